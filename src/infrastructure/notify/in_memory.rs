use crate::constants::NOTIFICATION_CAPACITY;
use crate::core::errors::GathrfiError;
use crate::core::models::{Notification, NotificationLevel};
use crate::infrastructure::notify::Notifier;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Bounded buffer; the oldest notification is dropped once full.
#[derive(Clone)]
pub struct InMemoryNotifier {
    notifications: Arc<RwLock<VecDeque<Notification>>>,
    capacity: usize,
}

impl Default for InMemoryNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::with_capacity(NOTIFICATION_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        InMemoryNotifier {
            notifications: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn notify(&self, level: NotificationLevel, message: &str) -> Result<(), GathrfiError> {
        match level {
            NotificationLevel::Error => error!("{}", message),
            _ => info!("{}", message),
        }
        let mut notifications = self.notifications.write().await;
        if notifications.len() == self.capacity {
            notifications.pop_back();
        }
        notifications.push_front(Notification::new(level, message));
        Ok(())
    }

    async fn recent(&self) -> Result<Vec<Notification>, GathrfiError> {
        let notifications = self.notifications.read().await;
        Ok(notifications.iter().cloned().collect())
    }
}
