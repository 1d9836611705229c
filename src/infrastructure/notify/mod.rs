pub mod in_memory;

use crate::core::errors::GathrfiError;
use crate::core::models::{Notification, NotificationLevel};
use async_trait::async_trait;

/// Sink for the transient messages shown to the user after each action.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, level: NotificationLevel, message: &str) -> Result<(), GathrfiError>;
    /// Most recent first.
    async fn recent(&self) -> Result<Vec<Notification>, GathrfiError>;
}
