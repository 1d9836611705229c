use crate::core::services::GathrfiService;
use crate::infrastructure::cache::Cache;
use crate::infrastructure::chain::ChainClient;
use crate::infrastructure::notify::Notifier;
use crate::infrastructure::wallet::WalletProvider;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Background refresh of the connected account's balance. The task stops
/// when the poller is dropped.
pub struct BalancePoller {
    handle: JoinHandle<()>,
}

impl BalancePoller {
    pub fn spawn<C, W, N, K>(service: Arc<GathrfiService<C, W, N, K>>, every: Duration) -> Self
    where
        C: ChainClient + 'static,
        W: WalletProvider + 'static,
        N: Notifier + 'static,
        K: Cache + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                match service.refresh_current_balance().await {
                    Ok(Some(snapshot)) => debug!(owner = %snapshot.owner, balance = %snapshot.formatted, "Balance refreshed"),
                    Ok(None) => debug!("No wallet connected, skipping balance refresh"),
                    Err(e) => warn!("Balance refresh failed: {}", e),
                }
            }
        });
        BalancePoller { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for BalancePoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
