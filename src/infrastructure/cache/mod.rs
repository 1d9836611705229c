pub mod cache_keys;
pub mod in_memory;

use crate::core::errors::GathrfiError;
use crate::core::models::{Address, BalanceSnapshot};
use async_trait::async_trait;

#[async_trait]
pub trait Cache: Send + Sync {
    async fn get_balance(&self, owner: &Address, coin_type: &str) -> Result<Option<BalanceSnapshot>, GathrfiError>;
    async fn save_balance(&self, snapshot: &BalanceSnapshot, ttl: std::time::Duration) -> Result<(), GathrfiError>;
    async fn invalidate_balance(&self, owner: &Address, coin_type: &str) -> Result<(), GathrfiError>;
}
