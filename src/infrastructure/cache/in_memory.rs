use crate::core::errors::GathrfiError;
use crate::core::models::{Address, BalanceSnapshot};
use crate::infrastructure::cache::Cache;
use crate::infrastructure::cache::cache_keys::balance_key;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryCache {
    cache: Arc<RwLock<HashMap<String, (BalanceSnapshot, chrono::DateTime<chrono::Utc>)>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        InMemoryCache {
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_balance(&self, owner: &Address, coin_type: &str) -> Result<Option<BalanceSnapshot>, GathrfiError> {
        let key = balance_key(owner, coin_type);
        {
            let cache = self.cache.read().await;
            match cache.get(&key) {
                None => return Ok(None),
                Some((snapshot, expiry)) if *expiry > chrono::Utc::now() => return Ok(Some(snapshot.clone())),
                Some(_) => {}
            }
        }
        let mut cache = self.cache.write().await;
        // re-check under the write lock, a fresh save may have landed
        if cache.get(&key).is_some_and(|(_, expiry)| *expiry <= chrono::Utc::now()) {
            cache.remove(&key);
        }
        Ok(cache.get(&key).map(|(snapshot, _)| snapshot.clone()))
    }

    async fn save_balance(&self, snapshot: &BalanceSnapshot, ttl: std::time::Duration) -> Result<(), GathrfiError> {
        let expiry = chrono::Utc::now()
            + chrono::Duration::from_std(ttl)
                .map_err(|e| GathrfiError::CacheError(format!("Failed to convert TTL: {}", e)))?;
        let now = chrono::Utc::now();
        let mut cache = self.cache.write().await;
        cache.retain(|_, (_, expiry)| *expiry > now);
        cache.insert(balance_key(&snapshot.owner, &snapshot.coin_type), (snapshot.clone(), expiry));
        Ok(())
    }

    async fn invalidate_balance(&self, owner: &Address, coin_type: &str) -> Result<(), GathrfiError> {
        let mut cache = self.cache.write().await;
        cache.remove(&balance_key(owner, coin_type));
        cache.retain(|_, (_, expiry)| *expiry > chrono::Utc::now());
        Ok(())
    }
}
