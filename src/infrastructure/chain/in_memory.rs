use crate::core::errors::GathrfiError;
use crate::core::models::{Address, ChainEvent, Coin, CoinPage, EventId, EventPage, ObjectContent, ObjectData, ObjectId};
use crate::infrastructure::chain::ChainClient;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

const COIN_PAGE_SIZE: usize = 50;

/// Chain state held in memory; events are kept in emission order.
pub struct InMemoryChain {
    events: RwLock<HashMap<String, Vec<ChainEvent>>>,
    objects: RwLock<HashMap<ObjectId, ObjectData>>,
    coins: RwLock<HashMap<(Address, String), Vec<Coin>>>,
    failing_objects: RwLock<HashSet<ObjectId>>,
    failing_events: RwLock<bool>,
    coin_page_size: usize,
}

impl Default for InMemoryChain {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryChain {
    pub fn new() -> Self {
        Self::with_coin_page_size(COIN_PAGE_SIZE)
    }

    pub fn with_coin_page_size(coin_page_size: usize) -> Self {
        InMemoryChain {
            events: RwLock::new(HashMap::new()),
            objects: RwLock::new(HashMap::new()),
            coins: RwLock::new(HashMap::new()),
            failing_objects: RwLock::new(HashSet::new()),
            failing_events: RwLock::new(false),
            coin_page_size: coin_page_size.max(1),
        }
    }

    pub async fn emit_event(&self, event: ChainEvent) {
        self.events
            .write()
            .await
            .entry(event.event_type.clone())
            .or_default()
            .push(event);
    }

    /// Stores a Move object whose content fields are `fields`.
    pub async fn put_move_object(&self, object_id: &ObjectId, fields: serde_json::Value) {
        self.put_object(
            object_id,
            ObjectData {
                object_id: object_id.to_string(),
                version: Some("1".to_string()),
                digest: None,
                content: Some(ObjectContent {
                    data_type: "moveObject".to_string(),
                    type_name: None,
                    fields,
                }),
            },
        )
        .await;
    }

    pub async fn put_object(&self, object_id: &ObjectId, object: ObjectData) {
        self.objects.write().await.insert(object_id.clone(), object);
    }

    pub async fn add_coin(&self, owner: &Address, coin: Coin) {
        self.coins
            .write()
            .await
            .entry((owner.clone(), coin.coin_type.clone()))
            .or_default()
            .push(coin);
    }

    /// Subsequent reads of `object_id` fail with an RPC error.
    pub async fn fail_object(&self, object_id: &ObjectId) {
        self.failing_objects.write().await.insert(object_id.clone());
    }

    pub async fn fail_event_queries(&self, failing: bool) {
        *self.failing_events.write().await = failing;
    }
}

#[async_trait]
impl ChainClient for InMemoryChain {
    async fn query_events(
        &self,
        event_type: &str,
        cursor: Option<EventId>,
        limit: usize,
        descending: bool,
    ) -> Result<EventPage, GathrfiError> {
        if *self.failing_events.read().await {
            return Err(GathrfiError::RpcError("suix_queryEvents: unavailable".to_string()));
        }
        let events = self.events.read().await;
        let mut ordered: Vec<&ChainEvent> = events.get(event_type).map(|e| e.iter().collect()).unwrap_or_default();
        if descending {
            ordered.reverse();
        }
        let start = match cursor {
            Some(cursor) => ordered
                .iter()
                .position(|e| e.id == cursor)
                .map(|i| i + 1)
                .unwrap_or(ordered.len()),
            None => 0,
        };
        let end = start.saturating_add(limit).min(ordered.len());
        let data: Vec<ChainEvent> = ordered[start..end].iter().map(|e| (*e).clone()).collect();
        Ok(EventPage {
            next_cursor: data.last().map(|e| e.id.clone()),
            has_next_page: end < ordered.len(),
            data,
        })
    }

    async fn get_object(&self, object_id: &ObjectId) -> Result<Option<ObjectData>, GathrfiError> {
        if self.failing_objects.read().await.contains(object_id) {
            return Err(GathrfiError::RpcError(format!("sui_getObject: {} unavailable", object_id)));
        }
        Ok(self.objects.read().await.get(object_id).cloned())
    }

    async fn get_coins(
        &self,
        owner: &Address,
        coin_type: &str,
        cursor: Option<String>,
    ) -> Result<CoinPage, GathrfiError> {
        let coins = self.coins.read().await;
        let owned = coins
            .get(&(owner.clone(), coin_type.to_string()))
            .map(Vec::as_slice)
            .unwrap_or_default();
        let start = match cursor {
            Some(c) => c
                .parse::<usize>()
                .map_err(|_| GathrfiError::RpcError(format!("suix_getCoins: bad cursor {}", c)))?,
            None => 0,
        };
        let start = start.min(owned.len());
        let end = (start + self.coin_page_size).min(owned.len());
        let has_next_page = end < owned.len();
        Ok(CoinPage {
            data: owned[start..end].to_vec(),
            next_cursor: has_next_page.then(|| end.to_string()),
            has_next_page,
        })
    }
}
