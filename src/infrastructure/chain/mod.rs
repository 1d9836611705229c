pub mod in_memory;
pub mod rpc;

use crate::core::errors::GathrfiError;
use crate::core::models::{Address, CoinPage, EventId, EventPage, ObjectData, ObjectId};
use async_trait::async_trait;
use std::sync::Arc;

/// Read side of the blockchain client.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn query_events(
        &self,
        event_type: &str,
        cursor: Option<EventId>,
        limit: usize,
        descending: bool,
    ) -> Result<EventPage, GathrfiError>;

    /// `Ok(None)` when the object does not exist (or was deleted).
    async fn get_object(&self, object_id: &ObjectId) -> Result<Option<ObjectData>, GathrfiError>;

    async fn get_coins(
        &self,
        owner: &Address,
        coin_type: &str,
        cursor: Option<String>,
    ) -> Result<CoinPage, GathrfiError>;
}

#[async_trait]
impl<T: ChainClient + ?Sized> ChainClient for Arc<T> {
    async fn query_events(
        &self,
        event_type: &str,
        cursor: Option<EventId>,
        limit: usize,
        descending: bool,
    ) -> Result<EventPage, GathrfiError> {
        (**self).query_events(event_type, cursor, limit, descending).await
    }

    async fn get_object(&self, object_id: &ObjectId) -> Result<Option<ObjectData>, GathrfiError> {
        (**self).get_object(object_id).await
    }

    async fn get_coins(
        &self,
        owner: &Address,
        coin_type: &str,
        cursor: Option<String>,
    ) -> Result<CoinPage, GathrfiError> {
        (**self).get_coins(owner, coin_type, cursor).await
    }
}
