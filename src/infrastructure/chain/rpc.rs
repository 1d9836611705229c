use crate::constants::RPC_TIMEOUT;
use crate::core::errors::GathrfiError;
use crate::core::models::{Address, CoinPage, EventId, EventPage, ObjectData, ObjectId};
use crate::infrastructure::chain::ChainClient;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
pub(crate) struct ObjectResponse {
    #[serde(default)]
    data: Option<ObjectData>,
    #[serde(default)]
    error: Option<Value>,
}

/// Unwraps a JSON-RPC 2.0 envelope into its typed `result`.
pub(crate) fn decode_envelope<R: DeserializeOwned>(method: &str, body: Value) -> Result<R, GathrfiError> {
    let response: RpcResponse = serde_json::from_value(body)
        .map_err(|e| GathrfiError::RpcError(format!("{}: invalid response: {}", method, e)))?;
    if let Some(err) = response.error {
        return Err(GathrfiError::RpcError(format!("{}: {} ({})", method, err.message, err.code)));
    }
    let result = response
        .result
        .ok_or_else(|| GathrfiError::RpcError(format!("{}: response has no result", method)))?;
    serde_json::from_value(result).map_err(|e| GathrfiError::RpcError(format!("{}: unexpected result: {}", method, e)))
}

/// `notExists` and `deleted` object errors mean there is nothing to show;
/// anything else is a failure.
pub(crate) fn object_from_response(response: ObjectResponse) -> Result<Option<ObjectData>, GathrfiError> {
    if let Some(data) = response.data {
        return Ok(Some(data));
    }
    match response.error {
        None => Ok(None),
        Some(err) => {
            let code = err.get("code").and_then(Value::as_str).unwrap_or_default();
            if code == "notExists" || code == "deleted" {
                Ok(None)
            } else {
                Err(GathrfiError::RpcError(format!("sui_getObject: {}", err)))
            }
        }
    }
}

/// Sui fullnode JSON-RPC client.
pub struct JsonRpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>) -> Result<Self, GathrfiError> {
        let http = reqwest::Client::builder().timeout(RPC_TIMEOUT).build()?;
        Ok(JsonRpcClient {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    async fn call<R: DeserializeOwned>(&self, method: &str, params: Value) -> Result<R, GathrfiError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!("RPC {} #{} -> {}", method, id, self.url);
        let response = self
            .http
            .post(&self.url)
            .json(&json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(GathrfiError::RpcError(format!("{}: HTTP {}", method, response.status())));
        }
        let body: Value = response.json().await?;
        decode_envelope(method, body)
    }
}

#[async_trait]
impl ChainClient for JsonRpcClient {
    async fn query_events(
        &self,
        event_type: &str,
        cursor: Option<EventId>,
        limit: usize,
        descending: bool,
    ) -> Result<EventPage, GathrfiError> {
        self.call(
            "suix_queryEvents",
            json!([{ "MoveEventType": event_type }, cursor, limit, descending]),
        )
        .await
    }

    async fn get_object(&self, object_id: &ObjectId) -> Result<Option<ObjectData>, GathrfiError> {
        let response: ObjectResponse = self
            .call(
                "sui_getObject",
                json!([object_id.to_string(), { "showContent": true }]),
            )
            .await?;
        object_from_response(response)
    }

    async fn get_coins(
        &self,
        owner: &Address,
        coin_type: &str,
        cursor: Option<String>,
    ) -> Result<CoinPage, GathrfiError> {
        self.call(
            "suix_getCoins",
            json!([owner.to_string(), coin_type, cursor, Value::Null]),
        )
        .await
    }
}
