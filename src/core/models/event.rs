use serde::{Deserialize, Serialize};

use super::address::{Address, ObjectId};
use crate::constants::CONTRACT_MODULE;
use crate::core::errors::GathrfiError;

/// Fully qualified Move event type, e.g. `0xabc::gathrfi::ExpenseAdded`.
pub fn event_type(package: &str, name: &str) -> String {
    format!("{}::{}::{}", package, CONTRACT_MODULE, name)
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventId {
    pub tx_digest: String,
    pub event_seq: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainEvent {
    pub id: EventId,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub parsed_json: serde_json::Value,
    #[serde(default)]
    pub timestamp_ms: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPage {
    pub data: Vec<ChainEvent>,
    #[serde(default)]
    pub next_cursor: Option<EventId>,
    #[serde(default)]
    pub has_next_page: bool,
}

#[derive(Deserialize)]
struct RawExpenseAdded {
    expense_id: String,
    payer: String,
}

#[derive(Deserialize)]
struct RawExpenseSplit {
    expense_id: String,
    split_members: Vec<String>,
}

/// Emitted by `add_expense`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseAdded {
    pub expense_id: ObjectId,
    pub payer: Address,
}

/// Emitted by `add_expense` alongside [`ExpenseAdded`], listing the split members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseSplit {
    pub expense_id: ObjectId,
    pub split_members: Vec<Address>,
}

fn malformed(event: &ChainEvent, reason: impl ToString) -> GathrfiError {
    GathrfiError::MalformedEvent(
        format!("{}:{}", event.id.tx_digest, event.id.event_seq),
        reason.to_string(),
    )
}

impl ExpenseAdded {
    pub fn from_event(event: &ChainEvent) -> Result<Self, GathrfiError> {
        let raw: RawExpenseAdded =
            serde_json::from_value(event.parsed_json.clone()).map_err(|e| malformed(event, e))?;
        Ok(ExpenseAdded {
            expense_id: ObjectId::parse(&raw.expense_id).map_err(|e| malformed(event, e))?,
            payer: Address::parse(&raw.payer).map_err(|e| malformed(event, e))?,
        })
    }
}

impl ExpenseSplit {
    pub fn from_event(event: &ChainEvent) -> Result<Self, GathrfiError> {
        let raw: RawExpenseSplit =
            serde_json::from_value(event.parsed_json.clone()).map_err(|e| malformed(event, e))?;
        let split_members = raw
            .split_members
            .iter()
            .map(|m| Address::parse(m))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| malformed(event, e))?;
        Ok(ExpenseSplit {
            expense_id: ObjectId::parse(&raw.expense_id).map_err(|e| malformed(event, e))?,
            split_members,
        })
    }
}
