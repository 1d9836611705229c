use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::address::{Address, ObjectId};
use super::object::ObjectData;
use crate::constants::NO_DESCRIPTION;
use crate::core::errors::GathrfiError;

const UNDECODABLE_DESCRIPTION: &str = "Unable to decode description";

#[derive(Clone, Debug, Serialize, PartialEq, Eq, ToSchema)]
pub struct MemberSplit {
    #[schema(value_type = String)]
    pub address: Address,
    /// Micro-units
    pub amount_owed: u64,
    pub has_settled: bool,
}

/// One record of an expense's `members` vector. Records that cannot be decoded
/// are kept in place so views can flag them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberEntry {
    Split(MemberSplit),
    Malformed { index: usize, reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: ObjectId,
    pub payer: Address,
    pub amount: u64,
    pub amount_settled: u64,
    pub description: String,
    pub fully_settled: bool,
    pub members: Vec<MemberEntry>,
}

impl Expense {
    pub fn from_object(id: &ObjectId, object: &ObjectData) -> Result<Self, GathrfiError> {
        let fields = object
            .move_fields()
            .ok_or_else(|| GathrfiError::MalformedObject(id.to_string(), "object has no Move content".to_string()))?;
        Self::from_fields(id, fields)
    }

    pub fn from_fields(id: &ObjectId, fields: &Value) -> Result<Self, GathrfiError> {
        let bad = |reason: String| GathrfiError::MalformedObject(id.to_string(), reason);

        let payer = fields
            .get("payer")
            .and_then(Value::as_str)
            .ok_or_else(|| bad("missing payer".to_string()))?;
        let payer = Address::parse(payer).map_err(|e| bad(e.to_string()))?;
        let amount = fields
            .get("amount")
            .and_then(u64_value)
            .ok_or_else(|| bad("missing or invalid amount".to_string()))?;
        let amount_settled = fields
            .get("amount_settled")
            .and_then(u64_value)
            .ok_or_else(|| bad("missing or invalid amount_settled".to_string()))?;
        let fully_settled = fields
            .get("fully_settled")
            .and_then(Value::as_bool)
            .ok_or_else(|| bad("missing or invalid fully_settled".to_string()))?;

        let members = match fields.get("members") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(records)) => records
                .iter()
                .enumerate()
                .map(|(index, record)| match decode_member(record) {
                    Ok(split) => MemberEntry::Split(split),
                    Err(reason) => MemberEntry::Malformed { index, reason },
                })
                .collect(),
            Some(_) => return Err(bad("members is not a list".to_string())),
        };

        Ok(Expense {
            id: id.clone(),
            payer,
            amount,
            amount_settled,
            description: decode_description(fields.get("description")),
            fully_settled,
            members,
        })
    }

    pub fn splits(&self) -> impl Iterator<Item = &MemberSplit> {
        self.members.iter().filter_map(|m| match m {
            MemberEntry::Split(split) => Some(split),
            MemberEntry::Malformed { .. } => None,
        })
    }

    /// First decoded member record for `address`.
    pub fn member(&self, address: &Address) -> Option<&MemberSplit> {
        self.splits().find(|m| &m.address == address)
    }

    pub fn is_payer(&self, address: &Address) -> bool {
        &self.payer == address
    }
}

/// u64 values arrive as JSON strings from the fullnode, but plain numbers are
/// accepted too.
fn u64_value(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

/// Nested Move structs come back as `{ "type": ..., "fields": { ... } }`.
fn member_field<'a>(record: &'a Value, key: &str) -> Option<&'a Value> {
    record
        .get(key)
        .or_else(|| record.get("fields").and_then(|f| f.get(key)))
}

fn decode_member(record: &Value) -> Result<MemberSplit, String> {
    let address = member_field(record, "addr")
        .or_else(|| member_field(record, "address"))
        .and_then(Value::as_str)
        .ok_or_else(|| "missing member address".to_string())?;
    let address = Address::parse(address).map_err(|e| e.to_string())?;
    let amount_owed = match member_field(record, "amount_owed") {
        None | Some(Value::Null) => 0,
        Some(v) => u64_value(v).ok_or_else(|| format!("invalid amount_owed {}", v))?,
    };
    let has_settled = member_field(record, "has_settled")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    Ok(MemberSplit {
        address,
        amount_owed,
        has_settled,
    })
}

fn decode_description(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(bytes)) => decode_bytes(bytes),
        Some(Value::Object(obj)) => match obj.get("data") {
            Some(Value::Array(bytes)) => decode_bytes(bytes),
            _ => NO_DESCRIPTION.to_string(),
        },
        _ => NO_DESCRIPTION.to_string(),
    }
}

fn decode_bytes(values: &[Value]) -> String {
    let bytes: Option<Vec<u8>> = values
        .iter()
        .map(|v| v.as_u64().and_then(|b| u8::try_from(b).ok()))
        .collect();
    match bytes {
        Some(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        None => UNDECODABLE_DESCRIPTION.to_string(),
    }
}
