//! Viewer-specific projections of on-chain expenses.

use serde::Serialize;
use utoipa::ToSchema;

use super::address::{Address, ObjectId};

#[derive(Clone, Debug, Serialize, PartialEq, Eq, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ViewerStatus {
    Payer,
    Settled,
    Owes { amount: u64, formatted: String },
    NotOwing,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq, ToSchema)]
pub struct ExpenseSummary {
    #[schema(value_type = String)]
    pub expense_id: ObjectId,
    pub description: String,
    #[schema(value_type = String)]
    pub payer: Address,
    pub payer_short: String,
    pub amount: u64,
    pub amount_formatted: String,
    pub amount_settled: u64,
    pub amount_settled_formatted: String,
    pub fully_settled: bool,
    pub progress_percent: u8,
    pub is_payer: bool,
    /// Zero when the viewer has no member record.
    pub viewer_owed: u64,
    pub viewer_has_settled: bool,
    pub viewer_status: ViewerStatus,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ExpenseEntry {
    Ready(ExpenseSummary),
    Unavailable {
        #[schema(value_type = String)]
        expense_id: ObjectId,
        reason: String,
    },
}

impl ExpenseEntry {
    pub fn expense_id(&self) -> &ObjectId {
        match self {
            ExpenseEntry::Ready(summary) => &summary.expense_id,
            ExpenseEntry::Unavailable { expense_id, .. } => expense_id,
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq, ToSchema)]
pub struct ExpenseListing {
    #[schema(value_type = String)]
    pub viewer: Address,
    pub entries: Vec<ExpenseEntry>,
    /// Events dropped because their payload could not be decoded.
    pub skipped_events: usize,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq, ToSchema)]
#[serde(tag = "row", rename_all = "snake_case")]
pub enum MemberRow {
    Member {
        #[schema(value_type = String)]
        address: Address,
        address_short: String,
        amount_owed: u64,
        amount_owed_formatted: String,
        has_settled: bool,
        is_payer: bool,
        is_viewer: bool,
    },
    Malformed {
        index: usize,
        error: String,
    },
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq, ToSchema)]
#[serde(tag = "option", rename_all = "snake_case")]
pub enum SettlementOption {
    Payer,
    Closed,
    NotParticipant,
    CanSettle { amount: u64, formatted: String },
    AlreadySettled,
    NothingOwed,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq, ToSchema)]
pub struct ExpenseDetail {
    pub summary: ExpenseSummary,
    pub members: Vec<MemberRow>,
    pub settlement: SettlementOption,
}
