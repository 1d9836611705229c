//! Rebuilds the expenses a viewer is involved in from contract events and
//! object reads, and derives their settlement state from the viewer's side.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::core::errors::GathrfiError;
use crate::core::models::amount::{format_micro, progress_percent};
use crate::core::models::{
    Address, ChainEvent, Expense, ExpenseAdded, ExpenseDetail, ExpenseEntry, ExpenseSplit, ExpenseSummary,
    MemberEntry, MemberRow, ObjectData, ObjectId, SettlementOption, ViewerStatus,
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Involvement {
    /// Deduplicated, in order of first appearance.
    pub expense_ids: Vec<ObjectId>,
    pub skipped_events: usize,
}

impl Involvement {
    fn push(&mut self, seen: &mut HashSet<ObjectId>, id: ObjectId) {
        if seen.insert(id.clone()) {
            self.expense_ids.push(id);
        }
    }
}

/// Ids of expenses where `viewer` is the payer (from `ExpenseAdded`) or a
/// split member (from `ExpenseSplit`).
pub fn involved_expense_ids(viewer: &Address, added: &[ChainEvent], splits: &[ChainEvent]) -> Involvement {
    let mut involvement = Involvement::default();
    let mut seen = HashSet::new();

    for event in added {
        match ExpenseAdded::from_event(event) {
            Ok(added) if &added.payer == viewer => involvement.push(&mut seen, added.expense_id),
            Ok(_) => {}
            Err(e) => {
                warn!("Skipping expense event: {}", e);
                involvement.skipped_events += 1;
            }
        }
    }

    for event in splits {
        match ExpenseSplit::from_event(event) {
            Ok(split) if split.split_members.contains(viewer) => involvement.push(&mut seen, split.expense_id),
            Ok(_) => {}
            Err(e) => {
                warn!("Skipping split event: {}", e);
                involvement.skipped_events += 1;
            }
        }
    }

    debug!(
        "Viewer {} involved in {} expenses ({} events skipped)",
        viewer,
        involvement.expense_ids.len(),
        involvement.skipped_events
    );
    involvement
}

pub fn viewer_status(expense: &Expense, viewer: &Address) -> ViewerStatus {
    if expense.is_payer(viewer) {
        return ViewerStatus::Payer;
    }
    match expense.member(viewer) {
        Some(member) if member.has_settled => ViewerStatus::Settled,
        Some(member) if member.amount_owed > 0 => ViewerStatus::Owes {
            amount: member.amount_owed,
            formatted: format_micro(member.amount_owed),
        },
        _ => ViewerStatus::NotOwing,
    }
}

pub fn summarize(expense: &Expense, viewer: &Address) -> ExpenseSummary {
    let is_payer = expense.is_payer(viewer);
    let member = expense.member(viewer);
    ExpenseSummary {
        expense_id: expense.id.clone(),
        description: expense.description.clone(),
        payer: expense.payer.clone(),
        payer_short: expense.payer.short(),
        amount: expense.amount,
        amount_formatted: format_micro(expense.amount),
        amount_settled: expense.amount_settled,
        amount_settled_formatted: format_micro(expense.amount_settled),
        fully_settled: expense.fully_settled,
        progress_percent: progress_percent(expense.amount_settled, expense.amount),
        is_payer,
        viewer_owed: member.map_or(0, |m| m.amount_owed),
        viewer_has_settled: member.map_or(is_payer, |m| m.has_settled),
        viewer_status: viewer_status(expense, viewer),
    }
}

pub fn settlement_option(expense: &Expense, viewer: &Address) -> SettlementOption {
    if expense.is_payer(viewer) {
        return SettlementOption::Payer;
    }
    if expense.fully_settled {
        return SettlementOption::Closed;
    }
    match expense.member(viewer) {
        None => SettlementOption::NotParticipant,
        Some(member) if !member.has_settled && member.amount_owed > 0 => SettlementOption::CanSettle {
            amount: member.amount_owed,
            formatted: format_micro(member.amount_owed),
        },
        Some(member) if member.has_settled => SettlementOption::AlreadySettled,
        Some(_) => SettlementOption::NothingOwed,
    }
}

pub fn member_rows(expense: &Expense, viewer: &Address) -> Vec<MemberRow> {
    expense
        .members
        .iter()
        .map(|entry| match entry {
            MemberEntry::Split(member) => MemberRow::Member {
                address: member.address.clone(),
                address_short: member.address.short(),
                amount_owed: member.amount_owed,
                amount_owed_formatted: format_micro(member.amount_owed),
                has_settled: member.has_settled,
                is_payer: member.address == expense.payer,
                is_viewer: &member.address == viewer,
            },
            MemberEntry::Malformed { index, reason } => MemberRow::Malformed {
                index: *index,
                error: format!("Error loading member details: {}", reason),
            },
        })
        .collect()
}

pub fn detail(expense: &Expense, viewer: &Address) -> ExpenseDetail {
    ExpenseDetail {
        summary: summarize(expense, viewer),
        members: member_rows(expense, viewer),
        settlement: settlement_option(expense, viewer),
    }
}

/// Decodes a fetched object, or explains why it cannot be shown.
pub fn decode_fetched(id: &ObjectId, fetched: Result<Option<ObjectData>, GathrfiError>) -> Result<Expense, GathrfiError> {
    match fetched? {
        Some(object) => Expense::from_object(id, &object),
        None => Err(GathrfiError::ExpenseNotFound(id.to_string())),
    }
}

/// One listing entry per involved id. A failed fetch or undecodable object
/// becomes an `Unavailable` entry instead of aborting the listing.
pub fn listing_entry(id: &ObjectId, fetched: Result<Option<ObjectData>, GathrfiError>, viewer: &Address) -> ExpenseEntry {
    match decode_fetched(id, fetched) {
        Ok(expense) => ExpenseEntry::Ready(summarize(&expense, viewer)),
        Err(e) => {
            warn!("Expense {} unavailable: {}", id, e);
            ExpenseEntry::Unavailable {
                expense_id: id.clone(),
                reason: e.to_string(),
            }
        }
    }
}
