//! Form state for a new expense: member rows, equal split, running totals
//! and the checks that gate submission.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::{SPLIT_TOLERANCE, SPLIT_TOLERANCE_MICRO};
use crate::core::errors::{FieldError, GathrfiError};
use crate::core::models::Address;
use crate::core::models::amount::{format_units, parse_amount, to_micro};

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DraftMember {
    pub address: String,
    pub amount: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemberField {
    Address,
    Amount,
}

/// Amounts are kept as the user typed them, in display units.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub description: String,
    pub total_amount: String,
    pub members: Vec<DraftMember>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DraftReport {
    pub total: f64,
    pub split: f64,
    pub total_formatted: String,
    pub split_formatted: String,
    pub balanced: bool,
    pub valid: bool,
    /// "Split amounts must equal total amount" is shown only once a total is entered.
    pub show_unbalanced_warning: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitShare {
    pub address: Address,
    pub amount: u64,
}

/// A draft that passed validation, converted to micro-units. Shares sum
/// exactly to `total`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedExpense {
    pub description: String,
    pub total: u64,
    pub shares: Vec<SplitShare>,
}

fn invalid(field: &str, title: &str, description: impl Into<String>) -> GathrfiError {
    GathrfiError::InvalidInput(field.to_string(), FieldError::new(field, title, description))
}

impl ExpenseDraft {
    /// Starts with a single row for the connected account.
    pub fn new(current_account: Option<&Address>) -> Self {
        ExpenseDraft {
            description: String::new(),
            total_amount: String::new(),
            members: vec![DraftMember {
                address: current_account.map(Address::to_string).unwrap_or_default(),
                amount: String::new(),
            }],
        }
    }

    pub fn reset(&mut self, current_account: Option<&Address>) {
        *self = Self::new(current_account);
    }

    pub fn add_member(&mut self) {
        self.members.push(DraftMember::default());
    }

    pub fn update_member(&mut self, index: usize, field: MemberField, value: impl Into<String>) -> bool {
        let Some(member) = self.members.get_mut(index) else {
            return false;
        };
        match field {
            MemberField::Address => member.address = value.into(),
            MemberField::Amount => member.amount = value.into(),
        }
        true
    }

    /// The last remaining row cannot be removed.
    pub fn remove_member(&mut self, index: usize) -> bool {
        if self.members.len() <= 1 || index >= self.members.len() {
            return false;
        }
        self.members.remove(index);
        true
    }

    /// Splits the total evenly in cents; leftover cents go to the first rows.
    pub fn equal_split(&mut self) {
        if self.members.is_empty() {
            return;
        }
        let Some(total) = parse_amount(&self.total_amount).filter(|t| *t >= 0.0) else {
            return;
        };
        let total_cents = (total * 100.0).round() as u64;
        let count = self.members.len() as u64;
        let (base, remainder) = (total_cents / count, total_cents % count);
        for (i, member) in self.members.iter_mut().enumerate() {
            let cents = base + u64::from((i as u64) < remainder);
            member.amount = format!("{}.{:02}", cents / 100, cents % 100);
        }
    }

    /// The entered total; blank or unparseable counts as 0.
    pub fn total(&self) -> f64 {
        parse_amount(&self.total_amount).unwrap_or(0.0)
    }

    /// Sum of the member amounts; blank or unparseable rows count as 0.
    pub fn calculated_total(&self) -> f64 {
        self.members
            .iter()
            .map(|m| parse_amount(&m.amount).unwrap_or(0.0))
            .sum()
    }

    pub fn is_balanced(&self) -> bool {
        (self.total() - self.calculated_total()).abs() < SPLIT_TOLERANCE
    }

    pub fn is_valid(&self) -> bool {
        let Some(total) = parse_amount(&self.total_amount) else {
            return false;
        };
        !self.description.trim().is_empty()
            && total > 0.0
            && (total - self.calculated_total()).abs() < SPLIT_TOLERANCE
            && self.members.iter().all(|m| {
                !m.address.trim().is_empty() && parse_amount(&m.amount).is_some_and(|a| a > 0.0)
            })
    }

    pub fn report(&self) -> DraftReport {
        let total = self.total();
        let split = self.calculated_total();
        let balanced = self.is_balanced();
        DraftReport {
            total,
            split,
            total_formatted: format_units(total),
            split_formatted: format_units(split),
            balanced,
            valid: self.is_valid(),
            show_unbalanced_warning: !balanced && total > 0.0,
        }
    }

    /// Field-level checks behind `is_valid`, plus address parsing and the
    /// conversion to micro-units.
    pub fn validate(&self) -> Result<ValidatedExpense, GathrfiError> {
        if self.description.trim().is_empty() {
            return Err(invalid("description", "Invalid description", "Description cannot be empty"));
        }
        let total = parse_amount(&self.total_amount)
            .filter(|t| *t > 0.0)
            .ok_or_else(|| invalid("total_amount", "Invalid Amount", "Amount must be greater than 0"))?;
        if self.members.is_empty() {
            return Err(invalid("members", "No members", "At least one member is required"));
        }

        let mut amounts = Vec::with_capacity(self.members.len());
        let mut shares = Vec::with_capacity(self.members.len());
        for (i, member) in self.members.iter().enumerate() {
            if member.address.trim().is_empty() {
                return Err(invalid(&format!("members[{}].address", i), "Invalid address", "Address cannot be empty"));
            }
            let amount = parse_amount(&member.amount).filter(|a| *a > 0.0).ok_or_else(|| {
                invalid(&format!("members[{}].amount", i), "Invalid Amount", "Amount must be greater than 0")
            })?;
            let address = Address::parse(&member.address).map_err(|_| {
                invalid(
                    &format!("members[{}].address", i),
                    "Invalid address",
                    format!("{} is not a valid address", member.address.trim()),
                )
            })?;
            amounts.push(amount);
            shares.push((address, amount));
        }

        let split: f64 = amounts.iter().sum();
        if (total - split).abs() >= SPLIT_TOLERANCE {
            return Err(GathrfiError::UnbalancedSplit {
                total: format_units(total),
                split: format_units(split),
            });
        }

        let too_large = || invalid("total_amount", "Amount Too Large", "Amount does not fit in u64 micro-units");
        let total_micro = to_micro(total).ok_or_else(too_large)?;
        let mut shares = shares
            .into_iter()
            .map(|(address, amount)| to_micro(amount).map(|amount| SplitShare { address, amount }))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(too_large)?;

        let split_micro: u128 = shares.iter().map(|s| s.amount as u128).sum();
        if split_micro != total_micro as u128 {
            let diff = total_micro as i128 - split_micro as i128;
            if diff.unsigned_abs() > SPLIT_TOLERANCE_MICRO as u128 {
                return Err(GathrfiError::UnbalancedSplit {
                    total: format_units(total),
                    split: format_units(split),
                });
            }
            let last_index = shares.len() - 1;
            let adjusted = shares[last_index].amount as i128 + diff;
            if adjusted <= 0 {
                return Err(invalid(
                    &format!("members[{}].amount", last_index),
                    "Invalid Amount",
                    "Amount must be greater than 0",
                ));
            }
            shares[last_index].amount = adjusted as u64;
        }

        Ok(ValidatedExpense {
            description: self.description.clone(),
            total: total_micro,
            shares,
        })
    }
}
