use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: &str, description: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.to_string(),
            description: description.into(),
        }
    }
}

#[derive(Error, Debug, Serialize)]
pub enum GathrfiError {
    /// Generic input validation error with detailed field information
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Split amounts don't add up to the expense total
    #[error("Split amounts ({split}) must equal total amount ({total})")]
    UnbalancedSplit { total: String, split: String },

    #[error("No wallet account connected")]
    NoWalletAccount,

    #[error("Contract is not configured for network {0}")]
    ContractNotConfigured(String),

    #[error("Expense {0} not found")]
    ExpenseNotFound(String),

    #[error("Malformed expense object {0}: {1}")]
    MalformedObject(String, String),

    #[error("Malformed event {0}: {1}")]
    MalformedEvent(String, String),

    #[error("No USDC coins found for {0}")]
    NoCoins(String),

    #[error("Insufficient balance: {available} available, {required} required")]
    InsufficientBalance { available: String, required: String },

    #[error("Payer cannot settle their own expense {0}")]
    PayerCannotSettle(String),

    #[error("Expense {0} is already fully settled")]
    ExpenseClosed(String),

    #[error("{0} is not part of this expense split")]
    NotParticipant(String),

    #[error("{0} has already settled their portion")]
    AlreadySettled(String),

    #[error("{0} has no outstanding amount for this expense")]
    NothingOwed(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Wallet error: {0}")]
    WalletError(String),

    #[error("Cache error: {0}")]
    CacheError(String),
}

impl From<reqwest::Error> for GathrfiError {
    fn from(err: reqwest::Error) -> Self {
        GathrfiError::RpcError(err.to_string())
    }
}
