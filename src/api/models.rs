use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::errors::{FieldError, GathrfiError};
use crate::core::models::{Address, TransactionReceipt};

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub network: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ViewerQuery {
    /// Defaults to the connected wallet account.
    pub viewer: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct TransactionResponse {
    pub receipt: TransactionReceipt,
    pub message: String,
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

pub fn parse_address(raw: &str) -> Result<Address, ApiError> {
    Ok(Address::parse(raw)?)
}

// Newtype wrapper for GathrfiError to implement IntoResponse
pub struct ApiError(pub GathrfiError);

impl From<GathrfiError> for ApiError {
    fn from(err: GathrfiError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            GathrfiError::InvalidInput(..)
            | GathrfiError::InvalidAddress(_)
            | GathrfiError::UnbalancedSplit { .. } => StatusCode::BAD_REQUEST,
            GathrfiError::NoWalletAccount => StatusCode::UNAUTHORIZED,
            GathrfiError::ContractNotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            GathrfiError::ExpenseNotFound(_) => StatusCode::NOT_FOUND,
            GathrfiError::MalformedObject(..) | GathrfiError::MalformedEvent(..) => StatusCode::UNPROCESSABLE_ENTITY,
            GathrfiError::NoCoins(_) | GathrfiError::InsufficientBalance { .. } => StatusCode::PAYMENT_REQUIRED,
            GathrfiError::PayerCannotSettle(_) | GathrfiError::NotParticipant(_) => StatusCode::FORBIDDEN,
            GathrfiError::ExpenseClosed(_) | GathrfiError::AlreadySettled(_) | GathrfiError::NothingOwed(_) => {
                StatusCode::CONFLICT
            }
            GathrfiError::RpcError(_) | GathrfiError::WalletError(_) => StatusCode::BAD_GATEWAY,
            GathrfiError::CacheError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let (error, field) = match &self.0 {
            GathrfiError::InvalidInput(_, FieldError { field, title, description }) => {
                (format!("{}: {}", title, description), Some(field.clone()))
            }
            other => (other.to_string(), None),
        };
        (status, Json(ErrorResponse { error, field })).into_response()
    }
}
