use crate::{
    api::models::*,
    constants::{EXPENSE_CREATED, EXPENSE_SETTLED, TEST_EXPENSE_CREATED},
    core::{
        draft::{DraftReport, ExpenseDraft},
        errors::GathrfiError,
        models::{Address, BalanceSnapshot, ExpenseDetail, ExpenseListing, Notification},
        services::{ContractInfo, GathrfiService, WalletStatus},
    },
    infrastructure::{
        cache::in_memory::InMemoryCache, chain::ChainClient, notify::in_memory::InMemoryNotifier,
        wallet::WalletProvider,
    },
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};

use std::sync::Arc;

pub type AppService = GathrfiService<Arc<dyn ChainClient>, Arc<dyn WalletProvider>, InMemoryNotifier, InMemoryCache>;

type AppState = State<Arc<AppService>>;

// Define API routes
pub fn api_routes(service: Arc<AppService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/contract", get(get_contract))
        .route("/wallet", get(get_wallet))
        .route("/accounts/{address}/expenses", get(list_expenses))
        .route("/accounts/{address}/balance", get(get_balance))
        .route("/expenses", post(create_expense))
        .route("/expenses/test", post(create_test_expense))
        .route("/expenses/draft", get(new_draft).post(report_draft))
        .route("/expenses/draft/equal-split", post(equal_split))
        .route("/expenses/{expense_id}", get(get_expense))
        .route("/expenses/{expense_id}/settle", post(settle_expense))
        .route("/notifications", get(get_notifications))
        .with_state(service)
}

async fn resolve_viewer(service: &AppService, viewer: Option<String>) -> Result<Address, ApiError> {
    match viewer {
        Some(raw) => parse_address(&raw),
        None => Ok(service
            .wallet_status()
            .await?
            .address
            .ok_or(GathrfiError::NoWalletAccount)?),
    }
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
async fn health(State(service): AppState) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        network: service.settings().network.network.name().to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/contract",
    responses(
        (status = 200, description = "Contract addresses for the configured network", body = ContractInfo)
    )
)]
async fn get_contract(State(service): AppState) -> Json<ContractInfo> {
    Json(service.contract_info())
}

#[utoipa::path(
    get,
    path = "/api/wallet",
    responses(
        (status = 200, description = "Connected wallet account, if any", body = WalletStatus),
        (status = 502, description = "Wallet unreachable", body = ErrorResponse)
    )
)]
async fn get_wallet(State(service): AppState) -> Result<Json<WalletStatus>, ApiError> {
    Ok(Json(service.wallet_status().await?))
}

#[utoipa::path(
    get,
    path = "/api/accounts/{address}/expenses",
    params(
        ("address" = String, Path, description = "Account whose expenses to list")
    ),
    responses(
        (status = 200, description = "Expenses the account paid for or is split into", body = ExpenseListing),
        (status = 400, description = "Invalid address", body = ErrorResponse),
        (status = 502, description = "Blockchain query failed", body = ErrorResponse)
    )
)]
async fn list_expenses(State(service): AppState, Path(address): Path<String>) -> Result<Json<ExpenseListing>, ApiError> {
    let viewer = parse_address(&address)?;
    Ok(Json(service.list_expenses(&viewer).await?))
}

#[utoipa::path(
    get,
    path = "/api/accounts/{address}/balance",
    params(
        ("address" = String, Path, description = "Coin owner")
    ),
    responses(
        (status = 200, description = "USDC balance", body = BalanceSnapshot),
        (status = 400, description = "Invalid address", body = ErrorResponse),
        (status = 502, description = "Blockchain query failed", body = ErrorResponse)
    )
)]
async fn get_balance(State(service): AppState, Path(address): Path<String>) -> Result<Json<BalanceSnapshot>, ApiError> {
    let owner = parse_address(&address)?;
    Ok(Json(service.balance(&owner).await?))
}

#[utoipa::path(
    get,
    path = "/api/expenses/{expense_id}",
    params(
        ("expense_id" = String, Path, description = "Expense object id"),
        ViewerQuery
    ),
    responses(
        (status = 200, description = "Expense with member rows and settle option", body = ExpenseDetail),
        (status = 400, description = "Invalid id or viewer", body = ErrorResponse),
        (status = 401, description = "No viewer and no wallet connected", body = ErrorResponse),
        (status = 404, description = "Expense not found", body = ErrorResponse),
        (status = 422, description = "Expense object could not be decoded", body = ErrorResponse)
    )
)]
async fn get_expense(
    State(service): AppState,
    Path(expense_id): Path<String>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<ExpenseDetail>, ApiError> {
    let expense_id = parse_address(&expense_id)?;
    let viewer = resolve_viewer(&service, query.viewer).await?;
    Ok(Json(service.expense_detail(&expense_id, &viewer).await?))
}

#[utoipa::path(
    get,
    path = "/api/expenses/draft",
    responses(
        (status = 200, description = "Empty draft prefilled with the connected account", body = ExpenseDraft)
    )
)]
async fn new_draft(State(service): AppState) -> Result<Json<ExpenseDraft>, ApiError> {
    Ok(Json(service.new_draft().await?))
}

#[utoipa::path(
    post,
    path = "/api/expenses/draft",
    request_body = ExpenseDraft,
    responses(
        (status = 200, description = "Running totals and validity of the draft", body = DraftReport)
    )
)]
async fn report_draft(Json(draft): Json<ExpenseDraft>) -> Json<DraftReport> {
    Json(draft.report())
}

#[utoipa::path(
    post,
    path = "/api/expenses/draft/equal-split",
    request_body = ExpenseDraft,
    responses(
        (status = 200, description = "Draft with the total divided across its members", body = ExpenseDraft)
    )
)]
async fn equal_split(Json(mut draft): Json<ExpenseDraft>) -> Json<ExpenseDraft> {
    draft.equal_split();
    Json(draft)
}

#[utoipa::path(
    post,
    path = "/api/expenses",
    request_body = ExpenseDraft,
    responses(
        (status = 200, description = "Expense submitted", body = TransactionResponse),
        (status = 400, description = "Invalid or unbalanced draft", body = ErrorResponse),
        (status = 401, description = "No wallet connected", body = ErrorResponse),
        (status = 502, description = "Wallet rejected the transaction", body = ErrorResponse),
        (status = 503, description = "Contract not configured", body = ErrorResponse)
    )
)]
async fn create_expense(
    State(service): AppState,
    Json(draft): Json<ExpenseDraft>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let receipt = service.create_expense(&draft).await?;
    Ok(Json(TransactionResponse {
        receipt,
        message: EXPENSE_CREATED.to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/expenses/test",
    responses(
        (status = 200, description = "Test expense submitted", body = TransactionResponse),
        (status = 401, description = "No wallet connected", body = ErrorResponse),
        (status = 502, description = "Wallet rejected the transaction", body = ErrorResponse),
        (status = 503, description = "Contract not configured", body = ErrorResponse)
    )
)]
async fn create_test_expense(State(service): AppState) -> Result<Json<TransactionResponse>, ApiError> {
    let receipt = service.create_test_expense().await?;
    Ok(Json(TransactionResponse {
        receipt,
        message: TEST_EXPENSE_CREATED.to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/expenses/{expense_id}/settle",
    params(
        ("expense_id" = String, Path, description = "Expense to pay the connected account's share of")
    ),
    responses(
        (status = 200, description = "Settlement submitted", body = TransactionResponse),
        (status = 401, description = "No wallet connected", body = ErrorResponse),
        (status = 402, description = "No coins or insufficient balance", body = ErrorResponse),
        (status = 403, description = "Payer or non-member", body = ErrorResponse),
        (status = 404, description = "Expense not found", body = ErrorResponse),
        (status = 409, description = "Already settled or closed", body = ErrorResponse),
        (status = 502, description = "Wallet rejected the transaction", body = ErrorResponse)
    )
)]
async fn settle_expense(
    State(service): AppState,
    Path(expense_id): Path<String>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let expense_id = parse_address(&expense_id)?;
    let receipt = service.settle_expense(&expense_id).await?;
    Ok(Json(TransactionResponse {
        receipt,
        message: EXPENSE_SETTLED.to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Recent notifications, newest first", body = Vec<Notification>)
    )
)]
async fn get_notifications(State(service): AppState) -> Result<Json<Vec<Notification>>, ApiError> {
    Ok(Json(service.notifications().await?))
}
