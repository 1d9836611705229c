use utoipa::OpenApi;

use crate::{
    api::models::{ErrorResponse, HealthResponse, TransactionResponse},
    config::Network,
    core::{
        draft::{DraftMember, DraftReport, ExpenseDraft, MemberField},
        models::{
            Argument, BalanceSnapshot, CallArg, Command, ExpenseDetail, ExpenseEntry, ExpenseListing, ExpenseSummary,
            MemberRow, MoveCall, Notification, NotificationLevel, ProgrammableTransaction, PureValue,
            SettlementOption, TransactionReceipt, ViewerStatus,
        },
        services::{ContractInfo, WalletStatus},
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::health,
        super::handlers::get_contract,
        super::handlers::get_wallet,
        super::handlers::list_expenses,
        super::handlers::get_balance,
        super::handlers::get_expense,
        super::handlers::new_draft,
        super::handlers::report_draft,
        super::handlers::equal_split,
        super::handlers::create_expense,
        super::handlers::create_test_expense,
        super::handlers::settle_expense,
        super::handlers::get_notifications
    ),
    components(schemas(
        HealthResponse,
        TransactionResponse,
        ErrorResponse,
        Network,
        ContractInfo,
        WalletStatus,
        ExpenseDraft,
        DraftMember,
        MemberField,
        DraftReport,
        ExpenseListing,
        ExpenseEntry,
        ExpenseSummary,
        ViewerStatus,
        ExpenseDetail,
        MemberRow,
        SettlementOption,
        BalanceSnapshot,
        Notification,
        NotificationLevel,
        TransactionReceipt,
        ProgrammableTransaction,
        Command,
        MoveCall,
        CallArg,
        PureValue,
        Argument
    )),
    info(
        title = "GathrFi API",
        description = "Split expenses between Sui accounts and settle them in USDC",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
