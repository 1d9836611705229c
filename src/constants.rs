use std::time::Duration;

pub const MICRO_PER_UNIT: u64 = 1_000_000;
pub const SPLIT_TOLERANCE: f64 = 0.01;
pub const SPLIT_TOLERANCE_MICRO: u64 = 10_000;

pub const CONTRACT_MODULE: &str = "gathrfi";
pub const EXPENSE_ADDED_EVENT: &str = "ExpenseAdded";
pub const EXPENSE_SPLIT_EVENT: &str = "ExpenseSplit";
pub const ADD_EXPENSE_FUNCTION: &str = "add_expense";
pub const SETTLE_EXPENSE_FUNCTION: &str = "settle_expense";

pub const UNCONFIGURED_PACKAGE: &str = "0x0";
pub const NO_DESCRIPTION: &str = "No description";

pub const TEST_EXPENSE_DESCRIPTION: &str = "Test Expense";
pub const TEST_EXPENSE_AMOUNT_MICRO: u64 = 100 * MICRO_PER_UNIT;

pub const DEFAULT_EVENT_QUERY_LIMIT: usize = 50;
pub const DEFAULT_BALANCE_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const BALANCE_CACHE_TTL: Duration = Duration::from_secs(10);
pub const NOTIFICATION_CAPACITY: usize = 50;
pub const RPC_TIMEOUT: Duration = Duration::from_secs(30);

pub const EXPENSES_LOAD_FAILED: &str = "Failed to load expense details";
pub const EXPENSE_CREATED: &str = "Expense created successfully!";
pub const EXPENSE_CREATE_FAILED: &str = "Failed to create expense. Please try again.";
pub const TEST_EXPENSE_CREATED: &str = "Test expense created successfully!";
pub const TEST_EXPENSE_CREATE_FAILED: &str = "Failed to create test expense";
pub const EXPENSE_SETTLED: &str = "Expense settled successfully!";
pub const EXPENSE_SETTLE_FAILED: &str = "Failed to settle expense";
pub const BALANCE_FETCH_FAILED: &str = "Failed to fetch balance";
