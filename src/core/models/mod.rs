pub mod address;
pub mod amount;
pub mod coin;
pub mod event;
pub mod expense;
pub mod notification;
pub mod object;
pub mod transaction;
pub mod view;

pub use address::{Address, ObjectId};
pub use coin::{BalanceSnapshot, Coin, CoinPage};
pub use event::{ChainEvent, EventId, EventPage, ExpenseAdded, ExpenseSplit};
pub use expense::{Expense, MemberEntry, MemberSplit};
pub use notification::{Notification, NotificationLevel};
pub use object::{ObjectContent, ObjectData};
pub use transaction::{Argument, CallArg, Command, MoveCall, ProgrammableTransaction, PureValue, TransactionReceipt};
pub use view::{ExpenseDetail, ExpenseEntry, ExpenseListing, ExpenseSummary, MemberRow, SettlementOption, ViewerStatus};
