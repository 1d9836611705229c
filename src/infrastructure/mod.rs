pub mod cache;
pub mod chain;
pub mod notify;
pub mod poller;
pub mod wallet;
