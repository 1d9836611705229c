pub mod draft;
pub mod errors;
pub mod models;
pub mod reconcile;
pub mod services;
pub mod transactions;
