pub mod api;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::GathrfiError;
pub use crate::core::services::GathrfiService;

#[cfg(test)]
mod tests;
