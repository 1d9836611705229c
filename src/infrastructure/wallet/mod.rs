pub mod in_memory;
pub mod relay;

use crate::core::errors::GathrfiError;
use crate::core::models::{Address, ProgrammableTransaction, TransactionReceipt};
use async_trait::async_trait;
use std::sync::Arc;

/// The connected wallet. Signing happens on the wallet side; this crate only
/// hands over the unsigned programmable transaction.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// `Ok(None)` when no account is connected.
    async fn current_account(&self) -> Result<Option<Address>, GathrfiError>;

    async fn sign_and_execute(&self, transaction: &ProgrammableTransaction) -> Result<TransactionReceipt, GathrfiError>;
}

#[async_trait]
impl<T: WalletProvider + ?Sized> WalletProvider for Arc<T> {
    async fn current_account(&self) -> Result<Option<Address>, GathrfiError> {
        (**self).current_account().await
    }

    async fn sign_and_execute(&self, transaction: &ProgrammableTransaction) -> Result<TransactionReceipt, GathrfiError> {
        (**self).sign_and_execute(transaction).await
    }
}
