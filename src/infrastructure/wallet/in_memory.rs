use crate::core::errors::GathrfiError;
use crate::core::models::{Address, ProgrammableTransaction, TransactionReceipt};
use crate::infrastructure::wallet::WalletProvider;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Wallet double that records every transaction it is asked to execute.
#[derive(Clone, Default)]
pub struct InMemoryWallet {
    account: Arc<RwLock<Option<Address>>>,
    executed: Arc<RwLock<Vec<ProgrammableTransaction>>>,
    rejection: Arc<RwLock<Option<String>>>,
}

impl InMemoryWallet {
    pub fn new(account: Option<Address>) -> Self {
        InMemoryWallet {
            account: Arc::new(RwLock::new(account)),
            ..Default::default()
        }
    }

    pub async fn connect(&self, account: Option<Address>) {
        *self.account.write().await = account;
    }

    /// Makes every following `sign_and_execute` fail with `reason`.
    pub async fn reject_with(&self, reason: Option<String>) {
        *self.rejection.write().await = reason;
    }

    pub async fn executed(&self) -> Vec<ProgrammableTransaction> {
        self.executed.read().await.clone()
    }
}

#[async_trait]
impl WalletProvider for InMemoryWallet {
    async fn current_account(&self) -> Result<Option<Address>, GathrfiError> {
        Ok(self.account.read().await.clone())
    }

    async fn sign_and_execute(&self, transaction: &ProgrammableTransaction) -> Result<TransactionReceipt, GathrfiError> {
        if self.account.read().await.is_none() {
            return Err(GathrfiError::NoWalletAccount);
        }
        if let Some(reason) = self.rejection.read().await.clone() {
            return Err(GathrfiError::WalletError(reason));
        }
        self.executed.write().await.push(transaction.clone());
        Ok(TransactionReceipt {
            digest: Uuid::new_v4().simple().to_string(),
            status: Some("success".to_string()),
        })
    }
}
