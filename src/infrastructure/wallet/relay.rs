use crate::constants::RPC_TIMEOUT;
use crate::core::errors::GathrfiError;
use crate::core::models::{Address, ProgrammableTransaction, TransactionReceipt};
use crate::infrastructure::wallet::WalletProvider;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Deserialize)]
struct AccountResponse {
    address: Option<Address>,
}

#[derive(Serialize)]
struct SignAndExecuteRequest<'a> {
    sender: &'a Address,
    transaction: &'a ProgrammableTransaction,
}

/// Forwards transactions to an external signer over HTTP:
/// `GET {base}/account` and `POST {base}/sign-and-execute`.
/// Without a base URL no account is connected.
pub struct RelayWallet {
    http: reqwest::Client,
    base_url: Option<String>,
}

impl RelayWallet {
    pub fn new(base_url: Option<String>) -> Result<Self, GathrfiError> {
        let http = reqwest::Client::builder()
            .timeout(RPC_TIMEOUT)
            .build()
            .map_err(|e| GathrfiError::WalletError(e.to_string()))?;
        Ok(RelayWallet {
            http,
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
        })
    }

    fn endpoint(&self, path: &str) -> Result<String, GathrfiError> {
        self.base_url
            .as_ref()
            .map(|base| format!("{}/{}", base, path))
            .ok_or(GathrfiError::NoWalletAccount)
    }
}

#[async_trait]
impl WalletProvider for RelayWallet {
    async fn current_account(&self) -> Result<Option<Address>, GathrfiError> {
        if self.base_url.is_none() {
            return Ok(None);
        }
        let response = self
            .http
            .get(self.endpoint("account")?)
            .send()
            .await
            .map_err(|e| GathrfiError::WalletError(e.to_string()))?;
        if !response.status().is_success() {
            return Err(GathrfiError::WalletError(format!("account lookup failed: HTTP {}", response.status())));
        }
        let account: AccountResponse = response
            .json()
            .await
            .map_err(|e| GathrfiError::WalletError(e.to_string()))?;
        Ok(account.address)
    }

    async fn sign_and_execute(&self, transaction: &ProgrammableTransaction) -> Result<TransactionReceipt, GathrfiError> {
        let sender = self.current_account().await?.ok_or(GathrfiError::NoWalletAccount)?;
        debug!("Relaying transaction with {} commands for {}", transaction.commands.len(), sender);
        let response = self
            .http
            .post(self.endpoint("sign-and-execute")?)
            .json(&SignAndExecuteRequest {
                sender: &sender,
                transaction,
            })
            .send()
            .await
            .map_err(|e| GathrfiError::WalletError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GathrfiError::WalletError(format!("HTTP {}: {}", status, body)));
        }
        let receipt: TransactionReceipt = response
            .json()
            .await
            .map_err(|e| GathrfiError::WalletError(e.to_string()))?;
        info!("Transaction {} executed", receipt.digest);
        Ok(receipt)
    }
}
