use crate::config::{Network, NetworkConfig, ServiceSettings};
use crate::constants::{
    BALANCE_FETCH_FAILED, EXPENSE_ADDED_EVENT, EXPENSE_CREATED, EXPENSE_CREATE_FAILED, EXPENSE_SETTLED,
    EXPENSE_SETTLE_FAILED, EXPENSE_SPLIT_EVENT, EXPENSES_LOAD_FAILED, TEST_EXPENSE_CREATE_FAILED, TEST_EXPENSE_CREATED,
};
use crate::core::draft::{ExpenseDraft, ValidatedExpense};
use crate::core::errors::GathrfiError;
use crate::core::models::amount::format_micro;
use crate::core::models::{
    Address, BalanceSnapshot, ChainEvent, Coin, Expense, ExpenseDetail, ExpenseListing, Notification,
    NotificationLevel, ObjectId, ProgrammableTransaction, SettlementOption, TransactionReceipt,
};
use crate::core::{reconcile, transactions};
use crate::infrastructure::cache::Cache;
use crate::infrastructure::chain::ChainClient;
use crate::infrastructure::notify::Notifier;
use crate::infrastructure::wallet::WalletProvider;
use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct ContractInfo {
    pub network: Network,
    pub rpc_url: String,
    pub package: String,
    pub module: String,
    pub coin_type: String,
    pub configured: bool,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct WalletStatus {
    pub connected: bool,
    #[schema(value_type = Option<String>)]
    pub address: Option<Address>,
}

pub struct GathrfiService<C: ChainClient, W: WalletProvider, N: Notifier, K: Cache> {
    chain: C,
    wallet: W,
    notifier: N,
    cache: K,
    settings: ServiceSettings,
}

impl<C: ChainClient, W: WalletProvider, N: Notifier, K: Cache> GathrfiService<C, W, N, K> {
    pub fn new(chain: C, wallet: W, notifier: N, cache: K, settings: ServiceSettings) -> Self {
        info!(
            "Initializing GathrfiService on {} (package {})",
            settings.network.network.name(),
            settings.network.package
        );
        GathrfiService {
            chain,
            wallet,
            notifier,
            cache,
            settings,
        }
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    pub fn contract_info(&self) -> ContractInfo {
        let network = &self.settings.network;
        ContractInfo {
            network: network.network,
            rpc_url: network.rpc_url.clone(),
            package: network.package.clone(),
            module: network.module(),
            coin_type: network.coin_type.clone(),
            configured: network.is_configured(),
        }
    }

    pub async fn wallet_status(&self) -> Result<WalletStatus, GathrfiError> {
        let address = self.wallet.current_account().await?;
        Ok(WalletStatus {
            connected: address.is_some(),
            address,
        })
    }

    /// Empty draft with the connected account as the first member.
    pub async fn new_draft(&self) -> Result<ExpenseDraft, GathrfiError> {
        let account = self.wallet.current_account().await?;
        Ok(ExpenseDraft::new(account.as_ref()))
    }

    pub async fn notifications(&self) -> Result<Vec<Notification>, GathrfiError> {
        self.notifier.recent().await
    }

    async fn notify(&self, level: NotificationLevel, message: &str) {
        if let Err(e) = self.notifier.notify(level, message).await {
            warn!("Dropping notification '{}': {}", message, e);
        }
    }

    fn require_contract(&self) -> Result<&NetworkConfig, GathrfiError> {
        let network = &self.settings.network;
        if network.is_configured() {
            Ok(network)
        } else {
            Err(GathrfiError::ContractNotConfigured(network.network.name().to_string()))
        }
    }

    async fn require_account(&self) -> Result<Address, GathrfiError> {
        self.wallet.current_account().await?.ok_or(GathrfiError::NoWalletAccount)
    }

    // EXPENSE LISTING

    async fn fetch_events(&self, event_name: &str) -> Result<Vec<ChainEvent>, GathrfiError> {
        let event_type = self.settings.network.event_type(event_name);
        let mut events = Vec::new();
        let mut cursor = None;
        for _ in 0..self.settings.event_query_pages.max(1) {
            let page = self
                .chain
                .query_events(&event_type, cursor.take(), self.settings.event_query_limit, true)
                .await?;
            events.extend(page.data);
            match page.next_cursor {
                Some(next) if page.has_next_page => cursor = Some(next),
                _ => break,
            }
        }
        debug!("Fetched {} {} events", events.len(), event_name);
        Ok(events)
    }

    async fn collect_listing(&self, viewer: &Address) -> Result<ExpenseListing, GathrfiError> {
        let (added, splits) = futures::try_join!(
            self.fetch_events(EXPENSE_ADDED_EVENT),
            self.fetch_events(EXPENSE_SPLIT_EVENT)
        )?;
        let involvement = reconcile::involved_expense_ids(viewer, &added, &splits);

        let fetches = involvement
            .expense_ids
            .iter()
            .map(|id| async move { (id, self.chain.get_object(id).await) });
        let entries = join_all(fetches)
            .await
            .into_iter()
            .map(|(id, fetched)| reconcile::listing_entry(id, fetched, viewer))
            .collect();

        Ok(ExpenseListing {
            viewer: viewer.clone(),
            entries,
            skipped_events: involvement.skipped_events,
        })
    }

    /// Every expense `viewer` paid for or was split into, newest first.
    pub async fn list_expenses(&self, viewer: &Address) -> Result<ExpenseListing, GathrfiError> {
        info!("Listing expenses for {}", viewer);
        match self.collect_listing(viewer).await {
            Ok(listing) => Ok(listing),
            Err(e) => {
                self.notify(NotificationLevel::Error, EXPENSES_LOAD_FAILED).await;
                Err(e)
            }
        }
    }

    pub async fn load_expense(&self, expense_id: &ObjectId) -> Result<Expense, GathrfiError> {
        let fetched = self.chain.get_object(expense_id).await;
        reconcile::decode_fetched(expense_id, fetched)
    }

    pub async fn expense_detail(&self, expense_id: &ObjectId, viewer: &Address) -> Result<ExpenseDetail, GathrfiError> {
        debug!("Loading expense {} for {}", expense_id, viewer);
        let expense = self.load_expense(expense_id).await?;
        Ok(reconcile::detail(&expense, viewer))
    }

    // TRANSACTIONS

    /// Hands the transaction to the wallet once. No retry on failure.
    async fn submit(
        &self,
        transaction: &ProgrammableTransaction,
        account: &Address,
        success: &str,
    ) -> Result<TransactionReceipt, GathrfiError> {
        let receipt = self.wallet.sign_and_execute(transaction).await?;
        info!("Transaction {} submitted by {}", receipt.digest, account);
        if let Err(e) = self.cache.invalidate_balance(account, &self.settings.network.coin_type).await {
            warn!("Failed to invalidate balance for {}: {}", account, e);
        }
        self.notify(NotificationLevel::Success, success).await;
        Ok(receipt)
    }

    /// Pushes the error notification for a failed build or submission.
    async fn report_failure<T>(
        &self,
        result: Result<T, GathrfiError>,
        message: impl FnOnce(&GathrfiError) -> String,
    ) -> Result<T, GathrfiError> {
        if let Err(e) = &result {
            self.notify(NotificationLevel::Error, &message(e)).await;
        }
        result
    }

    async fn prepare_expense(&self, expense: Result<ValidatedExpense, GathrfiError>) -> Result<(Address, ProgrammableTransaction), GathrfiError> {
        let network = self.require_contract()?;
        let account = self.require_account().await?;
        let expense = expense?;
        info!(
            "Building expense of {} split between {} members",
            format_micro(expense.total),
            expense.shares.len()
        );
        Ok((account, transactions::add_expense(&network.package, &expense)))
    }

    pub async fn create_expense(&self, draft: &ExpenseDraft) -> Result<TransactionReceipt, GathrfiError> {
        let result = match self.prepare_expense(draft.validate()).await {
            Ok((account, tx)) => self.submit(&tx, &account, EXPENSE_CREATED).await,
            Err(e) => Err(e),
        };
        self.report_failure(result, |e| format!("{} ({})", EXPENSE_CREATE_FAILED, e)).await
    }

    /// 100 USDC owed entirely by the connected account.
    pub async fn create_test_expense(&self) -> Result<TransactionReceipt, GathrfiError> {
        let account = self.wallet.current_account().await?;
        let expense = account
            .as_ref()
            .map(transactions::test_expense)
            .ok_or(GathrfiError::NoWalletAccount);
        let result = match self.prepare_expense(expense).await {
            Ok((account, tx)) => self.submit(&tx, &account, TEST_EXPENSE_CREATED).await,
            Err(e) => Err(e),
        };
        self.report_failure(result, |e| format!("{}: {}", TEST_EXPENSE_CREATE_FAILED, e)).await
    }

    async fn prepare_settlement(&self, expense_id: &ObjectId) -> Result<(Address, ProgrammableTransaction), GathrfiError> {
        let network = self.require_contract()?;
        let account = self.require_account().await?;
        let expense = self.load_expense(expense_id).await?;

        let owed = match reconcile::settlement_option(&expense, &account) {
            SettlementOption::CanSettle { amount, .. } => amount,
            SettlementOption::Payer => return Err(GathrfiError::PayerCannotSettle(expense_id.to_string())),
            SettlementOption::Closed => return Err(GathrfiError::ExpenseClosed(expense_id.to_string())),
            SettlementOption::NotParticipant => return Err(GathrfiError::NotParticipant(account.to_string())),
            SettlementOption::AlreadySettled => return Err(GathrfiError::AlreadySettled(account.to_string())),
            SettlementOption::NothingOwed => return Err(GathrfiError::NothingOwed(account.to_string())),
        };

        let coins = self.owned_coins(&account).await?;
        if coins.is_empty() {
            return Err(GathrfiError::NoCoins(account.to_string()));
        }
        let available: u64 = coins.iter().fold(0u64, |sum, c| sum.saturating_add(c.balance));
        if available < owed {
            return Err(GathrfiError::InsufficientBalance {
                available: format_micro(available),
                required: format_micro(owed),
            });
        }

        info!(
            "Settling {} of expense {} from {} coins",
            format_micro(owed),
            expense_id,
            coins.len()
        );
        let tx = transactions::settle_expense(&network.package, expense_id, &coins, &account)?;
        Ok((account, tx))
    }

    pub async fn settle_expense(&self, expense_id: &ObjectId) -> Result<TransactionReceipt, GathrfiError> {
        let result = match self.prepare_settlement(expense_id).await {
            Ok((account, tx)) => self.submit(&tx, &account, EXPENSE_SETTLED).await,
            Err(e) => Err(e),
        };
        self.report_failure(result, |e| format!("{}: {}", EXPENSE_SETTLE_FAILED, e)).await
    }

    // BALANCE

    /// All coins of the configured coin type owned by `owner`, across pages.
    pub async fn owned_coins(&self, owner: &Address) -> Result<Vec<Coin>, GathrfiError> {
        let coin_type = &self.settings.network.coin_type;
        let mut coins = Vec::new();
        let mut cursor = None;
        loop {
            let page = self.chain.get_coins(owner, coin_type, cursor.take()).await?;
            coins.extend(page.data);
            match page.next_cursor {
                Some(next) if page.has_next_page => cursor = Some(next),
                _ => break,
            }
        }
        Ok(coins)
    }

    pub async fn refresh_balance(&self, owner: &Address) -> Result<BalanceSnapshot, GathrfiError> {
        let coins = self.owned_coins(owner).await.map_err(|e| {
            warn!("{} for {}: {}", BALANCE_FETCH_FAILED, owner, e);
            e
        })?;
        let total = coins.iter().fold(0u64, |sum, c| sum.saturating_add(c.balance));
        let snapshot = BalanceSnapshot {
            owner: owner.clone(),
            coin_type: self.settings.network.coin_type.clone(),
            total,
            formatted: format_micro(total),
            coin_count: coins.len(),
            fetched_at: Utc::now(),
        };
        self.cache.save_balance(&snapshot, self.settings.balance_cache_ttl).await?;
        debug!("Balance of {} is {}", owner, snapshot.formatted);
        Ok(snapshot)
    }

    /// Cached balance while fresh, otherwise a new read.
    pub async fn balance(&self, owner: &Address) -> Result<BalanceSnapshot, GathrfiError> {
        if let Some(snapshot) = self.cache.get_balance(owner, &self.settings.network.coin_type).await? {
            return Ok(snapshot);
        }
        self.refresh_balance(owner).await
    }

    /// Refreshes the connected account's balance; `None` when no wallet is connected.
    pub async fn refresh_current_balance(&self) -> Result<Option<BalanceSnapshot>, GathrfiError> {
        match self.wallet.current_account().await? {
            Some(account) => self.refresh_balance(&account).await.map(Some),
            None => Ok(None),
        }
    }
}
