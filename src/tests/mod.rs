mod rpc_tests;
mod service_tests;

use crate::config::{Network, NetworkConfig, ServiceSettings};
use crate::constants::{EXPENSE_ADDED_EVENT, EXPENSE_SPLIT_EVENT};
use crate::core::models::{Address, ChainEvent, Coin, EventId, ObjectId};
use crate::core::services::GathrfiService;
use crate::infrastructure::cache::in_memory::InMemoryCache;
use crate::infrastructure::chain::in_memory::InMemoryChain;
use crate::infrastructure::notify::in_memory::InMemoryNotifier;
use crate::infrastructure::wallet::in_memory::InMemoryWallet;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_EVENT: AtomicU64 = AtomicU64::new(1);

pub type TestService = GathrfiService<Arc<InMemoryChain>, InMemoryWallet, InMemoryNotifier, InMemoryCache>;

pub struct TestContext {
    pub chain: Arc<InMemoryChain>,
    pub wallet: InMemoryWallet,
    pub cache: InMemoryCache,
    pub service: TestService,
}

/// Short test addresses: `addr(0xa1)` is `0x00..00a1`.
pub fn addr(n: u16) -> Address {
    Address::parse(&format!("0x{:x}", n)).unwrap()
}

pub fn test_settings() -> ServiceSettings {
    ServiceSettings::new(NetworkConfig::for_network(Network::Testnet))
}

pub fn create_test_service(account: Option<Address>) -> TestContext {
    create_test_service_with(account, test_settings(), InMemoryChain::new())
}

pub fn create_test_service_with(account: Option<Address>, settings: ServiceSettings, chain: InMemoryChain) -> TestContext {
    let chain = Arc::new(chain);
    let wallet = InMemoryWallet::new(account);
    let cache = InMemoryCache::new();
    let service = GathrfiService::new(chain.clone(), wallet.clone(), InMemoryNotifier::new(), cache.clone(), settings);
    TestContext {
        chain,
        wallet,
        cache,
        service,
    }
}

fn next_event_id() -> EventId {
    EventId {
        tx_digest: format!("tx{}", NEXT_EVENT.fetch_add(1, Ordering::Relaxed)),
        event_seq: "0".to_string(),
    }
}

pub fn event(name: &str, parsed_json: Value) -> ChainEvent {
    ChainEvent {
        id: next_event_id(),
        event_type: test_settings().network.event_type(name),
        sender: None,
        parsed_json,
        timestamp_ms: None,
    }
}

pub fn added_event(expense_id: &ObjectId, payer: &Address) -> ChainEvent {
    event(
        EXPENSE_ADDED_EVENT,
        json!({ "expense_id": expense_id.to_string(), "payer": payer.to_string(), "amount": "0" }),
    )
}

pub fn split_event(expense_id: &ObjectId, members: &[&Address]) -> ChainEvent {
    let members: Vec<String> = members.iter().map(|m| m.to_string()).collect();
    event(
        EXPENSE_SPLIT_EVENT,
        json!({ "expense_id": expense_id.to_string(), "split_members": members }),
    )
}

/// Move fields of an expense object as the fullnode returns them: u64s as
/// strings, the description as bytes, members as nested structs.
pub fn expense_fields(
    payer: &Address,
    description: &str,
    amount: u64,
    amount_settled: u64,
    fully_settled: bool,
    members: &[(&Address, u64, bool)],
) -> Value {
    let members: Vec<Value> = members
        .iter()
        .map(|(address, owed, settled)| {
            json!({
                "type": "gathrfi::Member",
                "fields": {
                    "addr": address.to_string(),
                    "amount_owed": owed.to_string(),
                    "has_settled": settled,
                }
            })
        })
        .collect();
    json!({
        "id": { "id": "0x0" },
        "payer": payer.to_string(),
        "amount": amount.to_string(),
        "amount_settled": amount_settled.to_string(),
        "description": description.as_bytes(),
        "fully_settled": fully_settled,
        "members": members,
    })
}

/// Stores the object and emits both creation events for an unsettled expense.
pub async fn seed_expense(
    chain: &InMemoryChain,
    expense_id: &ObjectId,
    payer: &Address,
    description: &str,
    members: &[(&Address, u64)],
) {
    let amount: u64 = members.iter().map(|(_, owed)| owed).sum();
    let rows: Vec<(&Address, u64, bool)> = members.iter().map(|(a, owed)| (*a, *owed, false)).collect();
    chain
        .put_move_object(expense_id, expense_fields(payer, description, amount, 0, false, &rows))
        .await;
    chain.emit_event(added_event(expense_id, payer)).await;
    let addresses: Vec<&Address> = members.iter().map(|(a, _)| *a).collect();
    chain.emit_event(split_event(expense_id, &addresses)).await;
}

pub fn usdc_coin(id: u16, balance: u64) -> Coin {
    Coin {
        coin_type: test_settings().network.coin_type,
        coin_object_id: addr(0xc000 + id),
        version: Some("1".to_string()),
        digest: None,
        balance,
    }
}
