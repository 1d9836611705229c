use super::{
    addr, create_test_service, create_test_service_with, expense_fields, seed_expense, test_settings, usdc_coin,
};
use crate::config::{Network, NetworkConfig, ServiceSettings};
use crate::constants::{
    EXPENSE_CREATED, EXPENSE_CREATE_FAILED, EXPENSE_SETTLED, EXPENSE_SETTLE_FAILED, EXPENSES_LOAD_FAILED,
    TEST_EXPENSE_CREATE_FAILED, TEST_EXPENSE_CREATED,
};
use crate::core::draft::{DraftMember, ExpenseDraft};
use crate::core::errors::GathrfiError;
use crate::core::models::{CallArg, Command, ExpenseEntry, NotificationLevel, PureValue, SettlementOption};
use crate::infrastructure::cache::Cache;
use crate::infrastructure::chain::in_memory::InMemoryChain;
use crate::infrastructure::poller::BalancePoller;
use std::sync::Arc;
use std::time::Duration;

fn dinner_draft(members: &[(&str, &str)]) -> ExpenseDraft {
    ExpenseDraft {
        description: "Dinner".to_string(),
        total_amount: "60".to_string(),
        members: members
            .iter()
            .map(|(address, amount)| DraftMember {
                address: address.to_string(),
                amount: amount.to_string(),
            })
            .collect(),
    }
}

#[tokio::test]
async fn lists_expenses_paid_then_owed() {
    let (alice, bob, carol) = (addr(0xa), addr(0xb), addr(0xc));
    let ctx = create_test_service(Some(alice.clone()));
    seed_expense(&ctx.chain, &addr(0xe1), &alice, "Dinner", &[(&alice, 10_000_000), (&bob, 20_000_000)]).await;
    seed_expense(&ctx.chain, &addr(0xe2), &bob, "Taxi", &[(&alice, 5_000_000)]).await;
    seed_expense(&ctx.chain, &addr(0xe3), &carol, "Hotel", &[(&bob, 5_000_000)]).await;

    let listing = ctx.service.list_expenses(&alice).await.unwrap();
    let ids: Vec<_> = listing.entries.iter().map(|e| e.expense_id().clone()).collect();
    assert_eq!(ids, vec![addr(0xe1), addr(0xe2)]);

    match &listing.entries[1] {
        ExpenseEntry::Ready(summary) => {
            assert_eq!(summary.description, "Taxi");
            assert_eq!(summary.viewer_owed, 5_000_000);
            assert!(!summary.is_payer);
        }
        other => panic!("expected ready entry, got {:?}", other),
    }
}

#[tokio::test]
async fn failed_object_reads_do_not_hide_other_expenses() {
    let alice = addr(0xa);
    let ctx = create_test_service(Some(alice.clone()));
    seed_expense(&ctx.chain, &addr(0xe1), &alice, "Dinner", &[(&alice, 10_000_000)]).await;
    seed_expense(&ctx.chain, &addr(0xe2), &alice, "Lunch", &[(&alice, 10_000_000)]).await;
    ctx.chain.fail_object(&addr(0xe2)).await;

    let listing = ctx.service.list_expenses(&alice).await.unwrap();
    assert_eq!(listing.entries.len(), 2);
    let unavailable = listing
        .entries
        .iter()
        .filter(|e| matches!(e, ExpenseEntry::Unavailable { .. }))
        .count();
    assert_eq!(unavailable, 1);
}

#[tokio::test]
async fn event_query_failure_notifies_and_errors() {
    let ctx = create_test_service(Some(addr(0xa)));
    ctx.chain.fail_event_queries(true).await;

    let result = ctx.service.list_expenses(&addr(0xa)).await;
    assert!(matches!(result, Err(GathrfiError::RpcError(_))));

    let notifications = ctx.service.notifications().await.unwrap();
    assert_eq!(notifications[0].level, NotificationLevel::Error);
    assert_eq!(notifications[0].message, EXPENSES_LOAD_FAILED);
}

#[tokio::test]
async fn scans_additional_event_pages_when_configured() {
    let alice = addr(0xa);
    let mut settings = test_settings();
    settings.event_query_limit = 1;
    settings.event_query_pages = 3;
    let ctx = create_test_service_with(Some(alice.clone()), settings, InMemoryChain::new());
    for id in [0xe1, 0xe2, 0xe3] {
        seed_expense(&ctx.chain, &addr(id), &alice, "Split", &[(&alice, 1_000_000)]).await;
    }

    let listing = ctx.service.list_expenses(&alice).await.unwrap();
    assert_eq!(listing.entries.len(), 3);

    let mut settings = test_settings();
    settings.event_query_limit = 1;
    let ctx = create_test_service_with(Some(alice.clone()), settings, InMemoryChain::new());
    for id in [0xe1, 0xe2, 0xe3] {
        seed_expense(&ctx.chain, &addr(id), &alice, "Split", &[(&alice, 1_000_000)]).await;
    }
    let listing = ctx.service.list_expenses(&alice).await.unwrap();
    assert_eq!(listing.entries.len(), 1);
    assert_eq!(listing.entries[0].expense_id(), &addr(0xe3));
}

#[tokio::test]
async fn expense_detail_reports_settle_option() {
    let (alice, bob) = (addr(0xa), addr(0xb));
    let ctx = create_test_service(Some(bob.clone()));
    seed_expense(&ctx.chain, &addr(0xe1), &alice, "Dinner", &[(&alice, 10_000_000), (&bob, 20_000_000)]).await;

    let detail = ctx.service.expense_detail(&addr(0xe1), &bob).await.unwrap();
    assert!(matches!(detail.settlement, SettlementOption::CanSettle { amount: 20_000_000, .. }));
    assert_eq!(detail.members.len(), 2);

    let missing = ctx.service.expense_detail(&addr(0xe9), &bob).await;
    assert!(matches!(missing, Err(GathrfiError::ExpenseNotFound(_))));
}

#[tokio::test]
async fn creates_expense_through_the_wallet() {
    let alice = addr(0xa);
    let ctx = create_test_service(Some(alice.clone()));
    let alice_hex = alice.to_string();
    let draft = dinner_draft(&[(alice_hex.as_str(), "20"), ("0xb", "40")]);

    let receipt = ctx.service.create_expense(&draft).await.unwrap();
    assert_eq!(receipt.status.as_deref(), Some("success"));

    let executed = ctx.wallet.executed().await;
    assert_eq!(executed.len(), 1);
    let call = executed[0].move_calls().next().unwrap();
    assert_eq!(call.function, "add_expense");
    assert_eq!(call.package, test_settings().network.package);
    assert_eq!(
        executed[0].inputs[3],
        CallArg::Pure {
            value: PureValue::VectorU64(vec![20_000_000, 40_000_000])
        }
    );

    let notifications = ctx.service.notifications().await.unwrap();
    assert_eq!(notifications[0].level, NotificationLevel::Success);
    assert_eq!(notifications[0].message, EXPENSE_CREATED);
}

#[tokio::test]
async fn invalid_draft_is_not_submitted() {
    let ctx = create_test_service(Some(addr(0xa)));
    let draft = dinner_draft(&[("0xa", "20"), ("0xb", "30")]);

    let result = ctx.service.create_expense(&draft).await;
    assert!(matches!(result, Err(GathrfiError::UnbalancedSplit { .. })));
    assert!(ctx.wallet.executed().await.is_empty());

    let notifications = ctx.service.notifications().await.unwrap();
    assert_eq!(notifications[0].level, NotificationLevel::Error);
    assert!(notifications[0].message.starts_with(EXPENSE_CREATE_FAILED));
}

#[tokio::test]
async fn creating_requires_a_connected_wallet() {
    let ctx = create_test_service(None);
    let result = ctx.service.create_expense(&dinner_draft(&[("0xa", "60")])).await;
    assert!(matches!(result, Err(GathrfiError::NoWalletAccount)));

    let result = ctx.service.create_test_expense().await;
    assert!(matches!(result, Err(GathrfiError::NoWalletAccount)));
    assert!(ctx.wallet.executed().await.is_empty());
}

#[tokio::test]
async fn unconfigured_contract_blocks_transactions() {
    let settings = ServiceSettings::new(NetworkConfig::for_network(Network::Devnet));
    let ctx = create_test_service_with(Some(addr(0xa)), settings, InMemoryChain::new());
    assert!(!ctx.service.contract_info().configured);

    let result = ctx.service.create_expense(&dinner_draft(&[("0xa", "60")])).await;
    assert!(matches!(result, Err(GathrfiError::ContractNotConfigured(_))));
    let result = ctx.service.settle_expense(&addr(0xe1)).await;
    assert!(matches!(result, Err(GathrfiError::ContractNotConfigured(_))));
    assert!(ctx.wallet.executed().await.is_empty());
}

#[tokio::test]
async fn wallet_rejection_is_reported_once() {
    let alice = addr(0xa);
    let ctx = create_test_service(Some(alice.clone()));
    ctx.wallet.reject_with(Some("User rejected the request".to_string())).await;

    let result = ctx.service.create_test_expense().await;
    assert!(matches!(result, Err(GathrfiError::WalletError(_))));

    let notifications = ctx.service.notifications().await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(
        notifications[0].message,
        format!("{}: Wallet error: User rejected the request", TEST_EXPENSE_CREATE_FAILED)
    );
}

#[tokio::test]
async fn test_expense_targets_the_connected_account() {
    let alice = addr(0xa);
    let ctx = create_test_service(Some(alice.clone()));
    ctx.service.create_test_expense().await.unwrap();

    let executed = ctx.wallet.executed().await;
    assert_eq!(
        executed[0].inputs[2],
        CallArg::Pure {
            value: PureValue::VectorAddress(vec![alice.to_string()])
        }
    );
    let notifications = ctx.service.notifications().await.unwrap();
    assert_eq!(notifications[0].message, TEST_EXPENSE_CREATED);
}

#[tokio::test]
async fn settles_owed_share_with_merged_coins() {
    let (alice, bob) = (addr(0xa), addr(0xb));
    let ctx = create_test_service(Some(bob.clone()));
    seed_expense(&ctx.chain, &addr(0xe1), &alice, "Dinner", &[(&bob, 20_000_000)]).await;
    ctx.chain.add_coin(&bob, usdc_coin(1, 15_000_000)).await;
    ctx.chain.add_coin(&bob, usdc_coin(2, 10_000_000)).await;

    ctx.service.settle_expense(&addr(0xe1)).await.unwrap();

    let executed = ctx.wallet.executed().await;
    assert_eq!(executed.len(), 1);
    assert!(matches!(executed[0].commands[0], Command::MergeCoins { .. }));
    let call = executed[0].move_calls().next().unwrap();
    assert_eq!(call.function, "settle_expense");

    let notifications = ctx.service.notifications().await.unwrap();
    assert_eq!(notifications[0].message, EXPENSE_SETTLED);
}

#[tokio::test]
async fn settlement_rejects_payer_and_outsiders() {
    let (alice, bob) = (addr(0xa), addr(0xb));
    let ctx = create_test_service(Some(alice.clone()));
    seed_expense(&ctx.chain, &addr(0xe1), &alice, "Dinner", &[(&alice, 5_000_000), (&bob, 5_000_000)]).await;

    let result = ctx.service.settle_expense(&addr(0xe1)).await;
    assert!(matches!(result, Err(GathrfiError::PayerCannotSettle(_))));

    ctx.wallet.connect(Some(addr(0xd))).await;
    let result = ctx.service.settle_expense(&addr(0xe1)).await;
    assert!(matches!(result, Err(GathrfiError::NotParticipant(_))));

    let notifications = ctx.service.notifications().await.unwrap();
    assert_eq!(notifications.len(), 2);
    assert_eq!(
        notifications[0].message,
        format!("{}: {}", EXPENSE_SETTLE_FAILED, GathrfiError::NotParticipant(addr(0xd).to_string()))
    );
    assert_eq!(
        notifications[1].message,
        format!("{}: {}", EXPENSE_SETTLE_FAILED, GathrfiError::PayerCannotSettle(addr(0xe1).to_string()))
    );
    assert!(ctx.wallet.executed().await.is_empty());
}

#[tokio::test]
async fn settlement_rejects_closed_and_already_settled() {
    let (alice, bob, carol) = (addr(0xa), addr(0xb), addr(0xc));
    let ctx = create_test_service(Some(bob.clone()));
    ctx.chain
        .put_move_object(
            &addr(0xe1),
            expense_fields(&alice, "Done", 10_000_000, 10_000_000, true, &[(&bob, 10_000_000, true)]),
        )
        .await;
    ctx.chain
        .put_move_object(
            &addr(0xe2),
            expense_fields(
                &alice,
                "Half",
                20_000_000,
                10_000_000,
                false,
                &[(&bob, 10_000_000, true), (&carol, 10_000_000, false)],
            ),
        )
        .await;

    let result = ctx.service.settle_expense(&addr(0xe1)).await;
    assert!(matches!(result, Err(GathrfiError::ExpenseClosed(_))));
    let result = ctx.service.settle_expense(&addr(0xe2)).await;
    assert!(matches!(result, Err(GathrfiError::AlreadySettled(_))));
}

#[tokio::test]
async fn settlement_needs_enough_coins() {
    let (alice, bob) = (addr(0xa), addr(0xb));
    let ctx = create_test_service(Some(bob.clone()));
    seed_expense(&ctx.chain, &addr(0xe1), &alice, "Dinner", &[(&bob, 20_000_000)]).await;

    let result = ctx.service.settle_expense(&addr(0xe1)).await;
    assert!(matches!(result, Err(GathrfiError::NoCoins(_))));

    ctx.chain.add_coin(&bob, usdc_coin(1, 19_990_000)).await;
    match ctx.service.settle_expense(&addr(0xe1)).await {
        Err(GathrfiError::InsufficientBalance { available, required }) => {
            assert_eq!(available, "19.99");
            assert_eq!(required, "20.00");
        }
        other => panic!("expected insufficient balance, got {:?}", other),
    }
    assert!(ctx.wallet.executed().await.is_empty());
}

#[tokio::test]
async fn balance_sums_every_coin_page() {
    let bob = addr(0xb);
    let ctx = create_test_service_with(Some(bob.clone()), test_settings(), InMemoryChain::with_coin_page_size(2));
    for (i, amount) in [1_000_000, 2_000_000, 3_000_000, 4_500_000, 10_000].into_iter().enumerate() {
        ctx.chain.add_coin(&bob, usdc_coin(i as u16, amount)).await;
    }

    let balance = ctx.service.balance(&bob).await.unwrap();
    assert_eq!(balance.total, 10_510_000);
    assert_eq!(balance.formatted, "10.51");
    assert_eq!(balance.coin_count, 5);
}

#[tokio::test]
async fn balance_is_cached_until_a_transaction_invalidates_it() {
    let (alice, bob) = (addr(0xa), addr(0xb));
    let ctx = create_test_service(Some(bob.clone()));
    seed_expense(&ctx.chain, &addr(0xe1), &alice, "Dinner", &[(&bob, 1_000_000)]).await;
    ctx.chain.add_coin(&bob, usdc_coin(1, 5_000_000)).await;

    assert_eq!(ctx.service.balance(&bob).await.unwrap().total, 5_000_000);
    ctx.chain.add_coin(&bob, usdc_coin(2, 1_000_000)).await;
    assert_eq!(ctx.service.balance(&bob).await.unwrap().total, 5_000_000);

    ctx.service.settle_expense(&addr(0xe1)).await.unwrap();
    let coin_type = test_settings().network.coin_type;
    assert!(ctx.cache.get_balance(&bob, &coin_type).await.unwrap().is_none());
    assert_eq!(ctx.service.balance(&bob).await.unwrap().total, 6_000_000);
}

#[tokio::test]
async fn poller_refreshes_the_connected_balance() {
    let bob = addr(0xb);
    let ctx = create_test_service(Some(bob.clone()));
    ctx.chain.add_coin(&bob, usdc_coin(1, 7_000_000)).await;
    let coin_type = test_settings().network.coin_type;
    let cache = ctx.cache.clone();
    let service = Arc::new(ctx.service);

    let poller = BalancePoller::spawn(service, Duration::from_millis(10));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(poller.is_running());

    let snapshot = cache.get_balance(&bob, &coin_type).await.unwrap().unwrap();
    assert_eq!(snapshot.formatted, "7.00");
    drop(poller);
}

#[tokio::test]
async fn wallet_status_follows_connection() {
    let ctx = create_test_service(None);
    assert!(!ctx.service.wallet_status().await.unwrap().connected);
    assert!(ctx.service.refresh_current_balance().await.unwrap().is_none());

    ctx.wallet.connect(Some(addr(0xa))).await;
    let status = ctx.service.wallet_status().await.unwrap();
    assert_eq!(status.address, Some(addr(0xa)));

    let draft = ctx.service.new_draft().await.unwrap();
    assert_eq!(draft.members[0].address, addr(0xa).to_string());
}
