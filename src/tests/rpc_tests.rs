use super::addr;
use crate::core::errors::GathrfiError;
use crate::core::models::{CoinPage, EventPage, Expense, ExpenseAdded};
use crate::infrastructure::chain::rpc::{ObjectResponse, decode_envelope, object_from_response};
use serde_json::json;

#[test]
fn decodes_event_page_from_query_events() {
    let body = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": {
            "data": [{
                "id": { "txDigest": "8Jp1", "eventSeq": "0" },
                "packageId": "0xad3c",
                "transactionModule": "gathrfi",
                "sender": "0xa",
                "type": "0xad3c::gathrfi::ExpenseAdded",
                "parsedJson": { "expense_id": "0xe1", "payer": "0xa", "amount": "5000000" },
                "bcs": "AAAA",
                "timestampMs": "1718000000000"
            }],
            "nextCursor": { "txDigest": "8Jp1", "eventSeq": "0" },
            "hasNextPage": false
        }
    });

    let page: EventPage = decode_envelope("suix_queryEvents", body).unwrap();
    assert_eq!(page.data.len(), 1);
    assert!(!page.has_next_page);
    assert_eq!(page.next_cursor.unwrap().tx_digest, "8Jp1");

    let added = ExpenseAdded::from_event(&page.data[0]).unwrap();
    assert_eq!(added.expense_id, addr(0xe1));
    assert_eq!(added.payer, addr(0xa));
}

#[test]
fn surfaces_json_rpc_errors() {
    let body = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "error": { "code": -32602, "message": "Invalid params" }
    });
    match decode_envelope::<EventPage>("suix_queryEvents", body) {
        Err(GathrfiError::RpcError(msg)) => {
            assert!(msg.contains("suix_queryEvents"));
            assert!(msg.contains("Invalid params"));
        }
        other => panic!("expected rpc error, got {:?}", other),
    }

    let empty = json!({ "jsonrpc": "2.0", "id": 1 });
    assert!(matches!(
        decode_envelope::<EventPage>("suix_queryEvents", empty),
        Err(GathrfiError::RpcError(_))
    ));
}

#[test]
fn decodes_coin_balances_given_as_strings() {
    let body = json!({
        "jsonrpc": "2.0",
        "id": 3,
        "result": {
            "data": [{
                "coinType": "0xad3c::mock_usdc::MOCK_USDC",
                "coinObjectId": "0xc1",
                "version": "12",
                "digest": "Fq3",
                "balance": "2500000",
                "previousTransaction": "9xz"
            }],
            "nextCursor": "0xc1",
            "hasNextPage": true
        }
    });
    let page: CoinPage = decode_envelope("suix_getCoins", body).unwrap();
    assert_eq!(page.data[0].balance, 2_500_000);
    assert_eq!(page.data[0].coin_object_id, addr(0xc1));
    assert!(page.has_next_page);
    assert_eq!(page.next_cursor.as_deref(), Some("0xc1"));
}

#[test]
fn decodes_expense_object() {
    let body = json!({
        "jsonrpc": "2.0",
        "id": 2,
        "result": {
            "data": {
                "objectId": "0xe1",
                "version": "7",
                "digest": "D1g",
                "content": {
                    "dataType": "moveObject",
                    "type": "0xad3c::gathrfi::Expense",
                    "hasPublicTransfer": false,
                    "fields": {
                        "id": { "id": "0xe1" },
                        "payer": "0xa",
                        "amount": "30000000",
                        "amount_settled": "10000000",
                        "description": [67, 111, 102, 102, 101, 101],
                        "fully_settled": false,
                        "members": [{
                            "type": "0xad3c::gathrfi::Member",
                            "fields": { "addr": "0xb", "amount_owed": "10000000", "has_settled": true }
                        }]
                    }
                }
            }
        }
    });
    let response: ObjectResponse = decode_envelope("sui_getObject", body).unwrap();
    let object = object_from_response(response).unwrap().unwrap();
    let expense = Expense::from_object(&addr(0xe1), &object).unwrap();
    assert_eq!(expense.description, "Coffee");
    assert_eq!(expense.amount, 30_000_000);
    assert!(expense.member(&addr(0xb)).is_some_and(|m| m.has_settled));
}

#[test]
fn missing_and_deleted_objects_are_none() {
    for code in ["notExists", "deleted"] {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 2,
            "result": { "error": { "code": code, "object_id": "0xe1" } }
        });
        let response: ObjectResponse = decode_envelope("sui_getObject", body).unwrap();
        assert!(object_from_response(response).unwrap().is_none());
    }

    let body = json!({
        "jsonrpc": "2.0",
        "id": 2,
        "result": { "error": { "code": "displayError", "error": "boom" } }
    });
    let response: ObjectResponse = decode_envelope("sui_getObject", body).unwrap();
    assert!(matches!(object_from_response(response), Err(GathrfiError::RpcError(_))));
}
