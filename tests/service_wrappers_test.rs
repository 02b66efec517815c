//! Integration tests for the REST service wrappers
//!
//! Tests cover:
//! - Missing credential short-circuits before the network
//! - Both wallet list envelopes
//! - Wallet activity never failing
//! - Backend error bodies surfacing verbatim
//! - Request bodies on the wire

mod common;

use common::{anonymous_client, client, closed_port_url, quote_json, wallets_json, MockBackend, TOKEN};
use serde_json::json;
use thunder_wallet::api::types::{
    CreateWalletRequest, ExecuteTransferRequest, FixedSide, QuoteRequest, Recipient,
};
use thunder_wallet::error::NO_AUTH_TOKEN;
use thunder_wallet::{ClientError, TransferService, UserService, WalletService};

#[tokio::test]
async fn test_no_token_fails_without_request() {
    let mock = MockBackend::new();
    mock.respond("GET", "/wallets", 200, wallets_json());
    let base = mock.start().await;
    let client = anonymous_client(&base);

    let err = client.list_wallets().await.unwrap_err();
    assert!(err.is_unauthenticated());
    assert_eq!(err.to_string(), NO_AUTH_TOKEN);

    assert!(client.get_profile().await.unwrap_err().is_unauthenticated());
    assert!(client.set_pin("1234").await.unwrap_err().is_unauthenticated());
    let quote = QuoteRequest::new("w", "1", FixedSide::Source, &Recipient::Email("a@b.c".into()));
    assert!(client.quote(quote).await.unwrap_err().is_unauthenticated());

    assert!(mock.hits().is_empty());
}

#[tokio::test]
async fn test_no_token_activity_is_empty_failure() {
    let mock = MockBackend::new();
    let base = mock.start().await;

    let activity = anonymous_client(&base).wallet_activity("ngn-1").await;
    assert!(!activity.success);
    assert!(activity.data.items.is_empty());
    assert!(mock.hits().is_empty());
}

#[tokio::test]
async fn test_list_wallets_bare_array() {
    let mock = MockBackend::new();
    mock.respond("GET", "/wallets", 200, wallets_json());
    let base = mock.start().await;

    let wallets = client(&base).list_wallets().await.unwrap();
    assert_eq!(wallets.len(), 2);
    assert_eq!(wallets[1].currency.code, "USDT");
    assert_eq!(wallets[0].currency.id.as_deref(), Some("1"));

    let hits = mock.hits();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].method, "GET");
    assert_eq!(hits[0].path, "/wallets");
    assert_eq!(hits[0].authorization.as_deref(), Some(format!("Bearer {}", TOKEN).as_str()));
    assert!(hits[0].request_id.is_some());
}

#[tokio::test]
async fn test_list_wallets_data_envelope() {
    let mock = MockBackend::new();
    mock.respond("GET", "/wallets", 200, json!({ "data": wallets_json() }));
    let base = mock.start().await;

    let wallets = client(&base).list_wallets().await.unwrap();
    assert_eq!(wallets.len(), 2);
    assert_eq!(wallets[0].wallet_id, "ngn-1");
}

#[tokio::test]
async fn test_activity_passes_through_success() {
    let mock = MockBackend::new();
    mock.respond(
        "GET",
        "/wallets/ngn-1/activity",
        200,
        json!({ "success": true, "data": { "items": [ { "id": 9, "type": "transfer", "amount": 100 } ] } }),
    );
    let base = mock.start().await;

    let activity = client(&base).wallet_activity("ngn-1").await;
    assert!(activity.success);
    assert_eq!(activity.data.items[0].amount.as_deref(), Some("100"));
}

#[tokio::test]
async fn test_activity_server_error_is_swallowed() {
    let mock = MockBackend::new();
    mock.respond("GET", "/wallets/ngn-1/activity", 500, json!({ "message": "boom" }));
    let base = mock.start().await;

    let activity = client(&base).wallet_activity("ngn-1").await;
    assert!(!activity.success);
    assert!(activity.data.items.is_empty());
    assert_eq!(mock.hits().len(), 1);
}

#[tokio::test]
async fn test_activity_unreachable_backend_is_swallowed() {
    let base = closed_port_url().await;
    let activity = client(&base).wallet_activity("ngn-1").await;
    assert!(!activity.success);
    assert!(activity.data.items.is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let base = closed_port_url().await;
    let err = client(&base).list_wallets().await.unwrap_err();
    assert!(matches!(err, ClientError::Network { .. }));
}

#[tokio::test]
async fn test_error_body_surfaces_verbatim() {
    let mock = MockBackend::new();
    let body = json!({ "success": false, "message": "Invalid PIN", "code": "PIN_INVALID" });
    mock.respond("POST", "/transfers/execute", 400, body.clone());
    let base = mock.start().await;

    let err = client(&base)
        .execute(ExecuteTransferRequest {
            quote_reference: "QREF-77".to_string(),
            recipient_identifier: "ada@thunder.app".to_string(),
            pin: "0000".to_string(),
        })
        .await
        .unwrap_err();

    match &err {
        ClientError::Api { status, body: received } => {
            assert_eq!(*status, 400);
            assert_eq!(received, &body);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message(), "Invalid PIN");

    let hits = mock.hits();
    assert_eq!(hits[0].body["quoteReference"], "QREF-77");
    assert_eq!(hits[0].body["recipientIdentifier"], "ada@thunder.app");
    assert_eq!(hits[0].body["pin"], "0000");
}

#[tokio::test]
async fn test_plain_text_error_body() {
    let mock = MockBackend::new();
    mock.respond_raw("GET", "/users/profile", 502, "Bad Gateway");
    let base = mock.start().await;

    let err = client(&base).get_profile().await.unwrap_err();
    assert_eq!(err.status_code(), Some(502));
    assert_eq!(err.backend_message().as_deref(), Some("Bad Gateway"));
}

#[tokio::test]
async fn test_quote_body_is_camel_case() {
    let mock = MockBackend::new();
    mock.respond("POST", "/transfers/quote", 200, quote_json());
    let base = mock.start().await;

    let request = QuoteRequest::new(
        "usdt-1",
        "10",
        FixedSide::Destination,
        &Recipient::Address {
            address: "TXYZabc123".to_string(),
            network: "tron".to_string(),
        },
    );
    let quote = client(&base).quote(request).await.unwrap();
    assert_eq!(quote.reference(), "QREF-77");
    assert_eq!(quote.total_debit, "5050");

    let body = &mock.hits()[0].body;
    assert_eq!(body["scope"], "external");
    assert_eq!(body["walletId"], "usdt-1");
    assert_eq!(body["amount"], "10");
    assert_eq!(body["fixedSide"], "destination");
    assert_eq!(body["recipientAddress"], "TXYZabc123");
    assert_eq!(body["network"], "tron");
    assert!(body.get("recipientEmail").is_none());
}

#[tokio::test]
async fn test_pin_endpoints() {
    let mock = MockBackend::new();
    mock.respond("POST", "/users/set-pin", 200, json!({ "success": true }));
    mock.respond("POST", "/users/reset-pin", 200, json!({ "success": true }));
    mock.respond("POST", "/users/reset-pin/verify", 200, json!({ "success": true, "data": { "verified": true } }));
    let base = mock.start().await;
    let client = client(&base);

    let ack = client.set_pin("1234").await.unwrap();
    assert_eq!(ack["success"], true);
    client.reset_pin("4321").await.unwrap();
    let ack = client.verify_reset_pin("556677").await.unwrap();
    assert_eq!(ack["data"]["verified"], true);

    let hits = mock.hits();
    assert_eq!(hits[0].path, "/users/set-pin");
    assert_eq!(hits[0].body, json!({ "pin": "1234" }));
    assert_eq!(hits[1].path, "/users/reset-pin");
    assert_eq!(hits[2].path, "/users/reset-pin/verify");
    assert_eq!(hits[2].body, json!({ "code": "556677" }));
}

#[tokio::test]
async fn test_create_wallet() {
    let mock = MockBackend::new();
    mock.respond(
        "POST",
        "/wallets",
        201,
        json!({ "data": { "id": 31, "currency": { "code": "BTC" }, "address": "bc1qabc", "network": "bitcoin" } }),
    );
    let base = mock.start().await;

    let wallet = client(&base)
        .create_wallet(CreateWalletRequest {
            currency_id: "2".to_string(),
            network: "bitcoin".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(wallet.wallet_id, "31");
    assert_eq!(wallet.address.as_deref(), Some("bc1qabc"));
    assert_eq!(mock.hits()[0].body, json!({ "currencyId": "2", "network": "bitcoin" }));
}
