//! Gateway behaviour against hand-crafted node responses.

mod common;

use common::{start_raw_backend, MockLedger};
use reqwest::Method;
use serde_json::json;
use std::time::Duration;

use ourchain_client::ledger::{LedgerError, LedgerGateway};

#[tokio::test]
async fn test_call_returns_data_verbatim() {
    let ledger = MockLedger::start().await;
    ledger.set(|s| s.message_response = json!({"nested": [1, 2, {"k": null}]}));
    let gateway = LedgerGateway::new(&ledger.url(), None).unwrap();

    let data = gateway
        .call(
            "get/contractmessage",
            Method::POST,
            Some(&json!({"address": "c", "arguments": [""]})),
        )
        .await
        .unwrap();
    assert_eq!(data, json!({"nested": [1, 2, {"k": null}]}));
}

#[tokio::test]
async fn test_non_json_body_is_remote_error() {
    let addr = start_raw_backend("502 Bad Gateway", "<html>upstream down</html>").await;
    let gateway = LedgerGateway::new(&format!("http://{}/", addr), None).unwrap();

    let err = gateway.list_utxos("owner").await.unwrap_err();
    match err {
        LedgerError::Remote { message } => {
            assert!(message.starts_with("malformed response (HTTP 502"));
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn test_unexpected_data_shape_is_decode_error() {
    let addr = start_raw_backend("200 OK", r#"{"result":"success","data":{"not":"a list"}}"#).await;
    let gateway = LedgerGateway::new(&format!("http://{}/", addr), None).unwrap();

    let err = gateway.list_utxos("owner").await.unwrap_err();
    match err {
        LedgerError::Decode { path, .. } => assert_eq!(path, "get/utxo"),
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn test_failure_envelope_on_http_error_status() {
    let addr = start_raw_backend(
        "500 Internal Server Error",
        r#"{"result":"fail","message":"node syncing"}"#,
    )
    .await;
    let gateway = LedgerGateway::new(&format!("http://{}/", addr), None).unwrap();

    let err = gateway.send_raw_transaction("00").await.unwrap_err();
    assert_eq!(err.to_string(), "ledger rejected request: node syncing");
}

#[tokio::test]
async fn test_endpoint_path_prefix_is_kept() {
    let ledger = MockLedger::start().await;
    // Paths resolve under the base path, so a prefixed base misses the mock's routes.
    let gateway = LedgerGateway::new(&format!("{}api", ledger.url()), None).unwrap();
    assert_eq!(gateway.endpoint().path(), "/api/");
    assert!(gateway.list_utxos("owner").await.is_err());
    assert!(ledger.calls().is_empty());
}

#[tokio::test]
async fn test_timeout_surfaces_as_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // Accept and hold the connection without answering.
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let gateway =
        LedgerGateway::new(&format!("http://{}/", addr), Some(Duration::from_millis(200))).unwrap();
    let err = gateway.list_utxos("owner").await.unwrap_err();
    assert!(matches!(err, LedgerError::Transport(_)));
}
