//! Admin API end-to-end against the in-memory chain

use aml_oracle_api::{create_router, AppState};
use aml_oracle_chain::{ExecuteMsg, MockChain};
use aml_oracle_core::{RiskScore, WalletRiskEntry};
use aml_oracle_signer::{verify, SigningService};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const ORACLE_KEY: &str = "0101010101010101010101010101010101010101010101010101010101010101";

struct Harness {
    chain: Arc<MockChain>,
    signer: Arc<SigningService>,
    app: Router,
}

fn harness() -> Harness {
    let chain = Arc::new(MockChain::new());
    let signer = Arc::new(SigningService::from_hex(ORACLE_KEY).unwrap());
    let state = AppState::new(chain.clone(), signer.clone(), "wasm").unwrap();
    Harness {
        chain,
        signer,
        app: create_router(state),
    }
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_update_signs_canonical_payload() {
    let h = harness();
    let (status, body) = send(
        &h.app,
        Method::POST,
        "/oracle-data",
        Some(r#"{"msg":[{"wallet":"wasm1a","reason":"sanctioned","risk_score":90}]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["result"]["tx_hash"].as_str().unwrap().starts_with("MOCKTX"));

    let executed = h.chain.executed();
    assert_eq!(executed.len(), 1);
    let ExecuteMsg::OracleDataUpdate { data, signature } = &executed[0] else {
        panic!("expected oracle_data_update, got {:?}", executed[0]);
    };
    assert_eq!(
        data,
        &vec![WalletRiskEntry::new("wasm1a", "sanctioned", RiskScore::new(90).unwrap())]
    );

    let signature = BASE64.decode(signature).unwrap();
    assert_eq!(signature.len(), 64);
    verify(
        br#"[["wasm1a","sanctioned",90]]"#,
        &signature,
        &h.signer.public_key_bytes(),
    )
    .unwrap();
}

#[tokio::test]
async fn test_update_forwards_presigned_signature() {
    let h = harness();
    let presigned = BASE64.encode([9u8; 64]);
    let body = json!({
        "msg": [{"wallet": "wasm1a", "reason": "mixer", "risk_score": 40}],
        "signature": presigned,
    })
    .to_string();

    let (status, _) = send(&h.app, Method::POST, "/oracle-data", Some(&body)).await;
    assert_eq!(status, StatusCode::OK);

    match &h.chain.executed()[0] {
        ExecuteMsg::OracleDataUpdate { signature, .. } => assert_eq!(signature, &presigned),
        other => panic!("unexpected message {:?}", other),
    }
}

#[tokio::test]
async fn test_update_rejects_short_presigned_signature() {
    let h = harness();
    let body = json!({
        "msg": [{"wallet": "wasm1a", "reason": "mixer"}],
        "signature": BASE64.encode([9u8; 32]),
    })
    .to_string();

    let (status, body) = send(&h.app, Method::POST, "/oracle-data", Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("64 bytes"));
    assert_eq!(h.chain.execute_attempts(), 0);
}

#[tokio::test]
async fn test_update_validation_errors() {
    let h = harness();
    let cases = [
        r#"{"msg":[]}"#,
        r#"{"msg":[{"wallet":"","reason":"x"}]}"#,
        r#"{"msg":[{"wallet":"cosmos1a","reason":"x"}]}"#,
        r#"{"msg":[{"wallet":"wasm1a","reason":"x","risk_score":101}]}"#,
        r#"{"msg":"not-an-array"}"#,
        r#"{}"#,
        "not json",
    ];

    for case in cases {
        let (status, body) = send(&h.app, Method::POST, "/oracle-data", Some(case)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "case {}", case);
        assert!(body["error"].is_string(), "case {}", case);
    }
    assert_eq!(h.chain.execute_attempts(), 0);
}

#[tokio::test]
async fn test_update_chain_rejection_is_bad_gateway() {
    let h = harness();
    h.chain.fail_executes(4, "signature verification failed");

    let (status, body) = send(
        &h.app,
        Method::POST,
        "/oracle-data",
        Some(r#"{"msg":[{"wallet":"wasm1a","reason":"sanctioned","risk_score":90}]}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("signature verification failed"));
}

#[tokio::test]
async fn test_get_oracle_data() {
    let h = harness();
    h.chain.set_wallets(vec![WalletRiskEntry::new(
        "wasm1a",
        "sanctioned",
        RiskScore::new(90).unwrap(),
    )]);

    let (status, body) = send(&h.app, Method::GET, "/oracle-data", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"data": [{"wallet": "wasm1a", "reason": "sanctioned", "risk_score": 90}]})
    );
}

#[tokio::test]
async fn test_get_oracle_data_chain_down() {
    let h = harness();
    h.chain.fail_queries("connection refused");
    let (status, _) = send(&h.app, Method::GET, "/oracle-data", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_delete_entry() {
    let h = harness();
    let (status, body) = send(
        &h.app,
        Method::POST,
        "/delete-oracle-entry",
        Some(r#"{"wallet":"wasm1a"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "deleted", "wallet": "wasm1a"}));
    assert_eq!(h.chain.execute_attempts(), 1);
    assert_eq!(
        h.chain.executed(),
        vec![ExecuteMsg::DeleteWallet {
            wallet: "wasm1a".to_string()
        }]
    );
}

#[tokio::test]
async fn test_delete_requires_wallet() {
    let h = harness();
    let (status, body) = send(&h.app, Method::POST, "/delete-oracle-entry", Some("{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "wallet is required"}));
    assert_eq!(h.chain.execute_attempts(), 0);
}

#[tokio::test]
async fn test_pubkey_and_health() {
    let h = harness();
    let address = h.signer.account_id("wasm").unwrap().to_string();

    let (status, body) = send(&h.app, Method::GET, "/oracle-pubkey", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["key_type"], "secp256k1");
    assert_eq!(body["pubkey"], h.signer.public_key_base64());
    assert_eq!(body["address"], address);

    let (status, body) = send(&h.app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "oracle": address}));
}
