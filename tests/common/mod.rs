//! Shared utilities for integration testing against a mock ledger node.

#![allow(dead_code)]

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use ourchain_client::ledger::LedgerGateway;
use ourchain_client::wallet::SigningCredential;
use ourchain_client::{Amount, TransactionPipeline, WalletContext};

pub const OWNER: &str = "owner-address";
pub const CREDENTIAL: &str = "test-credential";

/// Scripted behaviour and request log of the mock node.
pub struct LedgerState {
    pub utxos: Vec<Value>,
    /// Endpoint paths in the order they were hit.
    pub calls: Vec<String>,
    pub utxo_queries: Vec<HashMap<String, String>>,
    pub create_bodies: Vec<Value>,
    pub sign_bodies: Vec<Value>,
    pub send_bodies: Vec<Value>,
    pub message_bodies: Vec<Value>,
    pub sign_complete: bool,
    pub contract_address: String,
    pub message_response: Value,
    /// Whole envelope to return for a path instead of the scripted one.
    pub overrides: HashMap<&'static str, Value>,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            utxos: Vec::new(),
            calls: Vec::new(),
            utxo_queries: Vec::new(),
            create_bodies: Vec::new(),
            sign_bodies: Vec::new(),
            send_bodies: Vec::new(),
            message_bodies: Vec::new(),
            sign_complete: true,
            contract_address: "contract-1".to_string(),
            message_response: json!({"value": 42}),
            overrides: HashMap::new(),
        }
    }
}

type Shared = Arc<Mutex<LedgerState>>;

/// A mock ledger node listening on an ephemeral port.
pub struct MockLedger {
    pub addr: SocketAddr,
    pub state: Shared,
}

impl MockLedger {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(LedgerState::default()));
        let app = Router::new()
            .route("/get/utxo", get(list_utxos))
            .route("/rawtransaction/create", post(create))
            .route("/rawtransaction/sign", post(sign))
            .route("/rawtransaction/send", post(send))
            .route("/get/contractmessage", post(contract_message))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn with_utxos(self, amounts: &[&str]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.utxos = amounts
                .iter()
                .enumerate()
                .map(|(i, amount)| utxo(&format!("tx{}", i), i as u32, amount))
                .collect();
        }
        self
    }

    pub fn set<F: FnOnce(&mut LedgerState)>(&self, f: F) {
        f(&mut self.state.lock().unwrap());
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn create_bodies(&self) -> Vec<Value> {
        self.state.lock().unwrap().create_bodies.clone()
    }

    pub fn context(&self) -> WalletContext {
        let gateway = LedgerGateway::new(&self.url(), None).unwrap();
        WalletContext::new(
            OWNER,
            SigningCredential::new(CREDENTIAL).unwrap(),
            gateway,
            amount("0.0001"),
        )
    }

    pub fn pipeline(&self) -> TransactionPipeline {
        TransactionPipeline::new(self.context())
    }
}

pub fn amount(s: &str) -> Amount {
    s.parse().unwrap()
}

/// Parse a JSON amount the way the node would receive it.
pub fn json_amount(v: &Value) -> Amount {
    serde_json::from_value(v.clone()).unwrap()
}

pub fn utxo(txid: &str, vout: u32, amount: &str) -> Value {
    let value: f64 = amount.parse().unwrap();
    json!({"txid": txid, "vout": vout, "amount": value, "address": OWNER})
}

fn success(data: Value) -> Json<Value> {
    Json(json!({"result": "success", "data": data}))
}

fn record(state: &mut LedgerState, path: &'static str) -> Option<Json<Value>> {
    state.calls.push(path.to_string());
    state.overrides.get(path).cloned().map(Json)
}

async fn list_utxos(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state.utxo_queries.push(query);
    if let Some(resp) = record(&mut state, "get/utxo") {
        return resp;
    }
    success(Value::Array(state.utxos.clone()))
}

async fn create(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state.create_bodies.push(body);
    if let Some(resp) = record(&mut state, "rawtransaction/create") {
        return resp;
    }
    let n = state.create_bodies.len();
    success(json!({"hex": format!("raw-{}", n), "contractAddress": state.contract_address}))
}

async fn sign(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut state = state.lock().unwrap();
    let raw = body["rawTransaction"].as_str().unwrap_or_default().to_string();
    state.sign_bodies.push(body);
    if let Some(resp) = record(&mut state, "rawtransaction/sign") {
        return resp;
    }
    success(json!({"complete": state.sign_complete, "hex": format!("signed-{}", raw)}))
}

async fn send(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut state = state.lock().unwrap();
    let raw = body["rawTransaction"].as_str().unwrap_or_default().to_string();
    state.send_bodies.push(body);
    if let Some(resp) = record(&mut state, "rawtransaction/send") {
        return resp;
    }
    success(json!(format!("txid-of-{}", raw)))
}

async fn contract_message(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state.message_bodies.push(body);
    if let Some(resp) = record(&mut state, "get/contractmessage") {
        return resp;
    }
    success(state.message_response.clone())
}

/// Start a raw backend that answers every connection with `status` and `body`.
pub async fn start_raw_backend(status: &'static str, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
