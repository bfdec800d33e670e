//! HTTP gateway to the ledger node.
//!
//! # Responsibilities
//! - Execute one request/response cycle per call
//! - Unwrap the `{result, data, message}` envelope
//! - Decode endpoint-specific `data` shapes into typed records
//!
//! No retries and no caching happen here: every call reflects ledger state
//! at call time and every failure surfaces immediately.

use arc_swap::ArcSwap;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::ledger::types::{
    ContractMessageQuery, CreateRawTransaction, Envelope, LedgerError, LedgerResult,
    SendRawTransaction, SignRawTransaction, SignResponse,
};
use crate::observability::metrics;
use crate::transaction::types::{SpendableOutput, TxId, UnsignedTransaction};
use crate::wallet::credential::SigningCredential;

pub const UTXO_PATH: &str = "get/utxo";
pub const CREATE_PATH: &str = "rawtransaction/create";
pub const SIGN_PATH: &str = "rawtransaction/sign";
pub const SEND_PATH: &str = "rawtransaction/send";
pub const CONTRACT_MESSAGE_PATH: &str = "get/contractmessage";

/// Ledger node client with a rebindable base URL.
#[derive(Clone)]
pub struct LedgerGateway {
    client: Client,
    endpoint: Arc<ArcSwap<Url>>,
}

impl LedgerGateway {
    /// Create a gateway for the node at `endpoint`.
    ///
    /// `timeout` of `None` leaves calls without a client-side deadline.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> LedgerResult<Self> {
        let base = parse_endpoint(endpoint)?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        tracing::debug!(endpoint = %base, "Ledger gateway initialized");

        Ok(Self {
            client,
            endpoint: Arc::new(ArcSwap::from_pointee(base)),
        })
    }

    /// Current base URL.
    pub fn endpoint(&self) -> Url {
        self.endpoint.load().as_ref().clone()
    }

    /// Point subsequent calls at a different node.
    pub fn rebind(&self, endpoint: &str) -> LedgerResult<()> {
        let base = parse_endpoint(endpoint)?;
        tracing::info!(endpoint = %base, "Ledger endpoint rebound");
        self.endpoint.store(Arc::new(base));
        Ok(())
    }

    /// Execute one call and return the envelope's `data` verbatim.
    pub async fn call<B>(&self, path: &str, method: Method, body: Option<&B>) -> LedgerResult<Value>
    where
        B: Serialize + ?Sized,
    {
        let url = self
            .endpoint
            .load()
            .join(path)
            .map_err(|e| LedgerError::InvalidEndpoint(format!("{}: {}", path, e)))?;
        let label = metric_label(path);
        let started = Instant::now();

        let result = self.execute(url, method, body).await;

        metrics::record_gateway_call(label, result.is_ok(), started.elapsed());
        match &result {
            Ok(_) => tracing::debug!(path = label, "Ledger call succeeded"),
            Err(e) => tracing::warn!(path = label, error = %e, "Ledger call failed"),
        }
        result
    }

    async fn execute<B>(&self, url: Url, method: Method, body: Option<&B>) -> LedgerResult<Value>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let envelope: Envelope = serde_json::from_str(&text).map_err(|e| LedgerError::Remote {
            message: format!("malformed response (HTTP {}): {}", status, e),
        })?;
        envelope.into_data()
    }

    async fn call_typed<B, T>(&self, path: &str, method: Method, body: Option<&B>) -> LedgerResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let data = self.call(path, method, body).await?;
        serde_json::from_value(data).map_err(|e| LedgerError::Decode {
            path: metric_label(path).to_string(),
            reason: e.to_string(),
        })
    }

    /// Spendable outputs currently owned by `address`.
    pub async fn list_utxos(&self, address: &str) -> LedgerResult<Vec<SpendableOutput>> {
        let encoded: String = url::form_urlencoded::byte_serialize(address.as_bytes()).collect();
        let path = format!("{}?address={}", UTXO_PATH, encoded);
        self.call_typed::<(), _>(&path, Method::GET, None).await
    }

    /// Ask the node to encode an unsigned transaction.
    pub async fn create_raw_transaction(
        &self,
        request: &CreateRawTransaction,
    ) -> LedgerResult<UnsignedTransaction> {
        self.call_typed(CREATE_PATH, Method::POST, Some(request)).await
    }

    /// Have the node sign `raw_transaction` with the wallet credential.
    pub async fn sign_raw_transaction(
        &self,
        raw_transaction: &str,
        credential: &SigningCredential,
    ) -> LedgerResult<SignResponse> {
        let body = SignRawTransaction {
            raw_transaction,
            private_key: credential.expose(),
        };
        self.call_typed(SIGN_PATH, Method::POST, Some(&body)).await
    }

    /// Broadcast a signed transaction and return its identifier.
    pub async fn send_raw_transaction(&self, raw_transaction: &str) -> LedgerResult<TxId> {
        let body = SendRawTransaction { raw_transaction };
        self.call_typed(SEND_PATH, Method::POST, Some(&body)).await
    }

    /// Read-only contract query; the payload shape is contract-defined.
    pub async fn contract_message(&self, address: &str, arguments: &[String]) -> LedgerResult<Value> {
        let body = ContractMessageQuery { address, arguments };
        self.call(CONTRACT_MESSAGE_PATH, Method::POST, Some(&body)).await
    }
}

impl std::fmt::Debug for LedgerGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerGateway")
            .field("endpoint", &self.endpoint().as_str())
            .finish()
    }
}

/// Parse a base URL, making sure relative joins append to its path.
pub fn parse_endpoint(endpoint: &str) -> LedgerResult<Url> {
    let mut url = Url::parse(endpoint)
        .map_err(|e| LedgerError::InvalidEndpoint(format!("'{}': {}", endpoint, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(LedgerError::InvalidEndpoint(format!(
            "'{}': scheme must be http or https",
            endpoint
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn metric_label(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}
