//! Wire records and error definitions for the ledger node API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::transaction::contract::ContractRequest;
use crate::transaction::types::{OutPoint, OutputTarget};

/// Literal `result` value the node uses to mark success.
pub const SUCCESS_MARKER: &str = "success";

/// Detail used when a failed envelope carries no `message`.
pub const FALLBACK_MESSAGE: &str = "request failed";

/// Errors that can occur while talking to the ledger node.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Envelope `result` was not the success marker.
    #[error("ledger rejected request: {message}")]
    Remote { message: String },

    /// Connection, TLS, or timeout failure below the envelope.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Envelope succeeded but `data` had an unexpected shape.
    #[error("unexpected response from {path}: {reason}")]
    Decode { path: String, reason: String },

    /// Base URL or request path could not be turned into a URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Response wrapper shared by every node endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub result: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub message: Option<String>,
}

impl Envelope {
    /// Unwraps `data`, or turns a non-success result into [`LedgerError::Remote`].
    pub fn into_data(self) -> LedgerResult<Value> {
        if self.result == SUCCESS_MARKER {
            return Ok(self.data);
        }
        let message = self
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        Err(LedgerError::Remote { message })
    }
}

/// Body of `rawtransaction/create`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRawTransaction {
    pub inputs: Vec<OutPoint>,
    pub outputs: Vec<OutputTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<ContractRequest>,
}

/// Body of `rawtransaction/sign`.
#[derive(Serialize)]
pub(crate) struct SignRawTransaction<'a> {
    #[serde(rename = "rawTransaction")]
    pub raw_transaction: &'a str,
    #[serde(rename = "privateKey")]
    pub private_key: &'a str,
}

/// `data` of a successful `rawtransaction/sign`.
#[derive(Debug, Clone, Deserialize)]
pub struct SignResponse {
    pub complete: bool,
    #[serde(default)]
    pub hex: String,
}

/// Body of `rawtransaction/send`.
#[derive(Serialize)]
pub(crate) struct SendRawTransaction<'a> {
    #[serde(rename = "rawTransaction")]
    pub raw_transaction: &'a str,
}

/// Body of `get/contractmessage`.
#[derive(Serialize)]
pub(crate) struct ContractMessageQuery<'a> {
    pub address: &'a str,
    pub arguments: &'a [String],
}
