//! Value objects passed through the transaction pipeline.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::transaction::amount::Amount;

/// Reference to a single output of a prior transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub txid: String,
    pub vout: u32,
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

/// An unspent output the wallet may consume exactly once.
///
/// Owned by the ledger; the client only ever holds a read-only snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendableOutput {
    pub txid: String,
    pub vout: u32,
    pub amount: Amount,
    pub address: String,
}

impl SpendableOutput {
    pub fn outpoint(&self) -> OutPoint {
        OutPoint {
            txid: self.txid.clone(),
            vout: self.vout,
        }
    }
}

/// A destination credit in a new transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTarget {
    pub address: String,
    pub amount: Amount,
}

/// Node-encoded transaction returned by `rawtransaction/create`.
///
/// For contract deployments the node assigns `contract_address` at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    pub hex: String,
    #[serde(rename = "contractAddress", default, deserialize_with = "null_as_empty")]
    pub contract_address: String,
}

/// Transfers come back with `contractAddress: null` on some nodes.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Signed transaction ready for broadcast.
///
/// Deliberately not `Clone`: [`TransactionPipeline::broadcast`] consumes it,
/// so the same artifact cannot be submitted twice.
///
/// [`TransactionPipeline::broadcast`]: crate::transaction::TransactionPipeline::broadcast
#[derive(Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    hex: String,
}

impl SignedTransaction {
    pub(crate) fn new(hex: String) -> Self {
        Self { hex }
    }

    pub fn hex(&self) -> &str {
        &self.hex
    }

    pub(crate) fn into_hex(self) -> String {
        self.hex
    }
}

/// Transaction identifier returned by a successful broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(pub String);

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a contract deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployReceipt {
    pub txid: TxId,
    #[serde(rename = "contractAddress")]
    pub contract_address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spendable_output_wire_shape() {
        let json = r#"{"txid":"ab01","vout":2,"amount":1.5,"address":"owner"}"#;
        let utxo: SpendableOutput = serde_json::from_str(json).unwrap();
        assert_eq!(utxo.amount, "1.5".parse().unwrap());
        assert_eq!(utxo.outpoint().to_string(), "ab01:2");
    }

    #[test]
    fn test_unsigned_transaction_without_contract_address() {
        let tx: UnsignedTransaction = serde_json::from_str(r#"{"hex":"00ff"}"#).unwrap();
        assert_eq!(tx.hex, "00ff");
        assert!(tx.contract_address.is_empty());
    }

    #[test]
    fn test_unsigned_transaction_with_null_contract_address() {
        let tx: UnsignedTransaction =
            serde_json::from_str(r#"{"hex":"00","contractAddress":null}"#).unwrap();
        assert_eq!(tx.hex, "00");
        assert!(tx.contract_address.is_empty());
    }

    #[test]
    fn test_txid_is_transparent() {
        let txid: TxId = serde_json::from_str("\"deadbeef\"").unwrap();
        assert_eq!(txid, TxId("deadbeef".into()));
    }
}
