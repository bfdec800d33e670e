//! Identity certificate record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Where a certificate's authority comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertType {
    P2p,
    Server,
    Blockchain,
    Full,
}

/// An identity certificate as exchanged in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AidCert {
    /// Kept exactly as issued; the fingerprint hashes it verbatim.
    pub aid: String,
    pub cert_type: CertType,
    #[serde(default)]
    pub claims: Map<String, Value>,
    #[serde(default)]
    pub setting: Map<String, Value>,
    #[serde(default)]
    pub verify_options: Map<String, Value>,
    #[serde(default)]
    pub contract_address: String,
    #[serde(rename = "BlockChainUrl", default)]
    pub blockchain_url: String,
    #[serde(default)]
    pub server_address: String,
    /// Signature over the certificate fingerprint.
    #[serde(default)]
    pub sign: String,
}

impl AidCert {
    pub fn new(aid: impl Into<String>, cert_type: CertType) -> Self {
        Self {
            aid: aid.into(),
            cert_type,
            claims: Map::new(),
            setting: Map::new(),
            verify_options: Map::new(),
            contract_address: String::new(),
            blockchain_url: String::new(),
            server_address: String::new(),
            sign: String::new(),
        }
    }
}
