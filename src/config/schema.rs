//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from the TOML file.
//! Every section has defaults so a minimal file only names the wallet.

use serde::{Deserialize, Serialize};

use crate::transaction::amount::Amount;
use crate::wallet::credential::DEFAULT_CREDENTIAL_ENV_VAR;

/// Default fee charged per transaction (0.0001).
pub const DEFAULT_FEE: Amount = Amount::from_units(10_000);

/// Root configuration for the wallet client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WalletConfig {
    /// Ledger node connection settings.
    pub ledger: LedgerConfig,

    /// Wallet identity and fee settings.
    pub wallet: WalletSection,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Ledger node connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Base URL of the node API.
    pub endpoint: String,

    /// Per-request deadline in seconds; 0 disables it.
    pub request_timeout_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/".to_string(),
            request_timeout_secs: 0,
        }
    }
}

/// Wallet identity and fee settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletSection {
    /// Address whose outputs fund transactions and receive change.
    pub owner_address: String,

    /// Environment variable holding the signing credential.
    pub private_key_env: String,

    /// Fee applied when a call does not pass one explicitly.
    pub default_fee: Amount,
}

impl Default for WalletSection {
    fn default() -> Self {
        Self {
            owner_address: String::new(),
            private_key_env: DEFAULT_CREDENTIAL_ENV_VAR.to_string(),
            default_fee: DEFAULT_FEE,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WalletConfig::default();
        assert_eq!(config.wallet.default_fee.to_string(), "0.0001");
        assert_eq!(config.wallet.private_key_env, "OURCHAIN_PRIVATE_KEY");
        assert_eq!(config.ledger.request_timeout_secs, 0);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_minimal_toml() {
        let config: WalletConfig = toml::from_str(
            r#"
            [wallet]
            owner_address = "myaddr"
            default_fee = 0.001
            "#,
        )
        .unwrap();
        assert_eq!(config.wallet.owner_address, "myaddr");
        assert_eq!(config.wallet.default_fee, "0.001".parse().unwrap());
        assert_eq!(config.ledger.endpoint, "http://127.0.0.1:8080/");
    }

    #[test]
    fn test_fee_as_string() {
        let config: WalletConfig = toml::from_str(
            r#"
            [wallet]
            default_fee = "0.5"
            "#,
        )
        .unwrap();
        assert_eq!(config.wallet.default_fee, "0.5".parse().unwrap());
    }
}
