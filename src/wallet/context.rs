//! Per-session wallet configuration.

use std::time::Duration;

use crate::config::schema::WalletConfig;
use crate::error::WalletResult;
use crate::ledger::LedgerGateway;
use crate::transaction::amount::Amount;
use crate::wallet::credential::SigningCredential;

/// Immutable wallet identity plus the gateway it talks through.
///
/// Only the gateway endpoint may change after construction.
#[derive(Debug, Clone)]
pub struct WalletContext {
    owner_address: String,
    credential: SigningCredential,
    gateway: LedgerGateway,
    default_fee: Amount,
}

impl WalletContext {
    pub fn new(
        owner_address: impl Into<String>,
        credential: SigningCredential,
        gateway: LedgerGateway,
        default_fee: Amount,
    ) -> Self {
        Self {
            owner_address: owner_address.into(),
            credential,
            gateway,
            default_fee,
        }
    }

    /// Build a context from validated configuration, reading the
    /// credential from the configured environment variable.
    pub fn from_config(config: &WalletConfig) -> WalletResult<Self> {
        let credential = SigningCredential::from_env(&config.wallet.private_key_env)?;
        let timeout = match config.ledger.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        let gateway = LedgerGateway::new(&config.ledger.endpoint, timeout)?;

        tracing::info!(
            owner_address = %config.wallet.owner_address,
            endpoint = %gateway.endpoint(),
            default_fee = %config.wallet.default_fee,
            "Wallet context initialized"
        );

        Ok(Self::new(
            config.wallet.owner_address.clone(),
            credential,
            gateway,
            config.wallet.default_fee,
        ))
    }

    pub fn owner_address(&self) -> &str {
        &self.owner_address
    }

    pub fn default_fee(&self) -> Amount {
        self.default_fee
    }

    pub fn gateway(&self) -> &LedgerGateway {
        &self.gateway
    }

    pub(crate) fn credential(&self) -> &SigningCredential {
        &self.credential
    }

    /// Point this wallet at a different ledger node.
    pub fn rebind_endpoint(&self, endpoint: &str) -> WalletResult<()> {
        self.gateway.rebind(endpoint)?;
        Ok(())
    }
}
