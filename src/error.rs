//! Crate-wide error type.

use thiserror::Error;

use crate::ledger::LedgerError;
use crate::transaction::amount::Amount;

/// Errors surfaced by wallet operations.
///
/// Every variant is terminal for the in-flight flow. Nothing is retried
/// internally; callers restart a flow from selection if they want to retry.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The ledger node rejected the request or could not be reached.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The spendable outputs cannot cover the requested amount.
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Amount, available: Amount },

    /// Every selection was claimed by a concurrent flow before this one could reserve it.
    #[error("outputs claimed by concurrent flows; gave up after {attempts} selections")]
    ReservationContention { attempts: usize },

    /// The node returned `complete: false` from the sign call.
    #[error("signing incomplete")]
    SigningIncomplete,

    /// The contract payload failed validation before any network call.
    #[error("invalid contract request: {0}")]
    InvalidContract(String),

    /// An internal accounting invariant did not hold.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// Signing credential missing or malformed.
    #[error("credential error: {0}")]
    Credential(String),

    /// Certificate signature could not be produced or checked.
    #[error("signature error: {0}")]
    Signature(String),
}

impl WalletError {
    /// True for failures reported by, or on the way to, the ledger node.
    pub fn is_remote(&self) -> bool {
        matches!(self, WalletError::Ledger(_))
    }
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WalletError::InsufficientFunds {
            required: "7.1".parse().unwrap(),
            available: "1".parse().unwrap(),
        };
        assert_eq!(err.to_string(), "insufficient funds: required 7.1, available 1");

        let err = WalletError::from(LedgerError::Remote {
            message: "bad tx".into(),
        });
        assert!(err.is_remote());
        assert_eq!(err.to_string(), "ledger rejected request: bad tx");
        assert!(!WalletError::SigningIncomplete.is_remote());
    }
}
