//! Client-side transaction engine for a UTXO ledger node.
//!
//! Selects spendable outputs, drives the node's create → sign → send
//! sequence for transfers and contract actions, and fingerprints and
//! signs identity certificates.

pub mod config;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod observability;
pub mod transaction;
pub mod wallet;

pub use config::WalletConfig;
pub use error::{WalletError, WalletResult};
pub use ledger::LedgerGateway;
pub use transaction::{Amount, TransactionPipeline};
pub use wallet::WalletContext;
