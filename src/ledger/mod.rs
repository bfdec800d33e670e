//! Ledger node integration subsystem.
//!
//! # Data Flow
//! ```text
//! TransactionPipeline
//!     → gateway.rs (one HTTP round trip per call)
//!     → remote node (get/utxo, rawtransaction/{create,sign,send}, get/contractmessage)
//!     → types.rs (envelope unwrap, typed data)
//! ```
//!
//! # Security Constraints
//! - The sign endpoint receives the raw private key; this is the node's
//!   protocol, not a client choice. The credential is never logged.
//! - Only `reqwest` transport errors and envelope failures escape this layer

pub mod gateway;
pub mod types;

pub use gateway::LedgerGateway;
pub use types::{LedgerError, LedgerResult};
