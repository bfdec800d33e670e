//! Wallet identity subsystem.
//!
//! # Data Flow
//! ```text
//! WalletConfig + environment (private key)
//!     → credential.rs (redacted key material)
//!     → context.rs (owner address, gateway, default fee)
//!     → TransactionPipeline
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//!
//! A context is not a spend lock. Two pipelines on the same context may
//! select the same outputs unless a reservation ledger is injected.

pub mod context;
pub mod credential;

pub use context::WalletContext;
pub use credential::SigningCredential;
