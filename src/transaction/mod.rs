//! Transaction construction subsystem.
//!
//! # Data Flow
//! ```text
//! spend request (amount, fee, destination | contract)
//!     → selector.rs (randomized first-fit over the owner's UTXOs)
//!     → reservation.rs (optional claim against concurrent flows)
//!     → contract.rs (deploy / call payload)
//!     → pipeline.rs (create → sign → send through the ledger gateway)
//!     → TxId / DeployReceipt
//! ```
//!
//! # Invariants
//! - Selected inputs == outputs + fee, with change ≥ 0
//! - No change output when change is exactly zero
//! - A signed transaction is broadcast at most once

pub mod amount;
pub mod contract;
pub mod pipeline;
pub mod reservation;
pub mod selector;
pub mod types;

pub use amount::Amount;
pub use contract::{ContractAction, ContractRequest, ContractRequestBuilder};
pub use pipeline::TransactionPipeline;
pub use reservation::{InMemoryReservations, NoReservations, OutputReservations};
pub use selector::{CoinSelector, Selection};
pub use types::{DeployReceipt, OutPoint, OutputTarget, SpendableOutput, TxId};
