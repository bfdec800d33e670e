//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! gateway + pipeline produce:
//!     → logging.rs (structured log events, pipeline spans)
//!     → metrics.rs (counters, histograms)
//! ```
//!
//! # Design Decisions
//! - Structured logging with per-flow spans (`flow`, `phase`, `txid`)
//! - Logs go to stderr so CLI output on stdout stays machine-readable
//! - Signing credentials never appear in events

pub mod logging;
pub mod metrics;
