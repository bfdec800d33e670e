//! Identity certificate collaborators.
//!
//! # Data Flow
//! ```text
//! AidCert
//!     → fingerprint.rs (canonical SHA-256, or an injected strategy)
//!     → signer.rs (signature over the fingerprint into `Sign`)
//!     → verify_certificate (recompute, recover signer, compare)
//! ```

pub mod cert;
pub mod fingerprint;
pub mod signer;

pub use cert::{AidCert, CertType};
pub use fingerprint::{canonical_string, fingerprint, CanonicalSha256, FingerprintStrategy};
pub use signer::{issue_certificate, verify_certificate, CertSigner, LocalSigner};
