//! Certificate signing and verification.
//!
//! # Security
//! - Keys are loaded from environment variables or passed in directly
//! - Keys are never logged or serialized

use alloy::primitives::{hex, Address, Signature};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use std::future::Future;

use crate::error::{WalletError, WalletResult};
use crate::identity::cert::AidCert;
use crate::identity::fingerprint::{fingerprint, FingerprintStrategy};

/// Turns a payload into a signature string.
pub trait CertSigner {
    fn sign(&self, payload: &[u8]) -> impl Future<Output = WalletResult<String>> + Send;
}

/// secp256k1 signer producing hex-encoded 65-byte EIP-191 signatures.
#[derive(Debug, Clone)]
pub struct LocalSigner {
    signer: PrivateKeySigner,
}

impl LocalSigner {
    /// Create a signer from a hex-encoded private key (with or without 0x prefix).
    pub fn from_private_key(private_key_hex: &str) -> WalletResult<Self> {
        let key_hex = private_key_hex
            .trim()
            .strip_prefix("0x")
            .unwrap_or(private_key_hex.trim());

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| WalletError::Credential(format!("Invalid private key format: {}", e)))?;

        tracing::debug!(address = %signer.address(), "Certificate signer initialized");
        Ok(Self { signer })
    }

    /// Load the signing key from environment variable `var`.
    pub fn from_env(var: &str) -> WalletResult<Self> {
        let private_key = std::env::var(var).map_err(|_| {
            WalletError::Credential(format!("Environment variable {} not set", var))
        })?;
        Self::from_private_key(&private_key)
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

impl CertSigner for LocalSigner {
    async fn sign(&self, payload: &[u8]) -> WalletResult<String> {
        let signature = self
            .signer
            .sign_message(payload)
            .await
            .map_err(|e| WalletError::Signature(format!("Message signing failed: {}", e)))?;
        Ok(hex::encode_prefixed(signature.as_bytes()))
    }
}

/// Fill `cert.sign` with a signature over its fingerprint. Returns the fingerprint.
pub async fn issue_certificate<S: CertSigner>(
    cert: &mut AidCert,
    signer: &S,
    strategy: Option<&dyn FingerprintStrategy>,
) -> WalletResult<String> {
    let digest = fingerprint(cert, strategy);
    cert.sign = signer.sign(digest.as_bytes()).await?;
    tracing::info!(aid = %cert.aid, fingerprint = %digest, "Certificate issued");
    Ok(digest)
}

/// Check that `cert.sign` is a signature by `expected` over the current fingerprint.
///
/// Returns `Ok(false)` for a well-formed signature from another key or over
/// different content, and an error when the signature cannot be decoded.
pub fn verify_certificate(
    cert: &AidCert,
    expected: Address,
    strategy: Option<&dyn FingerprintStrategy>,
) -> WalletResult<bool> {
    let digest = fingerprint(cert, strategy);
    let bytes = hex::decode(cert.sign.trim())
        .map_err(|e| WalletError::Signature(format!("signature is not hex: {}", e)))?;
    let signature = Signature::try_from(bytes.as_slice())
        .map_err(|e| WalletError::Signature(format!("malformed signature: {}", e)))?;
    let recovered = signature
        .recover_address_from_msg(digest.as_bytes())
        .map_err(|e| WalletError::Signature(format!("recovery failed: {}", e)))?;
    Ok(recovered == expected)
}
