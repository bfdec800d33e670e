//! Signing credential handling.
//!
//! # Security
//! - Loaded from an environment variable, never from the config file
//! - Never logged or serialized; `Debug` is redacted
//! - Readable only inside the crate, by the gateway's sign call

use crate::error::{WalletError, WalletResult};

/// Environment variable read when the config does not name one.
pub const DEFAULT_CREDENTIAL_ENV_VAR: &str = "OURCHAIN_PRIVATE_KEY";

/// Opaque private key material handed to the node for transaction signing.
#[derive(Clone)]
pub struct SigningCredential(String);

impl SigningCredential {
    /// Wrap key material. Surrounding whitespace is dropped.
    pub fn new(secret: impl Into<String>) -> WalletResult<Self> {
        let secret = secret.into().trim().to_string();
        if secret.is_empty() {
            return Err(WalletError::Credential("signing credential is empty".into()));
        }
        Ok(Self(secret))
    }

    /// Load the credential from the environment variable `var`.
    pub fn from_env(var: &str) -> WalletResult<Self> {
        let secret = std::env::var(var).map_err(|_| {
            WalletError::Credential(format!("Environment variable {} not set", var))
        })?;
        Self::new(secret)
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SigningCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningCredential([redacted])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let cred = SigningCredential::new("cVsecretkey").unwrap();
        let printed = format!("{:?}", cred);
        assert!(!printed.contains("cVsecretkey"));
        assert!(printed.contains("redacted"));
    }

    #[test]
    fn test_empty_credential_rejected() {
        assert!(SigningCredential::new("   ").is_err());
    }

    #[test]
    fn test_from_env() {
        let var = "OURCHAIN_TEST_CREDENTIAL_FROM_ENV";
        std::env::set_var(var, " key-material\n");
        let cred = SigningCredential::from_env(var).unwrap();
        assert_eq!(cred.expose(), "key-material");
        std::env::remove_var(var);

        let err = SigningCredential::from_env(var).unwrap_err();
        assert!(err.to_string().contains(var));
    }
}
