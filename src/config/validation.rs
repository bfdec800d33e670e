//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the endpoint URL and wallet identity fields
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WalletConfig → Result<(), Vec<ValidationError>>

use std::fmt;

use crate::config::schema::WalletConfig;
use crate::ledger::gateway::parse_endpoint;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check every semantic rule and report all failures.
pub fn validate_config(config: &WalletConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = parse_endpoint(&config.ledger.endpoint) {
        errors.push(ValidationError {
            field: "ledger.endpoint",
            message: e.to_string(),
        });
    }

    if config.wallet.owner_address.trim().is_empty() {
        errors.push(ValidationError {
            field: "wallet.owner_address",
            message: "must not be empty".to_string(),
        });
    }

    if config.wallet.private_key_env.trim().is_empty() {
        errors.push(ValidationError {
            field: "wallet.private_key_env",
            message: "must name an environment variable".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError {
            field: "observability.log_level",
            message: format!(
                "'{}' is not one of {}",
                config.observability.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> WalletConfig {
        let mut config = WalletConfig::default();
        config.wallet.owner_address = "owner".to_string();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid_config();
        config.ledger.endpoint = "ftp://node".to_string();
        config.wallet.owner_address = " ".to_string();
        config.observability.log_level = "loud".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["ledger.endpoint", "wallet.owner_address", "observability.log_level"]
        );
    }
}
