//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that present values parse (endpoint URL, contract address)
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AuctionConfig → Result<(), Vec<ValidationError>>
//! - Optional fields are only checked when present; operations that need
//!   them report absence themselves, before touching the network

use alloy::primitives::Address;

use crate::config::schema::AuctionConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `ledger.rpc_url`.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &AuctionConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.ledger.rpc_url.as_deref() {
        None => errors.push(ValidationError::new(
            "ledger.rpc_url",
            "an endpoint URL is needed to connect to a ledger node",
        )),
        Some(raw) => match raw.parse::<url::Url>() {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::new(
                "ledger.rpc_url",
                format!("unsupported scheme '{}'", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new(
                "ledger.rpc_url",
                format!("invalid URL '{}': {}", raw, e),
            )),
        },
    }

    if config.ledger.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("ledger.rpc_timeout_secs", "must be greater than 0"));
    }
    if config.ledger.receipt_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "ledger.receipt_timeout_secs",
            "must be greater than 0",
        ));
    }

    if let Some(raw) = config.auction.contract_address.as_deref() {
        if let Err(e) = raw.parse::<Address>() {
            errors.push(ValidationError::new(
                "auction.contract_address",
                format!("invalid address '{}': {}", raw, e),
            ));
        }
    }

    if let Some(key) = &config.keys.bidder_private_key {
        if key.expose().trim().is_empty() {
            errors.push(ValidationError::new("keys.bidder_private_key", "must not be empty"));
        }
    }
    if let Some(key) = &config.keys.deployer_private_key {
        if key.expose().trim().is_empty() {
            errors.push(ValidationError::new("keys.deployer_private_key", "must not be empty"));
        }
    }
    if config.keys.keystore_dir.trim().is_empty() {
        errors.push(ValidationError::new("keys.keystore_dir", "must not be empty"));
    }

    if config.observability.log_level.parse::<tracing::Level>().is_err() {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
