//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the auction
//! client. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the auction client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuctionConfig {
    /// Ledger node connection settings.
    pub ledger: LedgerConfig,

    /// The deployed auction contract.
    pub auction: ContractConfig,

    /// Signing secrets and the transient keystore location.
    pub keys: KeyConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Ledger node connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint URL. Required by every operation.
    pub rpc_url: Option<String>,

    /// Timeout for a single RPC round trip, in seconds.
    pub rpc_timeout_secs: u64,

    /// How long to wait for a submitted transaction's receipt, in seconds.
    pub receipt_timeout_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            rpc_timeout_secs: 10,
            receipt_timeout_secs: 60,
        }
    }
}

/// The deployed auction contract.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContractConfig {
    /// Address of the deployed auction. Required by status, bids, bid and stats.
    pub contract_address: Option<String>,
}

/// Signing secrets.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyConfig {
    /// Hex-encoded private key used to submit bids.
    pub bidder_private_key: Option<SecretKey>,

    /// Hex-encoded private key used to deploy new auctions.
    pub deployer_private_key: Option<SecretKey>,

    /// Directory that briefly holds encrypted credential entries while signing.
    pub keystore_dir: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            bidder_private_key: None,
            deployer_private_key: None,
            keystore_dir: "./keys".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, for development.
    #[default]
    Pretty,
    /// One JSON object per line, for log aggregation.
    Json,
}

/// A hex-encoded private key.
///
/// The value is never printed: `Debug` is redacted so configs can be logged.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// The raw hex string. Callers must not log it.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuctionConfig::default();
        assert!(config.ledger.rpc_url.is_none());
        assert_eq!(config.ledger.rpc_timeout_secs, 10);
        assert_eq!(config.keys.keystore_dir, "./keys");
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_minimal_toml() {
        let config: AuctionConfig = toml::from_str(
            r#"
            [ledger]
            rpc_url = "http://localhost:8545"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.ledger.rpc_url.as_deref(), Some("http://localhost:8545"));
        assert_eq!(config.ledger.receipt_timeout_secs, 60);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert!(config.auction.contract_address.is_none());
    }

    #[test]
    fn test_secret_key_is_redacted() {
        let keys = KeyConfig {
            bidder_private_key: Some(SecretKey::new("ac0974bec39a17e36ba4a6b4d238ff94")),
            ..KeyConfig::default()
        };
        let printed = format!("{:?}", keys);
        assert!(!printed.contains("ac0974"));
        assert!(printed.contains("<redacted>"));
    }
}
