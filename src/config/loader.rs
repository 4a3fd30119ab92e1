//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{AuctionConfig, SecretKey};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `ledger.rpc_url`.
pub const RPC_URL_ENV_VAR: &str = "INSTANCE_URL";
/// Environment variable overriding `auction.contract_address`.
pub const CONTRACT_ADDRESS_ENV_VAR: &str = "CONTRACT_DEPLOYMENT_ADDR";
/// Environment variable overriding `keys.bidder_private_key`.
pub const BIDDER_KEY_ENV_VAR: &str = "BIDDER_ACC_PRIVATE_KEY";
/// Environment variable overriding `keys.deployer_private_key`.
pub const DEPLOYER_KEY_ENV_VAR: &str = "DEPLOYER_ACC_PRIVATE_KEY";

/// Error type for configuration loading and lookup.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
    /// A field required by the requested operation is absent.
    Missing(&'static str),
    /// A present field could not be interpreted.
    Invalid { field: &'static str, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
            ConfigError::Missing(field) => write!(f, "missing required setting {}", field),
            ConfigError::Invalid { field, reason } => write!(f, "invalid setting {}: {}", field, reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

/// Load configuration from an optional TOML file, apply environment
/// overrides, and validate the result.
///
/// This is the only place the process environment is read.
pub fn load_config(path: Option<&Path>) -> Result<AuctionConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => AuctionConfig::default(),
    };

    apply_overrides(&mut config, |name| std::env::var(name).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay values found through `lookup` onto `config`.
pub fn apply_overrides<F>(config: &mut AuctionConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(RPC_URL_ENV_VAR) {
        config.ledger.rpc_url = Some(url);
    }
    if let Some(address) = lookup(CONTRACT_ADDRESS_ENV_VAR) {
        config.auction.contract_address = Some(address);
    }
    if let Some(key) = lookup(BIDDER_KEY_ENV_VAR) {
        config.keys.bidder_private_key = Some(SecretKey::new(key));
    }
    if let Some(key) = lookup(DEPLOYER_KEY_ENV_VAR) {
        config.keys.deployer_private_key = Some(SecretKey::new(key));
    }
}
