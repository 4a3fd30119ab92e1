//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (INSTANCE_URL, CONTRACT_DEPLOYMENT_ADDR, ...)
//!     → validation.rs (semantic checks)
//!     → AuctionConfig (validated, immutable)
//!     → passed by reference to AuctionEngine::connect
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; nothing consults the environment later
//! - All fields have defaults to allow minimal configs
//! - Per-operation settings stay optional; their absence surfaces as
//!   `ConfigError::Missing` from the operation that needs them

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AuctionConfig, ContractConfig, KeyConfig, LedgerConfig, LogFormat, ObservabilityConfig, SecretKey};
pub use validation::{validate_config, ValidationError};
