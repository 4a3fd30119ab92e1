//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! LedgerConfig (endpoint URL, timeouts)
//!     → client.rs (RPC connection with timeouts)
//! raw private key
//!     → keystore.rs (transient entry, export, cleanup)
//!     → wallet.rs (chain-bound authorizer)
//!     → transaction.rs (fill, sign, broadcast, confirm)
//! ```
//!
//! # Security Constraints
//! - Private keys come from configuration only and are never logged
//! - Transient keystore entries are deleted before `authorize` returns
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod keystore;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::LedgerClient;
pub use keystore::{authorize, import_key};
pub use transaction::{TxBuilder, TxKind};
pub use types::{ChainId, LedgerError, LedgerResult, SignerError, SignerResult};
pub use wallet::Authorizer;
