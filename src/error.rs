//! Error type for auction operations.

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::blockchain::{LedgerError, SignerError};
use crate::config::ConfigError;

/// Broad category of an [`AuctionError`], for callers that map errors to outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Required settings or secrets are absent or unusable.
    Configuration,
    /// Caller-supplied arguments are invalid.
    Input,
    /// Local signing machinery failed.
    Signing,
    /// The ledger node could not be used or answered with an error.
    Transport,
    /// The auction contract refused the request for a known reason.
    Domain,
}

/// Errors returned by auction operations.
#[derive(Debug, Error)]
pub enum AuctionError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid input: {0}")]
    Input(String),

    /// Turning the configured `role` secret into an authorizer failed.
    #[error("{role} key: {source}")]
    Signer {
        role: &'static str,
        #[source]
        source: SignerError,
    },

    #[error("failed to read {what}: {source}")]
    Read {
        what: &'static str,
        #[source]
        source: LedgerError,
    },

    #[error("failed to decode contract data: {0}")]
    Decode(#[source] alloy::sol_types::Error),

    #[error("bid volume exceeds the 256-bit range")]
    VolumeOverflow,

    #[error("deployment failed: {0}")]
    Deploy(#[source] LedgerError),

    #[error("deployment {0} produced no contract address")]
    NoContractAddress(TxHash),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("There already is a higher bid")]
    HigherBidAlreadySubmitted,

    #[error("Auction already ended")]
    AuctionEnded,
}

impl AuctionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuctionError::Config(_) => ErrorKind::Configuration,
            AuctionError::Input(_) => ErrorKind::Input,
            AuctionError::Signer { source, .. } if source.is_bad_secret() => {
                ErrorKind::Configuration
            }
            AuctionError::Signer { .. } => ErrorKind::Signing,
            AuctionError::Ledger(LedgerError::Endpoint(_)) => ErrorKind::Configuration,
            AuctionError::Read { .. }
            | AuctionError::Decode(_)
            | AuctionError::VolumeOverflow
            | AuctionError::Deploy(_)
            | AuctionError::NoContractAddress(_)
            | AuctionError::Ledger(_) => ErrorKind::Transport,
            AuctionError::HigherBidAlreadySubmitted | AuctionError::AuctionEnded => {
                ErrorKind::Domain
            }
        }
    }

    /// Whether this is one of the known contract rejections.
    pub fn is_domain(&self) -> bool {
        self.kind() == ErrorKind::Domain
    }
}

/// Result type for auction operations.
pub type AuctionResult<T> = Result<T, AuctionError>;
