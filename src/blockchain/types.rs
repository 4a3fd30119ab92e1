//! Chain-specific types and error definitions.

use std::path::PathBuf;

use alloy::hex::FromHexError;
use alloy::primitives::TxHash;
use alloy::signers::k256::ecdsa;
use alloy::signers::local::LocalSignerError;
use alloy::transports::TransportError;
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors raised while talking to the ledger node.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No usable endpoint URL was supplied.
    #[error("no usable ledger endpoint: {0}")]
    Endpoint(String),

    /// The node could not be reached at the transport level.
    #[error("cannot reach ledger node: {0}")]
    Unreachable(#[source] TransportError),

    /// The node answered with an error, or with a malformed response.
    #[error(transparent)]
    Rpc(TransportError),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The node returned no latest block.
    #[error("latest block is not available")]
    MissingBlock,

    /// The transaction could not be signed with the supplied authorizer.
    #[error("failed to sign transaction: {0}")]
    Signing(String),

    /// A submitted transaction's receipt could not be obtained.
    #[error("transaction {tx_hash} was not confirmed: {reason}")]
    Unconfirmed { tx_hash: TxHash, reason: String },

    /// Transaction was mined but reverted.
    #[error("transaction {0} reverted")]
    Reverted(TxHash),
}

impl LedgerError {
    /// Whether this error means the node could not be used at all.
    pub fn is_connection(&self) -> bool {
        matches!(self, LedgerError::Endpoint(_) | LedgerError::Unreachable(_))
    }

    /// The node's error response, if the node answered with one.
    pub fn error_response(&self) -> Option<&alloy::rpc::json_rpc::ErrorPayload> {
        match self {
            LedgerError::Rpc(e) => e.as_error_resp(),
            _ => None,
        }
    }
}

impl From<TransportError> for LedgerError {
    fn from(err: TransportError) -> Self {
        if err.is_transport_error() {
            LedgerError::Unreachable(err)
        } else {
            LedgerError::Rpc(err)
        }
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors raised while turning raw key material into an authorizer.
#[derive(Debug, Error)]
pub enum SignerError {
    /// The secret is not valid hex.
    #[error("private key is not valid hex: {0}")]
    KeyDecode(#[source] FromHexError),

    /// The bytes are not a valid secp256k1 private key.
    #[error("private key is not a valid secp256k1 key: {0}")]
    KeyImport(#[source] ecdsa::Error),

    /// The keystore directory could not be prepared.
    #[error("failed to prepare keystore directory {path:?}: {source}")]
    KeystoreDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The transient credential entry could not be written.
    #[error("failed to create transient credential entry: {0}")]
    CredentialCreate(#[source] LocalSignerError),

    /// The transient credential entry could not be read back.
    #[error("failed to export transient credential entry: {0}")]
    Export(#[source] LocalSignerError),

    /// The transient credential entry could not be deleted.
    #[error("failed to delete transient credential entry {path:?}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The exported material did not yield the expected authorizer.
    #[error("failed to build transaction authorizer: {0}")]
    Authorizer(String),
}

impl SignerError {
    /// Whether the secret itself is unusable, as opposed to a local I/O problem.
    pub fn is_bad_secret(&self) -> bool {
        matches!(self, SignerError::KeyDecode(_) | SignerError::KeyImport(_))
    }
}

/// Result type for signer operations.
pub type SignerResult<T> = Result<T, SignerError>;
