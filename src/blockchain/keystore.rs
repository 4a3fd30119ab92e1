//! Ephemeral signer: raw key material in, one-shot authorizer out.
//!
//! # Data Flow
//! ```text
//! hex secret
//!     → decode & import (secp256k1), before any network call
//!     → chain id fetched by the caller
//!     → transient keystore entry (encrypted file, random name)
//!     → export (decrypt back into a signer)
//!     → entry deleted
//!     → Authorizer bound to the chain id
//! ```
//!
//! # Security Constraints
//! - The transient entry never outlives a call, whether export succeeds or not
//! - Key material is never logged
//! - Every call works on its own entry; nothing is shared between calls

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use alloy::hex;
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::types::{SignerError, SignerResult};
use crate::blockchain::wallet::Authorizer;

/// Passphrase for transient entries. They are deleted before the call returns.
const TRANSIENT_PASSPHRASE: &str = "";

/// A keystore file that exists only for the duration of one authorization.
#[derive(Debug)]
pub(crate) struct TransientEntry {
    path: PathBuf,
    released: bool,
}

impl TransientEntry {
    /// Write `signer`'s key into a fresh entry under `dir`.
    pub(crate) fn create(dir: &Path, signer: &PrivateKeySigner) -> SignerResult<Self> {
        fs::create_dir_all(dir).map_err(|source| SignerError::KeystoreDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let name = format!("transient-{}.json", uuid::Uuid::new_v4());
        let key = signer.to_bytes();

        PrivateKeySigner::encrypt_keystore(
            dir,
            &mut rand::thread_rng(),
            key.as_slice(),
            TRANSIENT_PASSPHRASE,
            Some(&name),
        )
        .map_err(SignerError::CredentialCreate)?;

        let path = dir.join(&name);
        tracing::trace!(path = %path.display(), "Transient credential entry created");

        Ok(Self {
            path,
            released: false,
        })
    }

    /// Read the key back out of the entry.
    pub(crate) fn export(&self) -> SignerResult<PrivateKeySigner> {
        PrivateKeySigner::decrypt_keystore(&self.path, TRANSIENT_PASSPHRASE)
            .map_err(SignerError::Export)
    }

    /// Delete the entry.
    pub(crate) fn release(mut self) -> io::Result<()> {
        self.released = true;
        let result = fs::remove_file(&self.path);
        if result.is_ok() {
            tracing::trace!(path = %self.path.display(), "Transient credential entry deleted");
        }
        result
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TransientEntry {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to delete transient credential entry"
            );
        }
    }
}

/// Decode and import a hex-encoded secp256k1 secret.
///
/// A `0x` prefix is accepted. Nothing touches the disk or the network.
///
/// # Errors
/// `KeyDecode` / `KeyImport` for an unusable secret.
pub fn import_key(raw_key: &str) -> SignerResult<PrivateKeySigner> {
    let trimmed = raw_key.trim();
    let bytes = hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed))
        .map_err(SignerError::KeyDecode)?;
    PrivateKeySigner::from_slice(&bytes).map_err(SignerError::KeyImport)
}

/// Turn an imported key into an authorizer for `chain_id`.
///
/// The key makes a round trip through a transient keystore entry under
/// `keystore_dir`, which is removed before this returns.
///
/// # Errors
/// - `KeystoreDir` / `CredentialCreate` / `Export` / `Cleanup` for local keystore failures
/// - `Authorizer` if the exported key does not match the imported one
pub fn authorize(
    imported: &PrivateKeySigner,
    chain_id: u64,
    keystore_dir: &Path,
) -> SignerResult<Authorizer> {
    let entry = TransientEntry::create(keystore_dir, imported)?;
    let path = entry.path().to_path_buf();

    let exported = entry.export();
    let released = entry.release();

    let material = match exported {
        Ok(signer) => signer,
        Err(e) => {
            if let Err(cleanup) = released {
                tracing::warn!(
                    path = %path.display(),
                    error = %cleanup,
                    "Failed to delete transient credential entry after export failure"
                );
            }
            return Err(e);
        }
    };
    released.map_err(|source| SignerError::Cleanup { path, source })?;

    if material.address() != imported.address() {
        return Err(SignerError::Authorizer(format!(
            "exported key resolves to {} instead of {}",
            material.address(),
            imported.address()
        )));
    }

    Ok(Authorizer::new(material, chain_id))
}
