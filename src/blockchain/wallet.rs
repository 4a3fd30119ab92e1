//! Chain-bound transaction authorizers.
//!
//! # Security
//! - Built only by the ephemeral signer from freshly exported key material
//! - Keys are never logged or serialized
//! - Each authorizer signs for exactly one chain (EIP-155)

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;

/// A one-shot signing capability for a single chain.
#[derive(Debug, Clone)]
pub struct Authorizer {
    /// Wallet holding the chain-bound signer.
    wallet: EthereumWallet,
    /// Address transactions are sent from.
    address: Address,
    /// Chain ID for EIP-155 replay protection.
    chain_id: u64,
}

impl Authorizer {
    /// Bind a signer to `chain_id`.
    pub(crate) fn new(signer: PrivateKeySigner, chain_id: u64) -> Self {
        let signer = signer.with_chain_id(Some(chain_id));
        let address = signer.address();

        tracing::debug!(address = %address, chain_id = chain_id, "Authorizer created");

        Self {
            wallet: EthereumWallet::from(signer),
            address,
            chain_id,
        }
    }

    /// Get the sending address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Get the chain ID this authorizer signs for.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Get the wallet used to sign transaction requests.
    pub fn wallet(&self) -> &EthereumWallet {
        &self.wallet
    }
}
