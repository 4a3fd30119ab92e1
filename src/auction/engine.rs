//! Auction engine: the five auction operations over a live ledger.
//!
//! Every operation is an independent round trip. The engine keeps no state
//! besides its settings and the shared ledger client, so a single engine can
//! serve concurrent callers.

use std::path::PathBuf;

use alloy::primitives::{Address, U256};

use crate::auction::contract::AuctionContract;
use crate::auction::types::{AuctionStatus, Bid, BidSnapshot, Deployment, Stats};
use crate::blockchain::{authorize, import_key, Authorizer, LedgerClient};
use crate::config::{validate_config, AuctionConfig, ConfigError, SecretKey};
use crate::error::{AuctionError, AuctionResult};

const CONTRACT_ADDRESS_FIELD: &str = "auction.contract_address";
const BIDDER_KEY_FIELD: &str = "keys.bidder_private_key";
const DEPLOYER_KEY_FIELD: &str = "keys.deployer_private_key";

/// Whether an auction ending at `end_time` is over at `chain_time`.
///
/// Equal timestamps are not yet ended.
pub fn is_ended(chain_time: u64, end_time: U256) -> bool {
    U256::from(chain_time) > end_time
}

/// Live auction engine bound to one ledger node.
#[derive(Debug, Clone)]
pub struct AuctionEngine {
    client: LedgerClient,
    contract_address: Option<Address>,
    bidder_key: Option<SecretKey>,
    deployer_key: Option<SecretKey>,
    keystore_dir: PathBuf,
}

impl AuctionEngine {
    /// Validate `config` and build an engine from it.
    ///
    /// No network request is made. Settings needed only by some operations
    /// may be absent; those operations fail with `ConfigError::Missing`.
    pub fn connect(config: &AuctionConfig) -> AuctionResult<Self> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let client = LedgerClient::connect(&config.ledger)?;

        let contract_address = config
            .auction
            .contract_address
            .as_deref()
            .map(|raw| {
                raw.parse::<Address>().map_err(|e| ConfigError::Invalid {
                    field: CONTRACT_ADDRESS_FIELD,
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        tracing::info!(
            rpc_url = %client.rpc_url(),
            contract = ?contract_address,
            "Auction engine ready"
        );

        Ok(Self {
            client,
            contract_address,
            bidder_key: config.keys.bidder_private_key.clone(),
            deployer_key: config.keys.deployer_private_key.clone(),
            keystore_dir: PathBuf::from(&config.keys.keystore_dir),
        })
    }

    fn contract(&self) -> AuctionResult<AuctionContract> {
        let address = self
            .contract_address
            .ok_or(ConfigError::Missing(CONTRACT_ADDRESS_FIELD))?;
        Ok(AuctionContract::new(self.client.clone(), address))
    }

    /// The secret is imported before the chain id is fetched, so an unusable
    /// secret never costs a request.
    async fn authorizer(&self, role: &'static str, key: &SecretKey) -> AuctionResult<Authorizer> {
        let signer_error = |source| AuctionError::Signer { role, source };

        let imported = import_key(key.expose()).map_err(signer_error)?;
        let chain_id = self.client.chain_id().await?;
        authorize(&imported, chain_id.into(), &self.keystore_dir).map_err(signer_error)
    }

    /// Whether the auction has ended, and its highest bid.
    pub async fn status(&self) -> AuctionResult<AuctionStatus> {
        let contract = self.contract()?;

        let end_time = contract.end_time().await?;
        let chain_time = self.client.chain_time().await?;
        let highest_bid = contract.highest_bid().await?;

        let status = AuctionStatus {
            ended: is_ended(chain_time, end_time),
            highest_bid,
        };
        tracing::debug!(
            auction = %contract.address(),
            chain_time = chain_time,
            end_time = %end_time,
            ended = status.ended,
            "Auction status read"
        );
        Ok(status)
    }

    /// Every accepted bid, oldest first.
    pub async fn list_bids(&self) -> AuctionResult<Vec<Bid>> {
        self.contract()?.bids().await
    }

    /// Bid count and volume.
    pub async fn stats(&self) -> AuctionResult<Stats> {
        Ok(self.bid_snapshot().await?.stats)
    }

    /// Bids and their aggregate from a single log fetch.
    pub async fn bid_snapshot(&self) -> AuctionResult<BidSnapshot> {
        let bids = self.contract()?.bids().await?;
        BidSnapshot::new(bids)
    }

    /// Bid `amount` wei with the configured bidder key.
    pub async fn bid(&self, amount: U256) -> AuctionResult<()> {
        let contract = self.contract()?;
        let key = self
            .bidder_key
            .as_ref()
            .ok_or(ConfigError::Missing(BIDDER_KEY_FIELD))?;

        let authorizer = self.authorizer("bidder", key).await?;
        contract.submit_bid(authorizer, amount).await?;
        Ok(())
    }

    /// Create a new auction with the configured deployer key.
    pub async fn deploy(&self, duration: u64, beneficiary: &str) -> AuctionResult<Deployment> {
        if duration == 0 {
            return Err(AuctionError::Input("duration must be greater than 0".to_string()));
        }
        let beneficiary: Address = beneficiary.parse().map_err(|e| {
            AuctionError::Input(format!("invalid beneficiary address '{}': {}", beneficiary, e))
        })?;
        let key = self
            .deployer_key
            .as_ref()
            .ok_or(ConfigError::Missing(DEPLOYER_KEY_FIELD))?;

        let authorizer = self.authorizer("deployer", key).await?;
        AuctionContract::deploy(&self.client, authorizer, U256::from(duration), beneficiary).await
    }
}
