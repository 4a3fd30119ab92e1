//! Auction data projections.
//!
//! Everything here is derived from live reads and never cached.

use alloy::primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};

use crate::error::{AuctionError, AuctionResult};

/// Current state of an auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionStatus {
    /// Chain time is strictly past the auction's end time.
    pub ended: bool,
    /// Highest accepted bid, in wei.
    pub highest_bid: U256,
}

/// One accepted bid, projected from a `HighestBidIncreased` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub sender: Address,
    pub amount: U256,
}

/// Aggregate over all accepted bids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Number of accepted bids.
    pub bids: u64,
    /// Sum of accepted bid amounts, in wei.
    pub volume: U256,
}

impl Stats {
    /// Fold a bid list into its aggregate.
    ///
    /// # Errors
    /// `VolumeOverflow` if the amounts do not fit in 256 bits.
    pub fn from_bids(bids: &[Bid]) -> AuctionResult<Self> {
        bids.iter().try_fold(Self::default(), |acc, bid| {
            Ok(Self {
                bids: acc.bids + 1,
                volume: acc
                    .volume
                    .checked_add(bid.amount)
                    .ok_or(AuctionError::VolumeOverflow)?,
            })
        })
    }
}

/// Bids and their aggregate, taken from one log fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidSnapshot {
    pub bids: Vec<Bid>,
    pub stats: Stats,
}

impl BidSnapshot {
    pub fn new(bids: Vec<Bid>) -> AuctionResult<Self> {
        let stats = Stats::from_bids(&bids)?;
        Ok(Self { bids, stats })
    }
}

/// A freshly created auction contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    /// Address of the new contract.
    pub address: Address,
    /// Hash of the creation transaction.
    pub tx_hash: TxHash,
}
