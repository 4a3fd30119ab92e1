//! Recognition of known contract rejections.
//!
//! A bid refused by the contract carries a revert reason. Exactly the
//! phrases in [`KNOWN_REJECTIONS`] map to domain errors, checked in order;
//! any other failure is returned as the ledger error it already is.

use alloy::sol_types::decode_revert_reason;

use crate::blockchain::LedgerError;
use crate::error::AuctionError;

/// A contract rejection with a domain meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    HigherBidAlreadySubmitted,
    AuctionEnded,
}

impl From<Rejection> for AuctionError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::HigherBidAlreadySubmitted => AuctionError::HigherBidAlreadySubmitted,
            Rejection::AuctionEnded => AuctionError::AuctionEnded,
        }
    }
}

/// Rejection phrases, in matching order.
pub const KNOWN_REJECTIONS: &[(&str, Rejection)] = &[
    ("There already is a higher bid", Rejection::HigherBidAlreadySubmitted),
    ("Auction already ended", Rejection::AuctionEnded),
];

/// The rejection text a node reported for `err`, if it reported one.
///
/// Prefers the ABI-decoded revert reason and falls back to the node's message.
pub fn rejection_text(err: &LedgerError) -> Option<String> {
    let payload = err.error_response()?;
    let reason = payload
        .as_revert_data()
        .and_then(|data| decode_revert_reason(&data));
    Some(reason.unwrap_or_else(|| payload.message.to_string()))
}

/// Look `text` up in the rejection table.
pub fn classify(text: &str) -> Option<Rejection> {
    KNOWN_REJECTIONS
        .iter()
        .find(|(phrase, _)| text.contains(phrase))
        .map(|(_, rejection)| *rejection)
}

/// Map a failed bid submission to a domain error, or pass it through.
pub fn map_bid_failure(err: LedgerError) -> AuctionError {
    match rejection_text(&err).as_deref().and_then(classify) {
        Some(rejection) => {
            tracing::debug!(rejection = ?rejection, "Bid rejected by contract");
            rejection.into()
        }
        None => AuctionError::Ledger(err),
    }
}
