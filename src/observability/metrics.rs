//! Metrics collection through the `metrics` facade.
//!
//! # Metrics
//! - `ledger_rpc_requests_total` (counter): requests by method
//! - `ledger_rpc_errors_total` (counter): failed requests by method
//! - `ledger_rpc_timeouts_total` (counter): requests cut off by the timeout, by method
//! - `auction_bids_total` (counter): bid submissions by outcome
//!
//! # Design Decisions
//! - Facade only: whoever embeds the crate installs the recorder and exporter
//! - Label values are static strings

use crate::error::{AuctionError, AuctionResult};

pub const RPC_REQUESTS_TOTAL: &str = "ledger_rpc_requests_total";
pub const RPC_ERRORS_TOTAL: &str = "ledger_rpc_errors_total";
pub const RPC_TIMEOUTS_TOTAL: &str = "ledger_rpc_timeouts_total";
pub const BIDS_TOTAL: &str = "auction_bids_total";

/// How a single RPC request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcOutcome {
    Success,
    Error,
    Timeout,
}

/// Record one request to `method`.
pub fn record_rpc(method: &'static str, outcome: RpcOutcome) {
    metrics::counter!(RPC_REQUESTS_TOTAL, "method" => method).increment(1);
    match outcome {
        RpcOutcome::Success => {}
        RpcOutcome::Error => {
            metrics::counter!(RPC_ERRORS_TOTAL, "method" => method).increment(1);
        }
        RpcOutcome::Timeout => {
            metrics::counter!(RPC_TIMEOUTS_TOTAL, "method" => method).increment(1);
        }
    }
}

/// Outcome label of a bid submission.
pub fn bid_outcome<T>(result: &AuctionResult<T>) -> &'static str {
    match result {
        Ok(_) => "accepted",
        Err(AuctionError::HigherBidAlreadySubmitted) => "higher_bid",
        Err(AuctionError::AuctionEnded) => "ended",
        Err(_) => "other",
    }
}

/// Record the outcome of a bid submission.
pub fn record_bid<T>(result: &AuctionResult<T>) {
    metrics::counter!(BIDS_TOTAL, "outcome" => bid_outcome(result)).increment(1);
}
