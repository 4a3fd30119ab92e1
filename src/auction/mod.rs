//! Auction subsystem.
//!
//! # Data Flow
//! ```text
//! Connection::{status, list_bids, bid, stats, deploy}
//!     → engine.rs (settings lookup, chain time, authorizers)
//!     → contract.rs (getters, bid(), logs, creation)
//!     → rejection.rs (known revert reasons → domain errors)
//!     → blockchain (client, signer, transactions)
//! ```

pub mod connection;
pub mod contract;
pub mod engine;
pub mod rejection;
pub mod types;

pub use connection::{Call, Connection, ConnectionDouble};
pub use contract::{AuctionContract, SimpleAuction};
pub use engine::{is_ended, AuctionEngine};
pub use rejection::Rejection;
pub use types::{AuctionStatus, Bid, BidSnapshot, Deployment, Stats};
