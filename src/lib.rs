//! Auction ledger client library.
//!
//! Drives an open auction contract on an EVM ledger: deploys new auctions,
//! submits bids signed with ephemeral key material, reads status and decodes
//! bid events. [`Connection`] is the entry point.

pub mod auction;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod observability;

pub use auction::{AuctionEngine, AuctionStatus, Bid, Connection, ConnectionDouble, Deployment, Stats};
pub use config::schema::AuctionConfig;
pub use error::{AuctionError, AuctionResult, ErrorKind};
