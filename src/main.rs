//! Auction ledger command-line client.
//!
//! ```text
//! auction-ledger [--config FILE] status
//! auction-ledger [--config FILE] bids
//! auction-ledger [--config FILE] bid --amount WEI
//! auction-ledger [--config FILE] stats
//! auction-ledger [--config FILE] deploy --duration SECS --beneficiary ADDR
//! ```
//!
//! Settings come from the config file with environment overrides
//! (`INSTANCE_URL`, `CONTRACT_DEPLOYMENT_ADDR`, `BIDDER_ACC_PRIVATE_KEY`,
//! `DEPLOYER_ACC_PRIVATE_KEY`). Results are printed to stdout as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use alloy::primitives::U256;
use clap::{Parser, Subcommand};
use serde::Serialize;

use auction_ledger::config::load_config;
use auction_ledger::observability::init_logging;
use auction_ledger::{AuctionConfig, AuctionError, Connection};

#[derive(Parser)]
#[command(name = "auction-ledger")]
#[command(about = "Deploy, bid on and inspect auctions on an EVM ledger", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "AUCTION_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether the auction has ended and its highest bid
    Status,
    /// List every accepted bid, oldest first
    Bids,
    /// Submit a bid with the bidder key
    Bid {
        /// Bid amount in wei
        #[arg(long)]
        amount: U256,
    },
    /// Show bid count and volume
    Stats,
    /// Deploy a new auction with the deployer key
    Deploy {
        /// Bidding period in seconds
        #[arg(long)]
        duration: u64,
        /// Address receiving the winning bid
        #[arg(long)]
        beneficiary: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    if let Err(e) = init_logging(&config.observability) {
        eprintln!("Error: failed to initialize logging: {}", e);
        return ExitCode::from(2);
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "auction-ledger starting");

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(kind = ?e.kind(), "Command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &AuctionConfig) -> Result<(), AuctionError> {
    let connection = Connection::ledger(config)?;

    match command {
        Commands::Status => print_json(&connection.status().await?),
        Commands::Bids => print_json(&connection.list_bids().await?),
        Commands::Bid { amount } => {
            connection.bid(amount).await?;
            print_json(&serde_json::json!({ "accepted": true, "amount": amount }))
        }
        Commands::Stats => print_json(&connection.stats().await?),
        Commands::Deploy {
            duration,
            beneficiary,
        } => print_json(&connection.deploy(duration, &beneficiary).await?),
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to render output: {}", e),
    }
}
