//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (rpc method, tx hash, auction)
//!     → logging.rs (subscriber: filter + pretty or JSON output)
//!     → metrics.rs (RPC and bid counters through the `metrics` facade)
//!
//! Consumers:
//!     → stderr, for humans or log aggregation
//!     → whatever metrics recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - `RUST_LOG` wins over the configured level
//! - Secrets never reach a log event

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
