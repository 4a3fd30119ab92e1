//! The auction capability: a live engine, or a programmable double.
//!
//! Callers hold a [`Connection`] and never need to know which variant they
//! were given. The double answers from `(input → output)` pairs set up in
//! advance and records each call, so code built on the capability can be
//! tested without a ledger node.

use std::sync::{Arc, Mutex, RwLock};

use alloy::primitives::U256;
use dashmap::DashMap;

use crate::auction::engine::AuctionEngine;
use crate::auction::types::{AuctionStatus, Bid, Deployment, Stats};
use crate::config::AuctionConfig;
use crate::error::AuctionResult;

/// The five auction operations.
#[derive(Debug, Clone)]
pub enum Connection {
    /// Backed by a ledger node.
    Ledger(AuctionEngine),
    /// Backed by programmed responses.
    Double(Arc<ConnectionDouble>),
}

impl Connection {
    /// Connect the live variant.
    pub fn ledger(config: &AuctionConfig) -> AuctionResult<Self> {
        AuctionEngine::connect(config).map(Connection::Ledger)
    }

    pub async fn status(&self) -> AuctionResult<AuctionStatus> {
        match self {
            Connection::Ledger(engine) => engine.status().await,
            Connection::Double(double) => double.status(),
        }
    }

    pub async fn list_bids(&self) -> AuctionResult<Vec<Bid>> {
        match self {
            Connection::Ledger(engine) => engine.list_bids().await,
            Connection::Double(double) => double.list_bids(),
        }
    }

    pub async fn bid(&self, amount: U256) -> AuctionResult<()> {
        match self {
            Connection::Ledger(engine) => engine.bid(amount).await,
            Connection::Double(double) => double.bid(amount),
        }
    }

    pub async fn stats(&self) -> AuctionResult<Stats> {
        match self {
            Connection::Ledger(engine) => engine.stats().await,
            Connection::Double(double) => double.stats(),
        }
    }

    pub async fn deploy(&self, duration: u64, beneficiary: &str) -> AuctionResult<Deployment> {
        match self {
            Connection::Ledger(engine) => engine.deploy(duration, beneficiary).await,
            Connection::Double(double) => double.deploy(duration, beneficiary),
        }
    }
}

impl From<AuctionEngine> for Connection {
    fn from(engine: AuctionEngine) -> Self {
        Connection::Ledger(engine)
    }
}

impl From<Arc<ConnectionDouble>> for Connection {
    fn from(double: Arc<ConnectionDouble>) -> Self {
        Connection::Double(double)
    }
}

/// A call received by a [`ConnectionDouble`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Call {
    Status,
    ListBids,
    Bid(U256),
    Stats,
    Deploy { duration: u64, beneficiary: String },
}

type Responder<T> = Arc<dyn Fn() -> AuctionResult<T> + Send + Sync>;

/// Programmable stand-in for a live connection.
///
/// Each response is a closure so errors, which are not `Clone`, can be
/// returned on every matching call. Programming a pair again replaces it.
/// A call with no programmed response panics.
#[derive(Default)]
pub struct ConnectionDouble {
    status: RwLock<Option<Responder<AuctionStatus>>>,
    list_bids: RwLock<Option<Responder<Vec<Bid>>>>,
    stats: RwLock<Option<Responder<Stats>>>,
    bids: DashMap<U256, Responder<()>>,
    deployments: DashMap<(u64, String), Responder<Deployment>>,
    calls: Mutex<Vec<Call>>,
}

impl ConnectionDouble {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share as a [`Connection`]. Responses can still be programmed afterwards.
    pub fn connection(self: &Arc<Self>) -> Connection {
        Connection::Double(self.clone())
    }

    pub fn on_status<F>(&self, respond: F) -> &Self
    where
        F: Fn() -> AuctionResult<AuctionStatus> + Send + Sync + 'static,
    {
        *self.status.write().expect("double lock poisoned") = Some(Arc::new(respond));
        self
    }

    pub fn on_list_bids<F>(&self, respond: F) -> &Self
    where
        F: Fn() -> AuctionResult<Vec<Bid>> + Send + Sync + 'static,
    {
        *self.list_bids.write().expect("double lock poisoned") = Some(Arc::new(respond));
        self
    }

    pub fn on_stats<F>(&self, respond: F) -> &Self
    where
        F: Fn() -> AuctionResult<Stats> + Send + Sync + 'static,
    {
        *self.stats.write().expect("double lock poisoned") = Some(Arc::new(respond));
        self
    }

    /// Respond to `bid(amount)`.
    pub fn on_bid<F>(&self, amount: U256, respond: F) -> &Self
    where
        F: Fn() -> AuctionResult<()> + Send + Sync + 'static,
    {
        self.bids.insert(amount, Arc::new(respond));
        self
    }

    /// Respond to `deploy(duration, beneficiary)`.
    pub fn on_deploy<F>(&self, duration: u64, beneficiary: &str, respond: F) -> &Self
    where
        F: Fn() -> AuctionResult<Deployment> + Send + Sync + 'static,
    {
        self.deployments
            .insert((duration, beneficiary.to_string()), Arc::new(respond));
        self
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("double lock poisoned").clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("double lock poisoned").push(call);
    }

    fn single<T>(&self, slot: &RwLock<Option<Responder<T>>>, call: Call) -> AuctionResult<T> {
        self.record(call.clone());
        let respond = slot
            .read()
            .expect("double lock poisoned")
            .clone()
            .unwrap_or_else(|| panic!("unexpected call to connection double: {:?}", call));
        respond()
    }

    pub fn status(&self) -> AuctionResult<AuctionStatus> {
        self.single(&self.status, Call::Status)
    }

    pub fn list_bids(&self) -> AuctionResult<Vec<Bid>> {
        self.single(&self.list_bids, Call::ListBids)
    }

    pub fn stats(&self) -> AuctionResult<Stats> {
        self.single(&self.stats, Call::Stats)
    }

    pub fn bid(&self, amount: U256) -> AuctionResult<()> {
        let call = Call::Bid(amount);
        self.record(call.clone());
        let respond = self
            .bids
            .get(&amount)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| panic!("unexpected call to connection double: {:?}", call));
        respond()
    }

    pub fn deploy(&self, duration: u64, beneficiary: &str) -> AuctionResult<Deployment> {
        let call = Call::Deploy {
            duration,
            beneficiary: beneficiary.to_string(),
        };
        self.record(call.clone());
        let respond = self
            .deployments
            .get(&(duration, beneficiary.to_string()))
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| panic!("unexpected call to connection double: {:?}", call));
        respond()
    }
}

impl std::fmt::Debug for ConnectionDouble {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionDouble")
            .field("programmed_bids", &self.bids.len())
            .field("programmed_deployments", &self.deployments.len())
            .field("calls", &self.calls())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuctionError;
    use alloy::primitives::Address;

    #[tokio::test]
    async fn test_double_answers_programmed_pairs() {
        let double = Arc::new(ConnectionDouble::new());
        double
            .on_bid(U256::from(10), || Ok(()))
            .on_bid(U256::from(5), || Err(AuctionError::HigherBidAlreadySubmitted));
        let connection = double.connection();

        assert!(connection.bid(U256::from(10)).await.is_ok());
        assert!(matches!(
            connection.bid(U256::from(5)).await,
            Err(AuctionError::HigherBidAlreadySubmitted)
        ));
        // Responses repeat.
        assert!(matches!(
            connection.bid(U256::from(5)).await,
            Err(AuctionError::HigherBidAlreadySubmitted)
        ));

        assert_eq!(
            double.calls(),
            vec![
                Call::Bid(U256::from(10)),
                Call::Bid(U256::from(5)),
                Call::Bid(U256::from(5)),
            ]
        );
    }

    #[tokio::test]
    async fn test_double_reads() {
        let bids = vec![Bid {
            sender: Address::repeat_byte(1),
            amount: U256::from(7),
        }];
        let listed = bids.clone();
        let double = Arc::new(ConnectionDouble::new());
        double
            .on_status(|| {
                Ok(AuctionStatus {
                    ended: true,
                    highest_bid: U256::from(7),
                })
            })
            .on_list_bids(move || Ok(listed.clone()))
            .on_stats(|| Err(AuctionError::Input("boom".into())));
        let connection = double.connection();

        assert!(connection.status().await.unwrap().ended);
        assert_eq!(connection.list_bids().await.unwrap(), bids);
        assert!(connection.stats().await.is_err());
        assert_eq!(double.calls(), vec![Call::Status, Call::ListBids, Call::Stats]);
    }

    #[tokio::test]
    async fn test_double_deploy_keyed_by_arguments() {
        let deployment = Deployment {
            address: Address::repeat_byte(0xde),
            tx_hash: Default::default(),
        };
        let double = Arc::new(ConnectionDouble::new());
        let connection = double.connection();
        double.on_deploy(3600, "0xabc", move || Ok(deployment));

        assert_eq!(connection.deploy(3600, "0xabc").await.unwrap(), deployment);

        double.on_deploy(3600, "0xabc", || Err(AuctionError::Input("replaced".into())));
        assert!(connection.deploy(3600, "0xabc").await.is_err());
    }

    #[tokio::test]
    #[should_panic(expected = "unexpected call to connection double")]
    async fn test_unprogrammed_call_panics() {
        let connection = Arc::new(ConnectionDouble::new()).connection();
        let _ = connection.status().await;
    }
}
