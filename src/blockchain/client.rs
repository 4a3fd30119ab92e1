//! Ledger RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Bind to a single JSON-RPC endpoint
//! - Query chain state (latest block time, chain id, logs, nonces)
//! - Execute read-only calls and gas estimates
//! - Submit signed transactions and wait for their receipts
//!
//! Node errors are surfaced as-is; there is no retry or failover.

use std::future::IntoFuture;
use std::time::Duration;

use alloy::consensus::TxEnvelope;
use alloy::eips::eip1559::Eip1559Estimation;
use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, Bytes};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{Filter, Log, TransactionReceipt, TransactionRequest};
use alloy::transports::TransportResult;
use tokio::time::timeout;

use crate::blockchain::types::{ChainId, LedgerError, LedgerResult};
use crate::config::LedgerConfig;
use crate::observability::metrics::{self, RpcOutcome};

/// Handle to one ledger node.
#[derive(Clone)]
pub struct LedgerClient {
    /// Provider bound to the configured endpoint.
    provider: DynProvider,
    /// Endpoint the provider was built from, for diagnostics.
    rpc_url: url::Url,
    /// Per-request timeout.
    timeout_duration: Duration,
    /// Upper bound on waiting for a receipt.
    receipt_timeout: Duration,
}

impl LedgerClient {
    /// Bind a client to the configured endpoint.
    ///
    /// No request is made here; an unreachable node shows up on first use.
    ///
    /// # Errors
    /// `LedgerError::Endpoint` if the URL is absent or unparseable.
    pub fn connect(config: &LedgerConfig) -> LedgerResult<Self> {
        let raw = config
            .rpc_url
            .as_deref()
            .ok_or_else(|| LedgerError::Endpoint("no endpoint URL configured".to_string()))?;

        let rpc_url: url::Url = raw
            .parse()
            .map_err(|e| LedgerError::Endpoint(format!("invalid URL '{}': {}", raw, e)))?;

        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_http(rpc_url.clone())
            .erased();

        tracing::debug!(rpc_url = %rpc_url, "Ledger client bound");

        Ok(Self {
            provider,
            rpc_url,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            receipt_timeout: Duration::from_secs(config.receipt_timeout_secs),
        })
    }

    async fn request<T, F>(&self, method: &'static str, fut: F) -> LedgerResult<T>
    where
        F: IntoFuture<Output = TransportResult<T>>,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(value)) => {
                metrics::record_rpc(method, RpcOutcome::Success);
                Ok(value)
            }
            Ok(Err(e)) => {
                metrics::record_rpc(method, RpcOutcome::Error);
                tracing::debug!(method, error = %e, "RPC error");
                Err(e.into())
            }
            Err(_) => {
                metrics::record_rpc(method, RpcOutcome::Timeout);
                tracing::warn!(method, rpc_url = %self.rpc_url, "RPC timeout");
                Err(LedgerError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }

    /// Timestamp of the latest block, in seconds.
    pub async fn chain_time(&self) -> LedgerResult<u64> {
        let block = self
            .request(
                "eth_getBlockByNumber",
                self.provider.get_block_by_number(BlockNumberOrTag::Latest),
            )
            .await?
            .ok_or(LedgerError::MissingBlock)?;
        Ok(block.header.timestamp)
    }

    /// Chain ID reported by the node.
    pub async fn chain_id(&self) -> LedgerResult<ChainId> {
        self.request("eth_chainId", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    /// Every log emitted by `address`, from genesis to the latest block.
    pub async fn logs(&self, address: Address) -> LedgerResult<Vec<Log>> {
        let filter = Filter::new()
            .address(address)
            .from_block(BlockNumberOrTag::Earliest)
            .to_block(BlockNumberOrTag::Latest);
        let logs = self.request("eth_getLogs", self.provider.get_logs(&filter)).await?;
        tracing::trace!(address = %address, count = logs.len(), "Fetched logs");
        Ok(logs)
    }

    /// Execute a read-only call against the latest state.
    pub async fn call(&self, tx: TransactionRequest) -> LedgerResult<Bytes> {
        self.request("eth_call", self.provider.call(tx)).await
    }

    /// Estimate gas for a transaction. Reverting transactions fail here.
    pub async fn estimate_gas(&self, tx: TransactionRequest) -> LedgerResult<u64> {
        self.request("eth_estimateGas", self.provider.estimate_gas(tx))
            .await
    }

    /// Current EIP-1559 fee suggestion.
    pub async fn fees(&self) -> LedgerResult<Eip1559Estimation> {
        self.request("eth_feeHistory", self.provider.estimate_eip1559_fees())
            .await
    }

    /// Next nonce for `address`, counting pending transactions.
    pub async fn nonce(&self, address: Address) -> LedgerResult<u64> {
        self.request(
            "eth_getTransactionCount",
            self.provider.get_transaction_count(address).pending(),
        )
        .await
    }

    /// Broadcast a signed transaction and wait for it to be mined.
    ///
    /// The receipt is returned whatever its status.
    pub async fn submit(&self, envelope: TxEnvelope) -> LedgerResult<TransactionReceipt> {
        let pending = self
            .request("eth_sendRawTransaction", self.provider.send_tx_envelope(envelope))
            .await?;
        let tx_hash = *pending.tx_hash();

        tracing::info!(tx_hash = %tx_hash, "Transaction submitted, awaiting receipt");

        let receipt = pending
            .with_timeout(Some(self.receipt_timeout))
            .get_receipt()
            .await
            .map_err(|e| LedgerError::Unconfirmed {
                tx_hash,
                reason: e.to_string(),
            })?;

        tracing::debug!(
            tx_hash = %tx_hash,
            block = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "Transaction mined"
        );

        Ok(receipt)
    }

    /// Get the endpoint this client is bound to.
    pub fn rpc_url(&self) -> &url::Url {
        &self.rpc_url
    }
}

impl std::fmt::Debug for LedgerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerClient")
            .field("rpc_url", &self.rpc_url.as_str())
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .field("receipt_timeout_secs", &self.receipt_timeout.as_secs())
            .finish()
    }
}
