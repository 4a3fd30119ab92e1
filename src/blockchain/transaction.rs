//! Transaction building, signing, and receipt handling.
//!
//! # Responsibilities
//! - Fill nonce, chain id, fees and gas for a state-changing call
//! - Sign with a one-shot authorizer
//! - Broadcast and wait for the receipt
//! - Turn a failed receipt status into `LedgerError::Reverted`
//!
//! Rejections by contract logic normally surface at gas estimation, before
//! anything is broadcast, as a node error response carrying the revert reason.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};

use crate::blockchain::client::LedgerClient;
use crate::blockchain::types::{LedgerError, LedgerResult};
use crate::blockchain::wallet::Authorizer;

/// What a transaction does once mined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxKind {
    /// Call a deployed contract.
    Call(Address),
    /// Create a contract from init code.
    Create,
}

/// Transaction builder bound to one client and one authorizer.
pub struct TxBuilder<'a> {
    client: &'a LedgerClient,
    authorizer: Authorizer,
}

impl<'a> TxBuilder<'a> {
    /// Create a new transaction builder.
    pub fn new(client: &'a LedgerClient, authorizer: Authorizer) -> Self {
        Self { client, authorizer }
    }

    /// Build a fully-filled transaction request.
    ///
    /// # Arguments
    /// * `kind` - Call target, or contract creation
    /// * `value` - Amount of native token to send
    /// * `data` - Call data, or init code for creation
    pub async fn build(
        &self,
        kind: TxKind,
        value: U256,
        data: Bytes,
    ) -> LedgerResult<TransactionRequest> {
        let from = self.authorizer.address();

        let tx = TransactionRequest::default()
            .with_from(from)
            .with_value(value);
        let tx = match kind {
            TxKind::Call(to) => tx.with_to(to).with_input(data),
            TxKind::Create => tx.with_deploy_code(data),
        };

        // Gas estimation runs the transaction; contract rejections end here.
        let gas_limit = self.client.estimate_gas(tx.clone()).await?;
        let nonce = self.client.nonce(from).await?;
        let fees = self.client.fees().await?;

        tracing::debug!(
            from = %from,
            nonce = nonce,
            gas_limit = gas_limit,
            max_fee_per_gas = fees.max_fee_per_gas,
            "Transaction filled"
        );

        Ok(tx
            .with_nonce(nonce)
            .with_chain_id(self.authorizer.chain_id())
            .with_gas_limit(gas_limit)
            .with_max_fee_per_gas(fees.max_fee_per_gas)
            .with_max_priority_fee_per_gas(fees.max_priority_fee_per_gas))
    }

    /// Build, sign, broadcast and confirm a transaction.
    ///
    /// # Errors
    /// `LedgerError::Reverted` if the transaction was mined with a failed status.
    pub async fn send(
        &self,
        kind: TxKind,
        value: U256,
        data: Bytes,
    ) -> LedgerResult<TransactionReceipt> {
        let tx = self.build(kind, value, data).await?;

        let envelope = tx
            .build(self.authorizer.wallet())
            .await
            .map_err(|e| LedgerError::Signing(e.to_string()))?;

        let receipt = self.client.submit(envelope).await?;
        check_status(&receipt)?;

        Ok(receipt)
    }
}

/// Reject receipts of reverted transactions.
pub fn check_status(receipt: &TransactionReceipt) -> LedgerResult<()> {
    if receipt.status() {
        Ok(())
    } else {
        tracing::warn!(tx_hash = %receipt.transaction_hash, "Transaction reverted");
        Err(LedgerError::Reverted(receipt.transaction_hash))
    }
}
