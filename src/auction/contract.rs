//! Binding for the open auction contract.
//!
//! # Responsibilities
//! - Read-only getters through `eth_call`
//! - Payable `bid()` submission with rejection recognition
//! - Decoding `HighestBidIncreased` logs into bids
//! - Creating new auction instances from the shipped creation bytecode
//!
//! The creation bytecode is assembled from `contracts/SimpleAuction.asm`.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::{Log, TransactionRequest};
use alloy::sol;
use alloy::sol_types::{SolCall, SolConstructor, SolEvent};

use crate::auction::rejection::map_bid_failure;
use crate::auction::types::{Bid, Deployment};
use crate::blockchain::{Authorizer, LedgerClient, TxBuilder, TxKind};
use crate::error::{AuctionError, AuctionResult};
use crate::observability::metrics;

sol! {
    #[sol(bytecode = "346100325760408038036000396000514201600155602051600160a01b60019003166000556102cc806100376000396000f35b600080fd6004361061005b5760003560e01c80631998aeef146100a45780633ccfd60b146101095780632a24f46c1461014757806338af3eed146100605780634b449cba1461007157806391f9015714610082578063d57bde7914610093575b600080fd5b3461005b5760005460005260206000f35b3461005b5760015460005260206000f35b3461005b5760025460005260206000f35b3461005b5760035460005260206000f35b60015442116101ac576003543411156101eb5760035480156100d057600254600160a01b178054820190555b50336002553460035534602052336000527ff4757a49b326036464bec6fe419a4ae38c8a02ce3e68bf0809674f6aab8ad30060406000a1005b3461005b5733600160a01b178054801561013c5760008255600080808084336000f161013c579055600060005260206000f35b600160005260206000f35b3461005b57600154421061022a576004546102695760016004556003546020526002546000527fdaec4582d5d9595688c8c98545fdd1c696d41c6aeaeb636737e84ed2f5c00eda60406000a1600080808060035460005481156108fc02f11561005b57005b6308c379a060e01b600052602060045260166024527f41756374696f6e20616c726561647920656e6465642e0000000000000000000060445260646000fd5b6308c379a060e01b6000526020600452601e6024527f546865726520616c7265616479206973206120686967686572206269642e000060445260646000fd5b6308c379a060e01b600052602060045260166024527f41756374696f6e206e6f742079657420656e6465642e0000000000000000000060445260646000fd5b6308c379a060e01b600052602060045260236024527f61756374696f6e456e642068617320616c7265616479206265656e2063616c6c6044527f65642e000000000000000000000000000000000000000000000000000000000060645260846000fd")]
    contract SimpleAuction {
        event HighestBidIncreased(address bidder, uint256 amount);
        event AuctionEnded(address winner, uint256 amount);

        constructor(uint256 biddingTime, address beneficiaryAddress);

        function beneficiary() external view returns (address);
        function auctionEndTime() external view returns (uint256);
        function highestBidder() external view returns (address);
        function highestBid() external view returns (uint256);

        function bid() external payable;
        function withdraw() external returns (bool);
        function auctionEnd() external;
    }
}

/// Typed handle to one deployed auction.
#[derive(Debug, Clone)]
pub struct AuctionContract {
    client: LedgerClient,
    address: Address,
}

impl AuctionContract {
    pub fn new(client: LedgerClient, address: Address) -> Self {
        Self { client, address }
    }

    /// Get the contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    async fn read<C: SolCall>(&self, what: &'static str, call: C) -> AuctionResult<C::Return> {
        let tx = TransactionRequest::default()
            .with_to(self.address)
            .with_input(call.abi_encode());
        let output = self
            .client
            .call(tx)
            .await
            .map_err(|source| AuctionError::Read { what, source })?;
        C::abi_decode_returns(&output).map_err(AuctionError::Decode)
    }

    /// Unix time after which the auction is over.
    pub async fn end_time(&self) -> AuctionResult<U256> {
        self.read("auctionEndTime", SimpleAuction::auctionEndTimeCall {})
            .await
    }

    /// Highest accepted bid, in wei.
    pub async fn highest_bid(&self) -> AuctionResult<U256> {
        self.read("highestBid", SimpleAuction::highestBidCall {}).await
    }

    /// Current highest bidder; zero before the first bid.
    pub async fn highest_bidder(&self) -> AuctionResult<Address> {
        self.read("highestBidder", SimpleAuction::highestBidderCall {})
            .await
    }

    pub async fn beneficiary(&self) -> AuctionResult<Address> {
        self.read("beneficiary", SimpleAuction::beneficiaryCall {})
            .await
    }

    /// Submit a bid of `amount` wei and wait for it to be mined.
    ///
    /// # Errors
    /// - `HigherBidAlreadySubmitted` / `AuctionEnded` for the known rejections
    /// - `Ledger` with the node's own error for anything else
    pub async fn submit_bid(&self, authorizer: Authorizer, amount: U256) -> AuctionResult<TxHash> {
        let bidder = authorizer.address();
        let data = Bytes::from(SimpleAuction::bidCall {}.abi_encode());

        let result = TxBuilder::new(&self.client, authorizer)
            .send(TxKind::Call(self.address), amount, data)
            .await
            .map_err(map_bid_failure);
        metrics::record_bid(&result);
        let receipt = result?;

        tracing::info!(
            auction = %self.address,
            bidder = %bidder,
            amount = %amount,
            tx_hash = %receipt.transaction_hash,
            "Bid accepted"
        );

        Ok(receipt.transaction_hash)
    }

    /// All accepted bids, in log order.
    pub async fn bids(&self) -> AuctionResult<Vec<Bid>> {
        let logs = self.client.logs(self.address).await?;
        decode_bids(&logs)
    }

    /// Create a new auction lasting `duration` seconds from the block it is mined in.
    pub async fn deploy(
        client: &LedgerClient,
        authorizer: Authorizer,
        duration: U256,
        beneficiary: Address,
    ) -> AuctionResult<Deployment> {
        let code = creation_code(duration, beneficiary);

        let receipt = TxBuilder::new(client, authorizer)
            .send(TxKind::Create, U256::ZERO, code)
            .await
            .map_err(AuctionError::Deploy)?;

        let address = receipt
            .contract_address
            .ok_or(AuctionError::NoContractAddress(receipt.transaction_hash))?;

        tracing::info!(
            auction = %address,
            beneficiary = %beneficiary,
            duration = %duration,
            tx_hash = %receipt.transaction_hash,
            "Auction deployed"
        );

        Ok(Deployment {
            address,
            tx_hash: receipt.transaction_hash,
        })
    }
}

/// Creation bytecode followed by the ABI-encoded constructor arguments.
pub fn creation_code(duration: U256, beneficiary: Address) -> Bytes {
    let args = SimpleAuction::constructorCall {
        biddingTime: duration,
        beneficiaryAddress: beneficiary,
    }
    .abi_encode();

    let mut code = SimpleAuction::BYTECODE.to_vec();
    code.extend_from_slice(&args);
    code.into()
}

/// Project bid events out of a contract's logs.
///
/// Logs of other events are skipped. A bid log that does not decode fails
/// the whole projection.
pub fn decode_bids(logs: &[Log]) -> AuctionResult<Vec<Bid>> {
    logs.iter()
        .filter(|log| log.topic0() == Some(&SimpleAuction::HighestBidIncreased::SIGNATURE_HASH))
        .map(|log| {
            let decoded = log
                .log_decode::<SimpleAuction::HighestBidIncreased>()
                .map_err(AuctionError::Decode)?;
            let event = &decoded.inner.data;
            Ok(Bid {
                sender: event.bidder,
                amount: event.amount,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{LogData, B256};

    fn contract() -> Address {
        Address::repeat_byte(0xaa)
    }

    fn rpc_log(index: u64, data: LogData) -> Log {
        Log {
            inner: alloy::primitives::Log {
                address: contract(),
                data,
            },
            log_index: Some(index),
            ..Default::default()
        }
    }

    fn bid_log(index: u64, bidder: u8, amount: u64) -> Log {
        let event = SimpleAuction::HighestBidIncreased {
            bidder: Address::repeat_byte(bidder),
            amount: U256::from(amount),
        };
        rpc_log(index, event.encode_log_data())
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_bytecode_dispatches_known_selectors() {
        let code = &SimpleAuction::BYTECODE;
        for selector in [
            SimpleAuction::bidCall::SELECTOR,
            SimpleAuction::withdrawCall::SELECTOR,
            SimpleAuction::auctionEndCall::SELECTOR,
            SimpleAuction::auctionEndTimeCall::SELECTOR,
            SimpleAuction::highestBidCall::SELECTOR,
            SimpleAuction::highestBidderCall::SELECTOR,
            SimpleAuction::beneficiaryCall::SELECTOR,
        ] {
            assert!(contains(code, &selector), "selector {:?} missing", selector);
        }
        assert!(contains(code, SimpleAuction::HighestBidIncreased::SIGNATURE_HASH.as_slice()));
        assert!(contains(code, SimpleAuction::AuctionEnded::SIGNATURE_HASH.as_slice()));
        assert!(contains(code, b"There already is a higher bid."));
        assert!(contains(code, b"Auction already ended."));
    }

    #[test]
    fn test_creation_code_appends_constructor_args() {
        let beneficiary = Address::repeat_byte(0x42);
        let code = creation_code(U256::from(3600), beneficiary);
        assert_eq!(code.len(), SimpleAuction::BYTECODE.len() + 64);

        let args = &code[SimpleAuction::BYTECODE.len()..];
        assert_eq!(U256::from_be_slice(&args[..32]), U256::from(3600));
        assert_eq!(Address::from_slice(&args[44..64]), beneficiary);
    }

    #[test]
    fn test_decode_bids_in_log_order() {
        let logs = vec![bid_log(0, 1, 100), bid_log(1, 2, 150), bid_log(2, 1, 400)];
        let bids = decode_bids(&logs).unwrap();
        let amounts: Vec<_> = bids.iter().map(|b| b.amount).collect();
        assert_eq!(amounts, vec![U256::from(100), U256::from(150), U256::from(400)]);
        assert_eq!(bids[1].sender, Address::repeat_byte(2));
    }

    #[test]
    fn test_decode_skips_other_events() {
        let ended = SimpleAuction::AuctionEnded {
            winner: Address::repeat_byte(1),
            amount: U256::from(400),
        };
        let logs = vec![bid_log(0, 1, 400), rpc_log(1, ended.encode_log_data())];
        let bids = decode_bids(&logs).unwrap();
        assert_eq!(bids.len(), 1);
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode_bids(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_bid_log_fails() {
        let data = LogData::new_unchecked(
            vec![SimpleAuction::HighestBidIncreased::SIGNATURE_HASH],
            Bytes::from(vec![1, 2, 3]),
        );
        let logs = vec![bid_log(0, 1, 100), rpc_log(1, data)];
        assert!(matches!(decode_bids(&logs), Err(AuctionError::Decode(_))));
    }

    #[test]
    fn test_untagged_logs_are_ignored() {
        let data = LogData::new_unchecked(vec![B256::ZERO], Bytes::new());
        let logs = vec![rpc_log(0, data), rpc_log(1, LogData::default())];
        assert!(decode_bids(&logs).unwrap().is_empty());
    }
}
