//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::U256;
use auction_ledger::config::{AuctionConfig, SecretKey};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Anvil's first two dev accounts.
#[allow(dead_code)]
pub const DEPLOYER_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
#[allow(dead_code)]
pub const BIDDER_KEY: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
#[allow(dead_code)]
pub const BENEFICIARY: &str = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";

/// A JSON-RPC error the mock node should answer with.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RpcFailure {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

#[allow(dead_code)]
impl RpcFailure {
    pub fn new(code: i64, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Handle to a running mock node.
#[allow(dead_code)]
pub struct MockNode {
    pub addr: SocketAddr,
    requests: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockNode {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of JSON-RPC requests served so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

/// Start a programmable JSON-RPC node on an ephemeral port.
///
/// `handler` gets the method name and params of each request.
#[allow(dead_code)]
pub async fn start_mock_node<F>(handler: F) -> MockNode
where
    F: Fn(&str, &Value) -> Result<Value, RpcFailure> + Send + Sync + 'static,
{
    start_mock_node_with_delay(Duration::ZERO, handler).await
}

/// Like [`start_mock_node`], but every answer is held back by `delay`.
#[allow(dead_code)]
pub async fn start_mock_node_with_delay<F>(delay: Duration, handler: F) -> MockNode
where
    F: Fn(&str, &Value) -> Result<Value, RpcFailure> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);
    let requests = Arc::new(AtomicUsize::new(0));
    let counter = requests.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let handler = handler.clone();
                    let counter = counter.clone();
                    tokio::spawn(async move {
                        serve(socket, delay, handler.as_ref(), &counter).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockNode { addr, requests }
}

async fn serve<F>(mut socket: TcpStream, delay: Duration, handler: &F, counter: &AtomicUsize)
where
    F: Fn(&str, &Value) -> Result<Value, RpcFailure>,
{
    let Some(body) = read_request(&mut socket).await else {
        return;
    };
    let Ok(request) = serde_json::from_slice::<Value>(&body) else {
        return;
    };
    counter.fetch_add(1, Ordering::SeqCst);

    let method = request["method"].as_str().unwrap_or_default().to_string();
    let response = match handler(&method, &request["params"]) {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": request["id"], "result": result }),
        Err(failure) => {
            let mut error = json!({ "code": failure.code, "message": failure.message });
            if let Some(data) = failure.data {
                error["data"] = data;
            }
            json!({ "jsonrpc": "2.0", "id": request["id"], "error": error })
        }
    };

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let body = response.to_string();
    let reply = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = socket.write_all(reply.as_bytes()).await;
    let _ = socket.shutdown().await;
}

async fn read_request(socket: &mut TcpStream) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(buf[header_end..header_end + content_length].to_vec())
}

/// Calldata of an `eth_call` / `eth_estimateGas` request.
#[allow(dead_code)]
pub fn call_input(params: &Value) -> String {
    let tx = &params[0];
    tx["input"]
        .as_str()
        .or_else(|| tx["data"].as_str())
        .unwrap_or_default()
        .to_string()
}

/// A 32-byte ABI word for `value`.
#[allow(dead_code)]
pub fn abi_word(value: u64) -> Value {
    json!(format!("0x{:064x}", value))
}

/// Hex quantity, as the node encodes numbers.
#[allow(dead_code)]
pub fn quantity(value: u64) -> Value {
    json!(format!("0x{:x}", value))
}

/// A minimal latest block with the given timestamp.
#[allow(dead_code)]
pub fn block(number: u64, timestamp: u64) -> Value {
    let zero_hash = format!("0x{}", "00".repeat(32));
    json!({
        "hash": format!("0x{:064x}", number + 1),
        "parentHash": zero_hash,
        "sha3Uncles": zero_hash,
        "miner": format!("0x{}", "00".repeat(20)),
        "stateRoot": zero_hash,
        "transactionsRoot": zero_hash,
        "receiptsRoot": zero_hash,
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "difficulty": "0x0",
        "number": quantity(number),
        "gasLimit": "0x1c9c380",
        "gasUsed": "0x0",
        "timestamp": quantity(timestamp),
        "extraData": "0x",
        "mixHash": zero_hash,
        "nonce": "0x0000000000000000",
        "baseFeePerGas": "0x3b9aca00",
        "uncles": [],
        "transactions": []
    })
}

/// Config pointing at `url` with short timeouts.
#[allow(dead_code)]
pub fn config_for(url: &str, keystore_dir: &std::path::Path) -> AuctionConfig {
    let mut config = AuctionConfig::default();
    config.ledger.rpc_url = Some(url.to_string());
    config.ledger.rpc_timeout_secs = 1;
    config.ledger.receipt_timeout_secs = 30;
    config.keys.keystore_dir = keystore_dir.display().to_string();
    config.keys.bidder_private_key = Some(SecretKey::new(BIDDER_KEY));
    config.keys.deployer_private_key = Some(SecretKey::new(DEPLOYER_KEY));
    config
}

/// Number of entries in a directory, 0 if it does not exist.
#[allow(dead_code)]
pub fn entry_count(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

#[allow(dead_code)]
pub fn wei(value: u64) -> U256 {
    U256::from(value)
}
