//! Shared test doubles: a scripted execution client and a tiny JSON-RPC server.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use alloy::primitives::{Address, Bytes, TxHash, B256, U256};
use alloy::rpc::types::{
    BlockId, BlockNumberOrTag, Filter, Header, Log, Transaction, TransactionReceipt,
    TransactionRequest,
};
use async_trait::async_trait;
use futures_util::StreamExt;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use ec_failover::blockchain::{ClientError, ClientResult, ExecutionClient, LogStream, SyncProgress};

/// How the next calls to a [`MockClient`] behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Answer normally.
    Ok,
    /// Fail as if the endpoint refused the connection.
    Disconnected,
    /// Fail with a JSON-RPC execution error.
    Reverted,
    /// Fail with a local timeout.
    TimedOut,
}

/// Scripted execution client counting every call it receives.
pub struct MockClient {
    url: String,
    calls: AtomicUsize,
    reply: Mutex<Reply>,
    block_number: u64,
    balance: U256,
    sync: Mutex<Option<SyncProgress>>,
    head_timestamp: Mutex<Option<u64>>,
}

impl MockClient {
    /// A healthy, fully synced client with a head block from just now.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            calls: AtomicUsize::new(0),
            reply: Mutex::new(Reply::Ok),
            block_number: 1,
            balance: U256::ZERO,
            sync: Mutex::new(None),
            head_timestamp: Mutex::new(Some(unix_now())),
        }
    }

    pub fn with_reply(self, reply: Reply) -> Self {
        self.set_reply(reply);
        self
    }

    pub fn with_block_number(mut self, block_number: u64) -> Self {
        self.block_number = block_number;
        self
    }

    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_sync(self, current: u64, highest: u64) -> Self {
        *self.sync.lock().unwrap() = Some(SyncProgress {
            starting_block: 0,
            current_block: current,
            highest_block: highest,
        });
        self
    }

    /// Claim to be synced with a head block `age` old.
    pub fn with_head_age(self, age: Duration) -> Self {
        *self.head_timestamp.lock().unwrap() = Some(unix_now() - age.as_secs());
        self
    }

    /// Claim to be synced but return no head block.
    pub fn without_head(self) -> Self {
        *self.head_timestamp.lock().unwrap() = None;
        self
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer<T>(&self, value: T) -> ClientResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match *self.reply.lock().unwrap() {
            Reply::Ok => Ok(value),
            Reply::Disconnected => Err(ClientError::Transport(format!(
                "dial tcp {}: connect: connection refused",
                self.url
            ))),
            Reply::Reverted => Err(ClientError::Rpc {
                code: 3,
                message: "execution reverted".to_string(),
            }),
            Reply::TimedOut => Err(ClientError::Timeout { ms: 100 }),
        }
    }
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

pub fn header_at(timestamp: u64) -> Header {
    Header {
        hash: B256::ZERO,
        inner: alloy::consensus::Header {
            timestamp,
            ..Default::default()
        },
        total_difficulty: None,
        size: None,
    }
}

#[async_trait]
impl ExecutionClient for MockClient {
    fn url(&self) -> &str {
        &self.url
    }

    async fn code_at(&self, _contract: Address, _block: BlockId) -> ClientResult<Bytes> {
        self.answer(Bytes::from_static(&[0x60, 0x80]))
    }

    async fn call_contract(
        &self,
        _call: &TransactionRequest,
        _block: BlockId,
    ) -> ClientResult<Bytes> {
        self.answer(Bytes::from(self.url.clone().into_bytes()))
    }

    async fn header_by_number(&self, _number: BlockNumberOrTag) -> ClientResult<Option<Header>> {
        let timestamp = *self.head_timestamp.lock().unwrap();
        self.answer(timestamp.map(header_at))
    }

    async fn pending_code_at(&self, _account: Address) -> ClientResult<Bytes> {
        self.answer(Bytes::new())
    }

    async fn pending_nonce_at(&self, _account: Address) -> ClientResult<u64> {
        self.answer(7)
    }

    async fn suggest_gas_price(&self) -> ClientResult<u128> {
        self.answer(1_000_000_000)
    }

    async fn suggest_gas_tip_cap(&self) -> ClientResult<u128> {
        self.answer(100_000_000)
    }

    async fn estimate_gas(&self, _call: &TransactionRequest) -> ClientResult<u64> {
        self.answer(21_000)
    }

    async fn send_transaction(&self, _raw_tx: &[u8]) -> ClientResult<TxHash> {
        self.answer(TxHash::repeat_byte(0xab))
    }

    async fn filter_logs(&self, _query: &Filter) -> ClientResult<Vec<Log>> {
        self.answer(Vec::new())
    }

    async fn subscribe_filter_logs(&self, _query: &Filter) -> ClientResult<LogStream> {
        self.answer(futures_util::stream::empty().boxed())
    }

    async fn transaction_receipt(
        &self,
        _tx_hash: TxHash,
    ) -> ClientResult<Option<TransactionReceipt>> {
        self.answer(None)
    }

    async fn block_number(&self) -> ClientResult<u64> {
        self.answer(self.block_number)
    }

    async fn balance_at(&self, _account: Address, _block: BlockId) -> ClientResult<U256> {
        self.answer(self.balance)
    }

    async fn transaction_by_hash(
        &self,
        _hash: TxHash,
    ) -> ClientResult<Option<(Transaction, bool)>> {
        self.answer(None)
    }

    async fn nonce_at(&self, _account: Address, _block: BlockId) -> ClientResult<u64> {
        self.answer(5)
    }

    async fn sync_progress(&self) -> ClientResult<Option<SyncProgress>> {
        let sync = *self.sync.lock().unwrap();
        self.answer(sync)
    }
}

/// Result of a JSON-RPC handler: a result value or `(code, message)`.
pub type RpcReply = Result<Value, (i64, String)>;

/// Start a JSON-RPC server on an ephemeral port answering with `handler`.
pub async fn start_rpc_backend<F>(handler: F) -> SocketAddr
where
    F: Fn(&str, &Value) -> RpcReply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        let Some(body) = read_request_body(&mut socket).await else {
                            return;
                        };
                        let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
                        let payload = respond(&request, handler.as_ref()).to_string();
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            payload.len(),
                            payload
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

fn respond<F>(request: &Value, handler: &F) -> Value
where
    F: Fn(&str, &Value) -> RpcReply,
{
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request.get("method").and_then(Value::as_str).unwrap_or_default();
    let params = request.get("params").cloned().unwrap_or(Value::Null);

    match handler(method, &params) {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err((code, message)) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": code, "message": message }
        }),
    }
}

async fn read_request_body(socket: &mut TcpStream) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length = head
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
