//! JSON-RPC execution client backed by an alloy HTTP provider.
//!
//! # Responsibilities
//! - Bind to a single endpoint URL (dialing is lazy)
//! - Bound the TCP connect separately from the whole request
//! - Translate alloy transport errors into [`ClientError`] so the manager can
//!   tell an unreachable endpoint from a failed request
//!
//! # Timeouts
//! - Connect timeout: the handshake did not complete, reported as
//!   [`ClientError::Transport`] (the endpoint is unreachable)
//! - Request timeout: the endpoint accepted the call but did not answer in
//!   time, reported as [`ClientError::Timeout`]

use std::future::IntoFuture;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{
    BlockId, BlockNumberOrTag, Filter, Header, Log, SyncStatus, Transaction, TransactionReceipt,
    TransactionRequest,
};
use alloy::transports::http::reqwest;
use alloy::transports::{RpcError, TransportError, TransportErrorKind};
use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::time::timeout;

use crate::blockchain::handle::{ExecutionClient, LogStream};
use crate::blockchain::types::{ClientError, ClientResult, SyncProgress};

/// Upper bound for the connect timeout derived by [`RpcClient::connect`].
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Socket error kinds meaning the endpoint cannot be reached.
const UNREACHABLE_KINDS: &[io::ErrorKind] = &[
    io::ErrorKind::ConnectionRefused,
    io::ErrorKind::ConnectionReset,
    io::ErrorKind::ConnectionAborted,
    io::ErrorKind::NetworkUnreachable,
    io::ErrorKind::HostUnreachable,
    io::ErrorKind::AddrNotAvailable,
];

/// Execution client talking JSON-RPC over HTTP to one endpoint.
#[derive(Clone)]
pub struct RpcClient {
    url: String,
    provider: Arc<dyn Provider + Send + Sync>,
    timeout_duration: Duration,
    connect_timeout: Duration,
}

impl RpcClient {
    /// Create a client for `url` with a connect timeout derived from
    /// `timeout_duration` (half of it, at most five seconds).
    ///
    /// No connection is made here; the first request dials the endpoint.
    pub fn connect(url: &str, timeout_duration: Duration) -> ClientResult<Self> {
        let connect_timeout = (timeout_duration / 2).min(MAX_CONNECT_TIMEOUT);
        Self::with_timeouts(url, timeout_duration, connect_timeout)
    }

    /// Create a client for `url` with explicit request and connect timeouts.
    pub fn with_timeouts(
        url: &str,
        timeout_duration: Duration,
        connect_timeout: Duration,
    ) -> ClientResult<Self> {
        let parsed: url::Url = url.parse().map_err(|e: url::ParseError| ClientError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| ClientError::Other(format!("failed to build HTTP client: {e}")))?;
        let provider = ProviderBuilder::new().connect_reqwest(http, parsed);

        tracing::debug!(
            url = %url,
            timeout_ms = timeout_duration.as_millis() as u64,
            connect_timeout_ms = connect_timeout.as_millis() as u64,
            "Execution client created"
        );

        Ok(Self {
            url: url.to_string(),
            provider: Arc::new(provider),
            timeout_duration,
            connect_timeout,
        })
    }

    async fn request<T, F>(&self, call: F) -> ClientResult<T>
    where
        F: IntoFuture<Output = Result<T, TransportError>>,
    {
        match timeout(self.timeout_duration, call).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => Err(classify(e)),
            Err(_) => Err(ClientError::Timeout {
                ms: self.timeout_duration.as_millis() as u64,
            }),
        }
    }
}

/// Map an alloy error onto the client error taxonomy.
pub(crate) fn classify(err: TransportError) -> ClientError {
    match err {
        RpcError::ErrorResp(payload) => ClientError::Rpc {
            code: payload.code,
            message: payload.message.to_string(),
        },
        RpcError::Transport(kind) if is_connection_failure(&kind) => {
            ClientError::Transport(describe(&kind))
        }
        other => ClientError::Other(other.to_string()),
    }
}

fn is_connection_failure(kind: &TransportErrorKind) -> bool {
    match kind {
        TransportErrorKind::BackendGone => true,
        TransportErrorKind::Custom(inner) => {
            if let Some(e) = inner.downcast_ref::<reqwest::Error>() {
                if e.is_connect() {
                    return true;
                }
            }
            chain_has_unreachable_socket(inner.as_ref())
        }
        _ => false,
    }
}

fn chain_has_unreachable_socket(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if UNREACHABLE_KINDS.contains(&io_err.kind()) {
                return true;
            }
        }
        current = e.source();
    }
    false
}

/// The top-level reqwest message omits the cause; append the innermost one.
fn describe(kind: &TransportErrorKind) -> String {
    let TransportErrorKind::Custom(inner) = kind else {
        return kind.to_string();
    };
    let mut root: &(dyn std::error::Error + 'static) = inner.as_ref();
    while let Some(source) = root.source() {
        root = source;
    }
    let top = inner.to_string();
    let cause = root.to_string();
    if cause == top {
        top
    } else {
        format!("{top}: {cause}")
    }
}

#[async_trait]
impl ExecutionClient for RpcClient {
    fn url(&self) -> &str {
        &self.url
    }

    async fn code_at(&self, contract: Address, block: BlockId) -> ClientResult<Bytes> {
        self.request(self.provider.get_code_at(contract).block_id(block)).await
    }

    async fn call_contract(
        &self,
        call: &TransactionRequest,
        block: BlockId,
    ) -> ClientResult<Bytes> {
        self.request(self.provider.call(call.clone()).block(block)).await
    }

    async fn header_by_number(&self, number: BlockNumberOrTag) -> ClientResult<Option<Header>> {
        let block = self.request(self.provider.get_block_by_number(number)).await?;
        Ok(block.map(|block| block.header))
    }

    async fn pending_code_at(&self, account: Address) -> ClientResult<Bytes> {
        self.request(self.provider.get_code_at(account).pending()).await
    }

    async fn pending_nonce_at(&self, account: Address) -> ClientResult<u64> {
        self.request(self.provider.get_transaction_count(account).pending()).await
    }

    async fn suggest_gas_price(&self) -> ClientResult<u128> {
        self.request(self.provider.get_gas_price()).await
    }

    async fn suggest_gas_tip_cap(&self) -> ClientResult<u128> {
        self.request(self.provider.get_max_priority_fee_per_gas()).await
    }

    async fn estimate_gas(&self, call: &TransactionRequest) -> ClientResult<u64> {
        self.request(self.provider.estimate_gas(call.clone())).await
    }

    async fn send_transaction(&self, raw_tx: &[u8]) -> ClientResult<TxHash> {
        let pending = self.request(self.provider.send_raw_transaction(raw_tx)).await?;
        Ok(*pending.tx_hash())
    }

    async fn filter_logs(&self, query: &Filter) -> ClientResult<Vec<Log>> {
        self.request(self.provider.get_logs(query)).await
    }

    async fn subscribe_filter_logs(&self, query: &Filter) -> ClientResult<LogStream> {
        let poller = self.request(self.provider.watch_logs(query)).await?;
        Ok(poller
            .into_stream()
            .flat_map(futures_util::stream::iter)
            .boxed())
    }

    async fn transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> ClientResult<Option<TransactionReceipt>> {
        self.request(self.provider.get_transaction_receipt(tx_hash)).await
    }

    async fn block_number(&self) -> ClientResult<u64> {
        self.request(self.provider.get_block_number()).await
    }

    async fn balance_at(&self, account: Address, block: BlockId) -> ClientResult<U256> {
        self.request(self.provider.get_balance(account).block_id(block)).await
    }

    async fn transaction_by_hash(
        &self,
        hash: TxHash,
    ) -> ClientResult<Option<(Transaction, bool)>> {
        let tx = self.request(self.provider.get_transaction_by_hash(hash)).await?;
        Ok(tx.map(|tx| {
            let is_pending = tx.block_number.is_none();
            (tx, is_pending)
        }))
    }

    async fn nonce_at(&self, account: Address, block: BlockId) -> ClientResult<u64> {
        self.request(self.provider.get_transaction_count(account).block_id(block)).await
    }

    async fn sync_progress(&self) -> ClientResult<Option<SyncProgress>> {
        match self.request(self.provider.syncing()).await? {
            SyncStatus::None => Ok(None),
            SyncStatus::Info(info) => Ok(Some(SyncProgress {
                starting_block: info.starting_block.saturating_to::<u64>(),
                current_block: info.current_block.saturating_to::<u64>(),
                highest_block: info.highest_block.saturating_to::<u64>(),
            })),
        }
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("url", &self.url)
            .field("timeout_ms", &self.timeout_duration.as_millis())
            .field("connect_timeout_ms", &self.connect_timeout.as_millis())
            .finish()
    }
}
