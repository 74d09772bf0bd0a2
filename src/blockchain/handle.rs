//! The `ExecutionClient` trait: one connected endpoint.

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::{
    BlockId, BlockNumberOrTag, Filter, Header, Log, Transaction, TransactionReceipt,
    TransactionRequest,
};
use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::blockchain::types::{ClientResult, SyncProgress};

/// Stream of logs matching a subscription filter.
pub type LogStream = BoxStream<'static, Log>;

/// A client bound to a single execution-layer endpoint.
///
/// Implementations must be safe for concurrent use; the manager shares one
/// handle across every in-flight call.
#[async_trait]
pub trait ExecutionClient: Send + Sync + 'static {
    /// The endpoint this client talks to.
    fn url(&self) -> &str;

    /// Code deployed at `contract` as of `block`.
    async fn code_at(&self, contract: Address, block: BlockId) -> ClientResult<Bytes>;

    /// Execute a read-only call against the state at `block`.
    async fn call_contract(&self, call: &TransactionRequest, block: BlockId)
        -> ClientResult<Bytes>;

    /// Header of the given block; `Latest` yields the most recent known header.
    async fn header_by_number(&self, number: BlockNumberOrTag) -> ClientResult<Option<Header>>;

    /// Code of `account` in the pending state.
    async fn pending_code_at(&self, account: Address) -> ClientResult<Bytes>;

    /// Nonce of `account` in the pending state.
    async fn pending_nonce_at(&self, account: Address) -> ClientResult<u64>;

    /// Suggested legacy gas price, in wei.
    async fn suggest_gas_price(&self) -> ClientResult<u128>;

    /// Suggested EIP-1559 priority fee, in wei.
    async fn suggest_gas_tip_cap(&self) -> ClientResult<u128>;

    /// Gas needed to execute `call` against the pending state.
    async fn estimate_gas(&self, call: &TransactionRequest) -> ClientResult<u64>;

    /// Submit an already signed, RLP-encoded transaction.
    async fn send_transaction(&self, raw_tx: &[u8]) -> ClientResult<TxHash>;

    /// All historical logs matching `query`, in one batch.
    async fn filter_logs(&self, query: &Filter) -> ClientResult<Vec<Log>>;

    /// Start streaming new logs matching `query`.
    async fn subscribe_filter_logs(&self, query: &Filter) -> ClientResult<LogStream>;

    /// Receipt of a mined transaction. Pending transactions have none.
    async fn transaction_receipt(&self, tx_hash: TxHash)
        -> ClientResult<Option<TransactionReceipt>>;

    /// Most recent block number.
    async fn block_number(&self) -> ClientResult<u64>;

    /// Wei balance of `account` as of `block`.
    async fn balance_at(&self, account: Address, block: BlockId) -> ClientResult<U256>;

    /// Transaction by hash, with a flag telling whether it is still pending.
    async fn transaction_by_hash(&self, hash: TxHash)
        -> ClientResult<Option<(Transaction, bool)>>;

    /// Nonce of `account` as of `block`.
    async fn nonce_at(&self, account: Address, block: BlockId) -> ClientResult<u64>;

    /// Current sync progress, or `None` when the node is not syncing.
    async fn sync_progress(&self) -> ClientResult<Option<SyncProgress>>;
}
