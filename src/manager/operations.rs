//! Remote operation surface of the manager.
//!
//! Every method forwards its arguments unchanged to the selected client and
//! shares the failover contract of [`ExecutionClientManager::run`].

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::{
    BlockId, BlockNumberOrTag, Filter, Header, Log, Transaction, TransactionReceipt,
    TransactionRequest,
};

use super::ExecutionClientManager;
use crate::blockchain::{ClientResult, ExecutionClient, LogStream, SyncProgress};

impl<C: ExecutionClient> ExecutionClientManager<C> {
    /// Code of `contract` as of `block`. Lets callers tell contract errors
    /// apart from a node that is out of sync.
    pub async fn code_at(&self, contract: Address, block: BlockId) -> ClientResult<Bytes> {
        self.run("code_at", |c| async move { c.code_at(contract, block).await })
            .await
    }

    /// Read-only contract call against the state at `block`.
    pub async fn call_contract(
        &self,
        call: &TransactionRequest,
        block: BlockId,
    ) -> ClientResult<Bytes> {
        self.run("call_contract", |c| async move { c.call_contract(call, block).await })
            .await
    }

    /// Header from the canonical chain; `Latest` returns the newest known header.
    pub async fn header_by_number(
        &self,
        number: BlockNumberOrTag,
    ) -> ClientResult<Option<Header>> {
        self.run("header_by_number", |c| async move { c.header_by_number(number).await })
            .await
    }

    pub async fn pending_code_at(&self, account: Address) -> ClientResult<Bytes> {
        self.run("pending_code_at", |c| async move { c.pending_code_at(account).await })
            .await
    }

    pub async fn pending_nonce_at(&self, account: Address) -> ClientResult<u64> {
        self.run("pending_nonce_at", |c| async move { c.pending_nonce_at(account).await })
            .await
    }

    pub async fn suggest_gas_price(&self) -> ClientResult<u128> {
        self.run("suggest_gas_price", |c| async move { c.suggest_gas_price().await })
            .await
    }

    /// Suggested EIP-1559 priority fee.
    pub async fn suggest_gas_tip_cap(&self) -> ClientResult<u128> {
        self.run("suggest_gas_tip_cap", |c| async move { c.suggest_gas_tip_cap().await })
            .await
    }

    /// Gas estimate for `call` against the pending state. Not a guarantee:
    /// the pending state can change before the transaction is mined.
    pub async fn estimate_gas(&self, call: &TransactionRequest) -> ClientResult<u64> {
        self.run("estimate_gas", |c| async move { c.estimate_gas(call).await })
            .await
    }

    /// Inject a signed, encoded transaction into the pending pool.
    pub async fn send_transaction(&self, raw_tx: &[u8]) -> ClientResult<TxHash> {
        self.run("send_transaction", |c| async move { c.send_transaction(raw_tx).await })
            .await
    }

    pub async fn filter_logs(&self, query: &Filter) -> ClientResult<Vec<Log>> {
        self.run("filter_logs", |c| async move { c.filter_logs(query).await })
            .await
    }

    /// Stream new logs matching `query`. The stream stays bound to the client
    /// that created it.
    pub async fn subscribe_filter_logs(&self, query: &Filter) -> ClientResult<LogStream> {
        self.run("subscribe_filter_logs", |c| async move {
            c.subscribe_filter_logs(query).await
        })
        .await
    }

    pub async fn transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> ClientResult<Option<TransactionReceipt>> {
        self.run("transaction_receipt", |c| async move {
            c.transaction_receipt(tx_hash).await
        })
        .await
    }

    pub async fn block_number(&self) -> ClientResult<u64> {
        self.run("block_number", |c| async move { c.block_number().await })
            .await
    }

    pub async fn balance_at(&self, account: Address, block: BlockId) -> ClientResult<U256> {
        self.run("balance_at", |c| async move { c.balance_at(account, block).await })
            .await
    }

    /// Transaction by hash and whether it is still pending.
    pub async fn transaction_by_hash(
        &self,
        hash: TxHash,
    ) -> ClientResult<Option<(Transaction, bool)>> {
        self.run("transaction_by_hash", |c| async move {
            c.transaction_by_hash(hash).await
        })
        .await
    }

    pub async fn nonce_at(&self, account: Address, block: BlockId) -> ClientResult<u64> {
        self.run("nonce_at", |c| async move { c.nonce_at(account, block).await })
            .await
    }

    /// Sync progress of the selected client; `None` when it is not syncing.
    pub async fn sync_progress(&self) -> ClientResult<Option<SyncProgress>> {
        self.run("sync_progress", |c| async move { c.sync_progress().await })
            .await
    }
}
