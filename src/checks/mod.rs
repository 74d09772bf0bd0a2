//! Concurrent preflight checks.
//!
//! # Data Flow
//! ```text
//! run_checks(checks)
//!     → one task per check
//!     → each reports Passed / Failed(message) / error over a shared channel
//!     → counting loop: first message or error wins, otherwise all must pass
//! ```
//!
//! Checks that are still running when the outcome is known are aborted.

use std::future::Future;
use std::sync::Arc;

use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, U256};
use alloy::rpc::types::BlockId;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::blockchain::{ClientError, ExecutionClient};
use crate::manager::ExecutionClientManager;

/// Result of a single check that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Passed,
    /// The precondition does not hold; the message explains why.
    Failed(String),
}

/// Errors that prevented a check from reaching a verdict.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("{context}: {source}")]
    Client {
        context: String,
        #[source]
        source: ClientError,
    },

    #[error("a check stopped without reporting")]
    Aborted,
}

impl CheckError {
    pub fn client(context: impl Into<String>) -> impl FnOnce(ClientError) -> Self {
        let context = context.into();
        move |source| CheckError::Client { context, source }
    }
}

/// A check ready to be spawned.
pub type Check = BoxFuture<'static, Result<CheckOutcome, CheckError>>;

/// Run `checks` concurrently and combine their verdicts.
pub async fn run_checks(checks: Vec<Check>) -> Result<CheckOutcome, CheckError> {
    let total = checks.len();
    let (tx, mut rx) = mpsc::channel(total.max(1));

    let mut tasks = JoinSet::new();
    for check in checks {
        let tx = tx.clone();
        tasks.spawn(async move {
            let _ = tx.send(check.await).await;
        });
    }
    drop(tx);

    let mut passed = 0;
    while passed < total {
        match rx.recv().await {
            Some(Ok(CheckOutcome::Passed)) => passed += 1,
            Some(Ok(failed)) => {
                tracing::debug!(passed, total, "Preflight check failed");
                return Ok(failed);
            }
            Some(Err(e)) => return Err(e),
            None => return Err(CheckError::Aborted),
        }
    }

    Ok(CheckOutcome::Passed)
}

/// Check that `account` holds at least the amount `minimum` resolves to.
///
/// The balance and the minimum are fetched concurrently.
pub fn balance_check<C, M>(
    manager: Arc<ExecutionClientManager<C>>,
    account: Address,
    minimum: M,
) -> Check
where
    C: ExecutionClient,
    M: Future<Output = Result<U256, CheckError>> + Send + 'static,
{
    async move {
        let balance = async {
            manager
                .balance_at(account, BlockId::latest())
                .await
                .map_err(CheckError::client("Error retrieving node account balance"))
        };
        let (minimum, balance) = tokio::try_join!(minimum, balance)?;

        if balance < minimum {
            Ok(CheckOutcome::Failed(format!(
                "Node account requires a minimum balance of {} ETH",
                format_ether(minimum)
            )))
        } else {
            Ok(CheckOutcome::Passed)
        }
    }
    .boxed()
}

/// Check that at least one execution client is ready after a fresh refresh.
pub fn sync_check<C: ExecutionClient>(manager: Arc<ExecutionClientManager<C>>) -> Check {
    async move {
        let status = manager.refresh_status().await;
        let fallback_ready = status.fallback.as_ref().is_some_and(|s| s.is_ready());

        if status.primary.is_ready() || fallback_ready {
            return Ok(CheckOutcome::Passed);
        }

        let reason = status
            .primary
            .error
            .unwrap_or_else(|| "primary execution client is still syncing".to_string());
        Ok(CheckOutcome::Failed(format!(
            "No execution client is ready: {reason}"
        )))
    }
    .boxed()
}
