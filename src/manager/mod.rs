//! Failover proxy over a primary and an optional fallback execution client.
//!
//! # Data Flow
//! ```text
//! Caller
//!     → operations.rs (typed wrapper per remote operation)
//!     → ExecutionClientManager::run (pick the first ready endpoint)
//!     → ExecutionClient (primary, at most one hop to fallback)
//!     → health::state (demote on transport failure)
//!
//! Reporting / monitoring
//!     → ExecutionClientManager::refresh_status
//!     → health::monitor (probe each endpoint)
//!     → health::state (overwrite readiness from the fresh status)
//! ```
//!
//! # Design Decisions
//! - Only transport failures demote and fail over; everything else is
//!   returned to the caller untouched
//! - Dispatch never promotes a demoted endpoint; only a refresh does
//! - Readiness flags are the only shared mutable state; handles are shared
//!   across concurrent calls without a lock

mod operations;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::{ClientError, ClientResult, ExecutionClient, RpcClient};
use crate::config::ManagerConfig;
use crate::health::monitor::{check_client_status, ClientStatus, ManagerStatus};
use crate::health::passive::{observe, CallOutcome};
use crate::health::staleness::DEFAULT_STALENESS_THRESHOLD;
use crate::health::state::{Endpoint, Readiness};
use crate::observability::metrics;

/// Behavior switches for the manager.
#[derive(Debug, Clone)]
pub struct ManagerOptions {
    /// Report readiness from the recorded flags instead of probing endpoints.
    pub ignore_sync_check: bool,
    /// Maximum age of the latest block for a synced endpoint to count as fresh.
    pub staleness_threshold: Duration,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            ignore_sync_check: false,
            staleness_threshold: DEFAULT_STALENESS_THRESHOLD,
        }
    }
}

/// Proxy for the execution clients with fallback support.
pub struct ExecutionClientManager<C: ExecutionClient = RpcClient> {
    primary: Arc<C>,
    fallback: Option<Arc<C>>,
    readiness: Readiness,
    options: ManagerOptions,
}

impl ExecutionClientManager<RpcClient> {
    /// Build the manager from configuration.
    ///
    /// Clients dial lazily, so this only fails on malformed endpoint URLs.
    pub fn from_config(config: &ManagerConfig) -> ClientResult<Self> {
        let timeout = Duration::from_secs(config.rpc.timeout_secs);
        let connect_timeout = Duration::from_secs(config.rpc.connect_timeout_secs);

        let primary_url = config.primary.resolve_url();
        let primary = RpcClient::with_timeouts(&primary_url, timeout, connect_timeout)?;

        let fallback = match config.fallback_url() {
            Some(url) => Some(RpcClient::with_timeouts(&url, timeout, connect_timeout)?),
            None => None,
        };

        let options = ManagerOptions {
            ignore_sync_check: config.health.ignore_sync_check,
            staleness_threshold: Duration::from_secs(config.health.staleness_threshold_secs),
        };

        tracing::info!(
            primary = %primary_url,
            fallback = ?config.fallback_url(),
            ignore_sync_check = options.ignore_sync_check,
            "Execution client manager initialized"
        );

        Ok(Self::new(primary, fallback, options))
    }
}

impl<C: ExecutionClient> ExecutionClientManager<C> {
    /// Create a manager from already constructed clients.
    pub fn new(primary: C, fallback: Option<C>, options: ManagerOptions) -> Self {
        let readiness = Readiness::new(fallback.is_some());
        metrics::record_endpoint_ready(Endpoint::Primary, true);
        if fallback.is_some() {
            metrics::record_endpoint_ready(Endpoint::Fallback, true);
        }

        Self {
            primary: Arc::new(primary),
            fallback: fallback.map(Arc::new),
            readiness,
            options,
        }
    }

    /// The primary client.
    pub fn primary(&self) -> &C {
        &self.primary
    }

    /// The fallback client, if one is configured.
    pub fn fallback(&self) -> Option<&C> {
        self.fallback.as_deref()
    }

    pub fn fallback_enabled(&self) -> bool {
        self.fallback.is_some()
    }

    /// Whether `endpoint` is currently eligible for dispatched calls.
    pub fn is_ready(&self, endpoint: Endpoint) -> bool {
        self.readiness.is_ready(endpoint)
    }

    fn client(&self, endpoint: Endpoint) -> Option<&Arc<C>> {
        match endpoint {
            Endpoint::Primary => Some(&self.primary),
            Endpoint::Fallback => self.fallback.as_ref(),
        }
    }

    /// Run `call` on the first ready endpoint, failing over at most once.
    ///
    /// A transport failure on the primary demotes it and retries on the
    /// fallback; a transport failure on the fallback demotes it and ends the
    /// call. Any other error is returned as is.
    async fn run<T, F, Fut>(&self, operation: &'static str, call: F) -> ClientResult<T>
    where
        F: Fn(Arc<C>) -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        for endpoint in Endpoint::ORDER {
            if !self.readiness.is_ready(endpoint) {
                continue;
            }
            let Some(client) = self.client(endpoint) else {
                continue;
            };

            let result = call(Arc::clone(client)).await;
            match (observe(&result), result) {
                (CallOutcome::Disconnected, Err(error)) => {
                    self.demote(endpoint, operation, client.url(), &error);
                    if endpoint == Endpoint::Fallback {
                        metrics::record_dispatch_exhausted();
                        return Err(ClientError::AllClientsFailed);
                    }
                }
                (_, result) => return result,
            }
        }

        tracing::warn!(operation, "No execution clients were ready");
        metrics::record_dispatch_exhausted();
        Err(ClientError::NoneReady)
    }

    fn demote(&self, endpoint: Endpoint, operation: &'static str, url: &str, error: &ClientError) {
        if !self.readiness.demote(endpoint) {
            // Another caller got there first.
            return;
        }
        metrics::record_demotion(endpoint);
        metrics::record_endpoint_ready(endpoint, false);

        match endpoint {
            Endpoint::Primary if self.readiness.is_ready(Endpoint::Fallback) => {
                metrics::record_failover();
                tracing::warn!(
                    endpoint = %endpoint,
                    url = %url,
                    operation,
                    error = %error,
                    "Primary execution client disconnected, using fallback"
                );
            }
            _ => tracing::warn!(
                endpoint = %endpoint,
                url = %url,
                operation,
                error = %error,
                "Execution client disconnected"
            ),
        }
    }

    /// Re-check both endpoints and overwrite their readiness.
    ///
    /// With `ignore_sync_check` set, nothing is probed and the recorded flags
    /// are reported instead. This is the only way a demoted endpoint becomes
    /// ready again.
    pub async fn refresh_status(&self) -> ManagerStatus {
        let fallback_enabled = self.fallback.is_some();

        if self.options.ignore_sync_check {
            return ManagerStatus {
                fallback_enabled,
                primary: ClientStatus::assumed(self.readiness.is_ready(Endpoint::Primary)),
                fallback: fallback_enabled
                    .then(|| ClientStatus::assumed(self.readiness.is_ready(Endpoint::Fallback))),
            };
        }

        let threshold = self.options.staleness_threshold;
        let primary_check = check_client_status(self.primary.as_ref(), threshold);
        let fallback_check = async {
            match &self.fallback {
                Some(client) => Some(check_client_status(client.as_ref(), threshold).await),
                None => None,
            }
        };
        let (primary, fallback) = tokio::join!(primary_check, fallback_check);

        self.apply_status(Endpoint::Primary, &primary);
        if let Some(status) = &fallback {
            self.apply_status(Endpoint::Fallback, status);
        }

        ManagerStatus {
            fallback_enabled,
            primary,
            fallback,
        }
    }

    fn apply_status(&self, endpoint: Endpoint, status: &ClientStatus) {
        let was_ready = self.readiness.is_ready(endpoint);
        let ready = self.readiness.refresh(endpoint, status);

        metrics::record_endpoint_ready(endpoint, ready);
        metrics::record_sync_progress(endpoint, status);

        if ready && !was_ready {
            tracing::info!(endpoint = %endpoint, "Execution client is ready again");
        } else if !ready && was_ready {
            tracing::warn!(
                endpoint = %endpoint,
                is_working = status.is_working,
                is_synced = status.is_synced,
                error = status.error.as_deref().unwrap_or(""),
                "Execution client is no longer ready"
            );
        }
    }
}

impl<C: ExecutionClient> std::fmt::Debug for ExecutionClientManager<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionClientManager")
            .field("primary", &self.primary.url())
            .field("fallback", &self.fallback.as_ref().map(|c| c.url().to_string()))
            .field("readiness", &self.readiness)
            .field("options", &self.options)
            .finish()
    }
}
