//! Execution client health probing.
//!
//! # Responsibilities
//! - Query sync progress from one endpoint
//! - Verify "fully synced" claims against block staleness
//! - Report failures as a descriptive status instead of an error

use std::time::Duration;

use serde::Serialize;

use crate::blockchain::ExecutionClient;
use crate::health::staleness::check_block_freshness;

/// Health of one execution client.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStatus {
    pub is_working: bool,
    pub is_synced: bool,
    /// Sync progress in `[0, 1]`.
    pub sync_progress: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClientStatus {
    /// Status derived from a recorded readiness flag, without probing.
    pub fn assumed(ready: bool) -> Self {
        Self {
            is_working: ready,
            is_synced: ready,
            ..Self::default()
        }
    }

    /// Whether an endpoint with this status may receive dispatched calls.
    pub fn is_ready(&self) -> bool {
        self.is_working && self.is_synced
    }
}

/// Aggregate status of the primary and fallback clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerStatus {
    pub fallback_enabled: bool,
    pub primary: ClientStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<ClientStatus>,
}

/// Probe `client` and describe its health.
pub async fn check_client_status<C>(client: &C, staleness_threshold: Duration) -> ClientStatus
where
    C: ExecutionClient + ?Sized,
{
    let progress = match client.sync_progress().await {
        Ok(progress) => progress,
        Err(e) => {
            tracing::debug!(url = %client.url(), error = %e, "Sync progress check failed");
            return ClientStatus {
                error: Some(format!("Sync progress check failed with [{e}]")),
                ..ClientStatus::default()
            };
        }
    };

    match progress {
        // Not syncing: the node claims to be caught up, make sure it is.
        None => match check_block_freshness(client, staleness_threshold).await {
            Err(e) => ClientStatus {
                error: Some(format!(
                    "Error checking if client's sync progress is up to date: [{e}]"
                )),
                ..ClientStatus::default()
            },
            Ok(freshness) if !freshness.is_fresh => ClientStatus {
                is_working: true,
                error: Some(format!(
                    "Client claims to have finished syncing, but its last block is stale \
                     (from {}s ago). It likely doesn't have enough peers",
                    freshness.age.as_secs()
                )),
                ..ClientStatus::default()
            },
            Ok(_) => ClientStatus {
                is_working: true,
                is_synced: true,
                ..ClientStatus::default()
            },
        },
        Some(progress) => ClientStatus {
            is_working: true,
            is_synced: false,
            sync_progress: progress.ratio(),
            error: None,
        },
    }
}
