//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ec_endpoint_ready` (gauge): 1=ready, 0=not ready, by endpoint
//! - `ec_endpoint_demotions_total` (counter): transport-failure demotions, by endpoint
//! - `ec_failover_total` (counter): calls moved from primary to fallback
//! - `ec_dispatch_exhausted_total` (counter): calls failed for lack of a ready endpoint
//! - `ec_sync_progress` (gauge): last probed sync progress, by endpoint
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::health::monitor::ClientStatus;
use crate::health::state::Endpoint;

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_endpoint_ready(endpoint: Endpoint, ready: bool) {
    metrics::gauge!("ec_endpoint_ready", "endpoint" => endpoint.as_str())
        .set(if ready { 1.0 } else { 0.0 });
}

pub fn record_demotion(endpoint: Endpoint) {
    metrics::counter!("ec_endpoint_demotions_total", "endpoint" => endpoint.as_str()).increment(1);
}

pub fn record_failover() {
    metrics::counter!("ec_failover_total").increment(1);
}

pub fn record_dispatch_exhausted() {
    metrics::counter!("ec_dispatch_exhausted_total").increment(1);
}

pub fn record_sync_progress(endpoint: Endpoint, status: &ClientStatus) {
    let progress = if status.is_synced { 1.0 } else { status.sync_progress };
    metrics::gauge!("ec_sync_progress", "endpoint" => endpoint.as_str()).set(progress);
}
