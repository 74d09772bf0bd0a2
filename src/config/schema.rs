//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the manager.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the execution client manager.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ManagerConfig {
    /// Primary execution client (required).
    pub primary: EndpointConfig,

    /// Fallback execution client (optional).
    pub fallback: FallbackConfig,

    /// Health check settings.
    pub health: HealthConfig,

    /// Per-request RPC settings.
    pub rpc: RpcConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ManagerConfig {
    /// URL of the fallback client, present only if a fallback is enabled.
    pub fn fallback_url(&self) -> Option<String> {
        self.fallback
            .enabled
            .then(|| self.fallback.endpoint().resolve_url())
    }
}

/// How an execution client is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClientMode {
    /// Client runs next to the manager, reached by container name and port.
    #[default]
    Local,
    /// Client is managed elsewhere, reached by a full URL.
    External,
}

/// Location of one execution client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Local or external client.
    pub mode: ClientMode,

    /// Host name of a local client.
    pub container_name: String,

    /// HTTP JSON-RPC port of a local client.
    pub http_port: u16,

    /// Full HTTP URL of an external client.
    pub url: String,
}

impl EndpointConfig {
    fn local(container_name: &str) -> Self {
        Self {
            mode: ClientMode::Local,
            container_name: container_name.to_string(),
            http_port: 8545,
            url: String::new(),
        }
    }

    /// The URL the client should dial.
    pub fn resolve_url(&self) -> String {
        match self.mode {
            ClientMode::Local => format!("http://{}:{}", self.container_name, self.http_port),
            ClientMode::External => self.url.clone(),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::local("eth1")
    }
}

/// Fallback client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Use a fallback client at all.
    pub enabled: bool,

    /// Local or external client.
    pub mode: ClientMode,

    /// Host name of a local client.
    pub container_name: String,

    /// HTTP JSON-RPC port of a local client.
    pub http_port: u16,

    /// Full HTTP URL of an external client.
    pub url: String,
}

impl FallbackConfig {
    /// Location of the fallback client, whether or not it is enabled.
    pub fn endpoint(&self) -> EndpointConfig {
        EndpointConfig {
            mode: self.mode,
            container_name: self.container_name.clone(),
            http_port: self.http_port,
            url: self.url.clone(),
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        let endpoint = EndpointConfig::local("eth1-fallback");
        Self {
            enabled: false,
            mode: endpoint.mode,
            container_name: endpoint.container_name,
            http_port: endpoint.http_port,
            url: endpoint.url,
        }
    }
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Skip live sync checks and report the recorded readiness instead
    /// (e.g. isolated test networks).
    pub ignore_sync_check: bool,

    /// Maximum age of the latest block of a synced client, in seconds.
    pub staleness_threshold_secs: u64,

    /// Interval of the background status poller, in seconds.
    pub refresh_interval_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            ignore_sync_check: false,
            staleness_threshold_secs: 300,
            refresh_interval_secs: 60,
        }
    }
}

/// RPC request configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// RPC request timeout in seconds.
    pub timeout_secs: u64,
    /// TCP connect timeout in seconds. Must be below `timeout_secs` so an
    /// endpoint that never answers the handshake fails over.
    pub connect_timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 5,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Pretty output for terminals, JSON for log aggregation.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9102".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ManagerConfig::default();
        assert_eq!(config.primary.resolve_url(), "http://eth1:8545");
        assert_eq!(config.fallback_url(), None);
        assert!(!config.health.ignore_sync_check);
        assert_eq!(config.health.staleness_threshold_secs, 300);
    }

    #[test]
    fn test_parse_external_with_fallback() {
        let config: ManagerConfig = toml::from_str(
            r#"
            [primary]
            mode = "external"
            url = "http://10.0.0.5:8545"

            [fallback]
            enabled = true
            mode = "local"
            http_port = 9545

            [health]
            ignore_sync_check = true
            "#,
        )
        .unwrap();

        assert_eq!(config.primary.resolve_url(), "http://10.0.0.5:8545");
        assert_eq!(
            config.fallback_url().as_deref(),
            Some("http://eth1-fallback:9545")
        );
        assert!(config.health.ignore_sync_check);
        assert_eq!(config.rpc.timeout_secs, 30);
        assert_eq!(config.rpc.connect_timeout_secs, 5);
    }
}
