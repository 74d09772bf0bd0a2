//! Execution client types and error definitions.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while talking to an execution client.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The endpoint could not be reached at all (refused, dial failure, backend gone).
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a JSON-RPC error.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The request did not complete within the configured timeout.
    #[error("RPC timeout after {ms}ms")]
    Timeout { ms: u64 },

    /// The requested object does not exist on the endpoint.
    #[error("not found: {0}")]
    NotFound(String),

    /// The endpoint URL could not be parsed.
    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The primary was demoted and the fallback also failed to connect.
    #[error("all execution clients failed")]
    AllClientsFailed,

    /// Neither endpoint is currently marked ready.
    #[error("no execution clients were ready")]
    NoneReady,

    /// Any other failure reported by the underlying client.
    #[error("{0}")]
    Other(String),
}

impl ClientError {
    /// Returns `true` if the endpoint could not be reached.
    ///
    /// This is the only error kind that demotes an endpoint.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if dispatch ran out of ready endpoints.
    pub fn is_exhaustion(&self) -> bool {
        matches!(self, Self::AllClientsFailed | Self::NoneReady)
    }
}

/// Result type for execution client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Sync progress reported by a node that is still catching up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncProgress {
    pub starting_block: u64,
    pub current_block: u64,
    pub highest_block: u64,
}

impl SyncProgress {
    /// Fraction of the chain downloaded, always within `[0, 1]`.
    ///
    /// A node that knows of no blocks at all (`0/0`) reports `0`.
    pub fn ratio(&self) -> f64 {
        let ratio = self.current_block as f64 / self.highest_block as f64;
        if ratio.is_nan() {
            0.0
        } else {
            ratio.clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(current: u64, highest: u64) -> SyncProgress {
        SyncProgress {
            starting_block: 0,
            current_block: current,
            highest_block: highest,
        }
    }

    #[test]
    fn test_ratio_bounds() {
        assert_eq!(progress(0, 0).ratio(), 0.0);
        assert_eq!(progress(150, 100).ratio(), 1.0);
        assert_eq!(progress(500, 1000).ratio(), 0.5);
        assert_eq!(progress(7, 0).ratio(), 1.0);
    }

    #[test]
    fn test_error_classes() {
        assert!(ClientError::Transport("dial tcp".into()).is_transport());
        assert!(!ClientError::Timeout { ms: 10 }.is_transport());
        assert!(!ClientError::Rpc { code: 3, message: "execution reverted".into() }.is_transport());
        assert!(ClientError::NoneReady.is_exhaustion());
        assert!(ClientError::AllClientsFailed.is_exhaustion());
        assert!(!ClientError::Other("x".into()).is_exhaustion());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(ClientError::AllClientsFailed.to_string(), "all execution clients failed");
        assert_eq!(ClientError::NoneReady.to_string(), "no execution clients were ready");
        let err = ClientError::Rpc { code: -32000, message: "nonce too low".into() };
        assert_eq!(err.to_string(), "RPC error -32000: nonce too low");
    }
}
