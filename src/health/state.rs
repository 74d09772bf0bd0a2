//! Endpoint readiness state.
//!
//! # States
//! - Ready: endpoint receives dispatched calls
//! - Not ready: endpoint is skipped by dispatch
//!
//! # State Transitions
//! ```text
//! Ready → Not ready:  transport failure during dispatch (demote)
//! Any   → Any:        explicit status refresh (refresh = working ∧ synced)
//! ```
//!
//! Successful dispatch traffic never promotes an endpoint; only a refresh,
//! which re-verifies liveness and freshness, can.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use crate::health::monitor::ClientStatus;

/// Role of an endpoint in the failover order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Primary,
    Fallback,
}

impl Endpoint {
    /// Dispatch order. Never more than one hop past the first entry.
    pub const ORDER: [Endpoint; 2] = [Endpoint::Primary, Endpoint::Fallback];

    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Primary => "primary",
            Endpoint::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-endpoint readiness flags shared by every concurrent caller.
#[derive(Debug)]
pub struct Readiness {
    primary: AtomicBool,
    fallback: AtomicBool,
    fallback_enabled: bool,
}

impl Readiness {
    /// Primary starts ready; fallback starts ready only if it exists.
    pub fn new(fallback_enabled: bool) -> Self {
        Self {
            primary: AtomicBool::new(true),
            fallback: AtomicBool::new(fallback_enabled),
            fallback_enabled,
        }
    }

    fn flag(&self, endpoint: Endpoint) -> &AtomicBool {
        match endpoint {
            Endpoint::Primary => &self.primary,
            Endpoint::Fallback => &self.fallback,
        }
    }

    /// Return true if `endpoint` may receive dispatched calls right now.
    pub fn is_ready(&self, endpoint: Endpoint) -> bool {
        self.flag(endpoint).load(Ordering::Acquire)
    }

    /// Mark `endpoint` not ready. Returns true if this call changed the flag.
    pub fn demote(&self, endpoint: Endpoint) -> bool {
        self.flag(endpoint).swap(false, Ordering::AcqRel)
    }

    /// Overwrite the flag of `endpoint` from a fresh health check.
    ///
    /// A disabled fallback stays not ready whatever the status says.
    pub fn refresh(&self, endpoint: Endpoint, status: &ClientStatus) -> bool {
        let ready = status.is_ready()
            && (endpoint == Endpoint::Primary || self.fallback_enabled);
        self.flag(endpoint).store(ready, Ordering::Release);
        ready
    }
}
