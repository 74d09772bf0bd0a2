//! Passive health checking (failure detection during dispatch).
//!
//! # Design Decisions
//! - Only connection-level failures count against an endpoint
//! - Timeouts and cancelled calls do not
//! - Application errors (reverts, bad arguments) never do: retrying the same
//!   request elsewhere would fail the same way

use crate::blockchain::ClientResult;

/// What a single dispatched call says about its endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// The call returned a result.
    Succeeded,
    /// The endpoint could not be reached.
    Disconnected,
    /// The endpoint was reached but the call failed.
    Failed,
}

/// Classify the result of a dispatched call.
pub fn observe<T>(result: &ClientResult<T>) -> CallOutcome {
    match result {
        Ok(_) => CallOutcome::Succeeded,
        Err(e) if e.is_transport() => CallOutcome::Disconnected,
        Err(_) => CallOutcome::Failed,
    }
}
