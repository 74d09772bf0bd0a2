//! Execution client subsystem.
//!
//! # Data Flow
//! ```text
//! Endpoint URL (resolved from config)
//!     → client.rs (alloy HTTP provider with per-request timeout)
//!     → handle.rs (ExecutionClient trait, one method per remote operation)
//!     → types.rs (ClientError taxonomy, SyncProgress)
//! ```
//!
//! # Error Classes
//! - Transport: the endpoint could not be reached; the only kind that demotes
//! - Rpc / Timeout / NotFound / Other: the request failed, the endpoint did not
//! - AllClientsFailed / NoneReady: dispatch ran out of ready endpoints

pub mod client;
pub mod handle;
pub mod types;

pub use client::RpcClient;
pub use handle::{ExecutionClient, LogStream};
pub use types::{ClientError, ClientResult, SyncProgress};
