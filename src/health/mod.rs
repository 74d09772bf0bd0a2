//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Explicit refresh (monitor.rs):
//!     sync progress query
//!     → staleness.rs when the node claims to be synced
//!     → ClientStatus → state.rs (readiness = working ∧ synced)
//!
//! Passive checks (passive.rs):
//!     Dispatched call fails to connect
//!     → state.rs demotes the endpoint
//!
//! Active checks (active.rs):
//!     Periodic timer → explicit refresh
//! ```
//!
//! # Design Decisions
//! - Health failures are reported as status text, never thrown
//! - Promotion only through an explicit refresh; dispatch only demotes

pub mod active;
pub mod monitor;
pub mod passive;
pub mod staleness;
pub mod state;

pub use active::StatusPoller;
pub use monitor::{check_client_status, ClientStatus, ManagerStatus};
pub use staleness::{check_block_freshness, BlockFreshness, DEFAULT_STALENESS_THRESHOLD};
pub use state::{Endpoint, Readiness};
