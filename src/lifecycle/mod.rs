//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     broadcast → background tasks exit their loops
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::{join_task, Shutdown};
pub use signals::wait_for_signal;
