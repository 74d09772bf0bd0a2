//! Fault-tolerant proxy over a primary and an optional fallback Ethereum
//! execution client.

pub mod blockchain;
pub mod checks;
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod manager;
pub mod observability;

pub use blockchain::{ClientError, ClientResult, ExecutionClient, RpcClient};
pub use config::ManagerConfig;
pub use health::{ClientStatus, Endpoint, ManagerStatus};
pub use lifecycle::Shutdown;
pub use manager::{ExecutionClientManager, ManagerOptions};
