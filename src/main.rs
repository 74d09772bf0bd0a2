//! Execution client manager CLI.
//!
//! Loads the manager configuration, builds the failover proxy and runs one
//! command against it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, U256};
use alloy::rpc::types::BlockId;
use clap::{Parser, Subcommand};
use serde::Serialize;

use ec_failover::checks::{balance_check, run_checks, sync_check, CheckOutcome};
use ec_failover::config::load_config;
use ec_failover::health::StatusPoller;
use ec_failover::lifecycle::{join_task, wait_for_signal, Shutdown};
use ec_failover::observability::{logging, metrics};
use ec_failover::ExecutionClientManager;

#[derive(Parser)]
#[command(name = "ec-manager")]
#[command(about = "Primary/fallback execution client manager", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "ec-manager.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check both execution clients and print their status
    Status,
    /// Keep refreshing client status until interrupted
    Watch,
    /// Print the latest block number
    BlockNumber,
    /// Print the balance of an account, in wei
    Balance { address: Address },
    /// Check that an account is ready to act on chain
    Preflight {
        address: Address,
        /// Minimum balance required, in wei
        #[arg(long)]
        min_wei: U256,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    logging::init_logging(&config.observability);
    tracing::debug!(config = %cli.config.display(), "Configuration loaded");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let manager = Arc::new(ExecutionClientManager::from_config(&config)?);

    match cli.command {
        Commands::Status => {
            let status = manager.refresh_status().await;
            print_json(&status)?;
        }
        Commands::Watch => {
            let shutdown = Shutdown::new();
            let poller = StatusPoller::new(
                Arc::clone(&manager),
                Duration::from_secs(config.health.refresh_interval_secs),
            );
            let poller_task = tokio::spawn(poller.run(shutdown.subscribe()));

            wait_for_signal().await;
            shutdown.trigger();
            join_task("status_poller", poller_task).await;
            tracing::info!("Shutdown complete");
        }
        Commands::BlockNumber => {
            println!("{}", manager.block_number().await?);
        }
        Commands::Balance { address } => {
            println!("{}", manager.balance_at(address, BlockId::latest()).await?);
        }
        Commands::Preflight { address, min_wei } => {
            let checks = vec![
                sync_check(Arc::clone(&manager)),
                balance_check(Arc::clone(&manager), address, async move { Ok(min_wei) }),
            ];
            match run_checks(checks).await? {
                CheckOutcome::Passed => println!("All preflight checks passed"),
                CheckOutcome::Failed(message) => println!("{message}"),
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
