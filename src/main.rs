//! Wallet session CLI.
//!
//! # Architecture Overview
//!
//! ```text
//!   wallet endpoint (JSON-RPC)
//!          ▲         │ polled accounts / chain id
//!          │         ▼
//!   ┌──────┴──────────────┐   events   ┌──────────────┐
//!   │  RpcWalletProvider  │──────────▶│ EventBridge  │
//!   └─────────────────────┘            └──────┬───────┘
//!          ▲                                  │
//!          │ request / switch / add           ▼
//!   ┌──────┴──────────────┐           ┌───────────────────┐
//!   │  NetworkEnforcer    │◀─────────│ ConnectionManager │──▶ Notifier
//!   └─────────────────────┘           └───────┬───────────┘
//!                                             │ SessionSnapshot (watch)
//!                                             ▼
//!                                          stdout
//! ```

use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use wallet_session::config::{load_config, SessionConfig};
use wallet_session::lifecycle::wait_for_shutdown;
use wallet_session::notify::TracingNotifier;
use wallet_session::observability::logging::init_logging;
use wallet_session::provider::{RpcWalletProvider, WalletProvider};
use wallet_session::session::{AutoConnectProbe, ConnectionManager, EventBridge, SessionSnapshot};

#[derive(Parser)]
#[command(name = "wallet-session")]
#[command(about = "Connect a wallet and keep it on the required network", long_about = None)]
struct Cli {
    /// Path to a TOML config file (defaults to Sepolia on localhost:8545).
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one connection attempt and print the session
    Connect,
    /// Ask the wallet to switch to the required network
    Switch,
    /// Reconnect silently, then follow wallet changes until interrupted
    Watch,
    /// Print the effective configuration
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SessionConfig::default(),
    };

    if let Commands::ShowConfig = cli.command {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    init_logging(&config.observability)?;
    tracing::info!(
        rpc_url = %config.wallet.rpc_url,
        chain_id = config.network.chain_id,
        chain_name = %config.network.chain_name,
        "wallet-session starting"
    );

    let adapter = Arc::new(RpcWalletProvider::new(&config.wallet)?);
    let provider: Arc<dyn WalletProvider> = adapter.clone();
    let manager = Arc::new(ConnectionManager::new(
        Some(provider.clone()),
        config.network.clone(),
        Arc::new(TracingNotifier),
    ));

    match cli.command {
        Commands::Connect => {
            let outcome = manager.connect().await;
            tracing::info!(?outcome, "Connect finished");
            print_snapshot(&manager.snapshot())?;
        }
        Commands::Switch => {
            let outcome = manager.switch_network().await;
            tracing::info!(?outcome, "Switch finished");
        }
        Commands::Watch => {
            let poll_interval = Duration::from_millis(config.wallet.poll_interval_ms);
            watch(&adapter, provider, manager, &config, poll_interval).await?;
        }
        Commands::ShowConfig => {}
    }

    Ok(())
}

async fn watch(
    adapter: &Arc<RpcWalletProvider>,
    provider: Arc<dyn WalletProvider>,
    manager: Arc<ConnectionManager>,
    config: &SessionConfig,
    poll_interval: Duration,
) -> Result<(), Box<dyn Error>> {
    let watcher = adapter.spawn_watcher(poll_interval);
    let bridge = EventBridge::attach_to(manager.clone(), provider);

    if config.wallet.auto_connect {
        let outcome = AutoConnectProbe::new(manager.clone()).run().await;
        tracing::info!(?outcome, "Auto-connect probe finished");
    }

    let mut snapshots = manager.subscribe();
    let current = snapshots.borrow_and_update().clone();
    print_snapshot(&current)?;

    let shutdown = wait_for_shutdown();
    tokio::pin!(shutdown);

    let signal = loop {
        tokio::select! {
            res = &mut shutdown => break res?,
            changed = snapshots.changed() => {
                changed?;
                let snapshot = snapshots.borrow_and_update().clone();
                print_snapshot(&snapshot)?;
            }
        }
    };

    tracing::info!(?signal, "Shutdown signal received");
    bridge.detach().await;
    watcher.abort();
    manager.disconnect();
    Ok(())
}

fn print_snapshot(snapshot: &SessionSnapshot) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string(snapshot)?);
    Ok(())
}
