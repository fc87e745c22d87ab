use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use stash_core::Stash;

use stash_server::config::Config;
use stash_server::server::Server;
use stash_server::storage;

#[derive(Parser)]
#[command(
    name = "stashd",
    about = "Content-addressed deterministically encrypted blob storage daemon"
)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply if omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured listen address, e.g.
    /// tcp://localhost:53431 or unix:///tmp/stash.sock
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration before tracing so the configured level can
    // serve as the fallback filter.
    let mut config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };
    if let Some(listen) = cli.listen {
        config.listen_address = listen;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    tracing::info!(
        listen_address = %config.listen_address,
        "stashd starting"
    );

    let store = storage::open_store(&config.storage);
    tracing::info!(storage = ?config.storage, "storage backend opened");

    let stash = Arc::new(Stash::new(store));

    let server = match Server::bind(&config.listen_address, stash).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "failed to bind listener");
            std::process::exit(1);
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let server_handle = tokio::spawn(server.run(shutdown_rx));

    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("interrupt received, shutting down"),
        Err(e) => tracing::error!(error = %e, "failed to listen for interrupt"),
    }

    let _ = shutdown_tx.send(true);
    let _ = server_handle.await;

    tracing::info!("stashd stopped");
}
