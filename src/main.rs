//! Main entry point for riot-match-downloader CLI

use clap::Parser;
use riot_match_downloader::cli::{Cli, Commands};
use riot_match_downloader::shutdown::{self, ShutdownCoordinator};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber with optional JSON formatting
fn init_tracing() {
    // Check if JSON output is requested via environment variable
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("riot_match_downloader=info"));

    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    // Load RIOT_API_KEY and friends from a .env file when present
    dotenv::dotenv().ok();

    init_tracing();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Optional Prometheus scrape endpoint
    if let Some(addr) = cli.metrics_addr {
        if let Err(e) = riot_match_downloader::metrics::init_metrics(addr).await {
            error!("Failed to initialize metrics: {}", e);
            std::process::exit(1);
        }
    }

    // Install global shutdown coordinator and Ctrl+C handler
    let shutdown = ShutdownCoordinator::shared();
    shutdown::set_global_shutdown(shutdown.clone());
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Ctrl+C received - finishing current suspension point...");
                shutdown.request_shutdown();
            }
        }
    });

    // Execute command
    let result = match cli.command {
        Commands::Fetch(ref args) => args
            .execute(&cli, shutdown.clone())
            .await
            .map_err(|e| anyhow::anyhow!(e)),
        Commands::Regions(ref regions_cmd) => regions_cmd.execute().await,
    };

    // Handle result
    if let Err(e) = result {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }
}
