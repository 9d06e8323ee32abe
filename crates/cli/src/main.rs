//! `world-bench` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve` — start the HTTP API server.
//! - `check` — verify store connectivity and exit.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "world-bench",
    about = "Benchmark-style CRUD service over Postgres",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API server.
    Serve {
        /// Listen address; falls back to APP_PORT (default 3000).
        #[arg(long)]
        bind: Option<String>,
    },
    /// Connect to the store, run the connectivity check, and exit.
    Check,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind } => {
            let pool = connect_or_exit().await;

            let bind = bind.unwrap_or_else(|| {
                let port = std::env::var("APP_PORT").unwrap_or_else(|_| "3000".to_string());
                format!("0.0.0.0:{port}")
            });

            info!("starting server on {bind}");
            if let Err(e) = api::serve(&bind, pool).await {
                error!("server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Check => {
            connect_or_exit().await;
            info!("store is reachable");
        }
    }
}

/// Build the pool from the environment.  Startup connectivity failure is
/// deliberately fatal: the service must not serve traffic against an
/// unreachable store.
async fn connect_or_exit() -> db::DbPool {
    let config = match db::DbConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    match db::pool::create_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("failed to connect to database: {e}");
            std::process::exit(1);
        }
    }
}
