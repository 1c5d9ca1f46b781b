//! HTTP server command
//!
//! Opens the database, applies pending migrations, then serves until shutdown.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use listkeep_server::db::{create_pool, migrations};
use listkeep_server::http::{run_server, ServerConfig};

use super::DEFAULT_DATABASE_URL;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "LISTKEEP_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    tracing::info!(database = %args.database_url, "Opening database");

    let pool = create_pool(&args.database_url)
        .await
        .context("Failed to create database pool")?;

    let report = migrations::run(&pool)
        .await
        .context("Failed to apply migrations")?;
    tracing::info!(
        version = report.current,
        applied = report.applied.len(),
        "Schema ready"
    );

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        request_timeout: Duration::from_secs(args.timeout),
    };

    tracing::info!("Starting listkeep server on {}", config.bind_addr);

    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
