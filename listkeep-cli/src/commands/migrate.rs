//! Migration command

use anyhow::{Context, Result};
use clap::Parser;

use listkeep_server::db::{create_pool, migrations};

use super::DEFAULT_DATABASE_URL;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,
}

/// Apply pending migrations and print the resulting schema version
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let pool = create_pool(&args.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", args.database_url))?;

    let report = migrations::run(&pool)
        .await
        .context("Failed to apply migrations")?;

    for version in &report.applied {
        println!("applied {}", version);
    }
    println!(
        "schema at version {} ({} applied)",
        report.current,
        report.applied.len()
    );

    pool.close().await;
    Ok(())
}
