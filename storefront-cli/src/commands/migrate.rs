//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use storefront_server::db::{create_pool, migrations};

use super::resolve_database_url;
use crate::config::StorefrontConfig;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config files)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Create every catalog table and index that is missing.
pub async fn run_migrate(args: MigrateArgs, config: StorefrontConfig) -> Result<()> {
    let database_url = resolve_database_url(args.database_url, &config)?;
    let pool = create_pool(&database_url)
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool).await.context("Failed to run migrations")?;
    println!("Catalog schema is up to date");
    Ok(())
}
