//! HTTP server command
//!
//! Runs the catalog API until Ctrl+C or SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use storefront_server::db::{create_pool_with_options, migrations};
use storefront_server::http::{run_server, ServerConfig};
use storefront_server::AppState;

use super::resolve_database_url;
use crate::config::StorefrontConfig;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default from config: 127.0.0.1:3030)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config files)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Page size when a listing request omits pageSize
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Create missing tables before serving
    #[arg(long)]
    pub migrate: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config: StorefrontConfig) -> Result<()> {
    let database_url = resolve_database_url(args.database_url, &config)?;
    let bind_addr = args.bind.unwrap_or(config.server.bind);
    let max_connections = args.max_connections.unwrap_or(config.database.max_connections);
    let page_size = args.page_size.unwrap_or(config.catalog.default_page_size);

    tracing::info!("Starting storefront server on {}", bind_addr);

    let pool = create_pool_with_options(&database_url, max_connections)
        .await
        .context("Failed to create database pool")?;

    if args.migrate {
        migrations::run(&pool).await.context("Failed to run migrations")?;
    }

    let server_config = ServerConfig {
        bind_addr,
        cors_permissive: args.cors_permissive || config.server.cors_permissive,
    };

    run_server(AppState::with_page_size(pool, page_size), server_config)
        .await
        .context("Server error")?;

    Ok(())
}
