//! storefront CLI - catalog server, schema migrations and listing links
//!
//! Configuration is layered: `.env` files, then TOML files
//! (`~/.storefront/config.toml`, `./storefront.toml`), then flags.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use config::StorefrontConfig;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "storefront",
    author,
    version,
    about = "Product catalog server with filterable, paginated listings"
)]
struct Cli {
    /// Debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the catalog HTTP server
    Serve(commands::serve::ServeArgs),
    /// Create missing catalog tables and indexes
    Migrate(commands::migrate::MigrateArgs),
    /// Build a product listing URL from filter selections
    Link(commands::link::LinkArgs),
    /// Inspect storefront configuration (path, show)
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Before tracing, so RUST_LOG and OTEL_* may come from .env
    let env_files = config::load_dotenv();
    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })
    .ok();
    if env_files.is_empty() {
        tracing::debug!("No .env files found (current dir or ~/.storefront)");
    } else {
        let shown: Vec<String> = env_files.iter().map(|p| p.display().to_string()).collect();
        tracing::info!("Loaded environment from: {}", shown.join(", "));
    }

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args, StorefrontConfig::load()?).await,
        Commands::Migrate(args) => commands::run_migrate(args, StorefrontConfig::load()?).await,
        Commands::Link(args) => commands::run_link(args).await,
        Commands::Config(args) => config::run_config(args),
    };

    tracing_setup::shutdown_otel();
    result
}
