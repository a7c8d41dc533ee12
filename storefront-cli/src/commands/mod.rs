//! Command implementations for the storefront CLI

pub mod link;
pub mod migrate;
pub mod serve;

pub use link::run_link;
pub use migrate::run_migrate;
pub use serve::run_serve;

use anyhow::{Context, Result};

use crate::config::StorefrontConfig;

/// Database URL from the flag/`DATABASE_URL`, falling back to config files.
fn resolve_database_url(arg: Option<String>, config: &StorefrontConfig) -> Result<String> {
    arg.or_else(|| config.database.url.clone()).context(
        "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, ~/.storefront/.env, \
         or [database] url in storefront.toml",
    )
}
