//! Layered configuration: `.env` files, TOML files, then CLI flags
//!
//! TOML is read from `~/.storefront/config.toml` and then `./storefront.toml`;
//! later files override earlier ones key by key.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use storefront_core::DEFAULT_PAGE_SIZE;
use storefront_server::db::pool::DEFAULT_MAX_CONNECTIONS;

/// Project-local config file name
const LOCAL_CONFIG: &str = "storefront.toml";

/// Resolved storefront configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub catalog: CatalogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: SocketAddr,
    pub cors_permissive: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3030)),
            cors_permissive: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    pub default_page_size: u32,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl StorefrontConfig {
    /// Load from the standard locations. Missing files are skipped.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_paths())
    }

    /// Merge the given files in order, later ones winning.
    pub fn load_from(paths: &[PathBuf]) -> Result<Self> {
        let mut merged = toml::Table::new();
        for path in paths.iter().filter(|p| p.exists()) {
            let content = std::fs::read_to_string(path)
                .context(format!("Failed to read config file: {}", path.display()))?;
            let table: toml::Table = toml::from_str(&content)
                .context(format!("Failed to parse config file (invalid TOML): {}", path.display()))?;
            debug!("Loaded config from {}", path.display());
            merge_tables(&mut merged, table);
        }

        toml::Value::Table(merged)
            .try_into()
            .context("Invalid storefront configuration")
    }
}

/// Get config directory: ~/.storefront
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".storefront"))
}

/// Config files in load order
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = config_dir() {
        paths.push(dir.join("config.toml"));
    }
    paths.push(PathBuf::from(LOCAL_CONFIG));
    paths
}

/// Load `.env` from the current directory, then `~/.storefront/.env`.
///
/// dotenvy never overwrites variables that are already set, so the current
/// directory wins over the home directory and the real environment wins
/// over both. Returns the files that were loaded.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(path);
    }
    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded_from.push(env_file);
        }
    }
    loaded_from
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Query keys libpq accepts a password under
const PASSWORD_KEYS: [&str; 2] = ["password", "sslpassword"];

/// Hide passwords in a connection URL, both `user:password@` and `?password=`.
pub fn redact_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_owned();
    };

    if url.password().is_some() {
        // Only fails for URLs that cannot carry credentials at all
        let _ = url.set_password(Some("***"));
    }

    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    if pairs.iter().any(|(key, _)| PASSWORD_KEYS.contains(&key.as_str())) {
        url.query_pairs_mut().clear().extend_pairs(pairs.iter().map(|(key, value)| {
            let value = if PASSWORD_KEYS.contains(&key.as_str()) {
                "***"
            } else {
                value.as_str()
            };
            (key.as_str(), value)
        }));
    }

    url.to_string()
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show config file paths in load order
    Path,
    /// Show the resolved configuration as TOML
    Show,
}

pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show => run_show(),
    }
}

fn run_path() -> Result<()> {
    for path in config_paths() {
        let marker = if path.exists() { "" } else { " (missing)" };
        println!("{}{}", path.display(), marker);
    }
    Ok(())
}

fn run_show() -> Result<()> {
    let mut config = StorefrontConfig::load()?;
    if config.database.url.is_none() {
        config.database.url = std::env::var("DATABASE_URL").ok();
    }
    if let Some(url) = config.database.url.as_mut() {
        *url = redact_url(url);
    }

    let toml_str = toml::to_string_pretty(&config).context("Failed to serialize config to TOML")?;
    println!("{}", toml_str);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_files() {
        let config = StorefrontConfig::load_from(&[]).unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.server.bind.port(), 3030);
        assert_eq!(config.catalog.default_page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn later_files_override_key_by_key() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home.toml");
        let local = dir.path().join("local.toml");
        fs::write(
            &home,
            "[server]\nbind = \"0.0.0.0:8080\"\ncors_permissive = true\n\n[database]\nmax_connections = 20\n",
        )
        .unwrap();
        fs::write(&local, "[server]\ncors_permissive = false\n\n[catalog]\ndefault_page_size = 24\n").unwrap();

        let config = StorefrontConfig::load_from(&[home, local]).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080".parse().unwrap());
        assert!(!config.server.cors_permissive);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.catalog.default_page_size, 24);
    }

    #[test]
    fn missing_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        let config = StorefrontConfig::load_from(&[dir.path().join("absent.toml")]).unwrap();
        assert_eq!(config, StorefrontConfig::default());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[server\nbind = ").unwrap();
        assert!(StorefrontConfig::load_from(&[path]).is_err());
    }

    #[test]
    fn redacts_password_only() {
        assert_eq!(
            redact_url("postgres://shop:hunter2@db:5432/catalog"),
            "postgres://shop:***@db:5432/catalog"
        );
        assert_eq!(redact_url("postgres://db/catalog"), "postgres://db/catalog");
        assert_eq!(redact_url("postgres://shop@db/catalog"), "postgres://shop@db/catalog");
    }

    #[test]
    fn redacts_password_query_parameters() {
        assert_eq!(
            redact_url("postgres://db/catalog?user=shop&password=hunter2&sslmode=require"),
            "postgres://db/catalog?user=shop&password=***&sslmode=require"
        );
        assert_eq!(
            redact_url("postgres://shop:pw@db/catalog?sslpassword=secret"),
            "postgres://shop:***@db/catalog?sslpassword=***"
        );
        assert_eq!(
            redact_url("postgres://db/catalog?sslmode=require"),
            "postgres://db/catalog?sslmode=require"
        );
    }
}
