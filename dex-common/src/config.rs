//! Configuration loading and override resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments
//! 2. Environment variables (`DEX_*`)
//! 3. TOML config file
//! 4. Compiled defaults
//!
//! The first two tiers reach this module already merged: the binary's argument
//! parser reads each `DEX_*` variable as the fallback for its flag and hands the
//! result over as [`Overrides`].
//!
//! A missing TOML file is not an error: the loader warns and falls back to
//! defaults. A TOML file that exists but cannot be parsed is an error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "DEX_CONFIG";

pub const DEFAULT_UPSTREAM_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_USER_AGENT: &str = "dex-catalog/0.1.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_ID: u32 = 1025;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_IMAGE_URL_TEMPLATE: &str =
    "https://assets.pokemon.com/assets/cms2/img/pokedex/full/{id}.png";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5790;

/// Full configuration as read from TOML
///
/// Every section is optional in the file; absent keys take compiled defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub upstream: UpstreamConfig,
    pub catalog: CatalogSettings,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Upstream REST service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL, without trailing slash (e.g. `https://pokeapi.co/api/v2`)
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
}

/// Catalog shaping settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Largest id ever surfaced
    pub max_id: u32,
    /// Records per `load_more`
    pub page_size: u32,
    /// Image URL template; `{id}` is replaced by the zero-padded id
    pub image_url_template: String,
}

/// HTTP server bind settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    pub level: String,
    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            max_id: DEFAULT_MAX_ID,
            page_size: DEFAULT_PAGE_SIZE,
            image_url_template: DEFAULT_IMAGE_URL_TEMPLATE.to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Values supplied on the command line or via `DEX_*`. `None` leaves the file
/// or default value in place.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub max_id: Option<u32>,
    pub page_size: Option<u32>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// Parse a TOML file. Fails if the file is missing or malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Load from `path` if present, otherwise warn and use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => {
                let config = Self::load(path)?;
                info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Some(path) => {
                warn!(
                    "Config file {} not found, using compiled defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            None => {
                warn!("No config file location available, using compiled defaults");
                Ok(Self::default())
            }
        }
    }

    /// Apply command-line and environment overrides (highest priority)
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(url) = &overrides.base_url {
            self.upstream.base_url = url.clone();
        }
        if let Some(max_id) = overrides.max_id {
            self.catalog.max_id = max_id;
        }
        if let Some(page_size) = overrides.page_size {
            self.catalog.page_size = page_size;
        }
        if let Some(host) = &overrides.host {
            self.server.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Reject values the catalog cannot operate with
    pub fn validate(&self) -> Result<()> {
        if self.catalog.max_id == 0 {
            return Err(Error::Config("catalog.max_id must be at least 1".to_string()));
        }
        if self.catalog.page_size == 0 {
            return Err(Error::Config("catalog.page_size must be at least 1".to_string()));
        }
        if !self.catalog.image_url_template.contains("{id}") {
            return Err(Error::Config(
                "catalog.image_url_template must contain an {id} placeholder".to_string(),
            ));
        }
        if self.upstream.base_url.trim().is_empty() {
            return Err(Error::Config("upstream.base_url must not be empty".to_string()));
        }
        Ok(())
    }

    /// Full resolution: file → overrides, then validation
    pub fn resolve(cli_path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let path = resolve_config_path(cli_path);
        let mut config = Self::load_or_default(path.as_deref())?;
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Serialise to pretty TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))
    }
}

/// Locate the config file: CLI path, then `DEX_CONFIG`, then the platform
/// config directory (`~/.config/dex/config.toml` on Linux)
pub fn resolve_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir().map(|d| d.join("dex").join("config.toml"))
}
