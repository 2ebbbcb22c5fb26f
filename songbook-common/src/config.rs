//! Configuration loading
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`SONGBOOK_*`)
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is not an error; the service starts on defaults.

use crate::lyrics::VerseSeparator;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const ENV_DATABASE: &str = "SONGBOOK_DATABASE";
pub const ENV_HOST: &str = "SONGBOOK_HOST";
pub const ENV_PORT: &str = "SONGBOOK_PORT";
pub const ENV_METADATA_API_URL: &str = "SONGBOOK_METADATA_API_URL";
pub const ENV_VERSE_SEPARATOR: &str = "SONGBOOK_VERSE_SEPARATOR";
pub const ENV_APP_ENV: &str = "SONGBOOK_APP_ENV";
pub const ENV_LOG_LEVEL: &str = "SONGBOOK_LOG_LEVEL";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5730;
pub const DEFAULT_METADATA_API_URL: &str = "http://127.0.0.1:8081";

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    /// Base URL of the song metadata provider
    pub metadata_api_url: String,
    pub verse_separator: VerseSeparator,
    /// `debug` turns on debug logging unless `log_level` says otherwise
    pub app_env: String,
    pub log_level: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            metadata_api_url: DEFAULT_METADATA_API_URL.to_string(),
            verse_separator: VerseSeparator::default(),
            app_env: "production".to_string(),
            log_level: None,
        }
    }
}

impl ServiceConfig {
    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Default tracing directive
    pub fn log_directive(&self) -> String {
        match &self.log_level {
            Some(level) => level.clone(),
            None if self.app_env.eq_ignore_ascii_case("debug") => "debug".to_string(),
            None => "info".to_string(),
        }
    }

    fn apply_toml(&mut self, toml: TomlConfig) {
        if let Some(path) = toml.database {
            self.database_path = path;
        }
        if let Some(host) = toml.host {
            self.host = host;
        }
        if let Some(port) = toml.port {
            self.port = port;
        }
        if let Some(url) = toml.metadata_api_url {
            self.metadata_api_url = url;
        }
        if let Some(separator) = toml.verse_separator {
            self.verse_separator = separator;
        }
        if let Some(app_env) = toml.app_env {
            self.app_env = app_env;
        }
        if toml.log_level.is_some() {
            self.log_level = toml.log_level;
        }
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(ENV_DATABASE) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(host) = get(ENV_HOST) {
            self.host = host;
        }
        if let Some(port) = get(ENV_PORT) {
            self.port = port.trim().parse().map_err(|_| {
                Error::Config(format!("{} must be a port number, got {:?}", ENV_PORT, port))
            })?;
        }
        if let Some(url) = get(ENV_METADATA_API_URL) {
            self.metadata_api_url = url;
        }
        if let Some(separator) = get(ENV_VERSE_SEPARATOR) {
            self.verse_separator = separator.parse()?;
        }
        if let Some(app_env) = get(ENV_APP_ENV) {
            self.app_env = app_env;
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            self.log_level = Some(level);
        }
        Ok(())
    }

    fn apply_cli(&mut self, cli: &CliOverrides) {
        if let Some(path) = &cli.database {
            self.database_path = path.clone();
        }
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(url) = &cli.metadata_api_url {
            self.metadata_api_url = url.clone();
        }
    }
}

/// Values read from the TOML config file; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub database: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub metadata_api_url: Option<String>,
    pub verse_separator: Option<VerseSeparator>,
    pub app_env: Option<String>,
    pub log_level: Option<String>,
}

impl TomlConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }
}

/// Command-line overrides (highest priority)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_file: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub metadata_api_url: Option<String>,
}

/// Resolves [`ServiceConfig`] from all configuration sources
pub struct ConfigResolver {
    cli: CliOverrides,
}

impl ConfigResolver {
    pub fn new(cli: CliOverrides) -> Self {
        Self { cli }
    }

    /// Resolve against the process environment
    pub fn resolve(&self) -> Result<ServiceConfig> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    pub fn resolve_with<F>(&self, lookup: F) -> Result<ServiceConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServiceConfig::default();

        if let Some(toml) = self.load_toml()? {
            config.apply_toml(toml);
        }
        config.apply_env_with(lookup)?;
        config.apply_cli(&self.cli);

        Ok(config)
    }

    fn load_toml(&self) -> Result<Option<TomlConfig>> {
        // An explicitly requested file must exist
        if let Some(path) = &self.cli.config_file {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return TomlConfig::from_file(path).map(Some);
        }

        match default_config_file() {
            Some(path) => {
                debug!("Loading config file {}", path.display());
                TomlConfig::from_file(&path).map(Some)
            }
            None => {
                warn!("No config file found, using defaults");
                Ok(None)
            }
        }
    }
}

/// First existing config file in the platform search path
fn default_config_file() -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("songbook").join("config.toml"));
    }
    if cfg!(target_os = "linux") {
        candidates.push(PathBuf::from("/etc/songbook/config.toml"));
    }
    candidates.into_iter().find(|path| path.exists())
}

/// OS-dependent default database location
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("songbook"))
        .unwrap_or_else(|| PathBuf::from("./songbook_data"))
        .join("songbook.db")
}
