//! Service configuration: YAML file, environment overrides, CLI overrides.
//!
//! ```yaml
//! api_key: "sk-..."
//! base_url: "https://api.openai.com/v1"
//! request_timeout_secs: 120
//! store:
//!   backend: sqlite
//!   path: /var/lib/parley/sessions.sqlite3
//! log:
//!   level: info
//!   json: false
//! server:
//!   port: 8080
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use pmemory::SessionStoreConfig;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::{ParleyError, Result};

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Sqlite,
}

impl std::str::FromStr for StoreBackend {
    type Err = ParleyError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "inmem" | "in-memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(ParleyError::Config(format!(
                "invalid store backend: {other}. Must be one of: memory, sqlite"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_base_url() -> String {
    pprovider::DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            store: StoreConfig::default(),
            log: LogConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Loads the file named by `cli`, then applies environment and CLI overrides.
    ///
    /// A missing file falls back to defaults.
    pub fn load(cli: &Cli) -> Result<Self> {
        let path = cli.config_path();
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);
        config.resolve_paths(&cli.work_dir());

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|error| ParleyError::Config(format!("failed to read config file: {error}")))?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents)
            .map_err(|error| ParleyError::Config(format!("failed to parse config: {error}")))
    }

    fn apply_env_vars(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `PARLEY_*` overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(api_key) = lookup("PARLEY_API_KEY") {
            self.api_key = api_key;
        }

        if let Some(base_url) = lookup("PARLEY_BASE_URL") {
            self.base_url = base_url;
        }

        if let Some(level) = lookup("PARLEY_LOG_LEVEL") {
            self.log.level = level;
        }

        if let Some(backend) = lookup("PARLEY_STORE_BACKEND") {
            match backend.parse::<StoreBackend>() {
                Ok(backend) => self.store.backend = backend,
                Err(error) => tracing::warn!(error = %error, "ignoring PARLEY_STORE_BACKEND"),
            }
        }
    }

    pub fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(port) = cli.port {
            self.server.port = port;
        }

        if cli.verbose {
            self.log.level = "debug".to_string();
        }
    }

    /// Fills in the sqlite path relative to the work directory when unset.
    pub fn resolve_paths(&mut self, work_dir: &Path) {
        if self.store.backend == StoreBackend::Sqlite && self.store.path.is_none() {
            self.store.path = Some(work_dir.join("sessions.sqlite3"));
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(ParleyError::Config("api_key cannot be empty".to_string()));
        }

        if self.base_url.trim().is_empty() {
            return Err(ParleyError::Config("base_url cannot be empty".to_string()));
        }

        if self.request_timeout_secs == 0 {
            return Err(ParleyError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.store.backend == StoreBackend::Sqlite
            && self
                .store
                .path
                .as_ref()
                .is_none_or(|path| path.as_os_str().is_empty())
        {
            return Err(ParleyError::Config(
                "store.path is required for the sqlite backend".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn session_store(&self) -> SessionStoreConfig {
        match (&self.store.backend, &self.store.path) {
            (StoreBackend::Sqlite, Some(path)) => SessionStoreConfig::Sqlite { path: path.clone() },
            (StoreBackend::Sqlite, None) => SessionStoreConfig::sqlite_default(),
            (StoreBackend::Memory, _) => SessionStoreConfig::InMemory,
        }
    }
}
