use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_ZIP_URL: &str = "https://www.ecb.europa.eu/stats/eurofxref/eurofxref-hist.zip";
pub const DEFAULT_FILE_TO_EXTRACT: &str = "eurofxref-hist.csv";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SourceConfig {
    pub zip_url: String,
    pub file_to_extract: String,
    #[serde(default = "default_retries")]
    pub retries: usize,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Upper bound for a single download attempt, body included
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_retries() -> usize {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            zip_url: DEFAULT_ZIP_URL.to_string(),
            file_to_extract: DEFAULT_FILE_TO_EXTRACT.to_string(),
            retries: default_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            address: DEFAULT_SERVER_ADDRESS.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file has been created there yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("eu", "fxdate", "fxdate")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Applies `ZIP_URL`, `FILE_TO_EXTRACT` and `SERVER_ADDRESS` overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = non_empty("ZIP_URL") {
            debug!("ZIP_URL overrides configured source url");
            self.source.zip_url = url;
        }
        if let Some(file) = non_empty("FILE_TO_EXTRACT") {
            self.source.file_to_extract = file;
        }
        if let Some(address) = non_empty("SERVER_ADDRESS") {
            self.server.address = address;
        }
        self
    }
}
