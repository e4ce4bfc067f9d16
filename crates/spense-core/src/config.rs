//! Client configuration
//!
//! Resolution order, highest priority first:
//! 1. `SPENSE_API_URL` / `SPENSE_PAGE_SIZE` environment variables
//! 2. Config file in the data dir (~/.local/share/spense/config.toml)
//! 3. Built-in defaults
//!
//! The resolved config is loaded once at startup and passed explicitly
//! to the components that need it; nothing reads ambient state later.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Resolved client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Spense REST API
    pub api_url: String,
    /// Transactions per page for list fetches
    pub page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// On-disk config file shape; every field optional
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    api_url: Option<String>,
    page_size: Option<u32>,
}

impl ClientConfig {
    /// Load config from file and environment
    pub fn load() -> Result<Self> {
        let file = match Self::config_path() {
            Some(path) if path.exists() => {
                debug!("Loading config from {}", path.display());
                let raw = fs::read_to_string(&path)?;
                toml::from_str(&raw)
                    .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?
            }
            _ => ConfigFile::default(),
        };
        Self::resolve(file)
    }

    /// Path of the config file override, if a data dir exists
    pub fn config_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("spense").join("config.toml"))
    }

    fn resolve(file: ConfigFile) -> Result<Self> {
        let defaults = Self::default();

        let api_url = std::env::var("SPENSE_API_URL")
            .ok()
            .or(file.api_url)
            .unwrap_or(defaults.api_url);

        let page_size = match std::env::var("SPENSE_PAGE_SIZE") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| Error::Config(format!("Invalid SPENSE_PAGE_SIZE: {}", raw)))?,
            Err(_) => file.page_size.unwrap_or(defaults.page_size),
        };
        if page_size == 0 {
            return Err(Error::Config("page_size must be greater than 0".to_string()));
        }

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            page_size,
        })
    }

    /// Override the API base URL (e.g. from a CLI flag)
    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = url.trim_end_matches('/').to_string();
        self
    }
}
