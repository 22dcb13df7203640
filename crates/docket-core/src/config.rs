//! Optional user configuration.
//!
//! Settings are read from `$XDG_CONFIG_HOME/docket/config.toml`:
//!
//! ```toml
//! api_url = "https://api.example.in"
//! database_path = "/home/me/.local/share/docket/docket.db"
//! timeout_secs = 90
//! ```
//!
//! Every key is optional. The `DOCKET_API_URL` environment variable wins over
//! the file, and explicit [`crate::DeskBuilder`] settings win over both.

use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

use crate::error::{DocketError, Result};

/// Environment variable overriding the backend URL.
pub const API_URL_ENV: &str = "DOCKET_API_URL";

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub api_url: Option<String>,
    pub database_path: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Loads the config file if there is one, then applies the environment.
    pub fn load() -> Result<Self> {
        let config = match xdg::BaseDirectories::with_prefix("docket").find_config_file(CONFIG_FILE) {
            Some(path) => {
                let text = std::fs::read_to_string(&path).map_err(|source| {
                    DocketError::FileSystem {
                        path: path.clone(),
                        source,
                    }
                })?;
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };
        Ok(config.with_env_override(std::env::var(API_URL_ENV).ok()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| DocketError::Configuration {
            message: format!("Invalid {CONFIG_FILE}: {e}"),
        })
    }

    /// Replaces the API URL with a non-empty override.
    pub fn with_env_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
            self.api_url = Some(url);
        }
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
