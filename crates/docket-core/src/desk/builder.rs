//! Builder for creating and configuring Desk instances.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use log::debug;
use tokio::task;

use super::Desk;
use crate::{
    client::{ApiClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT},
    config::Config,
    debounce::{ContextSaver, CONTEXT_DEBOUNCE},
    error::{DocketError, Result},
    store::LocalStore,
    sync::SyncTracker,
};

/// Builder for creating and configuring Desk instances.
///
/// Explicit settings win over the [`Config`] passed to
/// [`DeskBuilder::with_config`], which wins over the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct DeskBuilder {
    database_path: Option<PathBuf>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    context_delay: Option<Duration>,
    config: Config,
}

impl DeskBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a loaded configuration as the fallback for unset options.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/docket/docket.db` or `~/.local/share/docket/docket.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the backend base URL. Defaults to `http://localhost:8000`.
    pub fn with_base_url<S: Into<String>>(mut self, url: Option<S>) -> Self {
        if let Some(url) = url {
            self.base_url = Some(url.into());
        }
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the quiet period before a context edit is sent.
    pub fn with_context_delay(mut self, delay: Duration) -> Self {
        self.context_delay = Some(delay);
        self
    }

    /// Builds the configured desk instance.
    ///
    /// # Errors
    ///
    /// Returns `DocketError::FileSystem` if the database directory cannot be
    /// created, `DocketError::Database` if store initialization fails and
    /// `DocketError::Http` if the HTTP client cannot be built.
    pub async fn build(self) -> Result<Desk> {
        let db_path = match self.database_path.or(self.config.database_path.clone()) {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| DocketError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _store = LocalStore::open(&db_path_clone)?;
            Ok::<(), DocketError>(())
        })
        .await
        .map_err(|e| DocketError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        let base_url = self
            .base_url
            .or(self.config.api_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = self
            .timeout
            .or(self.config.timeout())
            .unwrap_or(DEFAULT_TIMEOUT);
        debug!("Using backend {base_url} and store {}", db_path.display());

        let client = ApiClient::new(base_url, timeout)?;
        let context_saver = ContextSaver::with_delay(
            SyncTracker::new(),
            self.context_delay.unwrap_or(CONTEXT_DEBOUNCE),
        );
        Ok(Desk::new(db_path, client, context_saver))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("docket")
            .place_data_file("docket.db")
            .map_err(|e| DocketError::XdgDirectory(e.to_string()))
    }
}
