//! High-level API tying the local store, the backend and the workspace
//! together.
//!
//! The [`Desk`] is the single entry point interfaces use. It owns nothing but
//! configuration: every operation opens the local store inside
//! `spawn_blocking`, talks to the backend through [`ApiClient`], and hands
//! back plain values.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │      Desk       │───▶│    Workspace    │    │   LocalStore    │
//! │ (session_ops,   │    │ (state machine) │    │ (spawn_blocking)│
//! │  case_ops,      │───────────────────────────▶│                 │
//! │  step_ops,      │    ┌─────────────────┐    └─────────────────┘
//! │  assist_ops)    │───▶│    ApiClient    │
//! └─────────────────┘    │    (reqwest)    │
//!                        └─────────────────┘
//! ```
//!
//! Writes the user should not wait for (progress and context) run in the
//! background and report through [`Desk::tracker`]. Call [`Desk::flush`]
//! before exiting so none are lost.
//!
//! ## Submodules
//!
//! - [`builder`]: configuration and construction
//! - [`session_ops`]: login, registration, jurisdiction
//! - [`case_ops`]: case listing, creation, deletion, workspace restore
//! - [`step_ops`]: step completion and remote reconciliation
//! - [`assist_ops`]: chat, drafting and evidence
//!
//! # Examples
//!
//! ```rust,no_run
//! use docket_core::{params::Login, DeskBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let desk = DeskBuilder::new()
//!     .with_base_url(Some("http://localhost:8000"))
//!     .build()
//!     .await?;
//!
//! desk.login(&Login {
//!     email: "asha@example.com".to_string(),
//!     password: "secret".to_string(),
//! })
//! .await?;
//!
//! for case in desk.list_cases().await? {
//!     println!("{case}");
//! }
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use log::{info, warn};
use tokio::task;

use crate::{
    client::ApiClient,
    debounce::ContextSaver,
    error::{DocketError, Result},
    models::UserSession,
    store::LocalStore,
    sync::SyncTracker,
};

pub mod assist_ops;
pub mod builder;
pub mod case_ops;
pub mod session_ops;
pub mod step_ops;

pub use builder::DeskBuilder;

/// Main interface to the case assistant.
pub struct Desk {
    pub(crate) db_path: PathBuf,
    pub(crate) client: ApiClient,
    pub(crate) tracker: SyncTracker,
    pub(crate) context_saver: ContextSaver,
}

impl Desk {
    pub(crate) fn new(db_path: PathBuf, client: ApiClient, context_saver: ContextSaver) -> Self {
        Self {
            db_path,
            client,
            tracker: context_saver.tracker(),
            context_saver,
        }
    }

    /// Path of the local store.
    pub fn database_path(&self) -> &Path {
        &self.db_path
    }

    /// Base URL of the backend.
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// State of background writes.
    pub fn tracker(&self) -> &SyncTracker {
        &self.tracker
    }

    /// Waits for every background write to finish.
    pub async fn flush(&self) {
        self.tracker.flush().await;
    }

    /// Runs `f` against a freshly opened local store on the blocking pool.
    pub(crate) async fn with_store<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&LocalStore) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        with_store_at(db_path, f).await
    }

    /// The stored session, or `NotLoggedIn`.
    pub(crate) async fn require_session(&self) -> Result<UserSession> {
        self.with_store(|store| store.session())
            .await?
            .ok_or(DocketError::NotLoggedIn)
    }

    /// A client carrying the stored token, if any.
    pub(crate) async fn client(&self) -> Result<ApiClient> {
        let session = self.with_store(|store| store.session()).await?;
        Ok(self.client.with_token(session.map(|s| s.token)))
    }

    /// A client for a logged-in user, with that user's session.
    pub(crate) async fn authed_client(&self) -> Result<(ApiClient, UserSession)> {
        let session = self.require_session().await?;
        Ok((self.client.with_token(Some(session.token.clone())), session))
    }

    /// Passes a backend result through, dropping the stored token first if
    /// the backend rejected it.
    pub(crate) async fn guard<T>(&self, result: Result<T>) -> Result<T> {
        if result.as_ref().is_err_and(DocketError::is_unauthorized) {
            forget_token(self.db_path.clone()).await;
        }
        result
    }
}

pub(crate) async fn with_store_at<T, F>(db_path: PathBuf, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&LocalStore) -> Result<T> + Send + 'static,
{
    task::spawn_blocking(move || {
        let store = LocalStore::open(&db_path)?;
        f(&store)
    })
    .await
    .map_err(|e| DocketError::Configuration {
        message: format!("Task join error: {e}"),
    })?
}

/// Clears the stored token after the backend rejected it.
pub(crate) async fn forget_token(db_path: PathBuf) {
    match with_store_at(db_path, |store| store.clear_token()).await {
        Ok(true) => info!("Session token rejected by backend; logged out"),
        Ok(false) => {}
        Err(e) => warn!("Failed to clear rejected session token: {e}"),
    }
}

#[cfg(test)]
mod tests;
