//! Core library for the Docket legal case assistant.
//!
//! Docket walks a user through a legal problem: a free-text situation is
//! analyzed by the backend, the returned strategy is parsed into an ordered
//! roadmap of steps, and the user completes those steps one at a time while
//! progress is mirrored locally and on the server.
//!
//! # Architecture
//!
//! - **State machine** ([`workspace`], [`strategy`], [`progress`]): pure,
//!   synchronous roadmap logic. Step statuses are always derived from one
//!   position.
//! - **Persistence** ([`store`]): a scoped SQLite key-value store for the
//!   session, device preferences and per-case autosaves.
//! - **Backend** ([`client`]): typed `reqwest` client with one error mapping
//!   for every endpoint.
//! - **Background writes** ([`sync`], [`debounce`]): progress and context
//!   saves run as tasks whose outcome is observable.
//! - **Facade** ([`desk`]): the async API interfaces are built on.
//! - **Display** ([`display`]): markdown wrappers for terminal output.
//!
//! # Quick Start
//!
//! ```rust
//! use docket_core::{strategy::parse_strategy, StepStatus};
//!
//! let steps = parse_strategy(Some(
//!     "1. File a complaint: go to station. 2. Hire a lawyer: find representation.",
//! ));
//! assert_eq!(steps[0].title, "File a complaint");
//! assert_eq!(steps[1].status, StepStatus::Locked);
//! ```
//!
//! ```rust,no_run
//! use docket_core::{params::NewCase, DeskBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let desk = DeskBuilder::new().build().await?;
//! let workspace = desk
//!     .new_case(&NewCase {
//!         situation: "My landlord refuses to return the deposit.".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! let (workspace, advance) = desk.complete_step(workspace.case_id()).await?;
//! desk.flush().await;
//! # Ok(())
//! # }
//! ```

pub mod chat;
pub mod client;
pub mod config;
pub mod debounce;
pub mod desk;
pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod progress;
pub mod store;
pub mod strategy;
pub mod sync;
pub mod timeline;
pub mod workspace;

// Re-export commonly used types
pub use chat::ChatLog;
pub use client::ApiClient;
pub use config::Config;
pub use desk::{Desk, DeskBuilder};
pub use display::{OperationStatus, Steps};
pub use error::{DocketError, Result};
pub use models::{
    Analysis, CaseCategory, CaseSummary, ChatMessage, ChatRole, DraftTemplate, Evidence, Facts,
    Jurisdiction, Step, StepStatus, UserSession,
};
pub use progress::{ProgressLabel, ProgressUpdate};
pub use store::{LocalStore, Scope};
pub use sync::{SyncChannel, SyncState, SyncTracker};
pub use workspace::{Advance, SyncOutcome, Workspace, WorkspaceSnapshot};
