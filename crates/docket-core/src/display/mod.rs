//! Display wrappers for collections, workspaces and operation results.
//!
//! Domain models implement [`std::fmt::Display`] themselves; this module adds
//! newtype wrappers for the contexts where the same data is shown
//! differently (a roadmap list vs. a single step, a fact table, a chat
//! transcript). Everything renders to markdown so the CLI can pass it
//! straight to its terminal renderer.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │    Wrappers     │    │    Markdown     │
//! │ (Step, Facts..) │───▶│ (Steps, Fact-   │───▶│     Output      │
//! │                 │    │  Sheet, ...)    │    │   (termimad)    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: case lists, roadmaps, evidence, facts, timeline, chat
//! - [`workspace`]: workspace overview, step completion and sync results
//! - [`status`]: confirmation messages and background write failures
//!
//! # Examples
//!
//! ```rust
//! use docket_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Case deleted".to_string());
//! assert_eq!(format!("{status}"), "Success: Case deleted\n");
//! ```

pub mod collections;
pub mod status;
pub mod workspace;

pub use collections::{
    CaseSummaries, ChatTranscript, EvidenceList, FactSheet, Steps, Timeline, FACT_MISSING,
};
pub use status::{OperationStatus, SyncReport};
pub use workspace::{AdvanceResult, SyncResult, WorkspaceView};
