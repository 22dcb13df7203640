//! The case workspace state machine.
//!
//! A [`Workspace`] owns the roadmap of one case: the steps parsed from the
//! strategy text, the position of the active step, and the in-progress work
//! around it (situation text, facts, current draft).
//!
//! Step statuses are never edited one by one. The workspace stores a single
//! position `p` in `0..=len` and every status is recomputed from it by
//! [`derive_statuses`]: indices below `p` are done, `p` is active, indices
//! above are locked. `p == len` is the terminal position where every step is
//! done.
//!
//! ```text
//!   position = 1, len = 3
//!   [ Done ][ Active ][ Locked ]
//!
//!   complete_step(1)  ->  Advance::Next { index: 2, .. }
//!   [ Done ][ Done ][ Active ]
//!
//!   complete_step(2)  ->  Advance::Finished { .. }
//!   [ Done ][ Done ][ Done ]
//! ```
//!
//! Network effects are not performed here. Operations that must reach the
//! backend return the request to send (a [`ProgressUpdate`]) and the caller
//! decides how to deliver it.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    error::{DocketError, Result},
    models::{Analysis, CaseSummary, Facts, Step, StepStatus},
    progress::{local_position, ProgressLabel, ProgressUpdate},
    strategy::{is_placeholder_step, parse_strategy, placeholder_step, DEFAULT_STRATEGY},
};

/// Situation text used when a new case arrives without one.
pub const MISSING_SITUATION: &str = "Case details not provided.";

/// Step title used in the context summary before any roadmap exists.
const NO_STEP_TITLE: &str = "Case Analysis";

/// Words in a step's text that make the drafting service worth offering.
const DRAFTING_CUES: [&str; 3] = ["notice", "draft", "write"];

/// Computes every step status from the active position.
///
/// This is the only place statuses are produced, so applying it twice with
/// the same arguments always yields the same array.
///
/// ```rust
/// use docket_core::{workspace::derive_statuses, StepStatus::*};
///
/// assert_eq!(derive_statuses(1, 3), vec![Done, Active, Locked]);
/// assert_eq!(derive_statuses(3, 3), vec![Done, Done, Done]);
/// ```
pub fn derive_statuses(position: usize, len: usize) -> Vec<StepStatus> {
    (0..len)
        .map(|index| match index.cmp(&position) {
            std::cmp::Ordering::Less => StepStatus::Done,
            std::cmp::Ordering::Equal => StepStatus::Active,
            std::cmp::Ordering::Greater => StepStatus::Locked,
        })
        .collect()
}

/// Outcome of completing the active step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The successor at `index` is now active
    Next {
        index: usize,
        progress: ProgressUpdate,
    },
    /// The last step was completed and the case is closed
    Finished { progress: ProgressUpdate },
}

impl Advance {
    /// The progress record the backend should receive.
    pub fn progress(&self) -> ProgressUpdate {
        match self {
            Advance::Next { progress, .. } | Advance::Finished { progress } => *progress,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Advance::Finished { .. })
    }
}

/// What [`Workspace::reconcile`] did with the remote case list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No record for this case, or the record carries no step number
    NoRecord,
    /// Remote and local positions already agree
    InSync,
    /// The remote record now shows the step this workspace last wrote
    Confirmed { step: u32 },
    /// A write from this workspace is unconfirmed; the remote value was
    /// treated as stale
    AwaitingEcho { pending: u32, remote: u32 },
    /// The remote position was adopted
    Adopted { from: usize, to: usize },
}

/// Serializable copy of a workspace, used by the autosave mirror.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSnapshot {
    pub case_id: String,
    #[serde(default)]
    pub original_situation: String,
    #[serde(default)]
    pub facts: Facts,
    #[serde(default)]
    pub draft: String,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default, rename = "currentStepIndex")]
    pub position: usize,
    #[serde(default)]
    pub pending_step: Option<u32>,
    pub saved_at: Timestamp,
}

/// The roadmap and working state of one case.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    case_id: String,
    situation: String,
    facts: Facts,
    draft: String,
    steps: Vec<Step>,
    position: usize,
    pending_step: Option<u32>,
}

impl Workspace {
    fn with_steps(case_id: String, situation: String, facts: Facts, steps: Vec<Step>) -> Self {
        let mut workspace = Self {
            case_id,
            situation,
            facts,
            draft: String::new(),
            steps,
            position: 0,
            pending_step: None,
        };
        workspace.apply_position(0);
        workspace
    }

    /// Starts a workspace from a fresh triage result.
    ///
    /// The roadmap is parsed from the analysis strategy (or a default two-step
    /// strategy when the analysis has none) and starts at step 0.
    pub fn from_analysis(case_id: impl Into<String>, situation: &str, analysis: &Analysis) -> Self {
        let situation = if situation.trim().is_empty() {
            MISSING_SITUATION.to_string()
        } else {
            situation.to_string()
        };
        let strategy = analysis
            .strategy
            .as_deref()
            .filter(|text| !text.is_empty())
            .unwrap_or(DEFAULT_STRATEGY);

        Self::with_steps(
            case_id.into(),
            situation,
            analysis.facts.clone(),
            parse_strategy(Some(strategy)),
        )
    }

    /// Workspace for a case with neither a fresh payload nor a cached
    /// snapshot: a single initialization step.
    pub fn placeholder(case_id: impl Into<String>) -> Self {
        Self::with_steps(
            case_id.into(),
            String::new(),
            Facts::new(),
            vec![placeholder_step()],
        )
    }

    /// Rebuilds a workspace from an autosave snapshot.
    ///
    /// Step ids and statuses are re-derived, so a hand-edited or stale
    /// snapshot cannot break the ordering invariant.
    pub fn from_snapshot(snapshot: WorkspaceSnapshot) -> Self {
        let mut steps = snapshot.steps;
        if steps.is_empty() {
            steps.push(placeholder_step());
        }
        for (index, step) in steps.iter_mut().enumerate() {
            step.id = index;
        }

        let mut workspace = Self {
            case_id: snapshot.case_id,
            situation: snapshot.original_situation,
            facts: snapshot.facts,
            draft: snapshot.draft,
            steps,
            position: 0,
            pending_step: snapshot.pending_step,
        };
        workspace.apply_position(snapshot.position);
        workspace
    }

    /// Captures the current state for the autosave mirror.
    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            case_id: self.case_id.clone(),
            original_situation: self.situation.clone(),
            facts: self.facts.clone(),
            draft: self.draft.clone(),
            steps: self.steps.clone(),
            position: self.position,
            pending_step: self.pending_step,
            saved_at: Timestamp::now(),
        }
    }

    pub fn case_id(&self) -> &str {
        &self.case_id
    }

    pub fn situation(&self) -> &str {
        &self.situation
    }

    pub fn facts(&self) -> &Facts {
        &self.facts
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Position of the active step, or `len()` once every step is done.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Index of the active step, `None` once the case is finished.
    pub fn active_index(&self) -> Option<usize> {
        (self.position < self.steps.len()).then_some(self.position)
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.position)
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.steps.len()
    }

    /// Whether the roadmap is only the stand-in from [`Workspace::placeholder`],
    /// i.e. the real one was never stored on this device.
    pub fn is_placeholder(&self) -> bool {
        matches!(self.steps.as_slice(), [only] if is_placeholder_step(only))
    }

    /// The remote step number written by this workspace and not yet seen in a
    /// case listing.
    pub fn pending_step(&self) -> Option<u32> {
        self.pending_step
    }

    /// Progress record describing the current position.
    pub fn progress(&self) -> ProgressUpdate {
        ProgressUpdate::at(self.position, self.steps.len())
    }

    pub fn set_situation(&mut self, situation: impl Into<String>) {
        self.situation = situation.into();
    }

    pub fn set_facts(&mut self, facts: Facts) {
        self.facts = facts;
    }

    pub fn set_fact(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.facts.insert(key.into(), value.into());
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    fn apply_position(&mut self, position: usize) {
        let len = self.steps.len();
        self.position = position.min(len);
        for (step, status) in self.steps.iter_mut().zip(derive_statuses(self.position, len)) {
            step.status = status;
        }
    }

    /// Marks the active step done and activates its successor.
    ///
    /// Completing the last step makes the workspace terminal and returns
    /// [`Advance::Finished`]; since a finished workspace has no active step,
    /// that happens at most once.
    ///
    /// The returned progress record must be sent to the backend by the
    /// caller; this method records it as pending so that a stale listing does
    /// not undo the transition (see [`Workspace::reconcile`]).
    ///
    /// # Errors
    ///
    /// `StepNotFound` if `index` is out of range, `InvalidInput` if `index`
    /// is not the active step.
    pub fn complete_step(&mut self, index: usize) -> Result<Advance> {
        let len = self.steps.len();
        if index >= len {
            return Err(DocketError::StepNotFound { index, len });
        }
        if self.active_index() != Some(index) {
            let reason = match self.steps[index].status {
                StepStatus::Done => "step is already done",
                _ => "step is locked until earlier steps are done",
            };
            return Err(DocketError::invalid_input("index").with_reason(reason));
        }

        self.apply_position(index + 1);
        let progress = self.record_write();

        if self.is_finished() {
            Ok(Advance::Finished { progress })
        } else {
            Ok(Advance::Next {
                index: self.position,
                progress,
            })
        }
    }

    /// Returns a step for viewing. Locked steps cannot be opened.
    pub fn select_step(&self, index: usize) -> Result<&Step> {
        let step = self.steps.get(index).ok_or(DocketError::StepNotFound {
            index,
            len: self.steps.len(),
        })?;
        if step.status == StepStatus::Locked {
            return Err(DocketError::invalid_input("index")
                .with_reason("step is locked until earlier steps are done"));
        }
        Ok(step)
    }

    /// Adopts the position recorded in the remote case list when it disagrees
    /// with the local one.
    ///
    /// While a write from [`Workspace::complete_step`] is unconfirmed, only a
    /// listing that shows exactly that write is accepted (and confirms it);
    /// any other remote value predates the write and is ignored.
    pub fn reconcile(&mut self, cases: &[CaseSummary]) -> SyncOutcome {
        let Some(record) = cases.iter().find(|case| case.id == self.case_id) else {
            return SyncOutcome::NoRecord;
        };
        let Some(remote) = record.step else {
            return SyncOutcome::NoRecord;
        };

        if let Some(pending) = self.pending_step {
            if remote == pending {
                self.pending_step = None;
                return SyncOutcome::Confirmed { step: remote };
            }
            return SyncOutcome::AwaitingEcho { pending, remote };
        }

        let target = if ProgressLabel::is_closed_label(&record.status) {
            self.steps.len()
        } else {
            match local_position(remote) {
                Some(position) => position.min(self.steps.len()),
                None => return SyncOutcome::NoRecord,
            }
        };

        if target == self.position {
            return SyncOutcome::InSync;
        }

        let from = self.position;
        self.apply_position(target);
        SyncOutcome::Adopted {
            from,
            to: self.position,
        }
    }

    /// Progress record for the current position, remembered as unconfirmed
    /// until a case listing shows it.
    pub fn record_write(&mut self) -> ProgressUpdate {
        let progress = self.progress();
        self.pending_step = Some(progress.step);
        progress
    }

    /// Drops any unconfirmed write so the next [`Workspace::reconcile`]
    /// treats the remote record as authoritative.
    pub fn forget_pending(&mut self) {
        self.pending_step = None;
    }

    /// Whether the active step is about producing a document.
    pub fn suggests_drafting(&self) -> bool {
        self.current_step().is_some_and(|step| {
            let text = step.full_text.to_lowercase();
            DRAFTING_CUES.iter().any(|cue| text.contains(cue))
        })
    }

    /// Context block handed to the chat assistant.
    pub fn context_summary(&self) -> String {
        let step_title = self
            .current_step()
            .map_or(NO_STEP_TITLE, |step| step.title.as_str());
        let facts = serde_json::to_string(&self.facts).unwrap_or_else(|_| "{}".to_string());
        format!(
            "[CASE SITUATION]: {}\n[FACTS]: {}\n[STEP]: {}",
            self.situation, facts, step_title
        )
    }
}
