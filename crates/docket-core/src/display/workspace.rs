//! Display wrappers for a case workspace and step transitions.

use std::fmt;

use super::collections::Steps;
use crate::workspace::{Advance, SyncOutcome, Workspace};

/// Overview of a workspace: situation, progress and roadmap.
pub struct WorkspaceView<'a>(pub &'a Workspace);

impl fmt::Display for WorkspaceView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let workspace = self.0;
        writeln!(f, "# Case `{}`", workspace.case_id())?;
        writeln!(f)?;
        if !workspace.situation().is_empty() {
            writeln!(f, "> {}", workspace.situation().trim())?;
            writeln!(f)?;
        }

        let done = workspace.steps().iter().filter(|s| s.is_completed()).count();
        match workspace.current_step() {
            Some(step) => writeln!(
                f,
                "**Progress:** {done}/{} steps done · now on step {}",
                workspace.len(),
                step.number()
            )?,
            None => writeln!(f, "**Progress:** all {} steps done · case closed", workspace.len())?,
        }
        if let Some(pending) = workspace.pending_step() {
            writeln!(f, "_Waiting for the server to confirm step {pending}._")?;
        }
        writeln!(f)?;

        writeln!(f, "## Roadmap")?;
        writeln!(f)?;
        write!(f, "{}", Steps(workspace.steps().to_vec()))?;

        if workspace.suggests_drafting() {
            writeln!(f)?;
            writeln!(
                f,
                "_This step involves a document. Try `docket draft generate {}`._",
                workspace.case_id()
            )?;
        }
        if !workspace.draft().is_empty() {
            writeln!(f)?;
            writeln!(f, "_A draft is saved. Show it with `docket draft show {}`._", workspace.case_id())?;
        }
        Ok(())
    }
}

/// Result of completing a step.
pub struct AdvanceResult<'a> {
    pub workspace: &'a Workspace,
    pub advance: Advance,
}

impl fmt::Display for AdvanceResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.advance {
            Advance::Next { index, .. } => {
                writeln!(f, "Step {} done.", index)?;
                if let Some(step) = self.workspace.steps().get(index) {
                    writeln!(f)?;
                    write!(f, "{step}")?;
                }
                Ok(())
            }
            Advance::Finished { .. } => {
                writeln!(f, "All steps done. The case is now closed.")
            }
        }
    }
}

/// Result of reconciling with the remote case list.
pub struct SyncResult(pub SyncOutcome);

impl fmt::Display for SyncResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            SyncOutcome::NoRecord => writeln!(f, "The server has no progress recorded for this case."),
            SyncOutcome::InSync => writeln!(f, "Already in sync with the server."),
            SyncOutcome::Confirmed { step } => {
                writeln!(f, "The server confirmed step {step}.")
            }
            SyncOutcome::AwaitingEcho { pending, remote } => writeln!(
                f,
                "The server still shows step {remote}; waiting for it to confirm step {pending}. \
                 Use `--force` to take the server's value."
            ),
            SyncOutcome::Adopted { from, to } => writeln!(
                f,
                "Moved from step {} to step {} to match the server.",
                from + 1,
                to + 1
            ),
        }
    }
}
