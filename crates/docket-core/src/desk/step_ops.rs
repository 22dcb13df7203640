//! Step operations for the Desk.

use std::path::PathBuf;

use log::{debug, info, warn};

use super::{forget_token, with_store_at, Desk};
use crate::{
    client::ApiClient,
    error::{DocketError, Result},
    models::{CaseSummary, Step},
    params::StepRef,
    progress::ProgressUpdate,
    sync::SyncChannel,
    workspace::{Advance, SyncOutcome, Workspace},
};

impl Desk {
    /// The workspace of a case as stored locally.
    pub async fn workspace(&self, case_id: &str) -> Result<Workspace> {
        self.open_workspace(case_id, None).await
    }

    /// Returns one step for viewing; locked steps are refused.
    pub async fn show_step(&self, params: &StepRef) -> Result<Step> {
        let workspace = self.open_workspace(&params.case_id, None).await?;
        let index = params.index().ok_or(DocketError::StepNotFound {
            index: 0,
            len: workspace.len(),
        })?;
        workspace.select_step(index).cloned()
    }

    /// Completes the active step of a case.
    ///
    /// The workspace is reconciled with the remote case list first, so the
    /// step completed is the one the server considers active. A case whose
    /// roadmap is not stored on this device is refused while the server has
    /// a step for it. The local transition is saved before returning. The
    /// progress record is sent in the background; its outcome is published
    /// on [`SyncChannel::Progress`] and a failure does not undo the
    /// transition.
    pub async fn complete_step(&self, case_id: &str) -> Result<(Workspace, Advance)> {
        let (client, session) = self.authed_client().await?;
        let cases = self.guard(client.list_cases(&session.email).await).await?;
        let mut workspace = self.open_workspace(case_id, None).await?;

        if workspace.is_placeholder() {
            let remote = cases
                .iter()
                .find(|case| case.id == case_id)
                .and_then(|case| case.step);
            if let Some(step) = remote {
                return Err(DocketError::invalid_input("case_id").with_reason(format!(
                    "the roadmap is not stored on this device and the server records step {step}"
                )));
            }
        }
        self.apply_remote(&mut workspace, &cases, false).await?;

        let index = workspace.active_index().ok_or_else(|| {
            DocketError::invalid_input("case_id").with_reason("every step is already done")
        })?;

        let advance = workspace.complete_step(index)?;
        self.save_workspace(&workspace).await?;
        self.spawn_progress(client, case_id.to_string(), advance.progress());

        if advance.is_finished() {
            info!("Case {case_id} closed after step {}", index + 1);
        } else {
            info!("Case {case_id} advanced to step {}", index + 2);
        }
        Ok((workspace, advance))
    }

    /// Re-sends the current position of a case and waits for the result.
    pub async fn push_progress(&self, case_id: &str) -> Result<ProgressUpdate> {
        let (client, _) = self.authed_client().await?;
        let mut workspace = self.open_workspace(case_id, None).await?;
        let progress = workspace.record_write();
        self.save_workspace(&workspace).await?;

        let result = self
            .tracker
            .track(
                SyncChannel::Progress,
                client.update_progress(case_id, &progress),
            )
            .await;
        if result.is_err() {
            release_pending(self.db_path.clone(), case_id.to_string(), progress.step).await;
        }
        self.guard(result).await?;
        Ok(progress)
    }

    /// Reconciles a case's workspace with the remote case list.
    ///
    /// With `force`, any unconfirmed local write is dropped first so the
    /// remote record is adopted even if it predates that write.
    pub async fn sync_workspace(&self, case_id: &str, force: bool) -> Result<(Workspace, SyncOutcome)> {
        let cases = self.list_cases().await?;
        let mut workspace = self.open_workspace(case_id, None).await?;
        if force {
            workspace.forget_pending();
        }
        let outcome = self.apply_remote(&mut workspace, &cases, force).await?;
        Ok((workspace, outcome))
    }

    /// Reconciles `workspace` and saves it when that changed anything.
    async fn apply_remote(
        &self,
        workspace: &mut Workspace,
        cases: &[CaseSummary],
        force: bool,
    ) -> Result<SyncOutcome> {
        let outcome = workspace.reconcile(cases);
        match outcome {
            SyncOutcome::Adopted { from, to } => {
                info!(
                    "Case {} moved from position {from} to {to} by remote record",
                    workspace.case_id()
                );
                self.save_workspace(workspace).await?;
            }
            SyncOutcome::Confirmed { .. } => self.save_workspace(workspace).await?,
            _ if force => self.save_workspace(workspace).await?,
            _ => {}
        }
        Ok(outcome)
    }

    fn spawn_progress(&self, client: ApiClient, case_id: String, progress: ProgressUpdate) {
        let db_path = self.db_path.clone();
        self.tracker.spawn(SyncChannel::Progress, async move {
            let result = client.update_progress(&case_id, &progress).await;
            if let Err(e) = &result {
                if e.is_unauthorized() {
                    forget_token(db_path.clone()).await;
                }
                release_pending(db_path, case_id, progress.step).await;
            }
            result
        });
    }
}

/// Drops the unconfirmed-write marker of a progress write that failed, so
/// later syncs take the remote record again. A marker already replaced by a
/// newer write is left alone.
async fn release_pending(db_path: PathBuf, case_id: String, step: u32) {
    let result = with_store_at(db_path, move |store| {
        let Some(snapshot) = store.autosave(&case_id)? else {
            return Ok(false);
        };
        let mut workspace = Workspace::from_snapshot(snapshot);
        if workspace.pending_step() != Some(step) {
            return Ok(false);
        }
        workspace.forget_pending();
        store.save_autosave(&workspace.snapshot())?;
        Ok(true)
    })
    .await;

    match result {
        Ok(true) => debug!("Released unconfirmed step {step} after failed write"),
        Ok(false) => {}
        Err(e) => warn!("Could not release unconfirmed step {step}: {e}"),
    }
}
