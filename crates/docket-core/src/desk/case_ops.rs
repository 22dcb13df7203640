//! Case operations for the Desk.

use jiff::Zoned;
use log::{debug, info};

use super::{forget_token, Desk};
use crate::{
    client::ApiClient,
    error::{DocketError, Result},
    models::{CaseSummary, TimelineEvent},
    params::{CaseContext, NewCase},
    timeline::extract_events,
    workspace::Workspace,
};

impl Desk {
    /// Lists the logged-in user's cases.
    pub async fn list_cases(&self) -> Result<Vec<CaseSummary>> {
        let (client, session) = self.authed_client().await?;
        self.guard(client.list_cases(&session.email).await).await
    }

    /// Finds one case in the user's case list.
    pub async fn find_case(&self, case_id: &str) -> Result<CaseSummary> {
        self.list_cases()
            .await?
            .into_iter()
            .find(|case| case.id == case_id)
            .ok_or_else(|| DocketError::CaseNotFound {
                id: case_id.to_string(),
            })
    }

    /// Analyzes a situation, files it as a new case and opens its workspace.
    ///
    /// The situation is sent with the stored jurisdiction as context. The
    /// returned workspace is built from the fresh analysis and replaces any
    /// cached state for the new case id.
    pub async fn new_case(&self, params: &NewCase) -> Result<Workspace> {
        if params.situation.trim().is_empty() {
            return Err(DocketError::invalid_input("situation")
                .with_reason("describe what happened first"));
        }
        let (client, session) = self.authed_client().await?;
        let jurisdiction = self.jurisdiction().await?;

        let analysis = self
            .guard(
                client
                    .analyze(&params.analysis_text(&jurisdiction), params.file.as_deref())
                    .await,
            )
            .await?;
        let created = self
            .guard(client.create_case(&session.email, &params.create_case()).await)
            .await?;
        info!("Created case {} ({})", created.id, created.title);

        let fresh = Workspace::from_analysis(created.id.clone(), &params.situation, &analysis);
        let workspace = self.open_workspace(&created.id, Some(fresh)).await?;
        self.schedule_context_save(client, &workspace);
        Ok(workspace)
    }

    /// Deletes a case remotely and forgets its local state.
    pub async fn delete_case(&self, case_id: &str) -> Result<()> {
        let (client, _) = self.authed_client().await?;
        self.guard(client.delete_case(case_id).await).await?;
        let id = case_id.to_string();
        self.with_store(move |store| store.discard_case(&id)).await?;
        info!("Deleted case {case_id}");
        Ok(())
    }

    /// Opens the workspace of a case.
    ///
    /// A fresh workspace (from a just-finished analysis) wins and overwrites
    /// the cache. Without one the autosaved snapshot is restored, and without
    /// that a placeholder roadmap is used.
    pub async fn open_workspace(&self, case_id: &str, fresh: Option<Workspace>) -> Result<Workspace> {
        if let Some(workspace) = fresh {
            self.save_workspace(&workspace).await?;
            return Ok(workspace);
        }

        let id = case_id.to_string();
        let snapshot = self.with_store(move |store| store.autosave(&id)).await?;
        Ok(match snapshot {
            Some(snapshot) => {
                debug!("Restored autosave for case {case_id} from {}", snapshot.saved_at);
                Workspace::from_snapshot(snapshot)
            }
            None => Workspace::placeholder(case_id),
        })
    }

    /// Writes the workspace to its case's autosave slot.
    pub async fn save_workspace(&self, workspace: &Workspace) -> Result<()> {
        let snapshot = workspace.snapshot();
        self.with_store(move |store| store.save_autosave(&snapshot))
            .await
    }

    /// Sets one fact, autosaves and schedules a context save.
    pub async fn set_fact(&self, case_id: &str, key: &str, value: &str) -> Result<Workspace> {
        let key = key.trim();
        if key.is_empty() {
            return Err(DocketError::invalid_input("key").with_reason("fact name is empty"));
        }
        let mut workspace = self.open_workspace(case_id, None).await?;
        workspace.set_fact(key, value.trim());
        self.save_workspace(&workspace).await?;

        let client = self.client().await?;
        self.schedule_context_save(client, &workspace);
        Ok(workspace)
    }

    /// Key dates of a case, derived from its facts.
    pub async fn timeline(&self, case_id: &str) -> Result<Vec<TimelineEvent>> {
        let workspace = self.open_workspace(case_id, None).await?;
        Ok(extract_events(workspace.facts(), Zoned::now().date()))
    }

    /// Queues the workspace's situation and facts for a debounced save.
    ///
    /// Returns false when there is nothing to save.
    pub(crate) fn schedule_context_save(&self, client: ApiClient, workspace: &Workspace) -> bool {
        let context = CaseContext {
            description: workspace.situation().to_string(),
            facts: workspace.facts().clone(),
        };
        if context.is_blank() {
            return false;
        }

        let case_id = workspace.case_id().to_string();
        let db_path = self.db_path.clone();
        self.context_saver.schedule(async move {
            let result = client.save_context(&case_id, &context).await;
            if result.as_ref().is_err_and(DocketError::is_unauthorized) {
                forget_token(db_path).await;
            }
            result
        });
        true
    }
}
