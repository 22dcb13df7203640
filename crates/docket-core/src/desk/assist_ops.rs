//! Chat, drafting and evidence operations for the Desk.

use std::path::Path;

use log::{info, warn};

use super::Desk;
use crate::{
    chat::{ChatLog, CONNECTION_ERROR_REPLY, GENERAL_FALLBACK_REPLY},
    error::{DocketError, Result},
    models::{ChatMessage, Evidence},
    params::{AskQuestion, DeleteEvidence, DraftRequest, GeneralQuestion, UploadEvidence},
    workspace::{Workspace, MISSING_SITUATION},
};

impl Desk {
    /// Chat transcript of a case.
    ///
    /// An empty stored history opens with a greeting quoting the case
    /// situation.
    pub async fn chat_history(&self, case_id: &str) -> Result<ChatLog> {
        let (client, _) = self.authed_client().await?;
        let detail = self.guard(client.get_case(case_id).await).await?;
        let workspace = self.open_workspace(case_id, None).await?;
        Ok(ChatLog::for_case(detail.chat_history, case_summary(&workspace)))
    }

    /// Asks the case assistant a question and returns the updated transcript.
    ///
    /// A delivery failure other than an expired session does not fail the
    /// call: the transcript ends with a connection-error reply instead.
    pub async fn ask(&self, params: &AskQuestion) -> Result<ChatLog> {
        let question = params.question.trim();
        if question.is_empty() {
            return Err(DocketError::invalid_input("question").with_reason("question is empty"));
        }

        let mut log = self.chat_history(&params.case_id).await?;
        let history = log.wire_history();
        log.push(ChatMessage::user(question));

        let (client, _) = self.authed_client().await?;
        match self
            .guard(client.ask(&params.case_id, question, &history).await)
            .await
        {
            Ok(answer) => log.push(ChatMessage::ai(answer)),
            Err(e) if e.is_unauthorized() || !e.is_remote() => return Err(e),
            Err(e) => {
                warn!("Question for case {} not delivered: {e}", params.case_id);
                log.push(ChatMessage::ai(CONNECTION_ERROR_REPLY));
            }
        }
        Ok(log)
    }

    /// Transcript of the general assistant, introduction included.
    pub async fn general_history(&self) -> Result<ChatLog> {
        let stored = self.with_store(|store| store.general_chat()).await?;
        Ok(stored.map_or_else(ChatLog::general, ChatLog::from_messages))
    }

    /// Forgets the general assistant transcript.
    pub async fn clear_general_history(&self) -> Result<bool> {
        self.with_store(|store| store.clear_general_chat()).await
    }

    /// Asks the general assistant a question; the transcript is kept on this
    /// device.
    pub async fn general_chat(&self, params: &GeneralQuestion) -> Result<ChatLog> {
        let query = params.query.trim();
        if query.is_empty() {
            return Err(DocketError::invalid_input("query").with_reason("question is empty"));
        }

        let mut log = self.general_history().await?;
        log.push(ChatMessage::user(query));

        let client = self.client().await?;
        let context = params.case_context.as_deref().unwrap_or_default();
        match self.guard(client.general_chat(query, context).await).await {
            Ok(response) => log.push(ChatMessage::ai(response)),
            Err(e) if e.is_unauthorized() || !e.is_remote() => return Err(e),
            Err(e) => {
                warn!("General question not delivered: {e}");
                log.push(ChatMessage::ai(GENERAL_FALLBACK_REPLY));
            }
        }

        let messages = log.messages().to_vec();
        self.with_store(move |store| store.save_general_chat(&messages))
            .await?;
        Ok(log)
    }

    /// Drafts a document for a case and makes it the workspace draft.
    pub async fn generate_draft(&self, params: &DraftRequest) -> Result<Workspace> {
        let (client, _) = self.authed_client().await?;
        let mut workspace = self.open_workspace(&params.case_id, None).await?;

        let draft = self
            .guard(
                client
                    .draft_document(&workspace.context_summary(), params.template.as_str())
                    .await,
            )
            .await?;
        workspace.set_draft(draft);
        self.save_workspace(&workspace).await?;
        info!(
            "Drafted {} document for case {}",
            params.template, params.case_id
        );
        Ok(workspace)
    }

    /// Replaces the workspace draft with the contents of a local file.
    pub async fn load_draft(&self, case_id: &str, path: &Path) -> Result<Workspace> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| DocketError::FileSystem {
                path: path.to_path_buf(),
                source,
            })?;
        let mut workspace = self.open_workspace(case_id, None).await?;
        workspace.set_draft(text);
        self.save_workspace(&workspace).await?;
        Ok(workspace)
    }

    /// Evidence uploaded to a case.
    pub async fn list_evidence(&self, case_id: &str) -> Result<Vec<Evidence>> {
        let (client, _) = self.authed_client().await?;
        self.guard(client.list_evidence(case_id).await).await
    }

    /// Uploads a file as evidence for a case.
    pub async fn upload_evidence(&self, params: &UploadEvidence) -> Result<Evidence> {
        let (client, _) = self.authed_client().await?;
        let evidence = self
            .guard(client.upload_evidence(&params.case_id, &params.path).await)
            .await?;
        info!("Uploaded {} to case {}", evidence.filename, params.case_id);
        Ok(evidence)
    }

    /// Removes a piece of evidence from a case.
    pub async fn delete_evidence(&self, params: &DeleteEvidence) -> Result<()> {
        let (client, _) = self.authed_client().await?;
        self.guard(
            client
                .delete_evidence(&params.case_id, &params.evidence_id)
                .await,
        )
        .await
    }
}

/// Text the greeting of an empty case chat quotes.
fn case_summary(workspace: &Workspace) -> Option<&str> {
    let situation = workspace.situation().trim();
    (!situation.is_empty() && situation != MISSING_SITUATION).then_some(situation)
}
