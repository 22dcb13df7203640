//! Command handlers: run a command against the desk and render the result.

use anyhow::{bail, Context, Result};
use docket_core::{
    display::{
        AdvanceResult, CaseSummaries, ChatTranscript, EvidenceList, FactSheet, OperationStatus,
        Steps, SyncReport, SyncResult, Timeline, WorkspaceView,
    },
    params::{NewCase, StepRef},
    strategy::parse_strategy,
    Desk,
};

use crate::{
    cli::{
        AuthCommands, CaseCommands, ChatCommands, DraftCommands, EvidenceCommands,
        JurisdictionCommands, StepCommands,
    },
    renderer::TerminalRenderer,
};

pub struct Cli {
    desk: Desk,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(desk: Desk, renderer: TerminalRenderer) -> Self {
        Self { desk, renderer }
    }

    fn status(&self, message: String) -> Result<()> {
        self.renderer
            .render(&OperationStatus::success(message).to_string())
    }

    /// Waits for background writes and reports the ones that failed.
    pub async fn finish(&self) -> Result<()> {
        self.desk.flush().await;
        let report = SyncReport(self.desk.tracker()).to_string();
        if !report.is_empty() {
            self.renderer.render(&report)?;
        }
        Ok(())
    }

    pub async fn handle_auth_command(&self, command: AuthCommands) -> Result<()> {
        match command {
            AuthCommands::Login(args) => {
                let session = self.desk.login(&args.into()).await.context("Login failed")?;
                self.status(format!("Logged in as {} <{}>", session.user_name, session.email))
            }
            AuthCommands::Register(args) => {
                let session = self
                    .desk
                    .register(&args.into())
                    .await
                    .context("Registration failed")?;
                self.status(format!("Welcome, {}! You are logged in.", session.user_name))
            }
            AuthCommands::Forgot(args) => {
                let email = args.email.clone();
                self.desk.forgot_password(&args.into()).await?;
                self.status(format!("A reset code was sent to {email}"))
            }
            AuthCommands::Reset(args) => {
                self.desk.reset_password(&args.into()).await?;
                self.status("Password changed. Log in with the new password.".to_string())
            }
            AuthCommands::Logout => {
                if self.desk.logout().await? {
                    self.status("Logged out".to_string())
                } else {
                    self.status("No session was stored".to_string())
                }
            }
            AuthCommands::Status => {
                let session = self.desk.current_session().await?;
                let jurisdiction = self.desk.jurisdiction().await?;
                let who = match session {
                    Some(session) => format!("{} <{}>", session.user_name, session.email),
                    None => "Not logged in".to_string(),
                };
                self.renderer.render(&format!(
                    "**User:** {who}\n**Jurisdiction:** {jurisdiction}\n**Server:** {}\n",
                    self.desk.base_url()
                ))
            }
        }
    }

    pub async fn handle_jurisdiction_command(&self, command: JurisdictionCommands) -> Result<()> {
        match command {
            JurisdictionCommands::Set(args) => {
                let jurisdiction = self.desk.set_jurisdiction(args.into()).await?;
                self.status(format!("Jurisdiction set to {jurisdiction}"))
            }
            JurisdictionCommands::Show => {
                let jurisdiction = self.desk.jurisdiction().await?;
                self.renderer
                    .render(&format!("**Jurisdiction:** {jurisdiction}\n"))
            }
        }
    }

    pub async fn list_cases(&self) -> Result<()> {
        let cases = self.desk.list_cases().await.context("Failed to list cases")?;
        self.renderer
            .render(&format!("# Your Cases\n\n{}", CaseSummaries(cases)))
    }

    pub async fn handle_case_command(&self, command: CaseCommands) -> Result<()> {
        match command {
            CaseCommands::List => self.list_cases().await,
            CaseCommands::New(args) => {
                let params: NewCase = args.into();
                let workspace = self
                    .desk
                    .new_case(&params)
                    .await
                    .context("Failed to create case")?;
                self.renderer.render(&format!(
                    "{}\n{}",
                    WorkspaceView(&workspace),
                    FactSheet(workspace.facts())
                ))
            }
            CaseCommands::Delete(args) => {
                if !args.confirm {
                    bail!(
                        "Deleting case {} cannot be undone. Re-run with --confirm",
                        args.id
                    );
                }
                self.desk.delete_case(&args.id).await?;
                self.status(format!("Deleted case {}", args.id))
            }
            CaseCommands::Show { id } => {
                let workspace = self.desk.workspace(&id).await?;
                self.renderer.render(&WorkspaceView(&workspace).to_string())
            }
            CaseCommands::Facts(args) => {
                let mut workspace = self.desk.workspace(&args.id).await?;
                for (key, value) in &args.set {
                    workspace = self.desk.set_fact(&args.id, key, value).await?;
                }
                self.renderer.render(&format!(
                    "## Facts\n\n{}",
                    FactSheet(workspace.facts())
                ))
            }
            CaseCommands::Timeline { id } => {
                let events = self.desk.timeline(&id).await?;
                self.renderer
                    .render(&format!("## Timeline\n\n{}", Timeline(events)))
            }
        }
    }

    pub async fn handle_step_command(&self, command: StepCommands) -> Result<()> {
        match command {
            StepCommands::List { id } => {
                let workspace = self.desk.workspace(&id).await?;
                self.renderer
                    .render(&Steps(workspace.steps().to_vec()).to_string())
            }
            StepCommands::Show(args) => {
                let params: StepRef = args.into();
                let step = self.desk.show_step(&params).await?;
                self.renderer.render(&step.to_string())
            }
            StepCommands::Complete { id } => {
                let (workspace, advance) = self
                    .desk
                    .complete_step(&id)
                    .await
                    .context("Failed to complete step")?;
                self.renderer.render(
                    &AdvanceResult {
                        workspace: &workspace,
                        advance,
                    }
                    .to_string(),
                )
            }
            StepCommands::Sync(args) => {
                let (workspace, outcome) = self
                    .desk
                    .sync_workspace(&args.id, args.force)
                    .await
                    .context("Failed to sync case")?;
                self.renderer.render(&format!(
                    "{}\n{}",
                    SyncResult(outcome),
                    Steps(workspace.steps().to_vec())
                ))
            }
            StepCommands::Push { id } => {
                let progress = self.desk.push_progress(&id).await?;
                self.status(format!(
                    "Server now records step {} ({})",
                    progress.step, progress.status
                ))
            }
            StepCommands::Preview { text } => {
                self.renderer
                    .render(&Steps(parse_strategy(Some(&text))).to_string())
            }
        }
    }

    pub async fn handle_chat_command(&self, command: ChatCommands) -> Result<()> {
        match command {
            ChatCommands::Ask(args) => {
                let log = self.desk.ask(&args.into()).await?;
                let reply = log.last().map(ToString::to_string).unwrap_or_default();
                self.renderer.render(&format!("{reply}\n"))
            }
            ChatCommands::General(args) => {
                let case_context = match &args.case {
                    Some(id) => Some(self.desk.workspace(id).await?.context_summary()),
                    None => None,
                };
                let log = self
                    .desk
                    .general_chat(&args.into_params(case_context))
                    .await?;
                let reply = log.last().map(ToString::to_string).unwrap_or_default();
                self.renderer.render(&format!("{reply}\n"))
            }
            ChatCommands::History { id } => {
                let log = match id {
                    Some(id) => self.desk.chat_history(&id).await?,
                    None => self.desk.general_history().await?,
                };
                self.renderer
                    .render(&ChatTranscript(log.messages()).to_string())
            }
            ChatCommands::Clear => {
                self.desk.clear_general_history().await?;
                self.status("General chat cleared".to_string())
            }
        }
    }

    pub async fn handle_draft_command(&self, command: DraftCommands) -> Result<()> {
        match command {
            DraftCommands::Generate(args) => {
                let workspace = self
                    .desk
                    .generate_draft(&args.into())
                    .await
                    .context("Failed to draft document")?;
                self.renderer.render(&format!("{}\n", workspace.draft()))
            }
            DraftCommands::Show { id } => {
                let workspace = self.desk.workspace(&id).await?;
                if workspace.draft().is_empty() {
                    self.renderer.render(&format!(
                        "No draft saved. Create one with `docket draft generate {id}`.\n"
                    ))
                } else {
                    self.renderer.render(&format!("{}\n", workspace.draft()))
                }
            }
            DraftCommands::Load { id, file } => {
                self.desk.load_draft(&id, &file).await?;
                self.status(format!("Draft for case {id} loaded from {}", file.display()))
            }
        }
    }

    pub async fn handle_evidence_command(&self, command: EvidenceCommands) -> Result<()> {
        match command {
            EvidenceCommands::List { id } => {
                let evidence = self.desk.list_evidence(&id).await?;
                self.renderer.render(&EvidenceList(evidence).to_string())
            }
            EvidenceCommands::Upload(args) => {
                let evidence = self
                    .desk
                    .upload_evidence(&args.into())
                    .await
                    .context("Upload failed")?;
                self.status(format!("Uploaded {} as `{}`", evidence.filename, evidence.id))
            }
            EvidenceCommands::Delete(args) => {
                let evidence_id = args.evidence_id.clone();
                self.desk.delete_evidence(&args.into()).await?;
                self.status(format!("Removed evidence {evidence_id}"))
            }
        }
    }
}
