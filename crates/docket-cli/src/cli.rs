//! Command-line interface definitions using clap.
//!
//! Argument structures here carry the clap derives and convert into the
//! framework-free parameter types of `docket_core::params`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Desk
//! ```
//!
//! Commands that only address a case by id take the id directly instead of a
//! wrapper struct.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use docket_core::{
    models::{CaseCategory, DraftTemplate, Jurisdiction},
    params::{
        AskQuestion, DeleteEvidence, DraftRequest, ForgotPassword, GeneralQuestion, Login,
        NewCase, Register, ResetPassword, StepRef, UploadEvidence,
    },
};

// ============================================================================
// Auth
// ============================================================================

/// Log in with an existing account
#[derive(Args)]
pub struct LoginArgs {
    #[arg(help = "Email address of the account")]
    pub email: String,
    #[arg(long, help = "Account password")]
    pub password: String,
}

impl From<LoginArgs> for Login {
    fn from(val: LoginArgs) -> Self {
        Login {
            email: val.email,
            password: val.password,
        }
    }
}

/// Create a new account and log in
#[derive(Args)]
pub struct RegisterArgs {
    #[arg(help = "Full name shown in greetings")]
    pub full_name: String,
    #[arg(help = "Email address for the account")]
    pub email: String,
    #[arg(long, help = "Password for the new account")]
    pub password: String,
}

impl From<RegisterArgs> for Register {
    fn from(val: RegisterArgs) -> Self {
        Register {
            full_name: val.full_name,
            email: val.email,
            password: val.password,
        }
    }
}

/// Email a password reset code
#[derive(Args)]
pub struct ForgotPasswordArgs {
    pub email: String,
}

impl From<ForgotPasswordArgs> for ForgotPassword {
    fn from(val: ForgotPasswordArgs) -> Self {
        ForgotPassword { email: val.email }
    }
}

/// Set a new password with an emailed reset code
#[derive(Args)]
pub struct ResetPasswordArgs {
    pub email: String,
    #[arg(long, help = "Reset code received by email")]
    pub otp: String,
    #[arg(long, help = "The new password")]
    pub new_password: String,
}

impl From<ResetPasswordArgs> for ResetPassword {
    fn from(val: ResetPasswordArgs) -> Self {
        ResetPassword {
            email: val.email,
            otp: val.otp,
            new_password: val.new_password,
        }
    }
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Log in with an existing account
    Login(LoginArgs),
    /// Create a new account and log in
    Register(RegisterArgs),
    /// Email a password reset code
    Forgot(ForgotPasswordArgs),
    /// Set a new password with an emailed reset code
    Reset(ResetPasswordArgs),
    /// Forget the stored session
    Logout,
    /// Show who is logged in and which server is used
    Status,
}

// ============================================================================
// Jurisdiction
// ============================================================================

/// Set the jurisdiction used as context for new cases
#[derive(Args)]
pub struct SetJurisdictionArgs {
    #[arg(help = "State or union territory, e.g. Karnataka")]
    pub state: String,
    #[arg(help = "District, e.g. Bengaluru Urban")]
    pub district: String,
}

impl From<SetJurisdictionArgs> for Jurisdiction {
    fn from(val: SetJurisdictionArgs) -> Self {
        Jurisdiction::new(val.state.trim(), val.district.trim())
    }
}

#[derive(Subcommand)]
pub enum JurisdictionCommands {
    /// Set the state and district
    Set(SetJurisdictionArgs),
    /// Show the stored jurisdiction
    Show,
}

// ============================================================================
// Cases
// ============================================================================

/// Category of a new case
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    /// Money / Debt
    Money,
    /// Property Dispute
    Property,
    /// Theft / Cybercrime
    Theft,
    /// Family / Matrimonial
    Family,
    /// Work / Labor
    Work,
    /// Other Legal Issues
    Others,
}

impl From<CategoryArg> for CaseCategory {
    fn from(val: CategoryArg) -> Self {
        match val {
            CategoryArg::Money => CaseCategory::Money,
            CategoryArg::Property => CaseCategory::Property,
            CategoryArg::Theft => CaseCategory::Theft,
            CategoryArg::Family => CaseCategory::Family,
            CategoryArg::Work => CaseCategory::Work,
            CategoryArg::Others => CaseCategory::Others,
        }
    }
}

/// Describe a legal problem and open a new case for it
///
/// The description is analyzed by the server, which extracts the key facts
/// and proposes a numbered strategy. The strategy becomes the case roadmap.
#[derive(Args)]
pub struct NewCaseArgs {
    #[arg(help = "What happened, in your own words")]
    pub situation: String,
    #[arg(short, long, help = "Category of the problem")]
    pub category: Option<CategoryArg>,
    #[arg(short, long, help = "Supporting document to analyze with the description")]
    pub file: Option<PathBuf>,
}

impl From<NewCaseArgs> for NewCase {
    fn from(val: NewCaseArgs) -> Self {
        NewCase {
            situation: val.situation,
            category: val.category.map(Into::into),
            file: val.file,
        }
    }
}

/// Delete a case permanently
#[derive(Args)]
pub struct DeleteCaseArgs {
    #[arg(help = "Id of the case to delete")]
    pub id: String,
    #[arg(long, help = "Confirm deletion (required)")]
    pub confirm: bool,
}

/// Show or edit the facts of a case
#[derive(Args)]
pub struct FactsArgs {
    #[arg(help = "Id of the case")]
    pub id: String,
    #[arg(
        long = "set",
        value_name = "KEY=VALUE",
        value_parser = parse_key_val,
        help = "Set a fact; may be repeated"
    )]
    pub set: Vec<(String, String)>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.trim().is_empty() {
        return Err("fact name is empty".to_string());
    }
    Ok((key.trim().to_string(), value.to_string()))
}

#[derive(Subcommand)]
pub enum CaseCommands {
    /// List your cases
    #[command(alias = "l")]
    List,
    /// Describe a problem and open a new case
    #[command(alias = "n")]
    New(NewCaseArgs),
    /// Delete a case
    Delete(DeleteCaseArgs),
    /// Show a case workspace
    #[command(alias = "s")]
    Show {
        #[arg(help = "Id of the case")]
        id: String,
    },
    /// Show or edit the facts of a case
    Facts(FactsArgs),
    /// Show key dates found in the facts
    Timeline {
        #[arg(help = "Id of the case")]
        id: String,
    },
}

// ============================================================================
// Steps
// ============================================================================

/// Show one step of a case roadmap
#[derive(Args)]
pub struct ShowStepArgs {
    #[arg(help = "Id of the case")]
    pub id: String,
    #[arg(help = "Step number, starting at 1")]
    pub number: usize,
}

impl From<ShowStepArgs> for StepRef {
    fn from(val: ShowStepArgs) -> Self {
        StepRef {
            case_id: val.id,
            number: val.number,
        }
    }
}

/// Bring a case roadmap in line with the server
#[derive(Args)]
pub struct SyncArgs {
    #[arg(help = "Id of the case")]
    pub id: String,
    #[arg(
        long,
        help = "Take the server's step even if a local change is still unconfirmed"
    )]
    pub force: bool,
}

#[derive(Subcommand)]
pub enum StepCommands {
    /// List the roadmap of a case
    #[command(alias = "l")]
    List {
        #[arg(help = "Id of the case")]
        id: String,
    },
    /// Show one step
    #[command(alias = "s")]
    Show(ShowStepArgs),
    /// Mark the active step done and move to the next one
    #[command(alias = "c")]
    Complete {
        #[arg(help = "Id of the case")]
        id: String,
    },
    /// Bring the roadmap in line with the server
    Sync(SyncArgs),
    /// Send the current step to the server again
    Push {
        #[arg(help = "Id of the case")]
        id: String,
    },
    /// Parse strategy text into a roadmap without creating a case
    Preview {
        #[arg(help = "Numbered strategy text, e.g. \"1. Send notice. 2. File suit.\"")]
        text: String,
    },
}

// ============================================================================
// Chat
// ============================================================================

/// Ask the assistant a question about a case
#[derive(Args)]
pub struct AskArgs {
    #[arg(help = "Id of the case")]
    pub id: String,
    pub question: String,
}

impl From<AskArgs> for AskQuestion {
    fn from(val: AskArgs) -> Self {
        AskQuestion {
            case_id: val.id,
            question: val.question,
        }
    }
}

/// Ask the general legal assistant a question
#[derive(Args)]
pub struct GeneralArgs {
    pub question: String,
    #[arg(long, help = "Ground the answer in this case's facts and current step")]
    pub case: Option<String>,
}

#[derive(Subcommand)]
pub enum ChatCommands {
    /// Ask about a case
    Ask(AskArgs),
    /// Ask the general legal assistant
    General(GeneralArgs),
    /// Show a case chat, or the general chat without an id
    History {
        #[arg(help = "Id of the case")]
        id: Option<String>,
    },
    /// Forget the general chat on this device
    Clear,
}

impl GeneralArgs {
    pub fn into_params(self, case_context: Option<String>) -> GeneralQuestion {
        GeneralQuestion {
            query: self.question,
            case_context,
        }
    }
}

// ============================================================================
// Drafts
// ============================================================================

/// Document template
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum TemplateArg {
    /// Let the server choose from the case
    Auto,
    Vakalatnama,
    Affidavit,
    LegalNotice,
    Plaint,
    Bail,
}

impl From<TemplateArg> for DraftTemplate {
    fn from(val: TemplateArg) -> Self {
        match val {
            TemplateArg::Auto => DraftTemplate::Auto,
            TemplateArg::Vakalatnama => DraftTemplate::Vakalatnama,
            TemplateArg::Affidavit => DraftTemplate::Affidavit,
            TemplateArg::LegalNotice => DraftTemplate::LegalNotice,
            TemplateArg::Plaint => DraftTemplate::Plaint,
            TemplateArg::Bail => DraftTemplate::Bail,
        }
    }
}

/// Draft a document from the case facts
#[derive(Args)]
pub struct GenerateDraftArgs {
    #[arg(help = "Id of the case")]
    pub id: String,
    #[arg(short, long, value_enum, default_value_t = TemplateArg::Auto)]
    pub template: TemplateArg,
}

impl From<GenerateDraftArgs> for DraftRequest {
    fn from(val: GenerateDraftArgs) -> Self {
        DraftRequest {
            case_id: val.id,
            template: val.template.into(),
        }
    }
}

#[derive(Subcommand)]
pub enum DraftCommands {
    /// Draft a document from the case facts
    #[command(alias = "g")]
    Generate(GenerateDraftArgs),
    /// Show the saved draft
    Show {
        #[arg(help = "Id of the case")]
        id: String,
    },
    /// Replace the saved draft with a local file
    Load {
        #[arg(help = "Id of the case")]
        id: String,
        file: PathBuf,
    },
}

// ============================================================================
// Evidence
// ============================================================================

/// Attach a file to a case
#[derive(Args)]
pub struct UploadEvidenceArgs {
    #[arg(help = "Id of the case")]
    pub id: String,
    pub file: PathBuf,
}

impl From<UploadEvidenceArgs> for UploadEvidence {
    fn from(val: UploadEvidenceArgs) -> Self {
        UploadEvidence {
            case_id: val.id,
            path: val.file,
        }
    }
}

/// Remove a file from a case
#[derive(Args)]
pub struct DeleteEvidenceArgs {
    #[arg(help = "Id of the case")]
    pub id: String,
    pub evidence_id: String,
}

impl From<DeleteEvidenceArgs> for DeleteEvidence {
    fn from(val: DeleteEvidenceArgs) -> Self {
        DeleteEvidence {
            case_id: val.id,
            evidence_id: val.evidence_id,
        }
    }
}

#[derive(Subcommand)]
pub enum EvidenceCommands {
    /// List files attached to a case
    #[command(alias = "l")]
    List {
        #[arg(help = "Id of the case")]
        id: String,
    },
    /// Attach a file to a case
    Upload(UploadEvidenceArgs),
    /// Remove a file from a case
    Delete(DeleteEvidenceArgs),
}
