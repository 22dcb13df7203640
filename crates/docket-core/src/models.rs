//! Data models for cases, steps, chat and evidence.
//!
//! This module contains the core domain models of the Docket case assistant.
//! Each model implements Display for direct markdown formatting, while
//! collection and result formatting lives in [`crate::display`].
//!
//! Models fall into two groups:
//!
//! - **Workspace models** owned by the local state machine: [`Step`],
//!   [`StepStatus`], [`Facts`].
//! - **Wire models** received from or sent to the backend: [`CaseSummary`],
//!   [`Analysis`], [`Evidence`], [`WireMessage`], [`UserSession`].
//!
//! # Examples
//!
//! ```rust
//! use docket_core::models::{Step, StepStatus};
//!
//! let step = Step {
//!     id: 0,
//!     title: "File a complaint".to_string(),
//!     full_text: "File a complaint: go to station.".to_string(),
//!     status: StepStatus::Active,
//! };
//! assert!(!step.is_completed());
//! println!("{}", step); // Shows ➤ Active status icon
//! ```

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

/// Facts extracted from a case situation, keyed by snake_case field name.
pub type Facts = BTreeMap<String, String>;

/// Placeholder value the backend uses for facts it could not find.
pub const FACT_NOT_MENTIONED: &str = "Not mentioned";

/// Lifecycle state of a single roadmap step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Step is not reachable until every earlier step is done
    Locked,

    /// Step is the one the user is working on
    Active,

    /// Step has been completed
    Done,
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "locked" => Ok(StepStatus::Locked),
            "active" => Ok(StepStatus::Active),
            "done" => Ok(StepStatus::Done),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Locked => "locked",
            StepStatus::Active => "active",
            StepStatus::Done => "done",
        }
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// ```rust
    /// use docket_core::models::StepStatus;
    ///
    /// assert_eq!(StepStatus::Done.with_icon(), "✓ Done");
    /// assert_eq!(StepStatus::Active.with_icon(), "➤ Active");
    /// assert_eq!(StepStatus::Locked.with_icon(), "○ Locked");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepStatus::Done => "✓ Done",
            StepStatus::Active => "➤ Active",
            StepStatus::Locked => "○ Locked",
        }
    }
}

/// One actionable item in a case's legal strategy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Zero-based position in the roadmap
    pub id: usize,

    /// Short label taken from the segment text before its first colon
    pub title: String,

    /// Complete instructional text for the step
    pub full_text: String,

    /// Current lifecycle state
    pub status: StepStatus,
}

impl Step {
    /// True once the step has been marked done.
    pub fn is_completed(&self) -> bool {
        self.status == StepStatus::Done
    }

    /// Human-facing 1-based step number.
    pub fn number(&self) -> usize {
        self.id + 1
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Step {}: {}", self.number(), self.title)?;
        writeln!(f)?;
        writeln!(f, "**Status:** {}", self.status.with_icon())?;
        writeln!(f)?;
        writeln!(f, "{}", self.full_text.trim())
    }
}

/// Result of the backend's triage of a free-text situation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Analysis {
    /// Extracted facts
    #[serde(default, deserialize_with = "deserialize_facts")]
    pub facts: Facts,

    /// Numbered strategy text the roadmap is parsed from
    #[serde(default)]
    pub strategy: Option<String>,

    /// Laws the backend considers relevant
    #[serde(default)]
    pub laws: Vec<String>,

    /// Free-form first advice
    #[serde(default)]
    pub initial_advice: Option<String>,
}

/// Accepts a facts map whose values are strings, numbers, booleans or null.
///
/// The model occasionally returns non-string values; they are stringified so
/// the rest of the crate only deals with text.
pub fn deserialize_facts<'de, D>(deserializer: D) -> Result<Facts, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, text)
        })
        .collect())
}

/// Summary of a case record as listed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaseSummary {
    /// Opaque case identifier
    #[serde(alias = "_id")]
    pub id: String,

    /// Case title
    pub title: String,

    /// Case category
    #[serde(rename = "type", default = "default_case_type")]
    pub case_type: String,

    /// Free-form status label ("Draft", "Active", "Closed")
    #[serde(default)]
    pub status: String,

    /// Persisted 1-based step number
    #[serde(default)]
    pub step: Option<u32>,

    /// Creation date as rendered by the backend
    #[serde(default)]
    pub date: Option<String>,

    /// Owner email
    #[serde(default)]
    pub user_email: Option<String>,
}

fn default_case_type() -> String {
    "General".to_string()
}

impl fmt::Display for CaseSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "**{}** `{}` ({})", self.title, self.id, self.case_type)?;
        if !self.status.is_empty() {
            write!(f, " · {}", self.status)?;
        }
        if let Some(step) = self.step {
            write!(f, " · step {step}")?;
        }
        if let Some(date) = &self.date {
            write!(f, " · {date}")?;
        }
        Ok(())
    }
}

/// An uploaded file associated with a case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Evidence {
    #[serde(alias = "_id")]
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub extracted_text: Option<String>,
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "**{}** `{}`", self.filename, self.id)?;
        if let Some(content_type) = &self.content_type {
            write!(f, " ({content_type})")?;
        }
        Ok(())
    }
}

/// User-selected state/district pair used as context for analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Jurisdiction {
    pub state: String,
    pub district: String,
}

impl Jurisdiction {
    pub fn new(state: impl Into<String>, district: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            district: district.into(),
        }
    }

    /// A jurisdiction only counts once a state has been chosen.
    pub fn is_set(&self) -> bool {
        !self.state.trim().is_empty()
    }

    /// Prefix the backend expects in front of a situation description.
    pub fn context_prefix(&self) -> String {
        let district = if self.district.trim().is_empty() {
            "Unknown District"
        } else {
            self.district.trim()
        };
        format!(
            "[JURISDICTION CONTEXT: {}, {}, India]",
            district,
            self.state.trim()
        )
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_set() {
            write!(f, "{}, {}", self.district, self.state)
        } else {
            write!(f, "Not set")
        }
    }
}

/// Locally stored login state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSession {
    pub token: String,
    pub user_name: String,
    pub email: String,
}

/// Speaker of a chat message as the workspace models it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Ai,
}

/// Speaker of a chat message as the backend stores it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    User,
    Model,
}

impl From<ChatRole> for WireRole {
    fn from(role: ChatRole) -> Self {
        match role {
            ChatRole::User => WireRole::User,
            ChatRole::Ai => WireRole::Model,
        }
    }
}

impl From<WireRole> for ChatRole {
    fn from(role: WireRole) -> Self {
        match role {
            WireRole::User => ChatRole::User,
            WireRole::Model => ChatRole::Ai,
        }
    }
}

/// A chat message in workspace vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Ai,
            text: text.into(),
        }
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let speaker = match self.role {
            ChatRole::User => "You",
            ChatRole::Ai => "Assistant",
        };
        write!(f, "**{}:** {}", speaker, self.text)
    }
}

/// A chat message in wire vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WireMessage {
    pub role: WireRole,
    #[serde(alias = "text", default)]
    pub content: String,
}

impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role.into(),
            content: message.text.clone(),
        }
    }
}

impl From<WireMessage> for ChatMessage {
    fn from(message: WireMessage) -> Self {
        Self {
            role: message.role.into(),
            text: message.content,
        }
    }
}

/// Translates a workspace transcript into the wire vocabulary.
pub fn encode_history(messages: &[ChatMessage]) -> Vec<WireMessage> {
    messages.iter().map(WireMessage::from).collect()
}

/// Translates a stored transcript into the workspace vocabulary.
pub fn decode_history(messages: Vec<WireMessage>) -> Vec<ChatMessage> {
    messages.into_iter().map(ChatMessage::from).collect()
}

/// Document templates the drafting service understands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DraftTemplate {
    /// Let the backend pick a template from the scenario
    #[default]
    Auto,
    Vakalatnama,
    Affidavit,
    LegalNotice,
    Plaint,
    Bail,
}

impl DraftTemplate {
    pub const ALL: [DraftTemplate; 6] = [
        DraftTemplate::Auto,
        DraftTemplate::Vakalatnama,
        DraftTemplate::Affidavit,
        DraftTemplate::LegalNotice,
        DraftTemplate::Plaint,
        DraftTemplate::Bail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DraftTemplate::Auto => "auto",
            DraftTemplate::Vakalatnama => "vakalatnama",
            DraftTemplate::Affidavit => "affidavit",
            DraftTemplate::LegalNotice => "legal_notice",
            DraftTemplate::Plaint => "plaint",
            DraftTemplate::Bail => "bail",
        }
    }
}

impl FromStr for DraftTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        DraftTemplate::ALL
            .into_iter()
            .find(|template| template.as_str() == normalized)
            .ok_or_else(|| format!("Invalid draft template: {s}"))
    }
}

impl fmt::Display for DraftTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Case categories offered when creating a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseCategory {
    Money,
    Property,
    Theft,
    Family,
    Work,
    Others,
}

impl CaseCategory {
    pub const ALL: [CaseCategory; 6] = [
        CaseCategory::Money,
        CaseCategory::Property,
        CaseCategory::Theft,
        CaseCategory::Family,
        CaseCategory::Work,
        CaseCategory::Others,
    ];

    /// Identifier sent to the backend as the case type.
    pub fn id(&self) -> &'static str {
        match self {
            CaseCategory::Money => "money",
            CaseCategory::Property => "property",
            CaseCategory::Theft => "theft",
            CaseCategory::Family => "family",
            CaseCategory::Work => "work",
            CaseCategory::Others => "others",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CaseCategory::Money => "Money / Debt",
            CaseCategory::Property => "Property Dispute",
            CaseCategory::Theft => "Theft / Cybercrime",
            CaseCategory::Family => "Family / Matrimonial",
            CaseCategory::Work => "Work / Labor",
            CaseCategory::Others => "Other Legal Issues",
        }
    }
}

impl FromStr for CaseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        CaseCategory::ALL
            .into_iter()
            .find(|category| category.id() == wanted)
            .ok_or_else(|| format!("Invalid case category: {s}"))
    }
}

/// A dated event pulled out of the facts for the case timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEvent {
    pub title: String,
    pub date: String,
    pub description: String,
}

impl fmt::Display for TimelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- `{}` **{}**: {}", self.date, self.title, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_step(status: StepStatus) -> Step {
        Step {
            id: 1,
            title: "Hire a lawyer".to_string(),
            full_text: "Hire a lawyer: find representation.".to_string(),
            status,
        }
    }

    #[test]
    fn test_step_status_round_trips_through_str() {
        for status in [StepStatus::Locked, StepStatus::Active, StepStatus::Done] {
            assert_eq!(status.as_str().parse::<StepStatus>(), Ok(status));
        }
        assert!("pending".parse::<StepStatus>().is_err());
    }

    #[test]
    fn test_step_completion_follows_status() {
        assert!(create_test_step(StepStatus::Done).is_completed());
        assert!(!create_test_step(StepStatus::Active).is_completed());
        assert!(!create_test_step(StepStatus::Locked).is_completed());
    }

    #[test]
    fn test_step_display() {
        let output = format!("{}", create_test_step(StepStatus::Locked));
        assert!(output.contains("# Step 2: Hire a lawyer"));
        assert!(output.contains("○ Locked"));
        assert!(output.contains("find representation."));
    }

    #[test]
    fn test_step_serializes_camel_case() {
        let json = serde_json::to_value(create_test_step(StepStatus::Active)).unwrap();
        assert_eq!(json["fullText"], "Hire a lawyer: find representation.");
        assert_eq!(json["status"], "active");
    }

    #[test]
    fn test_analysis_stringifies_fact_values() {
        let analysis: Analysis = serde_json::from_str(
            r#"{"facts": {"amount": 50000, "date_of_incident": "2024-01-02", "witness": null},
                "strategy": "1. Send notice."}"#,
        )
        .unwrap();
        assert_eq!(analysis.facts["amount"], "50000");
        assert_eq!(analysis.facts["date_of_incident"], "2024-01-02");
        assert_eq!(analysis.facts["witness"], "");
        assert_eq!(analysis.strategy.as_deref(), Some("1. Send notice."));
        assert!(analysis.laws.is_empty());
    }

    #[test]
    fn test_case_summary_accepts_backend_shape() {
        let summary: CaseSummary = serde_json::from_str(
            r#"{"_id": "abc123", "title": "Money / Debt: loan", "type": "money",
                "status": "Draft", "step": 1, "date": "2025-01-10",
                "user_email": "a@b.c"}"#,
        )
        .unwrap();
        assert_eq!(summary.id, "abc123");
        assert_eq!(summary.case_type, "money");
        assert_eq!(summary.step, Some(1));
    }

    #[test]
    fn test_case_summary_defaults() {
        let summary: CaseSummary =
            serde_json::from_str(r#"{"id": "x", "title": "T"}"#).unwrap();
        assert_eq!(summary.case_type, "General");
        assert_eq!(summary.step, None);
        assert!(summary.status.is_empty());
    }

    #[test]
    fn test_role_translation() {
        assert_eq!(WireRole::from(ChatRole::Ai), WireRole::Model);
        assert_eq!(ChatRole::from(WireRole::Model), ChatRole::Ai);
        assert_eq!(ChatRole::from(WireRole::from(ChatRole::User)), ChatRole::User);
    }

    #[test]
    fn test_wire_message_accepts_text_alias() {
        let message: WireMessage =
            serde_json::from_str(r#"{"role": "model", "text": "Hello"}"#).unwrap();
        assert_eq!(ChatMessage::from(message), ChatMessage::ai("Hello"));
    }

    #[test]
    fn test_jurisdiction_prefix() {
        let full = Jurisdiction::new("Karnataka", "Bengaluru");
        assert_eq!(
            full.context_prefix(),
            "[JURISDICTION CONTEXT: Bengaluru, Karnataka, India]"
        );
        let partial = Jurisdiction::new("Karnataka", "");
        assert!(partial.context_prefix().contains("Unknown District"));
        assert!(!Jurisdiction::default().is_set());
    }

    #[test]
    fn test_draft_template_parsing() {
        assert_eq!(
            "legal-notice".parse::<DraftTemplate>(),
            Ok(DraftTemplate::LegalNotice)
        );
        assert_eq!("Bail".parse::<DraftTemplate>(), Ok(DraftTemplate::Bail));
        assert!("contract".parse::<DraftTemplate>().is_err());
        assert_eq!(
            serde_json::to_value(DraftTemplate::LegalNotice).unwrap(),
            "legal_notice"
        );
    }

    #[test]
    fn test_case_category_parsing() {
        assert_eq!("Money".parse::<CaseCategory>(), Ok(CaseCategory::Money));
        assert_eq!(CaseCategory::Theft.label(), "Theft / Cybercrime");
        assert!("tax".parse::<CaseCategory>().is_err());
    }
}
