//! Parameter structures for Docket operations.
//!
//! These structures are shared between the [`crate::Desk`] facade and the
//! interfaces built on it. They carry no framework derives beyond serde, so
//! the CLI wraps them in its own clap argument structs and converts with
//! `.into()`:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │───▶│  Core Params    │───▶│  Request body   │
//! │  (clap derives) │    │ (serde derives) │    │   (reqwest)     │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Structures that are sent to the backend as-is serialize to the exact
//! request body the API expects.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::{CaseCategory, DraftTemplate, Facts, Jurisdiction};

/// Number of situation characters kept in a generated case title.
const TITLE_EXCERPT: usize = 25;

/// Credentials for `POST /auth/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

/// New account for `POST /auth/register`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Register {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/forgot-password`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForgotPassword {
    pub email: String,
}

/// Body of `POST /auth/reset-password`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResetPassword {
    pub email: String,
    /// One-time code mailed by the forgot-password flow
    pub otp: String,
    pub new_password: String,
}

/// Parameters for opening a new case from a free-text situation.
#[derive(Debug, Clone, Default)]
pub struct NewCase {
    /// The user's description of what happened
    pub situation: String,
    /// Category picked by the user; `None` files the case as "General"
    pub category: Option<CaseCategory>,
    /// Optional supporting document sent along with the analysis
    pub file: Option<PathBuf>,
}

impl NewCase {
    /// Situation text as sent for analysis, prefixed with the jurisdiction
    /// context when one is set.
    pub fn analysis_text(&self, jurisdiction: &Jurisdiction) -> String {
        if jurisdiction.is_set() {
            format!(
                "{}\n\nSITUATION: {}",
                jurisdiction.context_prefix(),
                self.situation
            )
        } else {
            self.situation.clone()
        }
    }

    /// The case record to create once analysis has succeeded.
    pub fn create_case(&self) -> CreateCase {
        let (label, case_type) = match self.category {
            Some(category) => (category.label(), category.id()),
            None => ("General", "General"),
        };
        CreateCase {
            title: case_title(label, &self.situation),
            case_type: case_type.to_string(),
        }
    }
}

/// Builds `"<label>: <first 25 chars>"`, marking a cut situation with "...".
pub fn case_title(label: &str, situation: &str) -> String {
    let situation = situation.trim();
    let mut excerpt: String = situation.chars().take(TITLE_EXCERPT).collect();
    if situation.chars().count() > TITLE_EXCERPT {
        excerpt.push_str("...");
    }
    format!("{label}: {excerpt}")
}

/// Body of `POST /cases?email=`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateCase {
    pub title: String,
    #[serde(rename = "type")]
    pub case_type: String,
}

/// Body of `PUT /cases/{id}/context`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CaseContext {
    pub description: String,
    pub facts: Facts,
}

impl CaseContext {
    /// Nothing worth saving: no situation and no facts.
    pub fn is_blank(&self) -> bool {
        self.description.trim().is_empty() && self.facts.is_empty()
    }
}

/// Parameters for asking the case assistant a question.
#[derive(Debug, Clone, Default)]
pub struct AskQuestion {
    pub case_id: String,
    pub question: String,
}

/// Parameters for asking the general assistant a question.
#[derive(Debug, Clone, Default)]
pub struct GeneralQuestion {
    pub query: String,
    /// Optional case context to ground the answer
    pub case_context: Option<String>,
}

/// Parameters for drafting a document for a case.
#[derive(Debug, Clone, Default)]
pub struct DraftRequest {
    pub case_id: String,
    pub template: DraftTemplate,
}

/// Parameters addressing one step of a case roadmap.
#[derive(Debug, Clone, Default)]
pub struct StepRef {
    pub case_id: String,
    /// 1-based step number as shown to the user
    pub number: usize,
}

impl StepRef {
    /// Zero-based index into the roadmap, `None` for step number 0.
    pub fn index(&self) -> Option<usize> {
        self.number.checked_sub(1)
    }
}

/// Parameters for uploading a piece of evidence.
#[derive(Debug, Clone, Default)]
pub struct UploadEvidence {
    pub case_id: String,
    pub path: PathBuf,
}

/// Parameters for removing a piece of evidence.
#[derive(Debug, Clone, Default)]
pub struct DeleteEvidence {
    pub case_id: String,
    pub evidence_id: String,
}
