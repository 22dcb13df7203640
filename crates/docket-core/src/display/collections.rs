//! Collection wrapper types for displaying groups of domain objects.
//!
//! Each wrapper formats its items with their own Display implementation and
//! prints a short notice when the collection is empty.

use std::{fmt, ops::Index};

use crate::models::{
    CaseSummary, ChatMessage, Evidence, Facts, Step, TimelineEvent, FACT_NOT_MENTIONED,
};

/// Shown for facts the analysis could not find.
pub const FACT_MISSING: &str = "Not found in text";

/// Newtype wrapper for displaying the user's case list.
///
/// # Examples
///
/// ```rust
/// use docket_core::{display::CaseSummaries, models::CaseSummary};
///
/// let case = CaseSummary {
///     id: "64f0c2".to_string(),
///     title: "Money / Debt: Friend owes me".to_string(),
///     case_type: "money".to_string(),
///     status: "Active".to_string(),
///     step: Some(2),
///     date: None,
///     user_email: None,
/// };
///
/// let output = format!("{}", CaseSummaries(vec![case]));
/// assert!(output.contains("Friend owes me"));
/// assert!(output.contains("`64f0c2`"));
/// ```
pub struct CaseSummaries(pub Vec<CaseSummary>);

impl CaseSummaries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CaseSummary> {
        self.0.iter()
    }
}

impl Index<usize> for CaseSummaries {
    type Output = CaseSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a CaseSummaries {
    type Item = &'a CaseSummary;
    type IntoIter = std::slice::Iter<'a, CaseSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for CaseSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No cases found. Start one with `docket case new`.");
        }
        for case in &self.0 {
            writeln!(f, "- {case}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying a roadmap as a numbered list.
pub struct Steps(pub Vec<Step>);

impl Steps {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No steps.");
        }
        for step in &self.0 {
            writeln!(
                f,
                "{}. **{}** _{}_",
                step.number(),
                step.title,
                step.status.with_icon()
            )?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying uploaded evidence.
pub struct EvidenceList(pub Vec<Evidence>);

impl fmt::Display for EvidenceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No evidence uploaded.");
        }
        for evidence in &self.0 {
            writeln!(f, "- {evidence}")?;
        }
        Ok(())
    }
}

/// The facts of a case as a two-column table.
///
/// Empty values and the backend's "Not mentioned" marker both read as
/// [`FACT_MISSING`].
pub struct FactSheet<'a>(pub &'a Facts);

impl fmt::Display for FactSheet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No facts extracted yet.");
        }
        writeln!(f, "| Fact | Value |")?;
        writeln!(f, "|:-|:-|")?;
        for (key, value) in self.0 {
            let value = value.trim();
            let shown = if value.is_empty() || value == FACT_NOT_MENTIONED {
                FACT_MISSING
            } else {
                value
            };
            writeln!(f, "| {} | {} |", key.replace('_', " "), shown)?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying timeline events.
pub struct Timeline(pub Vec<TimelineEvent>);

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.0 {
            writeln!(f, "{event}")?;
        }
        Ok(())
    }
}

/// A chat transcript, one paragraph per message.
pub struct ChatTranscript<'a>(pub &'a [ChatMessage]);

impl fmt::Display for ChatTranscript<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No messages yet.");
        }
        for message in self.0 {
            writeln!(f, "{message}")?;
            writeln!(f)?;
        }
        Ok(())
    }
}
