//! Parsing of backend strategy text into roadmap steps.
//!
//! The triage service answers with an informally numbered list such as
//! `"1. File a complaint: go to station. 2. Hire a lawyer: find representation."`.
//! [`parse_strategy`] turns that text into [`Step`]s. It is a total function:
//! whatever arrives, at least one step comes back and step 0 is active.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{Step, StepStatus};

/// Maximum number of characters kept in a step title.
pub const TITLE_LIMIT: usize = 30;

/// Marker appended to titles that were shortened.
///
/// Only a title longer than [`TITLE_LIMIT`] is cut and marked; one that fits
/// is shown whole with no marker, and trailing spaces left by the cut are
/// dropped before the marker.
pub const TITLE_ELLIPSIS: &str = "...";

/// Strategy used when an analysis arrives without one.
pub const DEFAULT_STRATEGY: &str = "1. Review Case Details. 2. Consult Lawyer.";

const PLACEHOLDER_TITLE: &str = "Case Initialization";
const PLACEHOLDER_BODY: &str = "Reviewing facts...";
const UNNUMBERED_TITLE: &str = "Analysis";

fn step_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    // "<digits>.<whitespace>" as in "1. " or "12.\n"
    MARKER.get_or_init(|| Regex::new(r"\d+\.\s+").expect("step marker pattern is valid"))
}

/// Converts strategy text into an ordered list of steps.
///
/// - `None` or empty text yields a single "Case Initialization" placeholder.
/// - Text is partitioned on `<digits>. ` markers; blank partitions are dropped.
/// - If nothing is left, the whole text becomes one "Analysis" step.
/// - Otherwise each partition becomes a step; the first is active and the
///   rest are locked.
///
/// # Examples
///
/// ```rust
/// use docket_core::{strategy::parse_strategy, StepStatus};
///
/// let steps = parse_strategy(Some(
///     "1. File a complaint: go to station. 2. Hire a lawyer: find representation.",
/// ));
/// assert_eq!(steps.len(), 2);
/// assert_eq!(steps[0].title, "File a complaint");
/// assert_eq!(steps[0].status, StepStatus::Active);
/// assert_eq!(steps[1].status, StepStatus::Locked);
/// ```
pub fn parse_strategy(text: Option<&str>) -> Vec<Step> {
    let text = match text {
        Some(text) if !text.is_empty() => text,
        _ => return vec![placeholder_step()],
    };

    let segments: Vec<&str> = step_marker()
        .split(text)
        .filter(|segment| !segment.trim().is_empty())
        .collect();

    if segments.is_empty() {
        return vec![Step {
            id: 0,
            title: UNNUMBERED_TITLE.to_string(),
            full_text: text.to_string(),
            status: StepStatus::Active,
        }];
    }

    segments
        .into_iter()
        .enumerate()
        .map(|(index, segment)| Step {
            id: index,
            title: step_title(segment),
            full_text: segment.to_string(),
            status: if index == 0 {
                StepStatus::Active
            } else {
                StepStatus::Locked
            },
        })
        .collect()
}

/// The single step used when no strategy is available at all.
pub fn placeholder_step() -> Step {
    Step {
        id: 0,
        title: PLACEHOLDER_TITLE.to_string(),
        full_text: PLACEHOLDER_BODY.to_string(),
        status: StepStatus::Active,
    }
}

/// Whether `step` is the stand-in from [`placeholder_step`] rather than part
/// of a parsed roadmap.
pub fn is_placeholder_step(step: &Step) -> bool {
    step.title == PLACEHOLDER_TITLE && step.full_text == PLACEHOLDER_BODY
}

/// Display title for a segment: the text before its first colon, bounded to
/// [`TITLE_LIMIT`] characters. [`TITLE_ELLIPSIS`] is appended only when
/// characters were removed.
pub fn step_title(segment: &str) -> String {
    let head = segment.split(':').next().unwrap_or(segment).trim();
    if head.chars().count() <= TITLE_LIMIT {
        return head.to_string();
    }
    let mut title: String = head.chars().take(TITLE_LIMIT).collect();
    title.truncate(title.trim_end().len());
    title.push_str(TITLE_ELLIPSIS);
    title
}
