//! Translation between local step positions and the remote progress record.
//!
//! The workspace counts steps from zero; the backend stores a 1-based `step`
//! number next to a free-form `status` label. Every sync point goes through
//! [`remote_step`] and [`local_position`] so the off-by-one lives in one place.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status label written alongside the step number.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProgressLabel {
    /// The case still has an active step
    Active,
    /// Every step is done
    Closed,
}

impl ProgressLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressLabel::Active => "Active",
            ProgressLabel::Closed => "Closed",
        }
    }

    /// Whether a free-form remote status label means the case is closed.
    pub fn is_closed_label(label: &str) -> bool {
        label.trim().eq_ignore_ascii_case(ProgressLabel::Closed.as_str())
    }
}

impl fmt::Display for ProgressLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Body of `PUT /cases/{id}/progress`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// 1-based step number
    pub step: u32,
    pub status: ProgressLabel,
}

impl ProgressUpdate {
    /// Progress record for a workspace sitting at `position` out of `len`
    /// steps. `position == len` is the terminal position.
    pub fn at(position: usize, len: usize) -> Self {
        Self {
            step: remote_step(position),
            status: if position >= len {
                ProgressLabel::Closed
            } else {
                ProgressLabel::Active
            },
        }
    }
}

/// Converts a zero-based position into the remote 1-based step number.
pub fn remote_step(position: usize) -> u32 {
    u32::try_from(position)
        .unwrap_or(u32::MAX - 1)
        .saturating_add(1)
}

/// Converts a remote step number into a zero-based position.
///
/// Returns `None` for `0`, which the backend never writes for a valid case.
pub fn local_position(step: u32) -> Option<usize> {
    step.checked_sub(1).map(|index| index as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_step_is_one_based() {
        assert_eq!(remote_step(0), 1);
        assert_eq!(remote_step(4), 5);
        assert_eq!(local_position(1), Some(0));
        assert_eq!(local_position(0), None);
    }

    #[test]
    fn test_progress_update_labels() {
        assert_eq!(
            ProgressUpdate::at(1, 3),
            ProgressUpdate {
                step: 2,
                status: ProgressLabel::Active
            }
        );
        assert_eq!(
            ProgressUpdate::at(3, 3),
            ProgressUpdate {
                step: 4,
                status: ProgressLabel::Closed
            }
        );
    }

    #[test]
    fn test_progress_update_wire_shape() {
        let json = serde_json::to_string(&ProgressUpdate::at(2, 2)).unwrap();
        assert_eq!(json, r#"{"step":3,"status":"Closed"}"#);
    }

    #[test]
    fn test_closed_label_detection() {
        assert!(ProgressLabel::is_closed_label("closed"));
        assert!(ProgressLabel::is_closed_label(" Closed "));
        assert!(!ProgressLabel::is_closed_label("Draft"));
    }
}
