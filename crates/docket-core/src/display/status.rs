//! One-line outcomes and background write warnings.

use std::fmt;

use crate::sync::{SyncChannel, SyncTracker};

/// One-line outcome of a command that has nothing else to show.
pub struct OperationStatus {
    pub success: bool,
    pub message: String,
}

impl OperationStatus {
    pub fn success(message: String) -> Self {
        Self {
            success: true,
            message,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            success: false,
            message,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {}",
            if self.success { "Success:" } else { "Error:" },
            self.message
        )
    }
}

/// Report of background writes that failed.
///
/// Renders nothing when every write went through.
pub struct SyncReport<'a>(pub &'a SyncTracker);

impl fmt::Display for SyncReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (channel, reason) in self.0.failures() {
            let what = match channel {
                SyncChannel::Progress => "Progress was saved locally but not on the server",
                SyncChannel::Context => "Case details were saved locally but not on the server",
            };
            writeln!(f, "> **Warning:** {what}: {reason}")?;
        }
        Ok(())
    }
}
