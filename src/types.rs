//! Core types for modpack-dl

use serde::{Deserialize, Serialize};

/// Classified result of one download step
///
/// Exactly one `Outcome` is produced per manifest entry. Fatal conditions
/// never become an `Outcome`; they abort the run as [`crate::Error`]s.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    /// The artifact was resolved and written to disk
    Success {
        /// File name inferred from the redirect target, used on disk
        resolved_name: String,
    },

    /// The artifact could not be resolved to a file ("mod not found")
    Failure {
        /// Display name of the entry that was attempted (may be empty)
        display_name: String,
        /// Human-readable failure reason
        reason: String,
    },
}

impl Outcome {
    /// Reason string for the one recoverable per-item failure
    pub const MOD_NOT_FOUND: &'static str = "mod not found";

    /// Build the standard "mod not found" failure for an attempted entry
    pub fn not_found(display_name: impl Into<String>) -> Self {
        Outcome::Failure {
            display_name: display_name.into(),
            reason: Self::MOD_NOT_FOUND.to_string(),
        }
    }

    /// True for [`Outcome::Failure`]
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure { .. })
    }

    /// The name associated with the outcome: resolved file name on success,
    /// attempted display name on failure
    pub fn name(&self) -> &str {
        match self {
            Outcome::Success { resolved_name } => resolved_name,
            Outcome::Failure { display_name, .. } => display_name,
        }
    }
}
