//! Failure and diagnostic taxonomy for report shaping.
//!
//! Only `ReportError::InvalidReport` stops a report from being shown.
//! Everything else is a `Diagnostic` that travels with the normalized report.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    /// Missing or malformed top-level fields. Render the empty state.
    #[error("invalid report: {reason}")]
    InvalidReport { reason: String },
}

impl ReportError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidReport {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::InvalidReport { reason } => reason,
        }
    }
}

/// Non-fatal observation made while decoding or normalizing a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The reported total disagrees with the summed category counts.
    /// The reported value is still used as the total.
    InconsistentTotal { reported: u64, summed: u64 },
    /// The reported total is numeric but not a non-negative integer.
    /// The summed category counts are used instead.
    InvalidTotal { value: String },
    /// Category not in the fixed table. Listed in detail rows only.
    UnknownCategory { name: String },
    /// A category value or occurrence that could not be decoded and was skipped.
    MalformedEntry { category: String, reason: String },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InconsistentTotal { reported, summed } => write!(
                f,
                "reported total {reported} differs from summed counts {summed}"
            ),
            Self::InvalidTotal { value } => {
                write!(f, "reported total {value} is not a non-negative integer")
            }
            Self::UnknownCategory { name } => write!(f, "unknown category \"{name}\""),
            Self::MalformedEntry { category, reason } => {
                write!(f, "skipped entry in \"{category}\": {reason}")
            }
        }
    }
}
