//! Report normalization.
//!
//! Turns a decoded service report into one count per table category plus a
//! single resolved total. The reported total is passed through unchanged when
//! usable; it is never reconciled against the summed counts.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::{self, CountPolicy, SMELL_CATEGORIES, SmellCategory};
use crate::error::{Diagnostic, ReportError};
use crate::raw::{CategoryEntry, RawReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: SmellCategory,
    pub count: u64,
}

/// Where `NormalizedReport::total` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalSource {
    Reported,
    Summed,
}

/// Category-complete, total-resolved report.
///
/// `counts` has exactly one entry per table category, in table order.
/// `breakdown` keeps the decoded service data for detail rows, including
/// categories the table does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedReport {
    pub counts: Vec<CategoryCount>,
    pub total: u64,
    pub total_source: TotalSource,
    pub policy: CountPolicy,
    pub breakdown: Vec<CategoryEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

impl NormalizedReport {
    pub fn count_of(&self, name: &str) -> Option<u64> {
        self.counts
            .iter()
            .find(|c| c.category.name == name)
            .map(|c| c.count)
    }

    /// Sum of the per-category counts, independent of the resolved total.
    pub fn summed(&self) -> u64 {
        saturating_sum(&self.counts)
    }
}

/// Bare counts may be as large as `u64::MAX`; the sum pins there.
fn saturating_sum(counts: &[CategoryCount]) -> u64 {
    counts
        .iter()
        .fold(0u64, |acc, c| acc.saturating_add(c.count))
}

/// Decode and normalize an untyped service report.
pub fn normalize(raw: &Value, policy: CountPolicy) -> Result<NormalizedReport, ReportError> {
    let decoded = RawReport::decode(raw)?;
    Ok(normalize_decoded(decoded, policy))
}

/// Normalize an already-decoded report. Never fails.
pub fn normalize_decoded(raw: RawReport, policy: CountPolicy) -> NormalizedReport {
    let RawReport {
        reported_total,
        breakdown,
        mut diagnostics,
    } = raw;

    let counts: Vec<CategoryCount> = SMELL_CATEGORIES
        .iter()
        .map(|category| CategoryCount {
            category: *category,
            count: breakdown
                .iter()
                .find(|e| e.name == category.name)
                .map_or(0, |e| e.value.count(policy)),
        })
        .collect();

    for entry in breakdown.iter().filter(|e| !catalog::is_known(&e.name)) {
        debug!(category = %entry.name, "category not in table; detail rows only");
        diagnostics.push(Diagnostic::UnknownCategory {
            name: entry.name.clone(),
        });
    }

    let summed = saturating_sum(&counts);

    let (total, total_source) = match reported_total {
        Some(reported) => {
            if reported != summed {
                let diag = Diagnostic::InconsistentTotal { reported, summed };
                warn!(diagnostic = %diag, "using reported total as-is");
                diagnostics.push(diag);
            }
            (reported, TotalSource::Reported)
        }
        None => (summed, TotalSource::Summed),
    };

    debug!(
        total,
        summed,
        %policy,
        categories = breakdown.len(),
        diagnostics = diagnostics.len(),
        "normalized report"
    );

    NormalizedReport {
        counts,
        total,
        total_source,
        policy,
        breakdown,
        diagnostics,
    }
}
