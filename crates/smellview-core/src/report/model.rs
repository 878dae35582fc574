use serde::{Deserialize, Serialize};

use crate::SCHEMA_VERSION;
use crate::error::{Diagnostic, ReportError};
use crate::project::{ChartSeries, DetailRow};
use crate::session::ReportView;

/// Rendered report handed to presentation.
///
/// This is the stable JSON contract of the CLI. It must remain deterministic
/// for identical input bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub schema_version: String,
    pub tool: ToolInfo,
    pub source: Option<SourceInfo>,
    pub status: ViewStatus,
    /// Why the report could not be shown. Only set for `NoResults`.
    pub reason: Option<String>,
    pub total: u64,
    pub counts: Vec<CountEntry>,
    pub chart: ChartSeries,
    pub rows: Vec<DetailRow>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ReportDocument {
    pub fn new(tool: ToolInfo, source: Option<SourceInfo>, view: &ReportView) -> Self {
        let counts = view
            .normalized
            .counts
            .iter()
            .map(|c| CountEntry {
                category: c.category.name.to_string(),
                color: c.category.color.to_string(),
                count: c.count,
            })
            .collect();

        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            tool,
            source,
            status: ViewStatus::Ok,
            reason: None,
            total: view.normalized.total,
            counts,
            chart: view.projection.chart.clone(),
            rows: view.projection.rows.clone(),
            diagnostics: view.normalized.diagnostics.clone(),
        }
    }

    /// Empty-state document for a report that failed to normalize.
    pub fn no_results(tool: ToolInfo, source: Option<SourceInfo>, err: &ReportError) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            tool,
            source,
            status: ViewStatus::NoResults,
            reason: Some(err.reason().to_string()),
            total: 0,
            counts: vec![],
            chart: ChartSeries {
                labels: vec![],
                percentages: vec![],
                colors: vec![],
            },
            rows: vec![],
            diagnostics: vec![],
        }
    }
}

/// Tool metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Where the raw report came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// File path or service URL. Informational only.
    pub path: Option<String>,
    pub size_bytes: u64,
    pub hash: SourceHash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceHash {
    pub algorithm: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountEntry {
    pub category: String,
    pub color: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    Ok,
    NoResults,
}

impl ViewStatus {
    /// Process exit code for the CLI.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::NoResults => 2,
        }
    }
}
