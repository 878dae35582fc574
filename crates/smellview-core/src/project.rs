//! Chart and detail projection of a normalized report.
//!
//! The chart covers table categories only. Detail rows cover everything the
//! service reported, unknown categories included, under the names the service used.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog;
use crate::normalize::NormalizedReport;
use crate::raw::{CategoryEntry, LineRange, Occurrence};
use crate::util::deterministic::{ordered_entries, percent_tenths};

/// Data for a proportional chart. The three vectors are parallel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub percentages: Vec<f64>,
    pub colors: Vec<String>,
}

impl ChartSeries {
    pub fn sum(&self) -> f64 {
        self.percentages.iter().sum()
    }
}

/// One occurrence flattened for tabular display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRow {
    /// Category name exactly as reported.
    pub category: String,
    /// Color token for table categories; `None` for unknown ones.
    pub color: Option<String>,
    pub file: String,
    pub lines: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<LineRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_content: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_code: Option<Vec<String>>,
}

/// A source line paired with whether the row flags it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based.
    pub number: u32,
    pub text: &'a str,
    pub flagged: bool,
}

impl DetailRow {
    fn from_occurrence(entry: &CategoryEntry, occurrence: &Occurrence) -> Self {
        Self {
            category: entry.name.clone(),
            color: catalog::lookup(&entry.name).map(|c| c.color.to_string()),
            file: occurrence.file.clone(),
            lines: occurrence.lines.clone(),
            range: occurrence.range,
            file_content: occurrence.file_content.clone(),
            full_code: occurrence.full_code.clone(),
        }
    }

    pub fn is_known(&self) -> bool {
        self.color.is_some()
    }

    pub fn is_flagged(&self, line: u32) -> bool {
        self.lines.contains(&line)
    }

    /// Line-indexed view of the file with flags derived from `lines`.
    ///
    /// Recomputed on every call; nothing about highlighting is stored on the
    /// row. `None` when the service sent no file content.
    pub fn source_view(&self) -> Option<Vec<SourceLine<'_>>> {
        let content = self.file_content.as_ref()?;
        let flagged: BTreeSet<u32> = self.lines.iter().copied().collect();

        Some(
            content
                .iter()
                .zip(1u32..)
                .map(|(text, number)| SourceLine {
                    number,
                    text: text.trim_end_matches(['\n', '\r']),
                    flagged: flagged.contains(&number),
                })
                .collect(),
        )
    }

    pub fn lines_label(&self) -> String {
        self.lines
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub chart: ChartSeries,
    pub rows: Vec<DetailRow>,
}

/// Share of `total` taken by `count`, in percent, rounded to one decimal.
///
/// Zero when `total` is zero. Clamped into `[0, 100]`; a reported total
/// smaller than a count still shows up as a skewed chart.
pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    percent_tenths(count, total) as f64 / 10.0
}

/// Build the chart series for table categories.
pub fn chart_series(report: &NormalizedReport) -> ChartSeries {
    let mut chart = ChartSeries {
        labels: Vec::with_capacity(report.counts.len()),
        percentages: Vec::with_capacity(report.counts.len()),
        colors: Vec::with_capacity(report.counts.len()),
    };

    for entry in &report.counts {
        chart.labels.push(entry.category.name.to_string());
        chart.percentages.push(percentage(entry.count, report.total));
        chart.colors.push(entry.category.color.to_string());
    }

    chart
}

/// Flatten every occurrence into a row.
///
/// Table categories come first in table order, then unknown categories in
/// response order. Occurrence order within a category is preserved.
pub fn detail_rows(report: &NormalizedReport) -> Vec<DetailRow> {
    ordered_entries(&report.breakdown)
        .into_iter()
        .flat_map(|entry| {
            entry
                .value
                .occurrences()
                .iter()
                .map(move |occurrence| DetailRow::from_occurrence(entry, occurrence))
        })
        .collect()
}

pub fn project(report: &NormalizedReport) -> Projection {
    let chart = chart_series(report);
    let rows = detail_rows(report);

    debug!(
        total = report.total,
        rows = rows.len(),
        chart_sum = chart.sum(),
        "projected report"
    );

    Projection { chart, rows }
}
