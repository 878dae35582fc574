use crate::report::model::{ReportDocument, ViewStatus};

pub const NO_RESULTS: &str = "No Results Yet";

/// Plain-text rendering of a report document.
///
/// With `show_source`, rows that carry file content are followed by the
/// numbered source, flagged lines marked with `>`.
pub fn render_text(doc: &ReportDocument, show_source: bool) -> String {
    let mut out = String::new();

    if doc.status == ViewStatus::NoResults {
        out.push_str(&format!("{NO_RESULTS}\n"));
        return out;
    }

    out.push_str(&format!("Total Smells Detected: {}\n\n", doc.total));

    for (entry, pct) in doc.counts.iter().zip(&doc.chart.percentages) {
        out.push_str(&format!(
            "  {}: {} ({pct:.1}%)\n",
            entry.category, entry.count
        ));
    }

    if doc.rows.is_empty() {
        return out;
    }

    out.push_str("\nSmell Type | File Path | Line Numbers\n");
    for row in &doc.rows {
        out.push_str(&format!(
            "{} | {} | {}\n",
            row.category,
            row.file,
            row.lines_label()
        ));

        if !show_source {
            continue;
        }
        if let Some(view) = row.source_view() {
            let width = view.len().to_string().len();
            for line in view {
                let marker = if line.flagged { '>' } else { ' ' };
                out.push_str(&format!(
                    "    {marker} {:>width$} | {}\n",
                    line.number, line.text
                ));
            }
        }
    }

    out
}
