//! Boundary decoding of the analysis service's report.
//!
//! The service response is untyped JSON. Each category value is decoded once,
//! here, into a `CategoryValue`: either a list of occurrences or a bare count.
//! Nothing past this module inspects `serde_json::Value` shapes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::catalog::CountPolicy;
use crate::error::{Diagnostic, ReportError};

pub const BREAKDOWN_FIELD: &str = "smell_breakdown";
pub const TOTAL_FIELD: &str = "total_smells";

/// Line span the service attaches to some occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// One reported instance of a smell in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub file: String,
    /// 1-based, in service order. Never empty.
    pub lines: Vec<u32>,
    /// Whole file, line N at index N-1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_content: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<LineRange>,
    /// Source of the enclosing definition, when the service extracts it.
    /// The service sends `[]` when it has none; that decodes to `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_code: Option<Vec<String>>,
}

/// Decoded shape of a single category value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", content = "value", rename_all = "snake_case")]
pub enum CategoryValue {
    Occurrences(Vec<Occurrence>),
    Count(u64),
}

impl CategoryValue {
    /// Contribution of this value to its category count.
    ///
    /// Saturates at `u64::MAX`.
    pub fn count(&self, policy: CountPolicy) -> u64 {
        match self {
            Self::Occurrences(items) => match policy {
                CountPolicy::Lines => items
                    .iter()
                    .fold(0u64, |acc, o| acc.saturating_add(o.lines.len() as u64)),
                CountPolicy::Occurrences => items.len() as u64,
            },
            Self::Count(n) => *n,
        }
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        match self {
            Self::Occurrences(items) => items,
            Self::Count(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryEntry {
    pub name: String,
    pub value: CategoryValue,
}

/// A service report after boundary decoding.
///
/// `breakdown` keeps the order categories appeared in the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawReport {
    /// `None` when `total_smells` was numeric but unusable as a count.
    pub reported_total: Option<u64>,
    pub breakdown: Vec<CategoryEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RawReport {
    /// Decode the top-level report object.
    ///
    /// Fails when the report is absent, lacks a category map, or carries a
    /// non-numeric `total_smells`. Malformed category values and occurrences
    /// are skipped and recorded as diagnostics.
    pub fn decode(value: &Value) -> Result<Self, ReportError> {
        let object = match value {
            Value::Null => return Err(ReportError::invalid("report is absent")),
            Value::Object(object) => object,
            _ => return Err(ReportError::invalid("report is not an object")),
        };

        let breakdown = object
            .get(BREAKDOWN_FIELD)
            .and_then(Value::as_object)
            .ok_or_else(|| ReportError::invalid(format!("missing {BREAKDOWN_FIELD} map")))?;

        let total = match object.get(TOTAL_FIELD) {
            Some(Value::Number(n)) => n,
            _ => {
                return Err(ReportError::invalid(format!(
                    "{TOTAL_FIELD} is not numeric"
                )));
            }
        };

        let mut diagnostics = Vec::new();

        let reported_total = number_as_count(total);
        if reported_total.is_none() {
            let diag = Diagnostic::InvalidTotal {
                value: total.to_string(),
            };
            warn!(diagnostic = %diag, "falling back to summed total");
            diagnostics.push(diag);
        }

        let breakdown = decode_breakdown(breakdown, &mut diagnostics);

        Ok(Self {
            reported_total,
            breakdown,
            diagnostics,
        })
    }

    pub fn entry(&self, name: &str) -> Option<&CategoryEntry> {
        self.breakdown.iter().find(|e| e.name == name)
    }
}

fn decode_breakdown(
    breakdown: &Map<String, Value>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<CategoryEntry> {
    let mut entries = Vec::with_capacity(breakdown.len());

    for (name, value) in breakdown {
        let mut malformed = |reason: String| {
            let diag = Diagnostic::MalformedEntry {
                category: name.clone(),
                reason,
            };
            warn!(diagnostic = %diag, "skipping malformed entry");
            diagnostics.push(diag);
        };

        let decoded = match value {
            Value::Array(items) => {
                let occurrences = items
                    .iter()
                    .enumerate()
                    .filter_map(|(index, item)| match decode_occurrence(item) {
                        Ok(occurrence) => Some(occurrence),
                        Err(reason) => {
                            malformed(format!("occurrence {index}: {reason}"));
                            None
                        }
                    })
                    .collect();
                Some(CategoryValue::Occurrences(occurrences))
            }
            Value::Number(n) => match n.as_u64() {
                Some(count) => Some(CategoryValue::Count(count)),
                None => {
                    malformed(format!("count {n} is not a non-negative integer"));
                    None
                }
            },
            _ => {
                malformed("expected a list of occurrences or a count".to_string());
                None
            }
        };

        if let Some(value) = decoded {
            entries.push(CategoryEntry {
                name: name.clone(),
                value,
            });
        }
    }

    entries
}

fn decode_occurrence(item: &Value) -> Result<Occurrence, String> {
    let object = item.as_object().ok_or("not an object")?;

    let file = object
        .get("file")
        .and_then(Value::as_str)
        .ok_or("missing file path")?
        .to_string();

    let raw_lines = object
        .get("lines")
        .and_then(Value::as_array)
        .ok_or("missing line list")?;
    if raw_lines.is_empty() {
        return Err("empty line list".to_string());
    }
    let lines = raw_lines
        .iter()
        .map(|line| line_number(line).ok_or_else(|| format!("invalid line number {line}")))
        .collect::<Result<Vec<u32>, String>>()?;

    let file_content = string_list(object.get("file_content"))
        .ok_or("file content is not a list of strings")?;
    let full_code = string_list(object.get("full_code"))
        .ok_or("full code is not a list of strings")?
        .filter(|code| !code.is_empty());

    let range = object.get("range").and_then(Value::as_object).and_then(|r| {
        let start = r.get("start").and_then(line_number);
        let end = r.get("end").and_then(line_number);
        (start.is_some() || end.is_some()).then_some(LineRange { start, end })
    });

    Ok(Occurrence {
        file,
        lines,
        file_content,
        range,
        full_code,
    })
}

/// `Some(None)` when absent or null, `None` when present but not all strings.
fn string_list(value: Option<&Value>) -> Option<Option<Vec<String>>> {
    match value {
        None | Some(Value::Null) => Some(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|l| l.as_str().map(str::to_owned))
            .collect::<Option<Vec<String>>>()
            .map(Some),
        Some(_) => None,
    }
}

fn line_number(value: &Value) -> Option<u32> {
    value
        .as_u64()
        .filter(|&n| n >= 1)
        .and_then(|n| u32::try_from(n).ok())
}

/// Accepts integral floats such as `12.0`, which some serializers emit.
fn number_as_count(n: &serde_json::Number) -> Option<u64> {
    if let Some(count) = n.as_u64() {
        return Some(count);
    }
    n.as_f64()
        .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
        .map(|f| f as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_occurrence_lists_in_response_order() {
        let raw = RawReport::decode(&json!({
            "total_smells": 3,
            "smell_breakdown": {
                "Long Method": [{"file": "a.py", "lines": [1, 2]}],
                "Large Class": [{"file": "b.py", "lines": [9]}]
            }
        }))
        .unwrap();

        assert_eq!(raw.reported_total, Some(3));
        let names: Vec<&str> = raw.breakdown.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Long Method", "Large Class"]);
        assert!(raw.diagnostics.is_empty());
    }

    #[test]
    fn bare_integer_decodes_as_count() {
        let raw = RawReport::decode(&json!({
            "total_smells": 5,
            "smell_breakdown": {"Long Method": 5}
        }))
        .unwrap();

        assert_eq!(raw.entry("Long Method").unwrap().value, CategoryValue::Count(5));
        assert!(raw.entry("Long Method").unwrap().value.occurrences().is_empty());
    }

    #[test]
    fn null_report_is_invalid() {
        let err = RawReport::decode(&Value::Null).unwrap_err();
        assert_eq!(err.reason(), "report is absent");
    }

    #[test]
    fn missing_breakdown_is_invalid() {
        let err = RawReport::decode(&json!({"total_smells": 1})).unwrap_err();
        assert_eq!(err.reason(), "missing smell_breakdown map");
    }

    #[test]
    fn non_numeric_total_is_invalid() {
        for total in [json!("3"), json!(null), json!([3])] {
            let err = RawReport::decode(&json!({
                "total_smells": total,
                "smell_breakdown": {}
            }))
            .unwrap_err();
            assert_eq!(err.reason(), "total_smells is not numeric");
        }

        let err = RawReport::decode(&json!({"smell_breakdown": {}})).unwrap_err();
        assert_eq!(err.reason(), "total_smells is not numeric");
    }

    #[test]
    fn negative_total_is_recorded_and_dropped() {
        let raw = RawReport::decode(&json!({
            "total_smells": -4,
            "smell_breakdown": {}
        }))
        .unwrap();

        assert_eq!(raw.reported_total, None);
        assert_eq!(
            raw.diagnostics,
            vec![Diagnostic::InvalidTotal { value: "-4".into() }]
        );
    }

    #[test]
    fn integral_float_total_is_accepted() {
        let raw = RawReport::decode(&json!({
            "total_smells": 12.0,
            "smell_breakdown": {}
        }))
        .unwrap();
        assert_eq!(raw.reported_total, Some(12));
    }

    #[test]
    fn malformed_occurrences_are_skipped_individually() {
        let raw = RawReport::decode(&json!({
            "total_smells": 1,
            "smell_breakdown": {
                "Long Method": [
                    {"file": "ok.py", "lines": [3]},
                    {"file": "empty.py", "lines": []},
                    {"lines": [1]},
                    {"file": "zero.py", "lines": [0]},
                    "garbage"
                ]
            }
        }))
        .unwrap();

        let entry = raw.entry("Long Method").unwrap();
        assert_eq!(entry.value.occurrences().len(), 1);
        assert_eq!(entry.value.occurrences()[0].file, "ok.py");
        assert_eq!(raw.diagnostics.len(), 4);
        assert!(matches!(
            &raw.diagnostics[0],
            Diagnostic::MalformedEntry { category, reason }
                if category == "Long Method" && reason == "occurrence 1: empty line list"
        ));
    }

    #[test]
    fn unsupported_category_value_is_dropped() {
        let raw = RawReport::decode(&json!({
            "total_smells": 0,
            "smell_breakdown": {"Long Method": "many", "Large Class": -2}
        }))
        .unwrap();

        assert!(raw.breakdown.is_empty());
        assert_eq!(raw.diagnostics.len(), 2);
    }

    #[test]
    fn file_content_and_range_are_carried() {
        let raw = RawReport::decode(&json!({
            "total_smells": 1,
            "smell_breakdown": {
                "Long Lambda Function": [{
                    "file": "f.py",
                    "lines": [2],
                    "file_content": ["a = 1\n", "f = lambda x: x\n"],
                    "full_code": [],
                    "range": {"start": 2, "end": 4}
                }]
            }
        }))
        .unwrap();

        let occurrence = &raw.entry("Long Lambda Function").unwrap().value.occurrences()[0];
        assert_eq!(occurrence.file_content.as_ref().unwrap().len(), 2);
        assert_eq!(occurrence.full_code, None);
        assert_eq!(
            occurrence.range,
            Some(LineRange {
                start: Some(2),
                end: Some(4)
            })
        );
    }

    #[test]
    fn full_code_is_carried_when_present() {
        let raw = RawReport::decode(&json!({
            "total_smells": 1,
            "smell_breakdown": {
                "Long Method": [{
                    "file": "f.py",
                    "lines": [1],
                    "full_code": ["def f():\n", "    pass\n"]
                }]
            }
        }))
        .unwrap();

        let occurrence = &raw.entry("Long Method").unwrap().value.occurrences()[0];
        assert_eq!(
            occurrence.full_code.as_deref(),
            Some(&["def f():\n".to_string(), "    pass\n".to_string()][..])
        );
    }

    #[test]
    fn non_string_full_code_skips_the_occurrence() {
        let raw = RawReport::decode(&json!({
            "total_smells": 1,
            "smell_breakdown": {
                "Long Method": [{"file": "f.py", "lines": [1], "full_code": [1, 2]}]
            }
        }))
        .unwrap();

        assert!(raw.entry("Long Method").unwrap().value.occurrences().is_empty());
        assert!(matches!(
            &raw.diagnostics[0],
            Diagnostic::MalformedEntry { reason, .. }
                if reason == "occurrence 0: full code is not a list of strings"
        ));
    }

    #[test]
    fn null_range_bounds_collapse_to_none() {
        let raw = RawReport::decode(&json!({
            "total_smells": 1,
            "smell_breakdown": {
                "Long Method": [{
                    "file": "f.py",
                    "lines": [2],
                    "range": {"start": null, "end": null}
                }]
            }
        }))
        .unwrap();

        assert_eq!(raw.entry("Long Method").unwrap().value.occurrences()[0].range, None);
    }

    #[test]
    fn count_policy_selects_lines_or_records() {
        let value = CategoryValue::Occurrences(vec![
            Occurrence {
                file: "a.py".into(),
                lines: vec![4, 7, 7, 9],
                file_content: None,
                range: None,
                full_code: None,
            },
            Occurrence {
                file: "b.py".into(),
                lines: vec![1],
                file_content: None,
                range: None,
                full_code: None,
            },
        ]);

        assert_eq!(value.count(CountPolicy::Lines), 5);
        assert_eq!(value.count(CountPolicy::Occurrences), 2);
        assert_eq!(CategoryValue::Count(7).count(CountPolicy::Occurrences), 7);
    }
}
