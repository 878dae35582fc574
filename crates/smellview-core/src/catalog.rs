//! Fixed smell category table and counting policy.
//!
//! The table order is the legend and table order of every rendered report.
//! Supporting a new smell type is a single row added to `SMELL_CATEGORIES`.

use serde::{Deserialize, Serialize};

/// A known smell category and the color token it is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SmellCategory {
    pub name: &'static str,
    pub color: &'static str,
}

impl SmellCategory {
    pub const fn new(name: &'static str, color: &'static str) -> Self {
        Self { name, color }
    }
}

pub const SMELL_CATEGORIES: &[SmellCategory] = &[
    SmellCategory::new("Large Class", "#ff6384"),
    SmellCategory::new("Long Parameter List", "#36a2eb"),
    SmellCategory::new("Long Method", "#cc65fe"),
    SmellCategory::new("Long Message Chain", "#ffce56"),
    SmellCategory::new("Long Base Class List", "#660f56"),
    SmellCategory::new("Long Lambda Function", "#35cbac"),
    SmellCategory::new("Long Element Chain", "#34495e"),
    SmellCategory::new("Long Ternary Conditional Expression", "#ab4646"),
];

/// Look up a category by its exact reported name.
pub fn lookup(name: &str) -> Option<&'static SmellCategory> {
    SMELL_CATEGORIES.iter().find(|c| c.name == name)
}

pub fn is_known(name: &str) -> bool {
    lookup(name).is_some()
}

/// How an occurrence list contributes to its category count.
///
/// A category reported as a bare integer counts as that integer under
/// every policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountPolicy {
    /// Sum of `lines.len()` over all occurrences. Duplicate lines count.
    #[default]
    Lines,
    /// Number of occurrence records.
    Occurrences,
}

impl std::fmt::Display for CountPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lines => f.write_str("lines"),
            Self::Occurrences => f.write_str("occurrences"),
        }
    }
}
