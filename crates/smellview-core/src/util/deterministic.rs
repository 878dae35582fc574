//! Deterministic ordering and rounding helpers.
//!
//! Rendered reports must be identical for identical input. Ordering here is
//! semantic: the category table first, then whatever the service sent that the
//! table does not know, in response order.

use crate::catalog::{self, SMELL_CATEGORIES};
use crate::raw::CategoryEntry;

/// Order breakdown entries for flattening.
///
/// Known categories follow the table order. Unknown categories follow in the
/// order they appeared in the response.
pub fn ordered_entries(breakdown: &[CategoryEntry]) -> Vec<&CategoryEntry> {
    let known = SMELL_CATEGORIES
        .iter()
        .filter_map(|category| breakdown.iter().find(|e| e.name == category.name));
    let unknown = breakdown.iter().filter(|e| !catalog::is_known(&e.name));

    known.chain(unknown).collect()
}

/// `count / total` in percent, as whole tenths, halves rounded up.
///
/// Integer arithmetic on the exact ratio, so ties like 23/80 = 28.75% are
/// never lost to float error. `count` above `total` pins at 1000 (100.0%).
/// `total` must be non-zero.
pub fn percent_tenths(count: u64, total: u64) -> u64 {
    let count = u128::from(count.min(total));
    let total = u128::from(total);
    // round(count * 1000 / total), ties away from zero
    ((count * 2000 + total) / (2 * total)) as u64
}
