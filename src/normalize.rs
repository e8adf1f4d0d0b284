//! Table normalization.
//!
//! Converts provisional backend output into canonical [`Table`] values:
//! jagged grids are repaired by padding, never by truncation, so no cell is
//! silently dropped. Backend order is assumed to reflect top-to-bottom
//! reading order and is passed through unsorted.

use crate::types::{RawExtractionResult, Table};

/// Normalize one page's provisional extraction result.
///
/// - Rectangularization: every row is padded with empty-string cells to the
///   longest row's length.
/// - Index assignment: tables are numbered `0..n-1` in backend order.
/// - Confidence: absent stays absent; present values are clamped into [0,1].
///
/// A page with zero detected tables normalizes to an empty sequence.
pub fn normalize(raw: RawExtractionResult) -> Vec<Table> {
    raw.tables
        .into_iter()
        .enumerate()
        .map(|(index, table)| Table {
            index,
            rows: rectangularize(table.rows),
            confidence: table.confidence.map(|c| c.clamp(0.0, 1.0)),
            method: raw.method,
            page: raw.page,
        })
        .collect()
}

/// Pad short rows with empty strings up to the maximum row length.
fn rectangularize(mut rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, String::new());
    }
    rows
}
