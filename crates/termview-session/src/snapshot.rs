//! Snapshot extraction from the live grid.
//!
//! Snapshots are always taken through the session's fixed window (its
//! construction-time dimensions), regardless of the live grid's current
//! size. Cells outside the live grid come back blank, so a snapshot of a
//! shrunken grid is still exactly `rows x cols`.

use termview_core::{CellRecord, Dimensions};
use termview_emulator::Grid;

/// Extract a deep-copied cell matrix through the given window.
///
/// The result is `window.rows` rows of `window.cols` records each and
/// shares no state with the live grid.
pub fn extract(grid: &Grid, window: Dimensions) -> Vec<Vec<CellRecord>> {
    let mut rows = Vec::with_capacity(window.rows as usize);
    for row in 0..window.rows {
        let mut records = Vec::with_capacity(window.cols as usize);
        for col in 0..window.cols {
            let record = grid
                .cell(row, col)
                .map(CellRecord::from_cell)
                .unwrap_or_default();
            records.push(record);
        }
        rows.push(records);
    }
    rows
}

/// Render a cell matrix as plain text.
///
/// Trailing blanks are trimmed from each row, and there is exactly one
/// line per window row, so the shape of the screen is preserved even
/// when rows are empty.
pub fn to_text(records: &[Vec<CellRecord>]) -> String {
    records
        .iter()
        .map(|row| {
            let line: String = row.iter().map(|r| r.ch).collect();
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
