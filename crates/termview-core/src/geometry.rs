//! Geometry types for terminal coordinates.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Position in the terminal grid (row, column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    /// Row index (0-based)
    pub row: u16,
    /// Column index (0-based)
    pub col: u16,
}

impl Position {
    /// Create a new position.
    pub fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }

    /// Origin position (0, 0).
    pub fn origin() -> Self {
        Self { row: 0, col: 0 }
    }
}

/// Dimensions of a terminal in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Dimensions {
    /// Number of rows
    pub rows: u16,
    /// Number of columns
    pub cols: u16,
}

impl Dimensions {
    /// Create new dimensions.
    pub fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }

    /// Total cell count (rows * cols).
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// An explicitly empty grid (0 rows or 0 cols) is permitted; it renders
    /// as a minimal image and an empty text snapshot.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(24, 80)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::new(5, 10);
        assert_eq!(pos.row, 5);
        assert_eq!(pos.col, 10);
    }

    #[test]
    fn test_dimensions_default() {
        let dims = Dimensions::default();
        assert_eq!(dims.rows, 24);
        assert_eq!(dims.cols, 80);
    }

    #[test]
    fn test_dimensions_cell_count() {
        assert_eq!(Dimensions::new(24, 80).cell_count(), 1920);
        assert_eq!(Dimensions::new(0, 80).cell_count(), 0);
    }

    #[test]
    fn test_dimensions_is_empty() {
        assert!(Dimensions::new(0, 80).is_empty());
        assert!(Dimensions::new(24, 0).is_empty());
        assert!(!Dimensions::new(1, 1).is_empty());
    }
}
