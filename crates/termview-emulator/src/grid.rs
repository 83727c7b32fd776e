//! Terminal screen buffer and cursor tracking.

use termview_core::{Cell, CellAttributes, Color, Dimensions, Position};

/// Cursor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Current position
    pub position: Position,
    /// Visibility
    pub visible: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            position: Position::origin(),
            visible: true,
        }
    }
}

/// Terminal screen buffer: a rows x cols matrix of cells plus cursor and
/// the attribute state applied to newly printed characters.
#[derive(Debug)]
pub struct Grid {
    /// Cell storage (row-major order)
    cells: Vec<Cell>,
    /// Grid dimensions
    dimensions: Dimensions,
    /// Cursor state
    cursor: Cursor,
    /// Saved cursor (CSI s / CSI u)
    saved_cursor: Option<Cursor>,
    /// Current cell attributes for new characters
    current_attrs: CellAttributes,
    /// Current foreground color
    current_fg: Color,
    /// Current background color
    current_bg: Color,
}

impl Grid {
    /// Create a new grid with all cells blank.
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            cells: vec![Cell::default(); dimensions.cell_count()],
            dimensions,
            cursor: Cursor::default(),
            saved_cursor: None,
            current_attrs: CellAttributes::default(),
            current_fg: Color::Default,
            current_bg: Color::Default,
        }
    }

    /// Cell at position, or `None` out of bounds.
    pub fn cell(&self, row: u16, col: u16) -> Option<&Cell> {
        if row < self.dimensions.rows && col < self.dimensions.cols {
            let idx = row as usize * self.dimensions.cols as usize + col as usize;
            self.cells.get(idx)
        } else {
            None
        }
    }

    /// Mutable cell at position, or `None` out of bounds.
    pub fn cell_mut(&mut self, row: u16, col: u16) -> Option<&mut Cell> {
        if row < self.dimensions.rows && col < self.dimensions.cols {
            let idx = row as usize * self.dimensions.cols as usize + col as usize;
            self.cells.get_mut(idx)
        } else {
            None
        }
    }

    /// Entire row as a slice, or `None` out of bounds.
    pub fn row(&self, row: u16) -> Option<&[Cell]> {
        if row < self.dimensions.rows {
            let start = row as usize * self.dimensions.cols as usize;
            let end = start + self.dimensions.cols as usize;
            Some(&self.cells[start..end])
        } else {
            None
        }
    }

    /// Grid dimensions.
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Cursor reference.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Mutable cursor reference.
    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    /// Current cell attributes.
    pub fn current_attrs(&self) -> &CellAttributes {
        &self.current_attrs
    }

    /// Set current cell attributes.
    pub fn set_current_attrs(&mut self, attrs: CellAttributes) {
        self.current_attrs = attrs;
    }

    /// Current foreground color.
    pub fn current_fg(&self) -> Color {
        self.current_fg
    }

    /// Set current foreground color.
    pub fn set_current_fg(&mut self, color: Color) {
        self.current_fg = color;
    }

    /// Current background color.
    pub fn current_bg(&self) -> Color {
        self.current_bg
    }

    /// Set current background color.
    pub fn set_current_bg(&mut self, color: Color) {
        self.current_bg = color;
    }

    /// Save current cursor state.
    pub fn save_cursor(&mut self) {
        self.saved_cursor = Some(self.cursor);
    }

    /// Restore saved cursor state.
    pub fn restore_cursor(&mut self) {
        if let Some(saved) = self.saved_cursor.take() {
            self.cursor = saved;
        }
    }

    /// Scroll content up by `n` rows; vacated bottom rows become blank.
    ///
    /// There is no scrollback; scrolled-off rows are discarded.
    pub fn scroll_up(&mut self, n: u16) {
        let rows = self.dimensions.rows as usize;
        let cols = self.dimensions.cols as usize;
        let n = (n as usize).min(rows);
        if n == 0 || cols == 0 {
            return;
        }

        self.cells.rotate_left(n * cols);
        let blank_from = (rows - n) * cols;
        for cell in &mut self.cells[blank_from..] {
            *cell = Cell::default();
        }
    }

    /// Resize the live buffer, preserving the top-left content.
    ///
    /// Cursor is clamped to the new bounds. Note that this changes the
    /// working size only; the session's snapshot window is independent.
    pub fn resize(&mut self, new_dimensions: Dimensions) {
        let mut new_cells = vec![Cell::default(); new_dimensions.cell_count()];

        let copy_rows = self.dimensions.rows.min(new_dimensions.rows);
        let copy_cols = self.dimensions.cols.min(new_dimensions.cols);

        for row in 0..copy_rows {
            for col in 0..copy_cols {
                let old_idx = row as usize * self.dimensions.cols as usize + col as usize;
                let new_idx = row as usize * new_dimensions.cols as usize + col as usize;
                new_cells[new_idx] = self.cells[old_idx].clone();
            }
        }

        self.cells = new_cells;
        self.dimensions = new_dimensions;

        if new_dimensions.rows > 0 {
            self.cursor.position.row = self.cursor.position.row.min(new_dimensions.rows - 1);
        }
        if new_dimensions.cols > 0 {
            self.cursor.position.col = self.cursor.position.col.min(new_dimensions.cols - 1);
        }
    }

    /// Clear the entire grid.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_new() {
        let grid = Grid::new(Dimensions::new(24, 80));
        assert_eq!(grid.dimensions().rows, 24);
        assert_eq!(grid.dimensions().cols, 80);
        assert_eq!(grid.cursor().position, Position::origin());
        assert!(grid.cursor().visible);
    }

    #[test]
    fn test_grid_cell_access() {
        let mut grid = Grid::new(Dimensions::new(10, 10));

        assert_eq!(grid.cell(0, 0).unwrap().character, ' ');

        if let Some(cell) = grid.cell_mut(5, 5) {
            cell.character = 'X';
        }
        assert_eq!(grid.cell(5, 5).unwrap().character, 'X');

        assert!(grid.cell(10, 10).is_none());
        assert!(grid.cell_mut(10, 10).is_none());
    }

    #[test]
    fn test_grid_row_access() {
        let mut grid = Grid::new(Dimensions::new(5, 10));

        for col in 0..10 {
            if let Some(cell) = grid.cell_mut(2, col) {
                cell.character = (b'0' + col as u8) as char;
            }
        }

        let row = grid.row(2).unwrap();
        assert_eq!(row.len(), 10);
        assert_eq!(row[0].character, '0');
        assert_eq!(row[9].character, '9');

        assert!(grid.row(5).is_none());
    }

    #[test]
    fn test_grid_scroll_up() {
        let mut grid = Grid::new(Dimensions::new(3, 4));
        for row in 0..3 {
            for col in 0..4 {
                grid.cell_mut(row, col).unwrap().character = (b'a' + row as u8) as char;
            }
        }

        grid.scroll_up(1);

        assert_eq!(grid.cell(0, 0).unwrap().character, 'b');
        assert_eq!(grid.cell(1, 0).unwrap().character, 'c');
        assert_eq!(grid.cell(2, 0).unwrap().character, ' ');
    }

    #[test]
    fn test_grid_scroll_up_past_height_clears() {
        let mut grid = Grid::new(Dimensions::new(2, 2));
        grid.cell_mut(0, 0).unwrap().character = 'X';

        grid.scroll_up(5);

        assert_eq!(grid.cell(0, 0).unwrap().character, ' ');
        assert_eq!(grid.cell(1, 1).unwrap().character, ' ');
    }

    #[test]
    fn test_grid_resize_preserve() {
        let mut grid = Grid::new(Dimensions::new(5, 5));
        for row in 0..5 {
            for col in 0..5 {
                grid.cell_mut(row, col).unwrap().character = 'A';
            }
        }

        grid.resize(Dimensions::new(10, 10));
        assert_eq!(grid.dimensions().rows, 10);
        assert_eq!(grid.cell(4, 4).unwrap().character, 'A');
        assert_eq!(grid.cell(9, 9).unwrap().character, ' ');
    }

    #[test]
    fn test_grid_resize_shrink() {
        let mut grid = Grid::new(Dimensions::new(10, 10));
        grid.cell_mut(2, 2).unwrap().character = 'M';

        grid.resize(Dimensions::new(5, 5));
        assert_eq!(grid.dimensions().rows, 5);
        assert_eq!(grid.cell(2, 2).unwrap().character, 'M');
    }

    #[test]
    fn test_cursor_save_restore() {
        let mut grid = Grid::new(Dimensions::new(24, 80));

        grid.cursor_mut().position = Position::new(10, 20);
        grid.save_cursor();

        grid.cursor_mut().position = Position::new(5, 5);
        grid.restore_cursor();
        assert_eq!(grid.cursor().position, Position::new(10, 20));
    }

    #[test]
    fn test_grid_clear() {
        let mut grid = Grid::new(Dimensions::new(5, 5));
        for row in 0..5 {
            for col in 0..5 {
                grid.cell_mut(row, col).unwrap().character = 'X';
            }
        }

        grid.clear();

        for row in 0..5 {
            for col in 0..5 {
                assert_eq!(grid.cell(row, col).unwrap().character, ' ');
            }
        }
    }
}
