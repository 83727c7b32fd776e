//! ANSI/VT escape sequence interpreter built on the VTE state machine.

use vte::{Params, ParamsIter, Perform};

use termview_core::{Cell, CellAttributes, Color, Position};

use crate::grid::Grid;

/// Applies a byte stream of terminal output to a [`Grid`].
///
/// The VTE parser is kept across calls, so escape sequences split over
/// chunk boundaries are handled correctly.
pub struct Interpreter {
    /// Terminal grid state
    grid: Grid,
    /// Set after printing into the last column; the wrap (and any
    /// scroll) happens only when the next character is printed
    wrap_pending: bool,
    /// VTE parser state, persisted between feed calls
    vte: vte::Parser,
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("grid", &self.grid)
            .finish_non_exhaustive()
    }
}

impl Interpreter {
    /// Create a new interpreter driving the given grid.
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            wrap_pending: false,
            vte: vte::Parser::new(),
        }
    }

    /// Get a reference to the grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Get a mutable reference to the grid.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Consume the interpreter and return the grid.
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Feed output bytes through the VTE parser into the grid.
    pub fn feed(&mut self, bytes: &[u8]) {
        let mut vte = std::mem::take(&mut self.vte);
        for byte in bytes {
            vte.advance(self, *byte);
        }
        self.vte = vte;
    }

    /// Move cursor forward by n columns, clamped to the last column.
    fn cursor_forward(&mut self, n: u16) {
        let dims = self.grid.dimensions();
        let cursor = self.grid.cursor_mut();
        cursor.position.col = (cursor.position.col.saturating_add(n)).min(dims.cols.saturating_sub(1));
    }

    /// Move cursor backward by n columns.
    fn cursor_backward(&mut self, n: u16) {
        let cursor = self.grid.cursor_mut();
        cursor.position.col = cursor.position.col.saturating_sub(n);
    }

    /// Move cursor down by n rows, clamped to the last row.
    fn cursor_down(&mut self, n: u16) {
        let dims = self.grid.dimensions();
        let cursor = self.grid.cursor_mut();
        cursor.position.row = (cursor.position.row.saturating_add(n)).min(dims.rows.saturating_sub(1));
    }

    /// Move cursor up by n rows.
    fn cursor_up(&mut self, n: u16) {
        let cursor = self.grid.cursor_mut();
        cursor.position.row = cursor.position.row.saturating_sub(n);
    }

    /// Advance to the next line, scrolling the grid when the cursor is
    /// already on the bottom row.
    fn line_feed(&mut self) {
        let dims = self.grid.dimensions();
        if self.grid.cursor().position.row + 1 >= dims.rows {
            self.grid.scroll_up(1);
        } else {
            self.grid.cursor_mut().position.row += 1;
        }
    }

    /// Update the pending attributes through a closure.
    fn update_attrs(&mut self, f: impl FnOnce(&mut CellAttributes)) {
        let mut attrs = *self.grid.current_attrs();
        f(&mut attrs);
        self.grid.set_current_attrs(attrs);
    }

    /// Parse the tail of an extended color sequence (38/48), consuming
    /// `5;n` or `2;r;g;b` from the parameter iterator.
    fn extended_color(iter: &mut ParamsIter<'_>) -> Option<Color> {
        match iter.next()?[0] {
            5 => {
                let index = iter.next()?[0];
                Some(Color::Indexed(index as u8))
            }
            2 => {
                let r = iter.next()?[0] as u8;
                let g = iter.next()?[0] as u8;
                let b = iter.next()?[0] as u8;
                Some(Color::Rgb { r, g, b })
            }
            _ => None,
        }
    }

    /// Process SGR (Select Graphic Rendition) parameters.
    fn process_sgr(&mut self, params: &Params) {
        let mut iter = params.iter();

        while let Some(param) = iter.next() {
            match param[0] {
                // Reset
                0 => {
                    self.grid.set_current_attrs(CellAttributes::default());
                    self.grid.set_current_fg(Color::Default);
                    self.grid.set_current_bg(Color::Default);
                }

                1 => self.update_attrs(|a| a.bold = true),
                2 => self.update_attrs(|a| a.dim = true),
                3 => self.update_attrs(|a| a.italic = true),
                4 => self.update_attrs(|a| a.underline = true),
                5 => self.update_attrs(|a| a.blink = true),
                7 => self.update_attrs(|a| a.reverse = true),
                8 => self.update_attrs(|a| a.hidden = true),
                9 => self.update_attrs(|a| a.strikethrough = true),

                22 => self.update_attrs(|a| {
                    a.bold = false;
                    a.dim = false;
                }),
                23 => self.update_attrs(|a| a.italic = false),
                24 => self.update_attrs(|a| a.underline = false),
                25 => self.update_attrs(|a| a.blink = false),
                27 => self.update_attrs(|a| a.reverse = false),
                28 => self.update_attrs(|a| a.hidden = false),
                29 => self.update_attrs(|a| a.strikethrough = false),

                // Standard foreground colors (30-37)
                n @ 30..=37 => self.grid.set_current_fg(ansi_color((n - 30) as u8)),

                // Extended foreground (38;5;n / 38;2;r;g;b)
                38 => {
                    if let Some(color) = Self::extended_color(&mut iter) {
                        self.grid.set_current_fg(color);
                    }
                }

                // Default foreground
                39 => self.grid.set_current_fg(Color::Default),

                // Standard background colors (40-47)
                n @ 40..=47 => self.grid.set_current_bg(ansi_color((n - 40) as u8)),

                // Extended background (48;5;n / 48;2;r;g;b)
                48 => {
                    if let Some(color) = Self::extended_color(&mut iter) {
                        self.grid.set_current_bg(color);
                    }
                }

                // Default background
                49 => self.grid.set_current_bg(Color::Default),

                // Bright foreground colors (90-97)
                n @ 90..=97 => self.grid.set_current_fg(ansi_color((n - 90 + 8) as u8)),

                // Bright background colors (100-107)
                n @ 100..=107 => self.grid.set_current_bg(ansi_color((n - 100 + 8) as u8)),

                _ => {} // Ignore unknown SGR codes
            }
        }
    }
}

/// Map an ANSI palette index 0-15 to a named color variant.
fn ansi_color(index: u8) -> Color {
    match index {
        0 => Color::Black,
        1 => Color::Red,
        2 => Color::Green,
        3 => Color::Yellow,
        4 => Color::Blue,
        5 => Color::Magenta,
        6 => Color::Cyan,
        7 => Color::White,
        8 => Color::BrightBlack,
        9 => Color::BrightRed,
        10 => Color::BrightGreen,
        11 => Color::BrightYellow,
        12 => Color::BrightBlue,
        13 => Color::BrightMagenta,
        14 => Color::BrightCyan,
        _ => Color::BrightWhite,
    }
}

impl Perform for Interpreter {
    /// Print a character at the cursor, then advance with line wrap.
    ///
    /// Wrap is deferred: filling the last column leaves the cursor in
    /// place and only the next printed character wraps (scrolling at
    /// the bottom row), so a line exactly as wide as the screen does
    /// not scroll early.
    fn print(&mut self, c: char) {
        let dims = self.grid.dimensions();
        if dims.is_empty() {
            return;
        }

        if self.wrap_pending {
            self.wrap_pending = false;
            self.grid.cursor_mut().position.col = 0;
            self.line_feed();
        }

        let cursor_pos = self.grid.cursor().position;
        let attrs = *self.grid.current_attrs();
        let fg = self.grid.current_fg();
        let bg = self.grid.current_bg();

        if let Some(cell) = self.grid.cell_mut(cursor_pos.row, cursor_pos.col) {
            cell.character = c;
            cell.attrs = attrs;
            cell.fg = fg;
            cell.bg = bg;
        }

        if cursor_pos.col + 1 >= dims.cols {
            self.wrap_pending = true;
        } else {
            self.grid.cursor_mut().position.col += 1;
        }
    }

    /// Execute a control character.
    fn execute(&mut self, byte: u8) {
        // Explicit cursor motion cancels a pending wrap
        self.wrap_pending = false;
        match byte {
            // Backspace (BS)
            0x08 => self.cursor_backward(1),

            // Horizontal Tab (HT): next tab stop every 8 columns
            0x09 => {
                let dims = self.grid.dimensions();
                let cursor = self.grid.cursor_mut();
                let next_tab = ((cursor.position.col / 8) + 1) * 8;
                cursor.position.col = next_tab.min(dims.cols.saturating_sub(1));
            }

            // Line Feed (LF)
            0x0A => self.line_feed(),

            // Carriage Return (CR)
            0x0D => self.grid.cursor_mut().position.col = 0,

            _ => {} // Ignore other control codes
        }
    }

    fn hook(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _c: char) {}

    fn put(&mut self, _byte: u8) {}

    fn unhook(&mut self) {}

    /// OSC (title changes etc.) do not affect the cell grid.
    fn osc_dispatch(&mut self, _params: &[&[u8]], _bell_terminated: bool) {}

    /// CSI (Control Sequence Introducer) dispatch.
    fn csi_dispatch(&mut self, params: &Params, _intermediates: &[u8], _ignore: bool, c: char) {
        // Missing counts default to 1 per ECMA-48
        let first = |params: &Params| params.iter().next().map(|p| p[0]).unwrap_or(1).max(1);

        // Sequences that move the cursor cancel a pending wrap
        if matches!(c, 'A' | 'B' | 'C' | 'D' | 'H' | 'f' | 'u') {
            self.wrap_pending = false;
        }

        match c {
            // Cursor Up (CUU)
            'A' => self.cursor_up(first(params)),

            // Cursor Down (CUD)
            'B' => self.cursor_down(first(params)),

            // Cursor Forward (CUF)
            'C' => self.cursor_forward(first(params)),

            // Cursor Backward (CUB)
            'D' => self.cursor_backward(first(params)),

            // Cursor Position (CUP), 1-indexed parameters
            'H' | 'f' => {
                let mut iter = params.iter();
                let row = iter.next().map(|p| p[0]).unwrap_or(1).saturating_sub(1);
                let col = iter.next().map(|p| p[0]).unwrap_or(1).saturating_sub(1);

                let dims = self.grid.dimensions();
                self.grid.cursor_mut().position = Position::new(
                    row.min(dims.rows.saturating_sub(1)),
                    col.min(dims.cols.saturating_sub(1)),
                );
            }

            // Erase in Display (ED)
            'J' => {
                let mode = params.iter().next().map(|p| p[0]).unwrap_or(0);
                let cursor_pos = self.grid.cursor().position;
                let dims = self.grid.dimensions();

                match mode {
                    // Cursor to end of screen
                    0 => {
                        for col in cursor_pos.col..dims.cols {
                            if let Some(cell) = self.grid.cell_mut(cursor_pos.row, col) {
                                *cell = Cell::default();
                            }
                        }
                        for row in (cursor_pos.row + 1)..dims.rows {
                            for col in 0..dims.cols {
                                if let Some(cell) = self.grid.cell_mut(row, col) {
                                    *cell = Cell::default();
                                }
                            }
                        }
                    }

                    // Start of screen to cursor
                    1 => {
                        for row in 0..cursor_pos.row {
                            for col in 0..dims.cols {
                                if let Some(cell) = self.grid.cell_mut(row, col) {
                                    *cell = Cell::default();
                                }
                            }
                        }
                        for col in 0..=cursor_pos.col {
                            if let Some(cell) = self.grid.cell_mut(cursor_pos.row, col) {
                                *cell = Cell::default();
                            }
                        }
                    }

                    // Entire screen
                    2 | 3 => self.grid.clear(),

                    _ => {}
                }
            }

            // Erase in Line (EL)
            'K' => {
                let mode = params.iter().next().map(|p| p[0]).unwrap_or(0);
                let cursor_pos = self.grid.cursor().position;
                let dims = self.grid.dimensions();

                let (start, end) = match mode {
                    0 => (cursor_pos.col, dims.cols),
                    1 => (0, cursor_pos.col.saturating_add(1).min(dims.cols)),
                    2 => (0, dims.cols),
                    _ => return,
                };
                for col in start..end {
                    if let Some(cell) = self.grid.cell_mut(cursor_pos.row, col) {
                        *cell = Cell::default();
                    }
                }
            }

            // SGR (Select Graphic Rendition)
            'm' => self.process_sgr(params),

            // Save / Restore Cursor Position
            's' => self.grid.save_cursor(),
            'u' => self.grid.restore_cursor(),

            _ => {} // Ignore unknown CSI sequences
        }
    }

    fn esc_dispatch(&mut self, _intermediates: &[u8], _ignore: bool, _byte: u8) {}
}
