//! Cell and color types for the terminal grid.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::palette::{self, Channel, Rgb};

/// Raw terminal color as reported by the escape-sequence interpreter.
///
/// The named ANSI variants correspond to palette indices 0-15; `Indexed`
/// covers the full 256-color table and `Rgb` carries 24-bit truecolor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// Default terminal color (resolves per channel)
    Default,

    /// ANSI Black (palette 0)
    Black,
    /// ANSI Red
    Red,
    /// ANSI Green
    Green,
    /// ANSI Yellow
    Yellow,
    /// ANSI Blue
    Blue,
    /// ANSI Magenta
    Magenta,
    /// ANSI Cyan
    Cyan,
    /// ANSI White
    White,

    /// Bright ANSI Black (palette 8)
    BrightBlack,
    /// Bright Red
    BrightRed,
    /// Bright Green
    BrightGreen,
    /// Bright Yellow
    BrightYellow,
    /// Bright Blue
    BrightBlue,
    /// Bright Magenta
    BrightMagenta,
    /// Bright Cyan
    BrightCyan,
    /// Bright White
    BrightWhite,

    /// 256-color palette index (0-255)
    Indexed(u8),

    /// True color RGB (24-bit)
    Rgb {
        /// Red component
        r: u8,
        /// Green component
        g: u8,
        /// Blue component
        b: u8,
    },
}

impl Color {
    /// Resolve this raw color to a concrete display color for a channel.
    pub fn resolve(&self, channel: Channel) -> Rgb {
        palette::resolve(*self, channel)
    }
}

/// Text attributes for a terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellAttributes {
    /// Bold/bright text
    pub bold: bool,
    /// Dimmed text
    pub dim: bool,
    /// Italic text
    pub italic: bool,
    /// Underlined text
    pub underline: bool,
    /// Blinking text
    pub blink: bool,
    /// Reverse video (swap fg/bg at render time)
    pub reverse: bool,
    /// Hidden text
    pub hidden: bool,
    /// Strikethrough text
    pub strikethrough: bool,
}

impl CellAttributes {
    /// Check if attributes are all default (no formatting).
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Create attributes with bold enabled.
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Create attributes with reverse video enabled.
    pub fn with_reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Create attributes with underline enabled.
    pub fn with_underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Create attributes with italic enabled.
    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

/// Single character cell in the live terminal grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Unicode character (space if empty)
    pub character: char,
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Text attributes
    pub attrs: CellAttributes,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            character: ' ',
            fg: Color::Default,
            bg: Color::Default,
            attrs: CellAttributes::default(),
        }
    }
}

impl Cell {
    /// Create a new cell with a character and default styling.
    pub fn new(character: char) -> Self {
        Self {
            character,
            ..Default::default()
        }
    }

    /// Check if cell is empty (space with default attributes).
    pub fn is_empty(&self) -> bool {
        self.character == ' ' && self.attrs.is_default()
    }
}

/// Fully-resolved, immutable snapshot of one cell.
///
/// Produced fresh on every snapshot request; colors are already resolved
/// to concrete values, but the inverse swap is deliberately NOT applied
/// here - renderers apply it exactly once when compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CellRecord {
    /// Character at this position (space for blank)
    pub ch: char,
    /// Resolved foreground color
    pub fg: Rgb,
    /// Resolved background color
    pub bg: Rgb,
    /// Bold flag
    pub bold: bool,
    /// Italic flag
    pub italic: bool,
    /// Dim flag
    pub dim: bool,
    /// Underline flag
    pub underline: bool,
    /// Strikethrough flag
    pub strikethrough: bool,
    /// Inverse flag (fg/bg swap, applied by the renderer)
    pub inverse: bool,
}

impl Default for CellRecord {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: palette::DEFAULT_FG,
            bg: palette::DEFAULT_BG,
            bold: false,
            italic: false,
            dim: false,
            underline: false,
            strikethrough: false,
            inverse: false,
        }
    }
}

impl CellRecord {
    /// Build a snapshot record from a live cell, resolving both channels.
    pub fn from_cell(cell: &Cell) -> Self {
        Self {
            ch: cell.character,
            fg: cell.fg.resolve(Channel::Foreground),
            bg: cell.bg.resolve(Channel::Background),
            bold: cell.attrs.bold,
            italic: cell.attrs.italic,
            dim: cell.attrs.dim,
            underline: cell.attrs.underline,
            strikethrough: cell.attrs.strikethrough,
            inverse: cell.attrs.reverse,
        }
    }

    /// Effective (fg, bg) pair with the inverse swap applied.
    pub fn effective_colors(&self) -> (Rgb, Rgb) {
        if self.inverse {
            (self.bg, self.fg)
        } else {
            (self.fg, self.bg)
        }
    }
}
