//! Color resolution: raw terminal colors to concrete 24-bit values.
//!
//! Resolution rules, in order:
//!
//! 1. `Default` resolves per channel: a light-gray foreground and a dark
//!    background. The two constants differ so default-on-default text
//!    stays legible.
//! 2. Palette indices resolve through a fixed 256-entry table: 0-15 are
//!    the standard ANSI set, 16-231 a 6x6x6 color cube, 232-255 a
//!    24-step grayscale ramp.
//! 3. `Rgb` values pass through unchanged.
//!
//! Inverse video is NOT handled here. It is a per-cell compositing rule
//! applied exactly once by whichever component consumes resolved colors.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::cell::Color;

/// Concrete 24-bit display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Rgb {
    /// Red component
    pub r: u8,
    /// Green component
    pub g: u8,
    /// Blue component
    pub b: u8,
}

impl Rgb {
    /// Create a new color from components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// True if all three channels are equal.
    pub fn is_gray(&self) -> bool {
        self.r == self.g && self.g == self.b
    }
}

/// Which channel a color is being resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Text color
    Foreground,
    /// Cell fill color
    Background,
}

/// Default foreground: light gray.
pub const DEFAULT_FG: Rgb = Rgb::new(0xd0, 0xd0, 0xd0);

/// Default background: near-black. Must differ from [`DEFAULT_FG`].
pub const DEFAULT_BG: Rgb = Rgb::new(0x1e, 0x1e, 0x1e);

/// Standard ANSI 16-color table (xterm values). Not configurable.
const ANSI_16: [Rgb; 16] = [
    Rgb::new(0x00, 0x00, 0x00), // black
    Rgb::new(0xcd, 0x00, 0x00), // red
    Rgb::new(0x00, 0xcd, 0x00), // green
    Rgb::new(0xcd, 0xcd, 0x00), // yellow
    Rgb::new(0x00, 0x00, 0xee), // blue
    Rgb::new(0xcd, 0x00, 0xcd), // magenta
    Rgb::new(0x00, 0xcd, 0xcd), // cyan
    Rgb::new(0xe5, 0xe5, 0xe5), // white
    Rgb::new(0x7f, 0x7f, 0x7f), // bright black
    Rgb::new(0xff, 0x00, 0x00), // bright red
    Rgb::new(0x00, 0xff, 0x00), // bright green
    Rgb::new(0xff, 0xff, 0x00), // bright yellow
    Rgb::new(0x5c, 0x5c, 0xff), // bright blue
    Rgb::new(0xff, 0x00, 0xff), // bright magenta
    Rgb::new(0x00, 0xff, 0xff), // bright cyan
    Rgb::new(0xff, 0xff, 0xff), // bright white
];

/// Level stops for the 6x6x6 color cube (indices 16-231).
const CUBE_STOPS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// Resolve a palette index (0-255) to its fixed table entry.
///
/// Index 16 + 36r + 6g + b addresses the color cube; 232-255 are the
/// grayscale ramp starting at intensity 8 in steps of 10. The `u8` index
/// makes out-of-range values unrepresentable.
pub fn palette_entry(index: u8) -> Rgb {
    match index {
        0..=15 => ANSI_16[index as usize],
        16..=231 => {
            let i = index - 16;
            let r = CUBE_STOPS[(i / 36) as usize];
            let g = CUBE_STOPS[((i / 6) % 6) as usize];
            let b = CUBE_STOPS[(i % 6) as usize];
            Rgb::new(r, g, b)
        }
        232..=255 => {
            let level = 8 + 10 * (index - 232);
            Rgb::new(level, level, level)
        }
    }
}

/// Resolve a raw color to a concrete display color for one channel.
pub fn resolve(color: Color, channel: Channel) -> Rgb {
    match color {
        Color::Default => match channel {
            Channel::Foreground => DEFAULT_FG,
            Channel::Background => DEFAULT_BG,
        },
        Color::Black => ANSI_16[0],
        Color::Red => ANSI_16[1],
        Color::Green => ANSI_16[2],
        Color::Yellow => ANSI_16[3],
        Color::Blue => ANSI_16[4],
        Color::Magenta => ANSI_16[5],
        Color::Cyan => ANSI_16[6],
        Color::White => ANSI_16[7],
        Color::BrightBlack => ANSI_16[8],
        Color::BrightRed => ANSI_16[9],
        Color::BrightGreen => ANSI_16[10],
        Color::BrightYellow => ANSI_16[11],
        Color::BrightBlue => ANSI_16[12],
        Color::BrightMagenta => ANSI_16[13],
        Color::BrightCyan => ANSI_16[14],
        Color::BrightWhite => ANSI_16[15],
        Color::Indexed(i) => palette_entry(i),
        Color::Rgb { r, g, b } => Rgb::new(r, g, b),
    }
}

/// Darken a color by roughly 50% per channel, for dim cells.
pub fn dim_rgb(color: Rgb) -> Rgb {
    Rgb::new(color.r / 2, color.g / 2, color.b / 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults_differ() {
        assert_ne!(DEFAULT_FG, DEFAULT_BG);
    }

    #[test]
    fn test_default_resolution_per_channel() {
        assert_eq!(resolve(Color::Default, Channel::Foreground), DEFAULT_FG);
        assert_eq!(resolve(Color::Default, Channel::Background), DEFAULT_BG);
    }

    #[test]
    fn test_named_ansi_matches_indexed() {
        assert_eq!(
            resolve(Color::Red, Channel::Foreground),
            palette_entry(1)
        );
        assert_eq!(
            resolve(Color::BrightWhite, Channel::Background),
            palette_entry(15)
        );
    }

    #[test]
    fn test_cube_index_196_is_pure_red() {
        // 196 = 16 + 36*5 + 6*0 + 0
        assert_eq!(palette_entry(196), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_cube_corners() {
        assert_eq!(palette_entry(16), Rgb::new(0, 0, 0));
        assert_eq!(palette_entry(231), Rgb::new(255, 255, 255));
        // 16 + 36*1 + 6*2 + 3 = 67
        assert_eq!(palette_entry(67), Rgb::new(95, 135, 175));
    }

    #[test]
    fn test_grayscale_ramp() {
        assert_eq!(palette_entry(232), Rgb::new(8, 8, 8));
        assert_eq!(palette_entry(233), Rgb::new(18, 18, 18));
        assert_eq!(palette_entry(255), Rgb::new(238, 238, 238));
    }

    #[test]
    fn test_rgb_passthrough() {
        assert_eq!(
            resolve(Color::Rgb { r: 1, g: 2, b: 3 }, Channel::Background),
            Rgb::new(1, 2, 3)
        );
    }

    #[test]
    fn test_dim_rgb_halves_channels() {
        assert_eq!(dim_rgb(Rgb::new(200, 100, 51)), Rgb::new(100, 50, 25));
        assert_eq!(dim_rgb(Rgb::new(0, 0, 0)), Rgb::new(0, 0, 0));
    }

    proptest! {
        #[test]
        fn prop_grayscale_indices_are_gray(index in 232u8..=255) {
            prop_assert!(palette_entry(index).is_gray());
        }

        #[test]
        fn prop_resolution_is_deterministic(index: u8) {
            let a = resolve(Color::Indexed(index), Channel::Foreground);
            let b = resolve(Color::Indexed(index), Channel::Background);
            // Indexed colors ignore the channel; only Default is per-channel.
            prop_assert_eq!(a, b);
            prop_assert_eq!(a, palette_entry(index));
        }

        #[test]
        fn prop_cube_uses_level_stops(index in 16u8..=231) {
            let rgb = palette_entry(index);
            for level in [rgb.r, rgb.g, rgb.b] {
                prop_assert!(CUBE_STOPS.contains(&level));
            }
        }
    }
}
