//! Rendering parameters.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameter bag for screenshot rendering. Purely presentational; has
/// no identity and no effect on session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RenderConfig {
    /// Nominal font size in pixels (glyphs are scaled to the cell box)
    pub font_size: f32,
    /// Font family name, recorded for clients; rendering uses a fixed
    /// bitmap face
    pub font_family: String,
    /// Cell width in pixels
    pub cell_width: f32,
    /// Cell height in pixels
    pub cell_height: f32,
    /// Canvas padding in pixels on every side
    pub padding: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            font_family: "monospace".to_string(),
            cell_width: 9.0,
            cell_height: 18.0,
            padding: 10.0,
        }
    }
}
