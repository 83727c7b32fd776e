//! MCP Tool Types
//!
//! Parameter and response types for every tool the server exposes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use termview_core::SessionSummary;
use termview_render::RenderConfig;

// =============================================================================
// Session Management Tools
// =============================================================================

/// Parameters for terminal_spawn
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SpawnParams {
    /// Shell or program to run (defaults to the platform shell)
    #[serde(default)]
    pub shell: Option<String>,

    /// Program arguments
    #[serde(default)]
    pub args: Vec<String>,

    /// Working directory (inherited if absent)
    #[serde(default)]
    pub cwd: Option<String>,

    /// Extra environment variables, merged over the inherited environment
    #[serde(default)]
    pub env: std::collections::HashMap<String, String>,

    /// Terminal width in character cells
    #[serde(default)]
    pub cols: Option<u16>,

    /// Terminal height in character cells
    #[serde(default)]
    pub rows: Option<u16>,
}

/// Response for terminal_spawn
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SpawnResponse {
    /// Unique session identifier
    pub session_id: String,

    /// Terminal width in character cells
    pub cols: u16,

    /// Terminal height in character cells
    pub rows: u16,

    /// Success message
    pub message: String,
}

/// Parameters for terminal_session_list
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SessionListParams {}

/// Response for terminal_session_list
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SessionListResponse {
    /// Summaries of all registered sessions
    pub sessions: Vec<SessionSummary>,

    /// Number of registered sessions
    pub count: usize,
}

/// Parameters for terminal_kill
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KillParams {
    /// Session to kill
    pub session_id: String,
}

/// Response for terminal_kill
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KillResponse {
    /// Killed session identifier
    pub session_id: String,

    /// Success message
    pub message: String,
}

// =============================================================================
// Input Tools
// =============================================================================

/// Parameters for terminal_write
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WriteParams {
    /// Target session
    pub session_id: String,

    /// Input text; literal `\r`, `\n`, `\t`, `\e`, and `\xHH` escapes
    /// are translated to control bytes
    pub input: String,
}

/// Response for terminal_write
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WriteResponse {
    /// Target session
    pub session_id: String,

    /// Number of bytes written to the PTY after unescaping
    pub bytes_written: usize,
}

/// Parameters for terminal_resize
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResizeParams {
    /// Target session
    pub session_id: String,

    /// New width in character cells
    pub cols: u16,

    /// New height in character cells
    pub rows: u16,
}

/// Response for terminal_resize
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResizeResponse {
    /// Target session
    pub session_id: String,

    /// Applied width
    pub cols: u16,

    /// Applied height
    pub rows: u16,
}

// =============================================================================
// Snapshot Tools
// =============================================================================

/// Parameters for terminal_text
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TextParams {
    /// Target session
    pub session_id: String,
}

/// Response for terminal_text
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TextResponse {
    /// Target session
    pub session_id: String,

    /// Screen content, one line per row with trailing blanks trimmed
    pub text: String,
}

/// Parameters for terminal_screenshot
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScreenshotParams {
    /// Target session
    pub session_id: String,

    /// Rendering parameters (defaults used when absent)
    #[serde(default)]
    pub render: Option<RenderConfig>,
}

/// Metadata accompanying a terminal_screenshot image payload
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScreenshotResponse {
    /// Target session
    pub session_id: String,

    /// Image format; always "png"
    pub format: String,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,
}

/// Parameters for terminal_wait_exit
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WaitExitParams {
    /// Target session
    pub session_id: String,
}

/// Response for terminal_wait_exit
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WaitExitResponse {
    /// Target session
    pub session_id: String,

    /// Process exit code
    pub exit_code: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_params_minimal() {
        let params: SpawnParams = serde_json::from_str("{}").unwrap();
        assert!(params.shell.is_none());
        assert!(params.args.is_empty());
        assert!(params.cols.is_none());
    }

    #[test]
    fn test_screenshot_params_with_render_overrides() {
        let params: ScreenshotParams = serde_json::from_str(
            r#"{"session_id": "sess-1", "render": {"cell_width": 12.0}}"#,
        )
        .unwrap();
        let render = params.render.unwrap();
        assert_eq!(render.cell_width, 12.0);
        assert_eq!(render.cell_height, 18.0);
    }

    #[test]
    fn test_write_params_roundtrip() {
        let params = WriteParams {
            session_id: "sess-3".to_string(),
            input: "ls\\r".to_string(),
        };
        let json = serde_json::to_string(&params).unwrap();
        let back: WriteParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back.session_id, "sess-3");
        assert_eq!(back.input, "ls\\r");
    }
}
