//! Termview MCP Server Implementation
//!
//! This module implements the MCP server using rmcp 0.9's #[tool_router]
//! pattern. It routes MCP tool calls to the session registry and the
//! snapshot/render pipeline.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router, ErrorData as McpError,
};

use base64::Engine;
use tracing::{debug, error, info, instrument};

use termview_core::{Dimensions, Error, SessionId, SpawnSpec};
use termview_render::RenderConfig;
use termview_session::{SessionRegistry, TerminalSession};

use crate::input::unescape;
use crate::tools::*;

/// Map a core error onto a JSON-RPC error for tool callers.
///
/// Unknown sessions and missing processes are caller mistakes (invalid
/// params); everything else surfaces as an internal error.
fn mcp_error(e: Error) -> McpError {
    let code = match e {
        Error::SessionNotFound(_) | Error::NotSpawned | Error::InvalidDimensions { .. } => {
            ErrorCode(-32602)
        }
        _ => ErrorCode(-32603),
    };
    McpError::new(code, e.to_string(), None)
}

fn json_response<T: serde::Serialize>(response: &T, fallback: &str) -> CallToolResult {
    CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(response).unwrap_or_else(|_| fallback.to_string()),
    )])
}

/// Termview MCP Server
///
/// Holds the session registry and exposes it via MCP tools.
#[derive(Clone)]
pub struct TermviewServer {
    /// Session registry (PTY backend injected at construction)
    registry: Arc<SessionRegistry>,
    /// Shell used when a spawn request names none (falls back to the
    /// platform shell)
    default_shell: Option<String>,
    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl TermviewServer {
    /// Create a new server over an existing registry.
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self::with_default_shell(registry, None)
    }

    /// Create a new server with a configured default shell.
    pub fn with_default_shell(registry: Arc<SessionRegistry>, default_shell: Option<String>) -> Self {
        Self {
            registry,
            default_shell,
            tool_router: Self::tool_router(),
        }
    }

    /// Get a session by id (helper method).
    fn get_session(&self, session_id: &str) -> Result<Arc<TerminalSession>, McpError> {
        self.registry
            .get(&SessionId::from(session_id))
            .map_err(mcp_error)
    }

    /// Spawn a new terminal session
    #[tool(
        description = "Spawn a shell in a new PTY-backed terminal session and return its session id"
    )]
    #[instrument(skip_all)]
    async fn terminal_spawn(
        &self,
        Parameters(params): Parameters<SpawnParams>,
    ) -> Result<CallToolResult, McpError> {
        let mut spec = SpawnSpec::default();
        if let Some(shell) = params.shell.or_else(|| self.default_shell.clone()) {
            spec.shell = shell;
        }
        spec.args = params.args;
        spec.cwd = params.cwd;
        spec.env = params.env.into_iter().collect();

        let dimensions = match (params.rows, params.cols) {
            (Some(rows), Some(cols)) => Some(Dimensions::new(rows, cols)),
            (None, None) => None,
            (rows, cols) => Some(Dimensions::new(rows.unwrap_or(40), cols.unwrap_or(120))),
        };

        info!(
            "Spawning session: shell='{}', dimensions={:?}",
            spec.shell, dimensions
        );

        let session = self
            .registry
            .create_spawned(&spec, dimensions)
            .map_err(|e| {
                error!("Failed to spawn session: {}", e);
                mcp_error(e)
            })?;

        let dims = session.dimensions();
        let response = SpawnResponse {
            session_id: session.id().to_string(),
            cols: dims.cols,
            rows: dims.rows,
            message: format!("Spawned '{}' in session {}", spec.shell, session.id()),
        };
        Ok(json_response(&response, &response.session_id))
    }

    /// List all terminal sessions
    #[tool(description = "List all terminal sessions with their dimensions and exit status")]
    #[instrument(skip_all)]
    async fn terminal_session_list(
        &self,
        Parameters(_params): Parameters<SessionListParams>,
    ) -> Result<CallToolResult, McpError> {
        let sessions = self.registry.list();
        let count = sessions.len();
        debug!("Listing {} session(s)", count);

        let response = SessionListResponse { sessions, count };
        Ok(json_response(&response, &format!("{count} sessions")))
    }

    /// Write input to a session
    #[tool(
        description = "Write input to a session's terminal. Literal \\r, \\n, \\t, \\e and \\xHH escapes are translated to control bytes"
    )]
    #[instrument(skip_all)]
    async fn terminal_write(
        &self,
        Parameters(params): Parameters<WriteParams>,
    ) -> Result<CallToolResult, McpError> {
        let session = self.get_session(&params.session_id)?;

        let bytes = unescape(&params.input);
        let bytes_written = session.write(&bytes).map_err(mcp_error)?;
        debug!(
            "Wrote {} bytes to session {}",
            bytes_written, params.session_id
        );

        let response = WriteResponse {
            session_id: params.session_id,
            bytes_written,
        };
        Ok(json_response(&response, "written"))
    }

    /// Resize a session's terminal
    #[tool(
        description = "Resize a session's PTY and live screen buffer. Snapshots keep the session's original shape"
    )]
    #[instrument(skip_all)]
    async fn terminal_resize(
        &self,
        Parameters(params): Parameters<ResizeParams>,
    ) -> Result<CallToolResult, McpError> {
        let session = self.get_session(&params.session_id)?;

        session
            .resize(Dimensions::new(params.rows, params.cols))
            .map_err(mcp_error)?;
        info!(
            "Resized session {} to {}x{}",
            params.session_id, params.cols, params.rows
        );

        let response = ResizeResponse {
            session_id: params.session_id,
            cols: params.cols,
            rows: params.rows,
        };
        Ok(json_response(&response, "resized"))
    }

    /// Read the screen as text
    #[tool(
        description = "Read the session's screen as plain text, one line per row. Pending output is flushed first"
    )]
    #[instrument(skip_all)]
    async fn terminal_text(
        &self,
        Parameters(params): Parameters<TextParams>,
    ) -> Result<CallToolResult, McpError> {
        let session = self.get_session(&params.session_id)?;

        // Flush so the snapshot covers everything received so far.
        session.flush().await.map_err(mcp_error)?;

        let response = TextResponse {
            session_id: params.session_id,
            text: session.text(),
        };
        Ok(json_response(&response, &response.text))
    }

    /// Render the screen as a PNG image
    #[tool(
        description = "Render the session's screen as a PNG screenshot with colors and text attributes"
    )]
    #[instrument(skip_all)]
    async fn terminal_screenshot(
        &self,
        Parameters(params): Parameters<ScreenshotParams>,
    ) -> Result<CallToolResult, McpError> {
        let session = self.get_session(&params.session_id)?;
        let config: RenderConfig = params.render.unwrap_or_default();

        session.flush().await.map_err(mcp_error)?;

        let records = session.cell_grid();
        let window = session.dimensions();
        let png = termview_render::render(&records, window, &config).map_err(|e| {
            error!("Screenshot failed for session {}: {}", params.session_id, e);
            mcp_error(e)
        })?;

        let (width, height) = termview_render::canvas_size(window, &config);
        info!(
            "Rendered {}x{} px screenshot ({} bytes) for session {}",
            width,
            height,
            png.len(),
            params.session_id
        );

        let meta = ScreenshotResponse {
            session_id: params.session_id,
            format: "png".to_string(),
            width,
            height,
        };
        let data = base64::engine::general_purpose::STANDARD.encode(&png);

        Ok(CallToolResult::success(vec![
            Content::image(data, "image/png"),
            Content::text(
                serde_json::to_string_pretty(&meta).unwrap_or_else(|_| "png".to_string()),
            ),
        ]))
    }

    /// Wait for a session's process to exit
    #[tool(
        description = "Wait until the session's process exits and return its exit code. Safe to call repeatedly"
    )]
    #[instrument(skip_all)]
    async fn terminal_wait_exit(
        &self,
        Parameters(params): Parameters<WaitExitParams>,
    ) -> Result<CallToolResult, McpError> {
        let session = self.get_session(&params.session_id)?;

        let exit_code = session.wait_for_exit().await.map_err(mcp_error)?;
        info!(
            "Session {} exited with code {}",
            params.session_id, exit_code
        );

        let response = WaitExitResponse {
            session_id: params.session_id,
            exit_code,
        };
        Ok(json_response(&response, &exit_code.to_string()))
    }

    /// Kill a session
    #[tool(description = "Kill a session's process and remove the session")]
    #[instrument(skip_all)]
    async fn terminal_kill(
        &self,
        Parameters(params): Parameters<KillParams>,
    ) -> Result<CallToolResult, McpError> {
        self.registry
            .destroy(&SessionId::from(params.session_id.as_str()))
            .map_err(mcp_error)?;

        let response = KillResponse {
            message: format!("Session '{}' killed", params.session_id),
            session_id: params.session_id,
        };
        Ok(json_response(&response, "killed"))
    }
}

// Implement the ServerHandler trait to define server capabilities
#[tool_handler]
impl rmcp::ServerHandler for TermviewServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Termview - remotely controllable terminal sessions. \
                 Use terminal_spawn to start a shell, terminal_write to send input, \
                 terminal_text or terminal_screenshot to observe the screen, \
                 terminal_wait_exit to wait for completion, and terminal_kill to clean up."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
