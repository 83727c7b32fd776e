//! # Termview MCP Server
//!
//! Model Context Protocol server exposing PTY-backed terminal sessions:
//! spawn a shell, drive it with input, and read back the screen either
//! as structured text or as a rendered PNG screenshot.
//!
//! ## Architecture
//!
//! This is Layer 1 - the server binary that ties together:
//! - termview-core: Core types, colors, errors, configuration
//! - termview-emulator: PTY handling and screen emulation
//! - termview-session: Session lifecycle and registry
//! - termview-render: PNG rasterization

use std::sync::Arc;

use rmcp::{transport::stdio, ServiceExt};

use termview_core::ServerConfig;
use termview_emulator::NativePtyBackend;
use termview_mcp::TermviewServer;
use termview_session::{RegistryConfig, SessionRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional config file: `termview-mcp --config path/to/config.yaml`
    let args: Vec<String> = std::env::args().collect();
    let config = match args.iter().position(|a| a == "--config") {
        Some(i) => {
            let path = args
                .get(i + 1)
                .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?;
            ServerConfig::from_file(path)?
        }
        None => ServerConfig::default(),
    };
    config.validate()?;

    // Initialize logging; RUST_LOG overrides the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.server.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Termview MCP Server starting...");

    // Resolve the PTY capability once at startup; a missing backend is
    // fatal here rather than on the first spawn.
    let backend = Arc::new(NativePtyBackend::probe()?);

    let registry = Arc::new(SessionRegistry::with_config(
        backend,
        RegistryConfig {
            max_sessions: config.server.max_sessions,
            default_rows: config.terminal.default_rows,
            default_cols: config.terminal.default_cols,
        },
    ));

    let server = TermviewServer::with_default_shell(registry, config.terminal.default_shell.clone());

    tracing::info!("Server initialized, starting stdio transport...");

    let service = server.serve(stdio()).await.map_err(|e| {
        tracing::error!("Error starting server: {}", e);
        e
    })?;

    tracing::info!("Termview MCP Server running on stdio");

    service.waiting().await?;

    tracing::info!("Termview MCP Server shutting down");

    Ok(())
}
