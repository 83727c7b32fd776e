//! Termview MCP Server Library
//!
//! This library contains the MCP protocol layer types and handlers.
//! The actual server binary is in main.rs.

pub mod input;
pub mod protocol;
pub mod tools;

// Re-export commonly used types
pub use input::unescape;
pub use protocol::TermviewServer;
pub use tools::*;
