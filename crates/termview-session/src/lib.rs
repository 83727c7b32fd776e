//! # termview-session
//!
//! Session lifecycle and registry for termview.
//!
//! This crate provides:
//! - PTY-backed terminal sessions with an ordered output pipeline
//! - Flush synchronization for consistent snapshots
//! - Exit waiting with a shared, idempotent exit code
//! - A registry coordinating multiple sessions
//!
//! ## Architecture
//!
//! This is Layer 2 in the architecture - it depends on termview-core
//! and termview-emulator to manage terminal session lifecycles.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod registry;
pub mod session;
pub mod snapshot;

// Re-export commonly used types
pub use registry::{RegistryConfig, SessionRegistry};
pub use session::{SessionState, TerminalSession};
