//! # termview-emulator
//!
//! PTY handling and terminal emulation for termview.
//!
//! This crate provides:
//! - PTY (pseudo-terminal) spawning with an ordered data/exit event stream
//! - The `PtyBackend` capability trait and its native implementation
//! - A VTE-driven screen buffer (`Grid`) and escape-sequence interpreter
//!
//! ## Architecture
//!
//! Both the PTY spawner and the interpreter are provided capabilities for
//! the session layer: sessions consume `PtyHandle`'s event stream and read
//! the interpreter's grid, nothing more.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod grid;
pub mod interpreter;
pub mod pty;

// Re-export commonly used types
pub use backend::{NativePtyBackend, PtyBackend};
pub use grid::{Cursor, Grid};
pub use interpreter::Interpreter;
pub use pty::{PtyEvent, PtyHandle};
