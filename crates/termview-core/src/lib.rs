//! # termview-core
//!
//! Core types for the termview terminal session server.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other termview crates. It provides:
//!
//! - Geometry types (Position, Dimensions)
//! - Session identity and spawn parameter types
//! - Cell and color types for the terminal grid
//! - The 256-color palette resolver
//! - Error types
//! - Server configuration
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other termview crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cell;
pub mod config;
pub mod error;
pub mod geometry;
pub mod palette;
pub mod session;

// Re-export commonly used types
pub use cell::{Cell, CellAttributes, CellRecord, Color};
pub use config::{ServerConfig, ServerSettings, TerminalSettings};
pub use error::{Error, Result};
pub use geometry::{Dimensions, Position};
pub use palette::{dim_rgb, resolve, Channel, Rgb, DEFAULT_BG, DEFAULT_FG};
pub use session::{SessionId, SessionSummary, SpawnSpec};
