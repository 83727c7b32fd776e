//! # termview-render
//!
//! PNG rasterization of terminal screen snapshots.
//!
//! This crate turns a snapshot cell matrix into a lossless raster
//! image: background rectangles, bitmap glyphs with bold/italic/dim
//! treatment, and underline/strikethrough strokes, composited over the
//! fixed dark canvas default.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod raster;

// Re-export commonly used types
pub use config::RenderConfig;
pub use raster::{canvas_size, render};
