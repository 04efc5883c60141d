//! Common infrastructure shared by every chart
//!
//! This module provides reusable infrastructure for:
//! - The color palettes
//! - Saving charts to PNG or SVG and the panel primitives they are drawn with

pub mod palette;
pub mod plots;

// Re-export commonly used items
pub use plots::{save_chart, Chart, PlotError};
