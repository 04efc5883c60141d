//! Charts built from loaded statistics
//!
//! This module contains:
//! - The single-run dashboard drawn by `show` and `live`
//! - The per-experiment comparison charts written by `batch`

pub mod comparison;
pub mod dashboard;

// Re-export chart entry points for convenience
pub use comparison::generate_comparison_plots;
pub use dashboard::Dashboard;
