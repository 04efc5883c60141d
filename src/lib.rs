//! # modelfuzz-plots
//! Charts and console summaries for the statistics a ModelFuzz run writes to `stats.json`.
//!
//! The [`commands`] module holds the three modes of the binary. Everything they share lives
//! in the other modules: [`stats`] reads the record, [`discovery`] finds result folders,
//! [`analysis`] draws the charts and [`summary`] formats the text reports.

pub mod analysis;
pub mod commands;
pub mod common;
pub mod config;
pub mod discovery;
pub mod stats;
pub mod summary;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can end a command
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Statistics error: {0}")]
    Stats(#[from] stats::StatsError),

    #[error("Discovery error: {0}")]
    Discovery(#[from] discovery::DiscoveryError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Plot error: {0}")]
    Plot(#[from] common::plots::PlotError),

    #[error("Results directory not found at {}", .0.display())]
    MissingResultsDir(PathBuf),

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to determine the working directory: {0}")]
    WorkingDir(#[source] std::io::Error),
}
