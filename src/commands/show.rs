use crate::analysis::dashboard::Dashboard;
use crate::common::plots::{save_chart, PlotError};
use crate::config::OutputFormat;
use crate::stats::{load_stats, FuzzStats};
use crate::summary::format_run_summary;
use crate::AppError;
use std::path::{Path, PathBuf};

/// Where to read one record from and how to draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOptions {
    pub stats_file: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub size: (u32, u32),
}

/// Draws the dashboard for `stats` into `output`.
pub fn render_dashboard(
    stats: &FuzzStats,
    output: &Path,
    format: OutputFormat,
    size: (u32, u32),
) -> Result<(), PlotError> {
    save_chart(&Dashboard::new(stats), output, format, size)?;
    log::debug!("Dashboard written to {}", output.display());
    Ok(())
}

/// Loads the record, renders its dashboard and prints the summary.
///
/// A missing or malformed statistics file is an error.
pub fn run(options: &DashboardOptions) -> Result<FuzzStats, AppError> {
    let stats = load_stats(&options.stats_file)?;

    render_dashboard(&stats, &options.output, options.format, options.size)?;
    println!("Dashboard saved to: {}", options.output.display());
    println!();
    println!("{}", format_run_summary(&stats));

    Ok(stats)
}
