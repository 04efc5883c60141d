use super::show::{render_dashboard, DashboardOptions};
use crate::stats::{load_stats, FuzzStats};
use crate::AppError;
use log::{error, info};
use std::thread::sleep;
use std::time::Duration;

/// Settings of the refresh loop.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveOptions {
    pub dashboard: DashboardOptions,
    /// Wait between two refreshes
    pub interval: Duration,
    /// Stop after this many refreshes, run until killed when `None`
    pub refreshes: Option<u64>,
}

fn refresh(options: &DashboardOptions) -> Result<FuzzStats, AppError> {
    let stats = load_stats(&options.stats_file)?;
    render_dashboard(&stats, &options.output, options.format, options.size)?;
    Ok(stats)
}

/// Re-renders the dashboard every [`LiveOptions::interval`] until the refresh limit is hit.
///
/// A record that cannot be loaded is reported and retried on the next cycle, as is a
/// failed render. Returns how many refreshes succeeded.
pub fn run(options: &LiveOptions) -> u64 {
    info!(
        "Watching {} every {}s, dashboard at {}",
        options.dashboard.stats_file.display(),
        options.interval.as_secs(),
        options.dashboard.output.display()
    );

    let mut cycle: u64 = 0;
    let mut succeeded: u64 = 0;

    loop {
        cycle += 1;

        match refresh(&options.dashboard) {
            Ok(stats) => {
                succeeded += 1;
                println!(
                    "Refreshed dashboard: {} iterations, coverage {}, transitions {}",
                    stats.iterations(),
                    stats.final_coverage(),
                    stats.final_transitions()
                );
            }
            Err(AppError::Stats(e)) => println!("Error loading JSON: {}", e),
            Err(e) => error!("Error rendering dashboard: {}", e),
        }

        if options.refreshes.is_some_and(|limit| cycle >= limit) {
            break;
        }

        sleep(options.interval);
    }

    succeeded
}
