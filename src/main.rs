use argh::FromArgs;
use modelfuzz_plots::commands::batch::{self, BatchOptions};
use modelfuzz_plots::commands::live::{self, LiveOptions};
use modelfuzz_plots::commands::show::{self, DashboardOptions};
use modelfuzz_plots::commands::{default_dashboard_path, default_stats_path};
use modelfuzz_plots::config::{OutputFormat, PlotConfig};
use modelfuzz_plots::discovery::find_project_root;
use modelfuzz_plots::AppError;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Charts and summaries for ModelFuzz statistics
#[derive(FromArgs, Debug)]
struct Args {
    /// configuration file (default: modelfuzz-plots.toml in the current directory, if present)
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Command {
    Show(ShowArgs),
    Live(LiveArgs),
    Batch(BatchArgs),
}

/// render the dashboard for one run and print its summary
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "show")]
struct ShowArgs {
    /// statistics file (default: output/modelfuzz/stats.json under the project root)
    #[argh(option, short = 's')]
    stats: Option<PathBuf>,

    /// dashboard image to write (default: next to the statistics file)
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// image format, png or svg
    #[argh(option, short = 'f')]
    format: Option<OutputFormat>,
}

/// keep re-rendering the dashboard while the fuzzer runs
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "live")]
struct LiveArgs {
    /// statistics file (default: output/modelfuzz/stats.json under the project root)
    #[argh(option, short = 's')]
    stats: Option<PathBuf>,

    /// dashboard image to write (default: next to the statistics file)
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// seconds between refreshes (default: 10)
    #[argh(option, short = 'i')]
    interval: Option<u64>,

    /// stop after this many refreshes
    #[argh(option, short = 'n')]
    refreshes: Option<u64>,
}

/// compare every result folder under the results directory
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "batch")]
struct BatchArgs {
    /// project root holding the results directory (default: nearest ancestor that has one)
    #[argh(option, short = 'r')]
    root: Option<PathBuf>,

    /// write charts for each subdirectory of the results directory separately
    #[argh(switch, short = 'p')]
    per_subdirectory: bool,

    /// image format, png or svg
    #[argh(option, short = 'f')]
    format: Option<OutputFormat>,
}

fn dashboard_options(
    config: &PlotConfig,
    working_dir: &Path,
    stats: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
) -> DashboardOptions {
    let format = format.unwrap_or(config.render.format);
    let stats_file = stats.unwrap_or_else(|| default_stats_path(config, working_dir));
    let output = output.unwrap_or_else(|| default_dashboard_path(&stats_file, format));

    DashboardOptions {
        stats_file,
        output,
        format,
        size: config.render.dashboard_size,
    }
}

fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    let working_dir = std::env::current_dir().map_err(AppError::WorkingDir)?;
    let config = PlotConfig::resolve(args.config.as_deref(), &working_dir)?;

    match args.command {
        Command::Show(show_args) => {
            let options = dashboard_options(
                &config,
                &working_dir,
                show_args.stats,
                show_args.output,
                show_args.format,
            );
            show::run(&options)?;
        }
        Command::Live(live_args) => {
            let options = LiveOptions {
                dashboard: dashboard_options(
                    &config,
                    &working_dir,
                    live_args.stats,
                    live_args.output,
                    None,
                ),
                interval: Duration::from_secs(
                    live_args.interval.unwrap_or(config.live.interval_secs),
                ),
                refreshes: live_args.refreshes,
            };
            live::run(&options);
        }
        Command::Batch(batch_args) => {
            let project_root = batch_args
                .root
                .unwrap_or_else(|| find_project_root(&working_dir, &config.paths.results_dir));
            let options = BatchOptions {
                project_root,
                per_subdirectory: batch_args.per_subdirectory,
                format: batch_args.format.unwrap_or(config.render.format),
                size: config.render.comparison_size,
                paths: config.paths,
            };
            batch::run(&options)?;
        }
    }

    Ok(())
}
