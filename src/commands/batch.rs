use crate::analysis::comparison::generate_comparison_plots;
use crate::config::{OutputFormat, PathSettings};
use crate::discovery::{
    experiment_label, find_result_folders, list_subdirectories, load_experiments,
    load_failure_message, Experiment,
};
use crate::summary::format_experiment_table;
use crate::AppError;
use indicatif::{ProgressBar, ProgressStyle};
use log::error;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

/// Settings of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOptions {
    /// Directory holding the results directory
    pub project_root: PathBuf,
    /// Process each subdirectory of the results directory on its own
    pub per_subdirectory: bool,
    pub paths: PathSettings,
    pub format: OutputFormat,
    pub size: (u32, u32),
}

impl BatchOptions {
    pub fn results_dir(&self) -> PathBuf {
        self.project_root.join(&self.paths.results_dir)
    }
}

/// What happened to one group of result folders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupOutcome {
    /// No folder below the group holds a statistics file
    NoResults,
    /// Statistics files were found but none of them loaded
    NoValidData,
    /// Charts were written for this many experiments
    Plotted {
        experiments: usize,
        charts: Vec<PathBuf>,
    },
}

impl GroupOutcome {
    pub fn is_plotted(&self) -> bool {
        matches!(self, GroupOutcome::Plotted { .. })
    }
}

/// Runs batch mode, returning the number of groups whose charts were written.
///
/// # Errors
///
/// Returns [`AppError::MissingResultsDir`] when the results directory does not exist.
/// In aggregate mode any discovery or drawing error is returned. In per-subdirectory
/// mode such errors are logged and only that subdirectory counts as failed.
pub fn run(options: &BatchOptions) -> Result<usize, AppError> {
    let results_dir = options.results_dir();
    if !results_dir.is_dir() {
        return Err(AppError::MissingResultsDir(results_dir));
    }

    if options.per_subdirectory {
        run_per_subdirectory(options, &results_dir)
    } else {
        let graphs_dir = results_dir.join(&options.paths.graphs_dir_name);
        println!("Project root: {}", options.project_root.display());
        println!("Searching for results in: {}", results_dir.display());
        println!("Graphs will be saved to: {}", graphs_dir.display());

        let outcome = plot_group(options, &results_dir, &graphs_dir, None)?;
        Ok(usize::from(outcome.is_plotted()))
    }
}

fn run_per_subdirectory(options: &BatchOptions, results_dir: &Path) -> Result<usize, AppError> {
    println!("Generating graphs for all subdirectories in {}...", results_dir.display());

    let subdirectories = list_subdirectories(results_dir)?;
    if subdirectories.is_empty() {
        println!("No subdirectories found in {}", results_dir.display());
        return Ok(0);
    }
    println!("Found {} subdirectories to process", subdirectories.len());

    let mut processed = 0;
    for subdirectory in &subdirectories {
        let name = subdirectory
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| subdirectory.display().to_string());
        println!();
        println!("Processing subdirectory: {}", name);

        let graphs_dir = subdirectory.join(&options.paths.graphs_dir_name);
        match plot_group(options, subdirectory, &graphs_dir, Some(&name)) {
            Ok(outcome) if outcome.is_plotted() => processed += 1,
            Ok(_) => {}
            Err(e) => error!("Failed to process {}: {}", name, e),
        }
    }

    let banner = "=".repeat(60);
    println!();
    println!("{}", banner);
    println!("PROCESSING COMPLETE");
    println!("{}", banner);
    println!(
        "Successfully processed {} out of {} subdirectories",
        processed,
        subdirectories.len()
    );

    Ok(processed)
}

/// Finds, loads and plots every result folder below `search_path`.
///
/// `group` names the subdirectory in per-subdirectory mode and suffixes chart titles.
pub fn plot_group(
    options: &BatchOptions,
    search_path: &Path,
    graphs_dir: &Path,
    group: Option<&str>,
) -> Result<GroupOutcome, AppError> {
    let folders = find_result_folders(search_path, &options.paths.stats_file_name)?;
    if folders.is_empty() {
        println!("No {} files found in {}", options.paths.stats_file_name, search_path.display());
        return Ok(GroupOutcome::NoResults);
    }
    println!("Found {} result folders", folders.len());

    let experiments = load_with_progress(&folders, &options.paths.stats_file_name);
    if experiments.is_empty() {
        println!("No valid data found in {}", search_path.display());
        return Ok(GroupOutcome::NoValidData);
    }

    create_dir_all(graphs_dir).map_err(|source| AppError::CreateDir {
        path: graphs_dir.to_path_buf(),
        source,
    })?;

    println!("Generating comparison plots...");
    let charts =
        generate_comparison_plots(&experiments, graphs_dir, group, options.format, options.size)?;
    for chart in &charts {
        println!("Saved: {}", chart.display());
    }

    let title = match group {
        Some(group) => format!("SUMMARY STATISTICS for {}", group),
        None => "SUMMARY STATISTICS".to_string(),
    };
    println!();
    println!("{}", format_experiment_table(&experiments, Some(&title)));
    println!();
    println!("Graphs saved to: {}", graphs_dir.display());

    Ok(GroupOutcome::Plotted {
        experiments: experiments.len(),
        charts,
    })
}

fn load_with_progress(folders: &[PathBuf], file_name: &str) -> Vec<Experiment> {
    let progress = ProgressBar::new(folders.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}") {
        progress.set_style(style);
    }

    let experiments = load_experiments(folders, file_name, |folder, failure| {
        if let Some(e) = failure {
            let message = load_failure_message(folder, e);
            // Bar is hidden while the failure is written
            progress.suspend(|| {
                error!("{}", message);
                println!("{}", message);
            });
        }
        progress.set_message(experiment_label(folder));
        progress.inc(1);
    });

    progress.finish_and_clear();
    experiments
}
