//! Locating the project root and result folders on disk.

use crate::stats::{load_stats, FuzzStats, StatsError};
use log::warn;
use std::fs::read_dir;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while discovering result folders
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

type Result<T> = core::result::Result<T, DiscoveryError>;

/// A result folder whose statistics record loaded successfully.
#[derive(Debug, Clone)]
pub struct Experiment {
    pub label: String,
    pub folder: PathBuf,
    pub stats: FuzzStats,
}

/// Walks `start` and its ancestors, returning the first directory that contains a
/// directory named `marker`. Falls back to `start` when none does.
pub fn find_project_root(start: &Path, marker: &str) -> PathBuf {
    start
        .ancestors()
        .find(|candidate| candidate.join(marker).is_dir())
        .unwrap_or(start)
        .to_path_buf()
}

/// Finds every directory below `base_path` (inclusive) that contains a file named
/// `file_name`.
///
/// # Arguments
///
/// * `base_path` - The directory to search
/// * `file_name` - Name of the file marking a result folder, usually `stats.json`
///
/// # Errors
///
/// Returns an error if `base_path` itself cannot be read. Unreadable directories
/// below it are logged and skipped.
pub fn find_result_folders(base_path: &Path, file_name: &str) -> Result<Vec<PathBuf>> {
    let mut folders = Vec::new();
    walk_directory(base_path, file_name, &mut |folder| folders.push(folder))?;
    folders.sort();
    Ok(folders)
}

fn walk_directory<F>(current_path: &Path, file_name: &str, callback: &mut F) -> Result<()>
where
    F: FnMut(PathBuf),
{
    let entries = read_dir(current_path).map_err(|source| DiscoveryError::ReadDir {
        path: current_path.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error reading entry in {}: {}", current_path.display(), e);
                continue;
            }
        };

        let path = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

        if is_dir {
            if let Err(e) = walk_directory(&path, file_name, callback) {
                warn!("Skipping {}", e);
            }
        } else if entry.file_name() == file_name {
            callback(current_path.to_path_buf());
        }
    }

    Ok(())
}

/// Label shown for an experiment: the name of the result folder's parent directory.
///
/// For `finalOutputs/raft/run1/output` this is `run1`, matching how the fuzzer lays out
/// `<experiment>/output/stats.json`.
pub fn experiment_label(folder: &Path) -> String {
    folder
        .parent()
        .and_then(Path::file_name)
        .or_else(|| folder.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| folder.display().to_string())
}

/// Immediate subdirectories of `dir`, sorted by name, excluding hidden ones.
pub fn list_subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = read_dir(dir).map_err(|source| DiscoveryError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut subdirectories: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .map(|entry| entry.path())
        .collect();

    subdirectories.sort();
    Ok(subdirectories)
}

/// Loads the statistics record of each folder, skipping the ones that fail.
///
/// `on_progress` is invoked once per folder with the load error, if any, so the caller
/// can report failures alongside its own progress output.
pub fn load_experiments<F>(folders: &[PathBuf], file_name: &str, mut on_progress: F) -> Vec<Experiment>
where
    F: FnMut(&Path, Option<&StatsError>),
{
    let mut experiments = Vec::with_capacity(folders.len());

    for folder in folders {
        let stats_file = folder.join(file_name);
        match load_stats(&stats_file) {
            Ok(stats) => {
                experiments.push(Experiment {
                    label: experiment_label(folder),
                    folder: folder.clone(),
                    stats,
                });
                on_progress(folder, None);
            }
            Err(e) => on_progress(folder, Some(&e)),
        }
    }

    experiments
}

/// Line reported when a result folder's record cannot be loaded.
pub fn load_failure_message(folder: &Path, error: &StatsError) -> String {
    format!("Error loading {}: {}", folder.display(), error)
}
