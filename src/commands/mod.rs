//! The three ways of running the tool
//!
//! - [`show`] renders one record to a dashboard image and prints its summary
//! - [`live`] keeps re-rendering that dashboard while the fuzzer runs
//! - [`batch`] compares every result folder under the results directory

pub mod batch;
pub mod live;
pub mod show;

use crate::config::{OutputFormat, PlotConfig};
use crate::discovery::find_project_root;
use std::path::{Path, PathBuf};

/// Statistics file of the current run: the configured path resolved against the project
/// root found from `working_dir`.
pub fn default_stats_path(config: &PlotConfig, working_dir: &Path) -> PathBuf {
    find_project_root(working_dir, &config.paths.results_dir).join(&config.paths.stats_file)
}

/// Dashboard image written next to the statistics file it was drawn from.
pub fn default_dashboard_path(stats_file: &Path, format: OutputFormat) -> PathBuf {
    let file_name = format!("dashboard.{}", format.extension());
    match stats_file.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::create_dir_all;
    use tempfile::TempDir;

    #[test]
    fn stats_path_is_resolved_against_project_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_dir_all(root.join("finalOutputs")).unwrap();
        let nested = root.join("scripts");
        create_dir_all(&nested).unwrap();

        let path = default_stats_path(&PlotConfig::default(), &nested);
        assert_eq!(path, root.join("output/modelfuzz/stats.json"));
    }

    #[test]
    fn dashboard_sits_next_to_stats_file() {
        assert_eq!(
            default_dashboard_path(Path::new("output/modelfuzz/stats.json"), OutputFormat::Svg),
            PathBuf::from("output/modelfuzz/dashboard.svg")
        );
        assert_eq!(
            default_dashboard_path(Path::new("stats.json"), OutputFormat::Png),
            PathBuf::from("dashboard.png")
        );
    }
}
