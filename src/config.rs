//! Optional TOML configuration
//!
//! Every key has a default, so the tool runs without a configuration file. Values given on
//! the command line take precedence over the file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "modelfuzz-plots.toml";

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML from config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unknown output format '{0}', expected 'png' or 'svg'")]
    UnknownFormat(String),
}

/// Image format charts are written in.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "svg" => Ok(OutputFormat::Svg),
            _ => Err(ConfigError::UnknownFormat(value.to_string())),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct PathSettings {
    /// Directory searched for when locating the project root.
    #[serde(default = "default_results_dir")]
    pub results_dir: String,
    /// Statistics file of the current run, relative to the project root.
    #[serde(default = "default_stats_file")]
    pub stats_file: PathBuf,
    /// File name identifying a result folder in batch mode.
    #[serde(default = "default_stats_file_name")]
    pub stats_file_name: String,
    /// Directory name batch charts are written to.
    #[serde(default = "default_graphs_dir_name")]
    pub graphs_dir_name: String,
}

pub fn default_results_dir() -> String {
    "finalOutputs".to_string()
}

pub fn default_stats_file() -> PathBuf {
    PathBuf::from("output/modelfuzz/stats.json")
}

pub fn default_stats_file_name() -> String {
    "stats.json".to_string()
}

pub fn default_graphs_dir_name() -> String {
    "graphs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            stats_file: default_stats_file(),
            stats_file_name: default_stats_file_name(),
            graphs_dir_name: default_graphs_dir_name(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct RenderSettings {
    #[serde(default)]
    pub format: OutputFormat,
    /// Size in pixels of the single-run dashboard.
    #[serde(default = "default_dashboard_size")]
    pub dashboard_size: (u32, u32),
    /// Size in pixels of each batch comparison chart.
    #[serde(default = "default_comparison_size")]
    pub comparison_size: (u32, u32),
}

pub fn default_dashboard_size() -> (u32, u32) {
    (1500, 1200)
}

pub fn default_comparison_size() -> (u32, u32) {
    (1200, 800)
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            dashboard_size: default_dashboard_size(),
            comparison_size: default_comparison_size(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct LiveSettings {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

pub fn default_interval_secs() -> u64 {
    10
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct PlotConfig {
    #[serde(default)]
    pub paths: PathSettings,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub live: LiveSettings,
}

impl PlotConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&content, path)
    }

    fn from_toml(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Loads `path` when given, otherwise [`DEFAULT_CONFIG_FILE`] if it exists in
    /// `working_dir`, otherwise the built-in defaults.
    pub fn resolve(path: Option<&Path>, working_dir: &Path) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                Self::load_from_file(path)
            }
            None => {
                let default_path = working_dir.join(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    log::info!("Loading configuration from {}", default_path.display());
                    Self::load_from_file(&default_path)
                } else {
                    log::debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }
}
