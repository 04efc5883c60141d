//! Statistics record produced by the fuzzer
//!
//! This module handles loading the `stats.json` file written by ModelFuzz, checking the
//! invariants the producer is expected to uphold, and the growth arithmetic used by the
//! console summaries.

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a statistics record
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

type Result<T> = core::result::Result<T, StatsError>;

/// One fuzzing run's statistics, one entry per iteration for the series fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FuzzStats {
    /// Cumulative abstract-state coverage per iteration
    #[serde(default, deserialize_with = "null_as_default")]
    pub coverages: Vec<u64>,
    /// Cumulative transition coverage per iteration
    #[serde(default, deserialize_with = "null_as_default")]
    pub transitions: Vec<u64>,
    /// Traces produced by unguided random exploration
    #[serde(default)]
    pub random_traces: u64,
    /// Traces produced by mutating interesting traces
    #[serde(default)]
    pub mutated_traces: u64,
    /// Cumulative code coverage per iteration, only when the fuzzer collected it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_coverage: Option<Vec<f64>>,
}

/// The Go producer serialises empty slices as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> core::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Invariant violations found in a record. These never stop rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsWarning {
    /// `Coverages` and `Transitions` differ in length.
    LengthMismatch { coverages: usize, transitions: usize },
    /// A cumulative series went down at `index`.
    Decreasing { series: &'static str, index: usize },
    /// `CodeCoverage` has a different number of entries than `Coverages`.
    CodeCoverageLengthMismatch { coverages: usize, code_coverage: usize },
}

impl std::fmt::Display for StatsWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsWarning::LengthMismatch {
                coverages,
                transitions,
            } => write!(
                f,
                "Coverages has {} entries but Transitions has {}",
                coverages, transitions
            ),
            StatsWarning::Decreasing { series, index } => {
                write!(f, "{} decreases at iteration {}", series, index)
            }
            StatsWarning::CodeCoverageLengthMismatch {
                coverages,
                code_coverage,
            } => write!(
                f,
                "Coverages has {} entries but CodeCoverage has {}",
                coverages, code_coverage
            ),
        }
    }
}

/// Absolute and relative change between the first and last entry of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Growth {
    pub absolute: f64,
    /// `None` when the first entry is zero.
    pub percent: Option<f64>,
}

impl std::fmt::Display for Growth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.percent {
            Some(percent) => write!(f, "{} ({:.1}%)", self.absolute, percent),
            None => write!(f, "{} (n/a)", self.absolute),
        }
    }
}

/// Computes `(last - first)` and `(last - first) / first * 100` for a series.
///
/// Returns `None` for an empty series.
pub fn growth<T: Copy + Into<f64>>(series: &[T]) -> Option<Growth> {
    let first: f64 = (*series.first()?).into();
    let last: f64 = (*series.last()?).into();
    let absolute = last - first;
    let percent = (first != 0.0).then(|| absolute / first * 100.0);
    Some(Growth { absolute, percent })
}

/// Same as [`growth`] for the integer series, which do not fit [`Into<f64>`].
pub fn growth_u64(series: &[u64]) -> Option<Growth> {
    let first = *series.first()?;
    let last = *series.last()?;
    // Signed difference in case the producer ever writes a decreasing series
    let absolute = last as f64 - first as f64;
    let percent = (first != 0).then(|| absolute / first as f64 * 100.0);
    Some(Growth { absolute, percent })
}

impl FuzzStats {
    /// Number of fuzzing iterations recorded.
    pub fn iterations(&self) -> usize {
        self.coverages.len()
    }

    pub fn final_coverage(&self) -> u64 {
        self.coverages.last().copied().unwrap_or(0)
    }

    pub fn final_transitions(&self) -> u64 {
        self.transitions.last().copied().unwrap_or(0)
    }

    pub fn total_traces(&self) -> u64 {
        self.random_traces + self.mutated_traces
    }

    /// Code coverage series, treating an empty array the same as a missing one.
    pub fn code_coverage(&self) -> Option<&[f64]> {
        self.code_coverage
            .as_deref()
            .filter(|series| !series.is_empty())
    }

    pub fn final_code_coverage(&self) -> Option<f64> {
        self.code_coverage().and_then(|series| series.last().copied())
    }

    pub fn coverage_growth(&self) -> Option<Growth> {
        growth_u64(&self.coverages)
    }

    pub fn transition_growth(&self) -> Option<Growth> {
        growth_u64(&self.transitions)
    }

    pub fn code_coverage_growth(&self) -> Option<Growth> {
        self.code_coverage().and_then(growth)
    }

    /// Checks the invariants the fuzzer is expected to maintain.
    pub fn validate(&self) -> Vec<StatsWarning> {
        let mut warnings = Vec::new();

        if self.coverages.len() != self.transitions.len() {
            warnings.push(StatsWarning::LengthMismatch {
                coverages: self.coverages.len(),
                transitions: self.transitions.len(),
            });
        }

        if let Some(index) = first_decrease(&self.coverages) {
            warnings.push(StatsWarning::Decreasing {
                series: "Coverages",
                index,
            });
        }

        if let Some(index) = first_decrease(&self.transitions) {
            warnings.push(StatsWarning::Decreasing {
                series: "Transitions",
                index,
            });
        }

        if let Some(code_coverage) = self.code_coverage() {
            if code_coverage.len() != self.coverages.len() {
                warnings.push(StatsWarning::CodeCoverageLengthMismatch {
                    coverages: self.coverages.len(),
                    code_coverage: code_coverage.len(),
                });
            }

            if let Some(index) = first_decrease(code_coverage) {
                warnings.push(StatsWarning::Decreasing {
                    series: "CodeCoverage",
                    index,
                });
            }
        }

        warnings
    }
}

fn first_decrease<T: PartialOrd>(series: &[T]) -> Option<usize> {
    series
        .windows(2)
        .position(|pair| pair[1] < pair[0])
        .map(|position| position + 1)
}

/// Parses a statistics record from a JSON string.
pub fn parse_stats(json: &str, origin: &Path) -> Result<FuzzStats> {
    serde_json::from_str(json).map_err(|source| StatsError::Parse {
        path: origin.to_path_buf(),
        source,
    })
}

/// Loads a `stats.json` file
///
/// Reads the whole file, parses it and logs any invariant violations as warnings.
///
/// # Arguments
/// * `file_path` - Path to the statistics file
///
/// # Returns
/// * `Ok(FuzzStats)` - Successfully parsed record
/// * `Err(StatsError)` - If the file could not be read or is not valid JSON
pub fn load_stats(file_path: &Path) -> Result<FuzzStats> {
    let content = fs::read_to_string(file_path).map_err(|source| StatsError::Read {
        path: file_path.to_path_buf(),
        source,
    })?;

    let stats = parse_stats(&content, file_path)?;
    for warning in stats.validate() {
        warn!("{}: {}", file_path.display(), warning);
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_RECORD: &str = r#"{
        "Coverages": [10, 12, 15, 20],
        "Transitions": [4, 6, 9, 11],
        "RandomTraces": 3,
        "MutatedTraces": 7,
        "CodeCoverage": [100.0, 140.0, 150.0, 200.0]
    }"#;

    fn parse(json: &str) -> FuzzStats {
        parse_stats(json, Path::new("test.json")).unwrap()
    }

    #[test]
    fn parses_full_record() {
        let stats = parse(FULL_RECORD);

        assert_eq!(stats.coverages, vec![10, 12, 15, 20]);
        assert_eq!(stats.transitions, vec![4, 6, 9, 11]);
        assert_eq!(stats.random_traces, 3);
        assert_eq!(stats.mutated_traces, 7);
        assert_eq!(stats.total_traces(), 10);
        assert_eq!(stats.iterations(), 4);
        assert_eq!(stats.final_coverage(), 20);
        assert_eq!(stats.final_transitions(), 11);
        assert_eq!(stats.final_code_coverage(), Some(200.0));
        assert!(stats.validate().is_empty());
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let stats = parse(r#"{"Coverages": [1, 2], "Transitions": [1, 1]}"#);

        assert_eq!(stats.random_traces, 0);
        assert_eq!(stats.mutated_traces, 0);
        assert!(stats.code_coverage().is_none());
        assert!(stats.code_coverage_growth().is_none());
    }

    #[rstest]
    #[case::null(r#"{"Coverages": null, "Transitions": null, "CodeCoverage": null}"#)]
    #[case::empty(r#"{"Coverages": [], "Transitions": [], "CodeCoverage": []}"#)]
    #[case::absent("{}")]
    fn empty_series_are_tolerated(#[case] json: &str) {
        let stats = parse(json);

        assert_eq!(stats.iterations(), 0);
        assert_eq!(stats.final_coverage(), 0);
        assert_eq!(stats.final_transitions(), 0);
        assert!(stats.code_coverage().is_none());
        assert!(stats.coverage_growth().is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let stats = parse(r#"{"Coverages": [1], "Transitions": [1], "Crashes": 2}"#);
        assert_eq!(stats.iterations(), 1);
    }

    #[rstest(series, absolute, percent,
        case(vec![10, 20], 10.0, Some(100.0)),
        case(vec![4, 5, 6, 5], 1.0, Some(25.0)),
        case(vec![7], 0.0, Some(0.0)),
        case(vec![0, 15], 15.0, None) // Division by zero is reported as undefined
    )]
    fn growth_is_relative_to_first_entry(series: Vec<u64>, absolute: f64, percent: Option<f64>) {
        let result = growth_u64(&series).unwrap();
        assert_eq!(result.absolute, absolute);
        assert_eq!(result.percent, percent);
    }

    #[test]
    fn growth_of_float_series() {
        let result = growth(&[50.0, 75.0]).unwrap();
        assert_eq!(result.absolute, 25.0);
        assert_eq!(result.percent, Some(50.0));
        assert!(growth::<f64>(&[]).is_none());
    }

    #[test]
    fn growth_display_uses_one_decimal() {
        let growth = growth_u64(&[3, 4]).unwrap();
        assert_eq!(growth.to_string(), "1 (33.3%)");

        let undefined = growth_u64(&[0, 4]).unwrap();
        assert_eq!(undefined.to_string(), "4 (n/a)");
    }

    #[test]
    fn validate_reports_length_mismatch_and_decrease() {
        let stats = FuzzStats {
            coverages: vec![1, 3, 2],
            transitions: vec![1, 2],
            code_coverage: Some(vec![1.0, 2.0]),
            ..Default::default()
        };

        let warnings = stats.validate();
        assert!(warnings.contains(&StatsWarning::LengthMismatch {
            coverages: 3,
            transitions: 2
        }));
        assert!(warnings.contains(&StatsWarning::Decreasing {
            series: "Coverages",
            index: 2
        }));
        assert!(warnings.contains(&StatsWarning::CodeCoverageLengthMismatch {
            coverages: 3,
            code_coverage: 2
        }));
    }

    #[test]
    fn load_stats_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", FULL_RECORD).unwrap();

        let stats = load_stats(file.path()).unwrap();
        assert_eq!(stats.final_coverage(), 20);
    }

    #[test]
    fn load_stats_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_stats(&dir.path().join("stats.json"));
        assert!(matches!(result, Err(StatsError::Read { .. })));
    }

    #[test]
    fn load_stats_reports_malformed_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{\"Coverages\": [1, 2").unwrap();

        let result = load_stats(file.path());
        assert!(matches!(result, Err(StatsError::Parse { .. })));
    }
}
