//! Console summaries for one statistics record and for a batch of experiments
//!
//! This module provides the plain-text reports printed after charts are written:
//! - [`format_run_summary`] for the single-run block printed by `show` and `live`
//! - [`ExperimentRow`] and [`format_experiment_table`] for the batch table, rendered
//!   with the [`tabled`] crate

use crate::discovery::Experiment;
use crate::stats::{FuzzStats, Growth};
use tabled::{Table, Tabled};

/// Header line of the single-run summary.
pub const RUN_SUMMARY_HEADER: &str = "=== ModelFuzz Statistics Summary ===";

fn growth_text(growth: Option<Growth>) -> String {
    growth.map_or_else(|| "n/a".to_string(), |g| g.to_string())
}

/// Formats the summary block for one record, one figure per line.
pub fn format_run_summary(stats: &FuzzStats) -> String {
    let mut lines = vec![
        RUN_SUMMARY_HEADER.to_string(),
        format!("Total iterations: {}", stats.iterations()),
        format!("Final coverage: {}", stats.final_coverage()),
        format!("Final transitions: {}", stats.final_transitions()),
        format!("Coverage growth: {}", growth_text(stats.coverage_growth())),
        format!("Transition growth: {}", growth_text(stats.transition_growth())),
        format!("Random traces: {}", stats.random_traces),
        format!("Mutated traces: {}", stats.mutated_traces),
        format!("Total traces: {}", stats.total_traces()),
    ];

    if let Some(final_code_coverage) = stats.final_code_coverage() {
        lines.push(format!("Final code coverage: {}", final_code_coverage));
        lines.push(format!(
            "Code coverage growth: {}",
            growth_text(stats.code_coverage_growth())
        ));
    }

    lines.join("\n")
}

/// One row of the batch summary table.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct ExperimentRow {
    #[tabled(rename = "Experiment")]
    pub label: String,
    #[tabled(rename = "Iterations")]
    pub iterations: usize,
    #[tabled(rename = "Final Cov")]
    pub final_coverage: u64,
    #[tabled(rename = "Final Trans")]
    pub final_transitions: u64,
    #[tabled(rename = "Random")]
    pub random_traces: u64,
    #[tabled(rename = "Mutated")]
    pub mutated_traces: u64,
}

impl From<&Experiment> for ExperimentRow {
    fn from(experiment: &Experiment) -> Self {
        let stats = &experiment.stats;
        Self {
            label: experiment.label.clone(),
            iterations: stats.iterations(),
            final_coverage: stats.final_coverage(),
            final_transitions: stats.final_transitions(),
            random_traces: stats.random_traces,
            mutated_traces: stats.mutated_traces,
        }
    }
}

/// Formats experiments as an ASCII table using the [`tabled`] crate
///
/// # Arguments
/// * `experiments` - The experiments to list, one row each
/// * `title` - Optional title, underlined with `=`
///
/// # Returns
/// A formatted ASCII table as a [`String`]
pub fn format_experiment_table(experiments: &[Experiment], title: Option<&str>) -> String {
    if experiments.is_empty() {
        return "No experiments to summarize".to_string();
    }

    let rows: Vec<ExperimentRow> = experiments.iter().map(ExperimentRow::from).collect();
    let table = Table::new(rows).to_string();

    match title {
        Some(title) => format!("{}\n{}\n{}", title, "=".repeat(title.len()), table),
        None => table,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record() -> FuzzStats {
        FuzzStats {
            coverages: vec![3, 4],
            transitions: vec![0, 6],
            random_traces: 2,
            mutated_traces: 5,
            code_coverage: None,
        }
    }

    fn has_line(summary: &str, expected: &str) -> bool {
        summary.lines().any(|line| line == expected)
    }

    #[test]
    fn run_summary_lists_figures() {
        let summary = format_run_summary(&record());

        assert_eq!(summary.lines().next(), Some(RUN_SUMMARY_HEADER));
        assert_eq!(summary.lines().count(), 9);
        assert!(has_line(&summary, "Total iterations: 2"));
        assert!(has_line(&summary, "Final coverage: 4"));
        assert!(has_line(&summary, "Final transitions: 6"));
        assert!(has_line(&summary, "Coverage growth: 1 (33.3%)"));
        assert!(has_line(&summary, "Transition growth: 6 (n/a)"));
        assert!(has_line(&summary, "Total traces: 7"));
        assert!(!summary.contains("code coverage"));
        assert!(!summary.ends_with('\n'));
    }

    #[test]
    fn run_summary_includes_code_coverage_when_present() {
        let mut stats = record();
        stats.code_coverage = Some(vec![10.0, 12.5]);

        let summary = format_run_summary(&stats);
        assert_eq!(summary.lines().count(), 11);
        assert!(has_line(&summary, "Final code coverage: 12.5"));
        assert!(has_line(&summary, "Code coverage growth: 2.5 (25.0%)"));
    }

    #[test]
    fn run_summary_of_empty_record() {
        let summary = format_run_summary(&FuzzStats::default());
        assert!(has_line(&summary, "Total iterations: 0"));
        assert!(has_line(&summary, "Coverage growth: n/a"));
    }

    #[test]
    fn experiment_table_has_every_label() {
        let experiments: Vec<Experiment> = ["run-a", "run-b"]
            .iter()
            .map(|label| Experiment {
                label: label.to_string(),
                folder: PathBuf::from(label),
                stats: record(),
            })
            .collect();

        let table = format_experiment_table(&experiments, Some("SUMMARY STATISTICS"));
        assert!(table.starts_with("SUMMARY STATISTICS\n=================="));
        for column in ["Experiment", "Iterations", "Final Cov", "Final Trans", "Random", "Mutated"] {
            assert!(table.contains(column), "missing column {column}");
        }
        assert!(table.contains("run-a"));
        assert!(table.contains("run-b"));

        let untitled = format_experiment_table(&experiments, None);
        assert!(!untitled.contains("SUMMARY STATISTICS"));
    }

    #[test]
    fn experiment_table_handles_no_experiments() {
        assert_eq!(
            format_experiment_table(&[], None),
            "No experiments to summarize"
        );
    }
}
