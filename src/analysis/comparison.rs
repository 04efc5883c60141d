//! Comparison charts across experiments
//!
//! This module provides the charts written by batch mode, one file per chart: every
//! experiment's series overlaid on a shared iteration axis, and grouped bars comparing
//! final values per experiment.

use crate::common::palette::{series_colors, ORANGE, SKY_BLUE};
use crate::common::plots::{
    draw_grouped_bars, draw_line_panel, save_chart, series_points_f64, series_points_u64,
    BarGroup, BarOptions, Chart, LineSeriesData, PanelStyle, PanelText, Result,
};
use crate::config::OutputFormat;
use crate::discovery::Experiment;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// Experiment names are written downward so long labels do not collide.
const BAR_OPTIONS: BarOptions = BarOptions {
    headroom: 0.15,
    label_zero: false,
    rotate_labels: true,
};

/// The charts batch mode can produce, with their output file stems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonKind {
    CoverageGrowth,
    TransitionsGrowth,
    FinalCoverageVsTransitions,
    TraceTypes,
    CodeCoverage,
}

impl ComparisonKind {
    pub const ALL: [ComparisonKind; 5] = [
        ComparisonKind::CoverageGrowth,
        ComparisonKind::TransitionsGrowth,
        ComparisonKind::FinalCoverageVsTransitions,
        ComparisonKind::TraceTypes,
        ComparisonKind::CodeCoverage,
    ];

    pub fn file_stem(&self) -> &'static str {
        match self {
            ComparisonKind::CoverageGrowth => "coverage_growth",
            ComparisonKind::TransitionsGrowth => "transitions_growth",
            ComparisonKind::FinalCoverageVsTransitions => "final_coverage_vs_transitions",
            ComparisonKind::TraceTypes => "trace_types_summary",
            ComparisonKind::CodeCoverage => "code_coverage",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ComparisonKind::CoverageGrowth => "Coverage Growth Over Time",
            ComparisonKind::TransitionsGrowth => "Transitions Growth Over Time",
            ComparisonKind::FinalCoverageVsTransitions => "Final Coverage and Transitions",
            ComparisonKind::TraceTypes => "Trace Types Summary",
            ComparisonKind::CodeCoverage => "Code Coverage Over Time",
        }
    }

    /// Whether the chart has anything to show for these experiments.
    pub fn applies_to(&self, experiments: &[Experiment]) -> bool {
        match self {
            ComparisonKind::CoverageGrowth => {
                experiments.iter().any(|e| !e.stats.coverages.is_empty())
            }
            ComparisonKind::TransitionsGrowth => {
                experiments.iter().any(|e| !e.stats.transitions.is_empty())
            }
            ComparisonKind::FinalCoverageVsTransitions => !experiments.is_empty(),
            ComparisonKind::TraceTypes => experiments.iter().any(|e| e.stats.total_traces() > 0),
            ComparisonKind::CodeCoverage => {
                experiments.iter().any(|e| e.stats.code_coverage().is_some())
            }
        }
    }
}

/// One comparison chart over a set of experiments.
pub struct ComparisonChart<'a> {
    kind: ComparisonKind,
    experiments: &'a [Experiment],
    title: String,
}

impl<'a> ComparisonChart<'a> {
    /// `group` names the results subdirectory and is appended to the title when given.
    pub fn new(kind: ComparisonKind, experiments: &'a [Experiment], group: Option<&str>) -> Self {
        let title = match group {
            Some(group) => format!("{} - {}", kind.title(), group),
            None => kind.title().to_string(),
        };

        Self {
            kind,
            experiments,
            title,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn labels(&self) -> Vec<String> {
        self.experiments.iter().map(|e| e.label.clone()).collect()
    }

    fn draw_overlaid<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        y_label: &str,
        points: impl Fn(&Experiment) -> Vec<(f64, f64)>,
    ) -> Result<()> {
        let colors = series_colors(self.experiments.len());
        let series: Vec<LineSeriesData> = self
            .experiments
            .iter()
            .zip(colors)
            .map(|(experiment, color)| LineSeriesData {
                label: &experiment.label,
                color,
                points: points(experiment),
            })
            .collect();

        draw_line_panel(
            area,
            &PanelText {
                title: &self.title,
                x_label: "Iteration",
                y_label,
            },
            &series,
            PanelStyle::COMPARISON,
        )
    }

    fn draw_bars<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        y_label: &str,
        groups: &[BarGroup],
    ) -> Result<()> {
        draw_grouped_bars(
            area,
            &PanelText {
                title: &self.title,
                x_label: "",
                y_label,
            },
            &self.labels(),
            groups,
            BAR_OPTIONS,
            PanelStyle::COMPARISON,
        )
    }
}

impl Chart for ComparisonChart<'_> {
    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<()> {
        match self.kind {
            ComparisonKind::CoverageGrowth => {
                self.draw_overlaid(area, "Coverage Count", |e| {
                    series_points_u64(&e.stats.coverages)
                })
            }
            ComparisonKind::TransitionsGrowth => {
                self.draw_overlaid(area, "Transition Count", |e| {
                    series_points_u64(&e.stats.transitions)
                })
            }
            ComparisonKind::CodeCoverage => self.draw_overlaid(area, "Code Coverage", |e| {
                e.stats.code_coverage().map(series_points_f64).unwrap_or_default()
            }),
            ComparisonKind::FinalCoverageVsTransitions => {
                let (coverages, transitions) = final_values(self.experiments);
                self.draw_bars(
                    area,
                    "Count",
                    &[
                        BarGroup::uniform("Coverage", SKY_BLUE, coverages),
                        BarGroup::uniform("Transitions", ORANGE, transitions),
                    ],
                )
            }
            ComparisonKind::TraceTypes => {
                let (random, mutated) = trace_totals(self.experiments);
                self.draw_bars(
                    area,
                    "Trace Count",
                    &[
                        BarGroup::uniform("Random Traces", SKY_BLUE, random),
                        BarGroup::uniform("Mutated Traces", ORANGE, mutated),
                    ],
                )
            }
        }
    }
}

/// Final coverage and final transitions per experiment, 0 for empty series.
pub fn final_values(experiments: &[Experiment]) -> (Vec<f64>, Vec<f64>) {
    experiments
        .iter()
        .map(|e| {
            (
                e.stats.final_coverage() as f64,
                e.stats.final_transitions() as f64,
            )
        })
        .unzip()
}

/// Random and mutated trace counts per experiment.
pub fn trace_totals(experiments: &[Experiment]) -> (Vec<f64>, Vec<f64>) {
    experiments
        .iter()
        .map(|e| (e.stats.random_traces as f64, e.stats.mutated_traces as f64))
        .unzip()
}

/// Writes every applicable comparison chart into `graphs_dir`
///
/// # Arguments
/// * `experiments` - Loaded experiments, in display order
/// * `graphs_dir` - Directory the chart files are written to
/// * `group` - Results subdirectory name appended to chart titles, if any
/// * `format` - Image format of the chart files
/// * `size` - Size of each chart in pixels
///
/// # Returns
/// * `Ok(Vec<PathBuf>)` - Paths of the files written
/// * `Err(PlotError)` - If any chart failed to render
pub fn generate_comparison_plots(
    experiments: &[Experiment],
    graphs_dir: &Path,
    group: Option<&str>,
    format: OutputFormat,
    size: (u32, u32),
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for kind in ComparisonKind::ALL {
        if !kind.applies_to(experiments) {
            log::debug!("Skipping {}: no data", kind.file_stem());
            continue;
        }

        let output_path = graphs_dir.join(format!("{}.{}", kind.file_stem(), format.extension()));
        save_chart(
            &ComparisonChart::new(kind, experiments, group),
            &output_path,
            format,
            size,
        )?;
        written.push(output_path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::FuzzStats;

    fn experiment(label: &str, coverages: Vec<u64>, random: u64, mutated: u64) -> Experiment {
        Experiment {
            label: label.to_string(),
            folder: PathBuf::from(label),
            stats: FuzzStats {
                transitions: coverages.iter().map(|c| c / 2).collect(),
                coverages,
                random_traces: random,
                mutated_traces: mutated,
                code_coverage: None,
            },
        }
    }

    #[test]
    fn file_stems_are_unique() {
        let mut stems: Vec<_> = ComparisonKind::ALL.iter().map(|k| k.file_stem()).collect();
        stems.sort_unstable();
        stems.dedup();
        assert_eq!(stems.len(), ComparisonKind::ALL.len());
    }

    #[test]
    fn title_includes_group() {
        let experiments = vec![experiment("run1", vec![1, 2], 0, 0)];
        let chart = ComparisonChart::new(ComparisonKind::CoverageGrowth, &experiments, Some("raft"));
        assert_eq!(chart.title(), "Coverage Growth Over Time - raft");

        let chart = ComparisonChart::new(ComparisonKind::TraceTypes, &experiments, None);
        assert_eq!(chart.title(), "Trace Types Summary");
    }

    #[test]
    fn charts_without_data_are_skipped() {
        let experiments = vec![
            experiment("run1", vec![], 0, 0),
            experiment("run2", vec![], 0, 0),
        ];

        assert!(!ComparisonKind::CoverageGrowth.applies_to(&experiments));
        assert!(!ComparisonKind::TraceTypes.applies_to(&experiments));
        assert!(!ComparisonKind::CodeCoverage.applies_to(&experiments));
        assert!(ComparisonKind::FinalCoverageVsTransitions.applies_to(&experiments));
        assert!(!ComparisonKind::FinalCoverageVsTransitions.applies_to(&[]));
    }

    #[test]
    fn code_coverage_applies_when_any_experiment_has_it() {
        let mut with_code = experiment("run2", vec![1], 1, 1);
        with_code.stats.code_coverage = Some(vec![3.0]);
        let experiments = vec![experiment("run1", vec![1], 1, 1), with_code];

        assert!(ComparisonKind::CodeCoverage.applies_to(&experiments));
    }

    #[test]
    fn final_values_default_to_zero() {
        let experiments = vec![
            experiment("run1", vec![2, 8], 1, 2),
            experiment("run2", vec![], 3, 4),
        ];

        let (coverages, transitions) = final_values(&experiments);
        assert_eq!(coverages, vec![8.0, 0.0]);
        assert_eq!(transitions, vec![4.0, 0.0]);

        let (random, mutated) = trace_totals(&experiments);
        assert_eq!(random, vec![1.0, 3.0]);
        assert_eq!(mutated, vec![2.0, 4.0]);
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn writes_all_applicable_charts() {
        let dir = tempfile::tempdir().unwrap();
        let experiments = vec![
            experiment("run1", vec![1, 4, 9], 2, 3),
            experiment("run2", vec![2, 3, 5, 7], 4, 1),
        ];

        let written = generate_comparison_plots(
            &experiments,
            dir.path(),
            Some("raft"),
            OutputFormat::Png,
            (1200, 800),
        )
        .unwrap();

        assert_eq!(written.len(), 4);
        assert!(dir.path().join("coverage_growth.png").exists());
        assert!(dir.path().join("trace_types_summary.png").exists());
        assert!(!dir.path().join("code_coverage.png").exists());
    }
}
