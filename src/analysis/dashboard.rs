//! Single-run dashboard
//!
//! Lays out the charts for one statistics record on a single image: coverage and
//! transition growth, their scatter colored by iteration, the trace type bars and, when the
//! fuzzer collected it, code coverage growth.

use crate::common::palette::{CODE_COVERAGE_GREEN, COVERAGE_BLUE, ORANGE, SKY_BLUE, TRANSITION_RED};
use crate::common::plots::{
    draw_colored_scatter, draw_grouped_bars, draw_line_panel, series_points_f64,
    series_points_u64, BarGroup, BarOptions, Chart, LineSeriesData, PanelStyle, PanelText,
    PlotError, Result,
};
use crate::stats::FuzzStats;
use plotters::coord::Shift;
use plotters::prelude::*;

/// Panels shown on the dashboard, in grid order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    CoverageGrowth,
    TransitionGrowth,
    CoverageVsTransitions,
    TraceTypes,
    CodeCoverage,
}

/// All panels of one dashboard, laid out two per row.
#[derive(Debug)]
pub struct Dashboard<'a> {
    stats: &'a FuzzStats,
}

impl<'a> Dashboard<'a> {
    pub const COLUMNS: usize = 2;

    pub fn new(stats: &'a FuzzStats) -> Self {
        Self { stats }
    }

    /// Panels in drawing order; code coverage only when present.
    pub fn panels(&self) -> Vec<Panel> {
        let mut panels = vec![
            Panel::CoverageGrowth,
            Panel::TransitionGrowth,
            Panel::CoverageVsTransitions,
            Panel::TraceTypes,
        ];
        if self.stats.code_coverage().is_some() {
            panels.push(Panel::CodeCoverage);
        }
        panels
    }

    /// `(rows, columns)` of the grid holding [`Self::panels`].
    pub fn grid(&self) -> (usize, usize) {
        let rows = self.panels().len().div_ceil(Self::COLUMNS);
        (rows, Self::COLUMNS)
    }

    fn draw_panel<DB: DrawingBackend>(
        &self,
        panel: Panel,
        area: &DrawingArea<DB, Shift>,
    ) -> Result<()> {
        let style = PanelStyle::DASHBOARD;
        let stats = self.stats;

        match panel {
            Panel::CoverageGrowth => draw_line_panel(
                area,
                &PanelText {
                    title: "Coverage Growth Over Time",
                    x_label: "Iteration",
                    y_label: "Coverage Count",
                },
                &[LineSeriesData {
                    label: "Coverage",
                    color: COVERAGE_BLUE,
                    points: series_points_u64(&stats.coverages),
                }],
                style,
            ),
            Panel::TransitionGrowth => draw_line_panel(
                area,
                &PanelText {
                    title: "Transitions Growth Over Time",
                    x_label: "Iteration",
                    y_label: "Transition Count",
                },
                &[LineSeriesData {
                    label: "Transitions",
                    color: TRANSITION_RED,
                    points: series_points_u64(&stats.transitions),
                }],
                style,
            ),
            Panel::CoverageVsTransitions => draw_colored_scatter(
                area,
                &PanelText {
                    title: "Coverage vs Transitions (colored by iteration)",
                    x_label: "Coverage Count",
                    y_label: "Transition Count",
                },
                "Iteration",
                &coverage_transition_pairs(stats),
                style,
            ),
            Panel::TraceTypes => draw_trace_types(area, stats, style),
            Panel::CodeCoverage => {
                let series = stats.code_coverage().ok_or_else(|| {
                    PlotError::InvalidData("Record has no code coverage".to_string())
                })?;
                draw_line_panel(
                    area,
                    &PanelText {
                        title: "Code Coverage Over Time",
                        x_label: "Iteration",
                        y_label: "Code Coverage",
                    },
                    &[LineSeriesData {
                        label: "Code Coverage",
                        color: CODE_COVERAGE_GREEN,
                        points: series_points_f64(series),
                    }],
                    style,
                )
            }
        }
    }
}

impl Chart for Dashboard<'_> {
    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<()> {
        let cells = area.split_evenly(self.grid());

        // Cells past the last panel are left blank
        for (panel, cell) in self.panels().into_iter().zip(cells.iter()) {
            self.draw_panel(panel, cell)?;
        }

        Ok(())
    }
}

/// `(coverage, transitions)` per iteration, truncated to the shorter series.
pub fn coverage_transition_pairs(stats: &FuzzStats) -> Vec<(f64, f64)> {
    stats
        .coverages
        .iter()
        .zip(&stats.transitions)
        .map(|(&coverage, &transitions)| (coverage as f64, transitions as f64))
        .collect()
}

fn draw_trace_types<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    stats: &FuzzStats,
    style: PanelStyle,
) -> Result<()> {
    let categories = ["Random Traces".to_string(), "Mutated Traces".to_string()];
    let counts = BarGroup {
        label: "Trace Count",
        colors: vec![SKY_BLUE, ORANGE],
        values: vec![stats.random_traces as f64, stats.mutated_traces as f64],
    };

    draw_grouped_bars(
        area,
        &PanelText {
            title: "Trace Type Summary",
            x_label: "",
            y_label: "Trace Count",
        },
        &categories,
        &[counts],
        BarOptions {
            headroom: 0.1,
            label_zero: true,
            rotate_labels: false,
        },
        style,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(code_coverage: Option<Vec<f64>>) -> FuzzStats {
        FuzzStats {
            coverages: vec![1, 2, 4],
            transitions: vec![1, 3],
            random_traces: 2,
            mutated_traces: 5,
            code_coverage,
        }
    }

    #[test]
    fn four_panels_without_code_coverage() {
        let record = stats(None);
        let dashboard = Dashboard::new(&record);

        assert_eq!(dashboard.panels().len(), 4);
        assert!(!dashboard.panels().contains(&Panel::CodeCoverage));
        assert_eq!(dashboard.grid(), (2, 2));
    }

    #[test]
    fn empty_code_coverage_counts_as_missing() {
        let record = stats(Some(Vec::new()));
        assert_eq!(Dashboard::new(&record).grid(), (2, 2));
    }

    #[test]
    fn code_coverage_adds_third_row() {
        let record = stats(Some(vec![10.0, 20.0, 30.0]));
        let dashboard = Dashboard::new(&record);

        assert_eq!(dashboard.panels().last(), Some(&Panel::CodeCoverage));
        assert_eq!(dashboard.grid(), (3, 2));
    }

    #[test]
    fn scatter_pairs_stop_at_shorter_series() {
        let record = stats(None);
        assert_eq!(
            coverage_transition_pairs(&record),
            vec![(1.0, 1.0), (2.0, 3.0)]
        );
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn zero_trace_count_is_labelled() {
        use crate::common::plots::save_chart;
        use crate::config::OutputFormat;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("dashboard.svg");
        let record = FuzzStats {
            coverages: vec![1, 2],
            transitions: vec![1, 2],
            random_traces: 7,
            mutated_traces: 0,
            code_coverage: None,
        };

        save_chart(&Dashboard::new(&record), &output, OutputFormat::Svg, (1500, 1200)).unwrap();
        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains(">7</text>"));
        assert!(content.contains(">0</text>"));
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn renders_dashboard_png() {
        use crate::common::plots::save_chart;
        use crate::config::OutputFormat;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("dashboard.png");
        let record = stats(Some(vec![10.0, 20.0, 30.0]));

        save_chart(&Dashboard::new(&record), &output, OutputFormat::Png, (1500, 1200)).unwrap();
        assert!(output.exists());
    }
}
