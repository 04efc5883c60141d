//! Plotting infrastructure shared by the dashboard and the comparison charts
//!
//! This module provides the [`Chart`] seam every chart implements, writing a chart to disk
//! as PNG or SVG using the [`plotters`] crate, and the panel primitives the charts are
//! assembled from: overlaid line series, a colored scatter with a color bar, and grouped
//! bar charts with value labels.

use crate::common::palette::viridis;
use crate::config::OutputFormat;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub(crate) type Result<T> = core::result::Result<T, PlotError>;

pub(crate) const FONT: &str = "sans-serif";

/// A chart that can be drawn onto any plotters backend.
pub trait Chart {
    /// Draws the chart onto `area`. The area has already been cleared to white.
    fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<()>;
}

/// Renders `chart` into `output_path`
///
/// # Arguments
/// * `chart` - The chart to draw
/// * `output_path` - Destination file, its extension should match `format`
/// * `format` - PNG through the bitmap backend or SVG through the vector backend
/// * `size` - Image size in pixels
///
/// # Returns
/// * `Ok(())` - If the chart was drawn and written
/// * `Err(PlotError)` - If drawing or writing failed
pub fn save_chart<C: Chart>(
    chart: &C,
    output_path: &Path,
    format: OutputFormat,
    size: (u32, u32),
) -> Result<()> {
    if size.0 == 0 || size.1 == 0 {
        return Err(PlotError::InvalidData(format!(
            "Image size {}x{} is empty",
            size.0, size.1
        )));
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    match format {
        OutputFormat::Png => {
            let root = BitMapBackend::new(output_path, size).into_drawing_area();
            draw_and_present(chart, &root)?;
        }
        OutputFormat::Svg => {
            let root = SVGBackend::new(output_path, size).into_drawing_area();
            draw_and_present(chart, &root)?;
        }
    }

    log::debug!("Wrote {}", output_path.display());
    Ok(())
}

fn draw_and_present<DB: DrawingBackend, C: Chart>(
    chart: &C,
    root: &DrawingArea<DB, Shift>,
) -> Result<()> {
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    chart.draw(root)?;

    // Ensure everything is properly rendered and saved
    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Upper bound of a value axis: the maximum plus `headroom` (a fraction), never zero.
pub fn axis_upper(max_value: f64, headroom: f64) -> f64 {
    if max_value.is_finite() && max_value > 0.0 {
        max_value * (1.0 + headroom)
    } else {
        1.0
    }
}

/// Turns an integer series into `(iteration, value)` points.
pub fn series_points_u64(series: &[u64]) -> Vec<(f64, f64)> {
    series
        .iter()
        .enumerate()
        .map(|(iteration, &value)| (iteration as f64, value as f64))
        .collect()
}

/// Turns a float series into `(iteration, value)` points.
pub fn series_points_f64(series: &[f64]) -> Vec<(f64, f64)> {
    series
        .iter()
        .enumerate()
        .map(|(iteration, &value)| (iteration as f64, value))
        .collect()
}

/// One labelled line on a line panel.
pub struct LineSeriesData<'a> {
    pub label: &'a str,
    pub color: RGBColor,
    pub points: Vec<(f64, f64)>,
}

/// Axis and title text of a panel.
pub struct PanelText<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
}

/// Sizes of fonts, margins and strokes; the dashboard packs panels tighter than the
/// standalone comparison charts.
#[derive(Debug, Clone, Copy)]
pub struct PanelStyle {
    pub caption_size: i32,
    pub label_size: i32,
    pub value_size: i32,
    pub stroke_width: u32,
}

impl PanelStyle {
    pub const DASHBOARD: PanelStyle = PanelStyle {
        caption_size: 24,
        label_size: 16,
        value_size: 16,
        stroke_width: 2,
    };

    pub const COMPARISON: PanelStyle = PanelStyle {
        caption_size: 32,
        label_size: 20,
        value_size: 18,
        stroke_width: 3,
    };
}

/// Draws one or more line series over a shared iteration axis with a grid and legend.
///
/// Series with no points are left out; an all-empty panel still gets its axes.
pub fn draw_line_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &PanelText,
    series: &[LineSeriesData],
    style: PanelStyle,
) -> Result<()> {
    let longest = series.iter().map(|s| s.points.len()).max().unwrap_or(0);
    let x_max = longest.saturating_sub(1).max(1) as f64;
    let y_max = series
        .iter()
        .flat_map(|s| s.points.iter().map(|(_, y)| *y))
        .fold(0.0, f64::max);

    let mut chart = ChartBuilder::on(area)
        .caption(text.title, (FONT, style.caption_size))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(0.0..x_max, 0.0..axis_upper(y_max, 0.05))
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(text.x_label)
        .y_desc(text.y_label)
        .bold_line_style(BLACK.mix(0.3))
        .light_line_style(WHITE)
        .label_style((FONT, style.label_size))
        .x_label_formatter(&|x| format!("{:.0}", x))
        .y_label_formatter(&|y| format_tick(*y))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let mut has_legend = false;
    for line in series.iter().filter(|s| !s.points.is_empty()) {
        let color = line.color;
        let stroke = style.stroke_width;
        chart
            .draw_series(LineSeries::new(
                line.points.iter().copied(),
                color.mix(0.9).stroke_width(stroke),
            ))
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(line.label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(stroke))
            });
        has_legend = true;
    }

    if has_legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font((FONT, style.label_size))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    Ok(())
}

/// Width in pixels reserved for the color bar next to a scatter panel.
const COLOR_BAR_WIDTH: u32 = 110;

/// Number of bands the color bar is drawn with.
const COLOR_BAR_STEPS: usize = 64;

/// Scatter of `(x, y)` points colored by their index on a viridis ramp, with a color bar
/// labelled `color_label` on the right.
pub fn draw_colored_scatter<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &PanelText,
    color_label: &str,
    points: &[(f64, f64)],
    style: PanelStyle,
) -> Result<()> {
    let (width, _) = area.dim_in_pixel();
    let (plot_area, bar_area) = area.split_horizontally(width.saturating_sub(COLOR_BAR_WIDTH) as i32);

    let x_max = points.iter().map(|(x, _)| *x).fold(0.0, f64::max);
    let y_max = points.iter().map(|(_, y)| *y).fold(0.0, f64::max);
    let last_index = points.len().saturating_sub(1).max(1) as f64;

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(text.title, (FONT, style.caption_size))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(0.0..axis_upper(x_max, 0.05), 0.0..axis_upper(y_max, 0.05))
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(text.x_label)
        .y_desc(text.y_label)
        .bold_line_style(BLACK.mix(0.3))
        .light_line_style(WHITE)
        .label_style((FONT, style.label_size))
        .x_label_formatter(&|x| format_tick(*x))
        .y_label_formatter(&|y| format_tick(*y))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(points.iter().enumerate().map(|(index, &point)| {
            let color = viridis(index as f64 / last_index);
            Circle::new(point, 4, color.mix(0.6).filled())
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    draw_color_bar(&bar_area, color_label, last_index, style)
}

fn draw_color_bar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    label: &str,
    max_value: f64,
    style: PanelStyle,
) -> Result<()> {
    // Leaves room for the caption of the neighbouring panel
    let mut chart = ChartBuilder::on(area)
        .margin_top(15 + style.caption_size)
        .margin_bottom(65)
        .margin_right(10)
        .y_label_area_size(75)
        .build_cartesian_2d(0.0..1.0, 0.0..max_value)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc(label)
        .label_style((FONT, style.label_size))
        .y_label_formatter(&|y| format!("{:.0}", y))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let band = max_value / COLOR_BAR_STEPS as f64;
    chart
        .draw_series((0..COLOR_BAR_STEPS).map(|step| {
            let low = step as f64 * band;
            let color = viridis(step as f64 / (COLOR_BAR_STEPS - 1) as f64);
            Rectangle::new([(0.0, low), (1.0, low + band)], color.filled())
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// One bar series of a grouped bar chart: a value per category.
pub struct BarGroup<'a> {
    pub label: &'a str,
    /// One color for the whole series, or one per category.
    pub colors: Vec<RGBColor>,
    pub values: Vec<f64>,
}

impl<'a> BarGroup<'a> {
    pub fn uniform(label: &'a str, color: RGBColor, values: Vec<f64>) -> Self {
        Self {
            label,
            colors: vec![color],
            values,
        }
    }

    pub fn color_at(&self, category: usize) -> RGBColor {
        self.colors
            .get(category)
            .or_else(|| self.colors.first())
            .copied()
            .unwrap_or(BLACK)
    }
}

/// Horizontal layout of a grouped bar chart with `series_count` bars per category.
///
/// Categories sit at integer positions; bars of one category share `group_width`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLayout {
    pub series_count: usize,
    pub group_width: f64,
}

impl BarLayout {
    pub fn new(series_count: usize) -> Self {
        // A single series (e.g. trace types) gets wider bars
        let group_width = if series_count <= 1 { 0.6 } else { 0.8 };
        Self {
            series_count: series_count.max(1),
            group_width,
        }
    }

    pub fn bar_width(&self) -> f64 {
        self.group_width / self.series_count as f64
    }

    /// `(left, right)` edges of bar `series` in category `category`.
    pub fn bar_span(&self, category: usize, series: usize) -> (f64, f64) {
        let left = category as f64 - self.group_width / 2.0 + series as f64 * self.bar_width();
        (left, left + self.bar_width())
    }
}

/// How a grouped bar chart labels its axis and bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarOptions {
    /// Fraction added above the tallest bar
    pub headroom: f64,
    /// Print a value above bars of height zero too
    pub label_zero: bool,
    /// Write category names downward under the axis instead of horizontally
    pub rotate_labels: bool,
}

/// Gap in pixels between the axis and a rotated category name.
const ROTATED_LABEL_GAP: i32 = 8;

/// Grouped bar chart: one group per category, one bar per [`BarGroup`], bars annotated with
/// their value as [`BarOptions`] asks.
pub fn draw_grouped_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &PanelText,
    categories: &[String],
    groups: &[BarGroup],
    options: BarOptions,
    style: PanelStyle,
) -> Result<()> {
    if groups.iter().any(|g| g.values.len() != categories.len()) {
        return Err(PlotError::InvalidData(
            "Every bar series needs one value per category".to_string(),
        ));
    }

    let layout = BarLayout::new(groups.len());
    let y_max = groups
        .iter()
        .flat_map(|g| g.values.iter().copied())
        .fold(0.0, f64::max);
    let y_upper = axis_upper(y_max, options.headroom);
    let x_range = -0.5..(categories.len().max(1) as f64 - 0.5);
    let x_label_area = if options.rotate_labels {
        rotated_label_area(categories, style.label_size)
    } else {
        60
    };

    let mut chart = ChartBuilder::on(area)
        .caption(text.title, (FONT, style.caption_size))
        .margin(15)
        .x_label_area_size(x_label_area)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range, 0.0..y_upper)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    // Rotated names are drawn below, the mesh only keeps the ticks
    let label_formatter = |x: &f64| {
        if options.rotate_labels {
            String::new()
        } else {
            category_label(categories, *x)
        }
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .bold_line_style(BLACK.mix(0.3))
        .light_line_style(WHITE)
        .x_labels(categories.len() * 2 + 2)
        .x_label_formatter(&label_formatter)
        .x_desc(text.x_label)
        .y_desc(text.y_label)
        .label_style((FONT, style.label_size))
        .y_label_formatter(&|y| format_tick(*y))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    if options.rotate_labels {
        let (base_x, base_y) = area.get_base_pixel();
        let anchors: Vec<(i32, i32)> = (0..categories.len())
            .map(|category| {
                let (x, y) = chart.backend_coord(&(category as f64, 0.0));
                (x - base_x, y - base_y + ROTATED_LABEL_GAP)
            })
            .collect();
        draw_rotated_labels(area, categories, &anchors, style.label_size)?;
    }

    for (series, group) in groups.iter().enumerate() {
        let color = group.color_at(0);
        chart
            .draw_series(group.values.iter().enumerate().map(|(category, &value)| {
                let (left, right) = layout.bar_span(category, series);
                let fill = group.color_at(category).mix(0.8).filled();
                Rectangle::new([(left, 0.0), (right, value)], fill)
            }))
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(group.label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], color.filled()));

        let value_style = (FONT, style.value_size)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart
            .draw_series(
                labelled_values(&group.values, options.label_zero)
                    .into_iter()
                    .map(|(category, value)| {
                        let (left, right) = layout.bar_span(category, series);
                        Text::new(
                            format_tick(value),
                            ((left + right) / 2.0, value + y_max * 0.01),
                            value_style.clone(),
                        )
                    }),
            )
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    if groups.len() > 1 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font((FONT, style.label_size))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    Ok(())
}

/// `(category, value)` of the bars that get a value printed above them.
pub fn labelled_values(values: &[f64], label_zero: bool) -> Vec<(usize, f64)> {
    values
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, value)| label_zero || value > 0.0)
        .collect()
}

/// Height of the x label area that fits the longest category name written downward.
pub fn rotated_label_area(categories: &[String], label_size: i32) -> u32 {
    let longest = categories
        .iter()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0) as f64;
    // Glyphs average a little over half the font size in width
    let needed = longest * label_size as f64 * 0.6 + 2.0 * ROTATED_LABEL_GAP as f64;
    (needed.ceil() as u32).clamp(60, 320)
}

/// Writes each category name downward from its anchor, a quarter turn clockwise.
fn draw_rotated_labels<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    categories: &[String],
    anchors: &[(i32, i32)],
    label_size: i32,
) -> Result<()> {
    let label_style = (FONT, label_size)
        .into_font()
        .transform(FontTransform::Rotate90)
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));

    for (category, &anchor) in categories.iter().zip(anchors) {
        area.draw(&Text::new(category.as_str(), anchor, label_style.clone()))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    Ok(())
}

/// Category name for an x-axis tick; ticks between categories stay blank.
pub fn category_label(categories: &[String], x: f64) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }

    categories
        .get(nearest as usize)
        .cloned()
        .unwrap_or_default()
}

/// Formats an axis tick or bar value without a trailing `.0` for whole numbers.
pub fn format_tick(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{:.0}", value)
    } else if value.abs() >= 100.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.2}", value)
    }
}
