//! Colors used across the charts.

use plotters::style::RGBColor;

pub const COVERAGE_BLUE: RGBColor = RGBColor(31, 119, 180);
pub const TRANSITION_RED: RGBColor = RGBColor(214, 39, 40);
pub const CODE_COVERAGE_GREEN: RGBColor = RGBColor(44, 160, 44);
pub const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
pub const ORANGE: RGBColor = RGBColor(255, 165, 0);

/// Qualitative palette for overlaying one series per experiment.
const TAB10: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Picks `count` colors spread evenly over the qualitative palette.
///
/// With more than ten series colors repeat.
pub fn series_colors(count: usize) -> Vec<RGBColor> {
    match count {
        0 => Vec::new(),
        1 => vec![TAB10[0]],
        _ => (0..count)
            .map(|i| {
                // Same spacing as sampling the palette at linspace(0, 1, count)
                let t = i as f64 / (count - 1) as f64;
                TAB10[((t * (TAB10.len() - 1) as f64).round() as usize).min(TAB10.len() - 1)]
            })
            .collect(),
    }
}

/// Viridis anchors at t = 0, 0.25, 0.5, 0.75, 1.
const VIRIDIS: [(f64, f64, f64); 5] = [
    (68.0, 1.0, 84.0),
    (59.0, 82.0, 139.0),
    (33.0, 145.0, 140.0),
    (94.0, 201.0, 98.0),
    (253.0, 231.0, 37.0),
];

/// Maps `t` in 0.0-1.0 onto a viridis ramp, dark purple to yellow.
pub fn viridis(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let index = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let s = scaled - index as f64;

    let (r0, g0, b0) = VIRIDIS[index];
    let (r1, g1, b1) = VIRIDIS[index + 1];
    let lerp = |a: f64, b: f64| (a + (b - a) * s).round() as u8;

    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viridis_endpoints() {
        assert_eq!(viridis(0.0), RGBColor(68, 1, 84));
        assert_eq!(viridis(1.0), RGBColor(253, 231, 37));
        assert_eq!(viridis(0.5), RGBColor(33, 145, 140));
    }

    #[test]
    fn viridis_clamps_out_of_range() {
        assert_eq!(viridis(-3.0), viridis(0.0));
        assert_eq!(viridis(7.0), viridis(1.0));
        assert_eq!(viridis(f64::NAN), viridis(0.0));
    }

    #[test]
    fn series_colors_spread_over_palette() {
        assert!(series_colors(0).is_empty());
        assert_eq!(series_colors(1), vec![TAB10[0]]);
        assert_eq!(series_colors(2), vec![TAB10[0], TAB10[9]]);

        let many = series_colors(25);
        assert_eq!(many.len(), 25);
        assert_eq!(many[0], TAB10[0]);
        assert_eq!(many[24], TAB10[9]);
    }
}
