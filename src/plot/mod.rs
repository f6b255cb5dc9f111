//! Plot construction: chart kinds, overlay geometry and rendering.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use owo_colors::OwoColorize;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use polars::prelude::{DataFrame, DataType};

use crate::settings::Settings;
use crate::utils;

const MARKER_BLUE: RGBColor = RGBColor(31, 119, 180);
const HOLE_GREEN: RGBColor = RGBColor(0, 100, 0);
const RING_ORANGE: RGBColor = RGBColor(255, 165, 0);

const MARGIN: u32 = 20;
const X_LABEL_AREA: u32 = 40;
const Y_LABEL_AREA: u32 = 60;
const CAPTION_HEIGHT: u32 = 30;
const CIRCLE_SEGMENTS: usize = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PlotKind {
    Scatter,
    Line,
    Bar,
}

/// Concentric circles drawn on top of the chart, independent of the data
/// series. Purely additive; an empty geometry draws nothing.
#[derive(Debug, Clone, Default)]
pub struct OverlayGeometry {
    pub center: (f64, f64),
    pub hole_radius: Option<f64>,
    pub ring_radii: Vec<f64>,
}

impl OverlayGeometry {
    pub fn is_empty(&self) -> bool {
        self.hole_radius.is_none() && self.ring_radii.is_empty()
    }

    /// Largest extent away from the center, for axis-range computation.
    fn max_radius(&self) -> f64 {
        self.ring_radii
            .iter()
            .copied()
            .chain(self.hole_radius)
            .fold(0.0, f64::max)
    }
}

/// Everything needed to render one chart, resolved and validated from the
/// settings before any drawing starts.
#[derive(Debug, Clone)]
pub struct PlotSpec {
    pub kind: PlotKind,
    pub x: Option<String>,
    pub y: Option<String>,
    pub title: Option<String>,
    pub limit: Option<usize>,
    pub save: Option<PathBuf>,
    pub overlays: OverlayGeometry,
}

impl PlotSpec {
    /// Build the spec when a plot kind is requested; `None` otherwise.
    /// Ring radii are parsed here so bad input fails before any chart work.
    pub fn from_settings(settings: &Settings) -> Result<Option<Self>> {
        let kind = match settings.plot {
            Some(kind) => kind,
            None => return Ok(None),
        };
        let mut overlays = OverlayGeometry {
            center: (settings.hole_x, settings.hole_y),
            ..Default::default()
        };
        if settings.hole {
            overlays.hole_radius = Some(settings.hole_r);
        }
        if settings.rings {
            overlays.ring_radii = parse_ring_radii(settings.ring_radii.as_deref())?;
        }
        Ok(Some(Self {
            kind,
            x: settings.x.clone(),
            y: settings.y.clone(),
            title: settings.title.clone(),
            limit: settings.limit,
            save: settings.save.clone(),
            overlays,
        }))
    }

    /// All supported kinds need both axes.
    pub fn axes(&self) -> Result<(&str, &str)> {
        match (self.x.as_deref(), self.y.as_deref()) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => bail!("Plotting requires both --x and --y (or CSVQL_X/CSVQL_Y)"),
        }
    }
}

/// Parse a comma-separated radius list. Blank chunks are skipped; a
/// non-numeric chunk is a fatal input error naming the chunk.
pub fn parse_ring_radii(raw: Option<&str>) -> Result<Vec<f64>> {
    let raw = match raw {
        Some(r) => r,
        None => return Ok(Vec::new()),
    };
    let mut radii = Vec::new();
    for chunk in raw.split(',') {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }
        let radius = chunk
            .parse::<f64>()
            .map_err(|_| anyhow!("Invalid ring radius: {}", chunk))?;
        radii.push(radius);
    }
    Ok(radii)
}

/// Fail fatally, naming every requested column absent from the result set.
pub fn require_columns(requested: &[&str], available: &[&str]) -> Result<()> {
    let missing: Vec<&str> = requested
        .iter()
        .copied()
        .filter(|c| !c.is_empty() && !available.contains(c))
        .collect();
    if !missing.is_empty() {
        bail!("Missing columns in result set: {}", missing.join(", "));
    }
    Ok(())
}

/// Render the chart for `settings` if one was requested.
pub fn maybe_plot(df: &DataFrame, settings: &Settings) -> Result<()> {
    let spec = match PlotSpec::from_settings(settings)? {
        Some(spec) => spec,
        None => return Ok(()),
    };
    render(df, &spec)
}

/// Validate the spec against the result set and draw the chart.
pub fn render(df: &DataFrame, spec: &PlotSpec) -> Result<()> {
    let (x_col, y_col) = spec.axes()?;
    require_columns(&[x_col, y_col], &df.get_column_names_str())?;

    let plot_df = match spec.limit {
        Some(0) => bail!("--limit must be a positive integer"),
        Some(limit) => df.head(Some(limit)),
        None => df.clone(),
    };

    let xs = numeric_series(&plot_df, x_col)?;
    let ys = numeric_series(&plot_df, y_col)?;
    let points: Vec<(f64, f64)> = xs
        .into_iter()
        .zip(ys)
        .filter_map(|(x, y)| Some((x?, y?)))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();

    match &spec.save {
        Some(path) => {
            draw(&points, spec, path, x_col, y_col)?;
            println!("Saved plot to {}", path.display().green());
        }
        None => {
            let tmp = tempfile::Builder::new()
                .prefix("csvql-plot-")
                .suffix(".png")
                .tempfile()?;
            let (_file, path) = tmp
                .keep()
                .map_err(|e| anyhow!("Failed to keep plot file: {}", e))?;
            draw(&points, spec, &path, x_col, y_col)?;
            utils::open_in_viewer(&path)?;
            println!("Opened plot {}", path.display().green());
        }
    }
    Ok(())
}

/// Extract a column as f64 values, null-preserving.
fn numeric_series(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)
        .map_err(|_| anyhow!("Column is not numeric: {}", name))?;
    Ok(series.f64()?.into_iter().collect())
}

fn draw(points: &[(f64, f64)], spec: &PlotSpec, out: &Path, x_col: &str, y_col: &str) -> Result<()> {
    let overlays = &spec.overlays;
    let equal_scale = !overlays.is_empty();
    let (width, height): (u32, u32) = if equal_scale { (860, 860) } else { (860, 660) };

    let (x_range, y_range) = axis_ranges(points, spec, (width, height));

    let root = BitMapBackend::new(out, (width, height)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| anyhow!("Failed to render plot: {}", e))?;

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(MARGIN)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA);
    if let Some(title) = &spec.title {
        builder.caption(title, ("sans-serif", 22));
    }
    let mut chart = builder
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| anyhow!("Failed to build chart: {}", e))?;

    chart
        .configure_mesh()
        .x_desc(x_col)
        .y_desc(y_col)
        .light_line_style(BLACK.mix(0.08))
        .draw()
        .map_err(|e| anyhow!("Failed to draw axes: {}", e))?;

    match spec.kind {
        PlotKind::Scatter => {
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&pt| Circle::new(pt, 4, MARKER_BLUE.mix(0.8).filled())),
                )
                .map_err(|e| anyhow!("Failed to draw series: {}", e))?;
        }
        PlotKind::Line => {
            chart
                .draw_series(LineSeries::new(points.iter().copied(), &MARKER_BLUE))
                .map_err(|e| anyhow!("Failed to draw series: {}", e))?;
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&pt| Circle::new(pt, 3, MARKER_BLUE.filled())),
                )
                .map_err(|e| anyhow!("Failed to draw series: {}", e))?;
        }
        PlotKind::Bar => {
            let half = bar_half_width(points);
            chart
                .draw_series(points.iter().map(|&(x, y)| {
                    Rectangle::new(
                        [(x - half, y.min(0.0)), (x + half, y.max(0.0))],
                        MARKER_BLUE.mix(0.6).filled(),
                    )
                }))
                .map_err(|e| anyhow!("Failed to draw series: {}", e))?;
        }
    }

    let (cx, cy) = overlays.center;
    if let Some(radius) = overlays.hole_radius {
        chart
            .draw_series(LineSeries::new(
                circle_points(cx, cy, radius),
                HOLE_GREEN.stroke_width(2),
            ))
            .map_err(|e| anyhow!("Failed to draw hole overlay: {}", e))?;
    }
    for (idx, &radius) in overlays.ring_radii.iter().enumerate() {
        chart
            .draw_series(DashedLineSeries::new(
                circle_points(cx, cy, radius),
                6,
                4,
                RING_ORANGE.stroke_width(1),
            ))
            .map_err(|e| anyhow!("Failed to draw ring overlay: {}", e))?;
        let label = format!("Ring {}", idx + 1);
        chart
            .draw_series(std::iter::once(Text::new(
                label,
                (cx, cy + radius),
                ("sans-serif", 14).into_font().color(&RING_ORANGE),
            )))
            .map_err(|e| anyhow!("Failed to draw ring label: {}", e))?;
    }

    root.present()
        .map_err(|e| anyhow!("Failed to write plot to {}: {}", out.display(), e))?;
    Ok(())
}

/// Axis ranges for the data plus overlays. With overlays present both axes
/// share one data span, scaled by the plot area's pixel aspect so circles
/// come out round.
fn axis_ranges(
    points: &[(f64, f64)],
    spec: &PlotSpec,
    (width, height): (u32, u32),
) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let overlays = &spec.overlays;
    let mut bounds = Bounds::default();
    for &(x, y) in points {
        bounds.add(x, y);
    }
    if !overlays.is_empty() {
        let (cx, cy) = overlays.center;
        let r = overlays.max_radius();
        bounds.add(cx - r, cy - r);
        bounds.add(cx + r, cy + r);
    }
    if spec.kind == PlotKind::Bar {
        // Bars grow from a zero baseline.
        let x = points.first().map(|p| p.0).unwrap_or(0.0);
        bounds.add(x, 0.0);
    }
    let (x_min, x_max, y_min, y_max) = bounds.finish();

    if overlays.is_empty() {
        return (pad_range(x_min, x_max), pad_range(y_min, y_max));
    }

    let caption = if spec.title.is_some() { CAPTION_HEIGHT } else { 0 };
    let plot_w = (width - 2 * MARGIN - Y_LABEL_AREA) as f64;
    let plot_h = (height - 2 * MARGIN - X_LABEL_AREA - caption) as f64;
    let span = (x_max - x_min).max(y_max - y_min).max(1e-9) * 1.05;
    let span_y = span;
    let span_x = span * plot_w / plot_h;
    let cx = (x_min + x_max) / 2.0;
    let cy = (y_min + y_max) / 2.0;
    (
        cx - span_x / 2.0..cx + span_x / 2.0,
        cy - span_y / 2.0..cy + span_y / 2.0,
    )
}

#[derive(Debug)]
struct Bounds {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
        }
    }
}

impl Bounds {
    fn add(&mut self, x: f64, y: f64) {
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
    }

    /// Collapse to a unit box when nothing was added.
    fn finish(self) -> (f64, f64, f64, f64) {
        if self.x_min > self.x_max || self.y_min > self.y_max {
            (0.0, 1.0, 0.0, 1.0)
        } else {
            (self.x_min, self.x_max, self.y_min, self.y_max)
        }
    }
}

fn pad_range(min: f64, max: f64) -> std::ops::Range<f64> {
    let span = (max - min).max(1e-9);
    let pad = span * 0.05;
    min - pad..max + pad
}

fn bar_half_width(points: &[(f64, f64)]) -> f64 {
    let mut xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    xs.sort_by(|a, b| a.total_cmp(b));
    xs.dedup();
    let min_gap = xs
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold(f64::INFINITY, f64::min);
    if min_gap.is_finite() {
        min_gap * 0.4
    } else {
        0.4
    }
}

fn circle_points(cx: f64, cy: f64, radius: f64) -> impl Iterator<Item = (f64, f64)> + Clone {
    (0..=CIRCLE_SEGMENTS).map(move |i| {
        let angle = i as f64 / CIRCLE_SEGMENTS as f64 * std::f64::consts::TAU;
        (cx + radius * angle.cos(), cy + radius * angle.sin())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_radii_parse_with_whitespace() {
        assert_eq!(parse_ring_radii(Some("1,2.5, 3")).unwrap(), vec![1.0, 2.5, 3.0]);
    }

    #[test]
    fn ring_radii_empty_inputs_yield_nothing() {
        assert_eq!(parse_ring_radii(None).unwrap(), Vec::<f64>::new());
        assert_eq!(parse_ring_radii(Some("")).unwrap(), Vec::<f64>::new());
        assert_eq!(parse_ring_radii(Some(" , ,")).unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn ring_radii_reject_non_numeric_chunks() {
        let err = parse_ring_radii(Some("1,x,3")).unwrap_err();
        assert!(err.to_string().contains("Invalid ring radius: x"));
    }

    #[test]
    fn axes_are_required_before_any_chart_work() {
        let spec = PlotSpec {
            kind: PlotKind::Scatter,
            x: Some("x".into()),
            y: None,
            title: None,
            limit: None,
            save: None,
            overlays: OverlayGeometry::default(),
        };
        assert!(spec.axes().is_err());
    }

    #[test]
    fn missing_columns_are_named() {
        let err = require_columns(&["x", "made"], &["x", "y"]).unwrap_err();
        assert!(err.to_string().contains("made"));
        assert!(!err.to_string().contains("x,"));
    }

    #[test]
    fn overlay_geometry_tracks_largest_radius() {
        let geom = OverlayGeometry {
            center: (0.0, 0.0),
            hole_radius: Some(2.125),
            ring_radii: vec![5.0, 10.0],
        };
        assert!(!geom.is_empty());
        assert_eq!(geom.max_radius(), 10.0);
    }

    #[test]
    fn bar_half_width_uses_min_gap() {
        let points = [(0.0, 1.0), (10.0, 2.0), (2.0, 3.0)];
        assert!((bar_half_width(&points) - 0.8).abs() < 1e-12);
        assert_eq!(bar_half_width(&[(1.0, 1.0)]), 0.4);
    }
}
