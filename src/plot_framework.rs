// src/plot_framework.rs

use plotters::backend::{BitMapBackend, DrawingBackend, SVGBackend};
use plotters::chart::{ChartBuilder, ChartContext, SeriesLabelPosition};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::combinators::{IntoLogRange, LogCoord};
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{Circle, PathElement, Polygon, Rectangle, Text};
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, TRANSPARENT, WHITE};
use plotters::style::{Color, IntoFont, RGBColor};

use std::error::Error;
use std::fs;
use std::ops::Range;
use std::path::Path;

use crate::config::OutputFormat;
use crate::constants::{
    BAND_OPACITY, COLOR_GRID, COLOR_INSET_BACKGROUND, COLOR_INSET_LINK, COLOR_LABEL_BOX_EDGE,
    COLOR_LABEL_BOX_FILL, COLOR_TEXT, DOT_GAP_PX, DOT_LENGTH_PX, FONT_SIZE_AXIS_LABEL,
    FONT_SIZE_DATASET_LABEL, FONT_SIZE_INSET_TICK_LABEL, FONT_SIZE_TICK_LABEL,
    LINE_WIDTH_INSET_LINK, MARKER_AREA_LOG2_END, MARKER_AREA_LOG2_START, PIXELS_PER_POINT,
    PLOT_HEIGHT, PLOT_WIDTH,
};

type LogLogChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<LogCoord<f64>, LogCoord<f64>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dotted,
}

/// Shaded area between two curves sharing the x values of the series.
#[derive(Debug, Clone)]
pub struct Band {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct PlotSeries {
    pub data: Vec<(f64, f64)>,
    pub label: String,
    pub color: RGBColor,
    pub stroke_width: u32,
    pub line_style: LineStyle,
    pub band: Option<Band>,
    /// One circle radius (px) per data point; empty for no markers.
    pub marker_radii: Vec<u32>,
}

/// Zoomed panel placed inside the main axes.
#[derive(Debug, Clone)]
pub struct InsetLayout {
    /// x0, y0 (from the bottom), width, height as fractions of the main plotting area.
    pub bounds: [f64; 4],
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
}

#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<PlotSeries>,
    /// Boxed text in the lower-left corner of the axes.
    pub corner_label: Option<String>,
    pub inset: Option<InsetLayout>,
    pub show_legend: bool,
}

/// Range spanning all positive finite values, widened by `padding` powers of
/// `base` on each side. `None` if there is no positive value.
pub fn padded_log_range(
    values: impl IntoIterator<Item = f64>,
    base: f64,
    padding: f64,
) -> Option<Range<f64>> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        })?;
    let factor = base.powf(padding.max(0.0));
    if factor <= 1.0 {
        // degenerate range
        return Some(min / base..max * base);
    }
    Some(min / factor..max * factor)
}

/// Matplotlib-style marker radii for scatter areas shrinking log-uniformly
/// from 2^5 to 2^2 pt^2 along the series.
pub fn marker_radii(n: usize) -> Vec<u32> {
    (0..n)
        .map(|i| {
            let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
            let area_pt2 = 2f64.powf(MARKER_AREA_LOG2_START + (MARKER_AREA_LOG2_END - MARKER_AREA_LOG2_START) * t);
            let radius_px = area_pt2.sqrt() / 2.0 * PIXELS_PER_POINT;
            (radius_px.round() as u32).max(1)
        })
        .collect()
}

/// Tick label for a log axis: `base^k` with superscript exponent on exact
/// powers, plain decimal otherwise.
pub fn format_log_tick(value: f64, base: f64) -> String {
    if value <= 0.0 || !value.is_finite() {
        return String::new();
    }
    let exponent = value.ln() / base.ln();
    if (exponent - exponent.round()).abs() < 1e-9 {
        let superscript: String = format!("{}", exponent.round() as i64)
            .chars()
            .map(|c| match c {
                '-' => '⁻',
                '0' => '⁰',
                '1' => '¹',
                '2' => '²',
                '3' => '³',
                '4' => '⁴',
                '5' => '⁵',
                '6' => '⁶',
                '7' => '⁷',
                '8' => '⁸',
                '9' => '⁹',
                other => other,
            })
            .collect();
        format!("{}{}", base, superscript)
    } else {
        format!("{:.3}", value)
    }
}

fn to_log(p: (f64, f64)) -> (f64, f64) {
    (p.0.ln(), p.1.ln())
}

/// Clips segment a-b to the box in log-log space (Liang-Barsky).
/// Returns the parameters (t0, t1) of the visible part.
fn clip_segment_log(
    a: (f64, f64),
    b: (f64, f64),
    x_range: &Range<f64>,
    y_range: &Range<f64>,
) -> Option<(f64, f64)> {
    if a.0 <= 0.0 || a.1 <= 0.0 || b.0 <= 0.0 || b.1 <= 0.0 {
        return None;
    }
    let (ax, ay) = to_log(a);
    let (bx, by) = to_log(b);
    let (dx, dy) = (bx - ax, by - ay);
    let checks = [
        (-dx, ax - x_range.start.ln()),
        (dx, x_range.end.ln() - ax),
        (-dy, ay - y_range.start.ln()),
        (dy, y_range.end.ln() - ay),
    ];
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    if t0 > t1 {
        return None;
    }
    Some((t0, t1))
}

fn lerp_log(a: (f64, f64), b: (f64, f64), t: f64) -> (f64, f64) {
    let (ax, ay) = to_log(a);
    let (bx, by) = to_log(b);
    ((ax + (bx - ax) * t).exp(), (ay + (by - ay) * t).exp())
}

/// Splits a polyline into the runs that are visible inside the box.
/// Segments are straight in log-log space, like they appear on the plot.
pub fn clip_polyline(
    points: &[(f64, f64)],
    x_range: &Range<f64>,
    y_range: &Range<f64>,
) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    let mut open_end = false;
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        match clip_segment_log(a, b, x_range, y_range) {
            Some((t0, t1)) => {
                let start = if t0 == 0.0 { a } else { lerp_log(a, b, t0) };
                let end = if t1 == 1.0 { b } else { lerp_log(a, b, t1) };
                if !(open_end && t0 == 0.0) {
                    if current.len() >= 2 {
                        runs.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(start);
                }
                current.push(end);
                open_end = t1 == 1.0;
            }
            None => {
                if current.len() >= 2 {
                    runs.push(std::mem::take(&mut current));
                }
                current.clear();
                open_end = false;
            }
        }
    }
    if current.len() >= 2 {
        runs.push(current);
    }
    runs
}

fn restrict_to_x(points: &[(f64, f64)], x_range: &Range<f64>) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(points.len() + 2);
    for (i, &p) in points.iter().enumerate() {
        if i > 0 {
            let q = points[i - 1];
            for bound in [x_range.start, x_range.end] {
                if (q.0 - bound) * (p.0 - bound) < 0.0 {
                    let t = (bound.ln() - q.0.ln()) / (p.0.ln() - q.0.ln());
                    out.push((bound, lerp_log(q, p, t).1));
                }
            }
        }
        if p.0 >= x_range.start && p.0 <= x_range.end {
            out.push(p);
        }
    }
    out
}

/// Outline of the band between `lower` and `upper` inside the box: upper
/// edge left to right, then lower edge back.
pub fn band_polygon(
    xs: &[f64],
    band: &Band,
    x_range: &Range<f64>,
    y_range: &Range<f64>,
) -> Vec<(f64, f64)> {
    let clamp = |y: f64| {
        if y.is_nan() {
            y_range.start
        } else {
            y.clamp(y_range.start, y_range.end)
        }
    };
    let edge = |ys: &[f64]| -> Vec<(f64, f64)> {
        let clamped: Vec<(f64, f64)> = xs
            .iter()
            .zip(ys.iter())
            .filter(|(x, _)| **x > 0.0)
            .map(|(&x, &y)| (x, clamp(y)))
            .collect();
        restrict_to_x(&clamped, x_range)
    };
    let mut outline = edge(&band.upper);
    let lower = edge(&band.lower);
    if outline.len() < 2 || lower.len() < 2 {
        return Vec::new();
    }
    outline.extend(lower.into_iter().rev());
    outline
}

/// Dash segments along a pixel-space polyline; the dash phase carries over vertices.
pub fn dash_segments(points: &[(f64, f64)], dash: f64, gap: f64) -> Vec<[(f64, f64); 2]> {
    let mut segments = Vec::new();
    if dash <= 0.0 {
        return segments;
    }
    let period = dash + gap.max(0.0);
    let mut phase = 0.0f64;
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let length = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
        if length == 0.0 {
            continue;
        }
        let at = |s: f64| (a.0 + (b.0 - a.0) * s / length, a.1 + (b.1 - a.1) * s / length);
        let mut s = 0.0;
        while s < length {
            let in_period = phase % period;
            if in_period < dash {
                let end = (s + dash - in_period).min(length);
                segments.push([at(s), at(end)]);
                phase += end - s;
                s = end;
            } else {
                let end = (s + period - in_period).min(length);
                phase += end - s;
                s = end;
            }
        }
    }
    segments
}

/// Pixel corners (top-left, bottom-right) of an inset given in axes fractions.
pub fn inset_pixel_rect(
    px_x: &Range<i32>,
    px_y: &Range<i32>,
    bounds: [f64; 4],
) -> ((i32, i32), (i32, i32)) {
    let width = (px_x.end - px_x.start) as f64;
    let height = (px_y.end - px_y.start) as f64;
    let left = px_x.start as f64 + bounds[0] * width;
    let right = left + bounds[2] * width;
    let bottom = px_y.end as f64 - bounds[1] * height;
    let top = bottom - bounds[3] * height;
    (
        (left.round() as i32, top.round() as i32),
        (right.round() as i32, bottom.round() as i32),
    )
}

/// Draws mean curves, bands and markers of every series into `chart`,
/// clipped to its ranges. `root` must be the backend's root area so that
/// backend pixel coordinates can be drawn directly.
fn draw_curves<DB: DrawingBackend>(
    chart: &mut LogLogChart<'_, DB>,
    root: &DrawingArea<DB, Shift>,
    series: &[PlotSeries],
    x_range: &Range<f64>,
    y_range: &Range<f64>,
    with_labels: bool,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    // bands first so every curve stays on top of every band
    for s in series {
        if let Some(band) = &s.band {
            let xs: Vec<f64> = s.data.iter().map(|p| p.0).collect();
            let outline = band_polygon(&xs, band, x_range, y_range);
            if !outline.is_empty() {
                chart.draw_series(std::iter::once(Polygon::new(
                    outline,
                    s.color.mix(BAND_OPACITY).filled(),
                )))?;
            }
        }
    }

    for s in series {
        let style = s.color.stroke_width(s.stroke_width);
        let runs = clip_polyline(&s.data, x_range, y_range);
        match s.line_style {
            LineStyle::Solid => {
                for run in runs {
                    chart.draw_series(LineSeries::new(run, style))?;
                }
            }
            LineStyle::Dotted => {
                for run in runs {
                    let pixels: Vec<(f64, f64)> = run
                        .iter()
                        .map(|p| {
                            let (px, py) = chart.backend_coord(p);
                            (px as f64, py as f64)
                        })
                        .collect();
                    for [a, b] in dash_segments(&pixels, DOT_LENGTH_PX, DOT_GAP_PX) {
                        root.draw(&PathElement::new(
                            vec![
                                (a.0.round() as i32, a.1.round() as i32),
                                (b.0.round() as i32, b.1.round() as i32),
                            ],
                            style,
                        ))?;
                    }
                }
            }
        }

        if !s.marker_radii.is_empty() {
            let visible = s
                .data
                .iter()
                .zip(s.marker_radii.iter())
                .filter(|((x, y), _)| {
                    *x >= x_range.start && *x <= x_range.end && *y >= y_range.start && *y <= y_range.end
                })
                .map(|(&p, &r)| Circle::new(p, r, s.color.filled()));
            chart.draw_series(visible)?;
        }

        if with_labels && !s.label.is_empty() {
            // legend-only entry
            let color = s.color;
            let width = s.stroke_width;
            chart
                .draw_series(std::iter::once(Circle::new(
                    (x_range.start, y_range.start),
                    0,
                    color.filled(),
                )))?
                .label(&s.label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(width)));
        }
    }
    Ok(())
}

fn draw_corner_label<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    plot_px: &(Range<i32>, Range<i32>),
    text: &str,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let font = ("sans-serif", FONT_SIZE_DATASET_LABEL).into_font().color(COLOR_TEXT);
    let (text_w, text_h) = root.estimate_text_size(text, &font)?;
    let pad = 8;
    let (px_x, px_y) = plot_px;
    let width = px_x.end - px_x.start;
    let height = px_y.end - px_y.start;
    let left = px_x.start + (0.008 * width as f64).round() as i32;
    let bottom = px_y.end - (0.018 * height as f64).round() as i32;
    let top = bottom - text_h as i32 - 2 * pad;
    let right = left + text_w as i32 + 2 * pad;

    root.draw(&Rectangle::new([(left, top), (right, bottom)], COLOR_LABEL_BOX_FILL.filled()))?;
    root.draw(&Rectangle::new([(left, top), (right, bottom)], COLOR_LABEL_BOX_EDGE.stroke_width(2)))?;
    root.draw(&Text::new(text.to_string(), (left + pad, top + pad), font))?;
    Ok(())
}

fn draw_inset<DB: DrawingBackend>(
    main: &mut LogLogChart<'_, DB>,
    root: &DrawingArea<DB, Shift>,
    plot_config: &PlotConfig,
    inset: &InsetLayout,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let link_style = COLOR_INSET_LINK.stroke_width(LINE_WIDTH_INSET_LINK);
    let zoom = [
        (inset.x_range.start, inset.y_range.start),
        (inset.x_range.end, inset.y_range.end),
    ];
    main.draw_series(std::iter::once(Rectangle::new(zoom, link_style)))?;

    let plot_px = main.plotting_area().get_pixel_range();
    let ((left, top), (right, bottom)) = inset_pixel_rect(&plot_px.0, &plot_px.1, inset.bounds);

    // upper-left and lower-right corners of the zoom box to the inset
    let zoom_upper_left = main.backend_coord(&(inset.x_range.start, inset.y_range.end));
    let zoom_lower_right = main.backend_coord(&(inset.x_range.end, inset.y_range.start));
    root.draw(&PathElement::new(vec![zoom_upper_left, (left, top)], link_style))?;
    root.draw(&PathElement::new(vec![zoom_lower_right, (right, bottom)], link_style))?;

    let label_area = 70;
    let inset_area = root.clone().shrink(
        (left - label_area, top),
        ((right - left + label_area).max(1) as u32, (bottom - top).max(1) as u32),
    );
    let mut chart = ChartBuilder::on(&inset_area)
        .margin(0)
        .y_label_area_size(label_area as u32)
        .x_label_area_size(0)
        .build_cartesian_2d(
            inset.x_range.clone().log_scale().base(2.0),
            inset.y_range.clone().log_scale(),
        )?;
    chart.plotting_area().fill(&COLOR_INSET_BACKGROUND)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(0)
        .y_labels(3)
        .y_label_formatter(&|y| format_log_tick(*y, 10.0))
        .label_style(("sans-serif", FONT_SIZE_INSET_TICK_LABEL))
        .axis_style(BLACK)
        .draw()?;

    draw_curves(
        &mut chart,
        root,
        &plot_config.series,
        &inset.x_range,
        &inset.y_range,
        false,
    )?;

    chart.draw_series(std::iter::once(Rectangle::new(
        [
            (inset.x_range.start, inset.y_range.start),
            (inset.x_range.end, inset.y_range.end),
        ],
        BLACK.stroke_width(1),
    )))?;
    Ok(())
}

fn draw_log_log_plot_impl<DB: DrawingBackend>(
    backend: DB,
    plot_config: &PlotConfig,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(12)
        .x_label_area_size(70)
        .y_label_area_size(110)
        .build_cartesian_2d(
            plot_config.x_range.clone().log_scale().base(2.0),
            plot_config.y_range.clone().log_scale(),
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .bold_line_style(COLOR_GRID)
        .light_line_style(TRANSPARENT)
        .x_desc(&plot_config.x_label)
        .y_desc(&plot_config.y_label)
        .x_label_formatter(&|x| format_log_tick(*x, 2.0))
        .y_label_formatter(&|y| format_log_tick(*y, 10.0))
        .label_style(("sans-serif", FONT_SIZE_TICK_LABEL))
        .axis_desc_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
        .draw()?;

    draw_curves(
        &mut chart,
        &root,
        &plot_config.series,
        &plot_config.x_range,
        &plot_config.y_range,
        plot_config.show_legend,
    )?;

    // full frame around the axes
    chart.draw_series(std::iter::once(Rectangle::new(
        [
            (plot_config.x_range.start, plot_config.y_range.start),
            (plot_config.x_range.end, plot_config.y_range.end),
        ],
        BLACK.stroke_width(1),
    )))?;

    if plot_config.show_legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", FONT_SIZE_TICK_LABEL))
            .draw()?;
    }

    if let Some(label) = &plot_config.corner_label {
        let plot_px = chart.plotting_area().get_pixel_range();
        draw_corner_label(&root, &plot_px, label)?;
    }

    if let Some(inset) = &plot_config.inset {
        draw_inset(&mut chart, &root, plot_config, inset)?;
    }

    root.present()?;
    Ok(())
}

/// Converts a rendered SVG document to a single-page PDF. Text is laid out
/// with the system fonts.
fn svg_to_pdf(svg: &str) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut options = svg2pdf::usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = svg2pdf::usvg::Tree::from_str(svg, &options)?;
    let pdf = svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|e| format!("PDF conversion failed: {e:?}"))?;
    Ok(pdf)
}

/// Renders a log2-log10 plot to `output_path`, creating its folder if needed.
pub fn draw_log_log_plot(
    output_path: &Path,
    format: OutputFormat,
    plot_config: &PlotConfig,
) -> Result<(), Box<dyn Error>> {
    if plot_config.x_range.start <= 0.0
        || plot_config.y_range.start <= 0.0
        || plot_config.x_range.end <= plot_config.x_range.start
        || plot_config.y_range.end <= plot_config.y_range.start
    {
        return Err(format!(
            "Invalid log-log ranges: x {:?}, y {:?}",
            plot_config.x_range, plot_config.y_range
        )
        .into());
    }
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    match format {
        OutputFormat::Pdf => {
            let mut svg = String::new();
            draw_log_log_plot_impl(
                SVGBackend::with_string(&mut svg, (PLOT_WIDTH, PLOT_HEIGHT)),
                plot_config,
            )?;
            fs::write(output_path, svg_to_pdf(&svg)?)?;
            Ok(())
        }
        OutputFormat::Svg => draw_log_log_plot_impl(
            SVGBackend::new(output_path, (PLOT_WIDTH, PLOT_HEIGHT)),
            plot_config,
        ),
        OutputFormat::Png => draw_log_log_plot_impl(
            BitMapBackend::new(output_path, (PLOT_WIDTH, PLOT_HEIGHT)),
            plot_config,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_log_range() {
        let range = padded_log_range([0.5, 2.0, -1.0, 0.0, f64::NAN], 2.0, 1.0).unwrap();
        assert!((range.start - 0.25).abs() < 1e-12);
        assert!((range.end - 4.0).abs() < 1e-12);
        assert!(padded_log_range([0.0, -3.0], 10.0, 0.1).is_none());

        // single value still gives a non-empty range
        let range = padded_log_range([1e-5], 10.0, 0.0).unwrap();
        assert!(range.start < 1e-5 && range.end > 1e-5);
    }

    #[test]
    fn test_marker_radii_shrink() {
        let radii = marker_radii(63);
        assert_eq!(radii.len(), 63);
        assert!(radii.windows(2).all(|w| w[0] >= w[1]));
        // 32 pt^2 -> 2.83 pt radius; 4 pt^2 -> 1 pt radius
        assert_eq!(radii[0], (32f64.sqrt() / 2.0 * PIXELS_PER_POINT).round() as u32);
        assert_eq!(radii[62], PIXELS_PER_POINT.round() as u32);
        assert_eq!(marker_radii(1).len(), 1);
        assert!(marker_radii(0).is_empty());
    }

    #[test]
    fn test_format_log_tick() {
        assert_eq!(format_log_tick(0.125, 2.0), "2⁻³");
        assert_eq!(format_log_tick(1e-5, 10.0), "10⁻⁵");
        assert_eq!(format_log_tick(100.0, 10.0), "10²");
        assert_eq!(format_log_tick(0.3, 2.0), "0.300");
        assert_eq!(format_log_tick(0.0, 2.0), "");
    }

    #[test]
    fn test_clip_polyline_inside_is_untouched() {
        let points = vec![(0.1, 1.0), (0.2, 2.0), (0.4, 3.0)];
        let runs = clip_polyline(&points, &(0.01..1.0), &(0.1..10.0));
        assert_eq!(runs, vec![points]);
    }

    #[test]
    fn test_clip_polyline_cuts_at_x_bounds() {
        let points = vec![(0.1, 1.0), (0.4, 1.0), (1.6, 1.0)];
        let runs = clip_polyline(&points, &(0.2..0.8), &(0.5..2.0));
        assert_eq!(runs.len(), 1);
        let run = &runs[0];
        assert_eq!(run.len(), 3);
        assert!((run[0].0 - 0.2).abs() < 1e-12);
        assert_eq!(run[1], (0.4, 1.0));
        assert!((run[2].0 - 0.8).abs() < 1e-12);
        assert!(run.iter().all(|p| (p.1 - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_clip_polyline_splits_on_excursion() {
        // middle point leaves the box upward
        let points = vec![(1.0, 1.0), (2.0, 1.0), (4.0, 100.0), (8.0, 1.0), (16.0, 1.0)];
        let runs = clip_polyline(&points, &(0.5..32.0), &(0.5..10.0));
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0][0], (1.0, 1.0));
        assert!((runs[0].last().unwrap().1 - 10.0).abs() < 1e-9);
        assert!((runs[1][0].1 - 10.0).abs() < 1e-9);
        assert_eq!(*runs[1].last().unwrap(), (16.0, 1.0));
    }

    #[test]
    fn test_clip_polyline_drops_non_positive_segments() {
        let points = vec![(1.0, 0.0), (2.0, 1.0), (4.0, 1.0)];
        let runs = clip_polyline(&points, &(0.5..8.0), &(0.5..2.0));
        assert_eq!(runs, vec![vec![(2.0, 1.0), (4.0, 1.0)]]);
    }

    #[test]
    fn test_band_polygon_restricts_and_clamps() {
        let xs = [0.25, 0.5, 1.0, 2.0];
        let band = Band {
            lower: vec![1e-3, 1e-3, 0.0, 1e-3],
            upper: vec![1.0, 1.0, 1e3, 1.0],
        };
        let outline = band_polygon(&xs, &band, &(0.5..1.0), &(1e-2..10.0));
        // two points per edge inside [0.5, 1.0]
        assert_eq!(outline.len(), 4);
        assert!(outline.iter().all(|p| p.0 >= 0.5 && p.0 <= 1.0));
        assert!(outline.iter().all(|p| p.1 >= 1e-2 && p.1 <= 10.0));
        assert_eq!(outline[1], (1.0, 10.0));
        assert_eq!(outline[2], (1.0, 1e-2));
    }

    #[test]
    fn test_band_polygon_interpolates_at_bounds() {
        let xs = [0.25, 1.0];
        let band = Band {
            lower: vec![0.1, 0.1],
            upper: vec![1.0, 1.0],
        };
        let outline = band_polygon(&xs, &band, &(0.5..2.0), &(0.01..10.0));
        assert_eq!(outline.len(), 4);
        assert!((outline[0].0 - 0.5).abs() < 1e-12);
        assert!((outline[0].1 - 1.0).abs() < 1e-12);
        assert!((outline[3].0 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_dash_segments_phase() {
        let segments = dash_segments(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)], 2.0, 3.0);
        // dashes start at 0, 5, 10, 15 along the path
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0], [(0.0, 0.0), (2.0, 0.0)]);
        assert_eq!(segments[1], [(5.0, 0.0), (7.0, 0.0)]);
        assert_eq!(segments[2], [(10.0, 0.0), (10.0, 2.0)]);
        assert_eq!(segments[3], [(10.0, 5.0), (10.0, 7.0)]);
    }

    #[test]
    fn test_inset_pixel_rect() {
        let ((left, top), (right, bottom)) = inset_pixel_rect(&(100..1100), &(0..400), [0.27, 0.02, 0.45, 0.50]);
        assert_eq!((left, right), (370, 820));
        assert_eq!((top, bottom), (192, 392));
    }
}

// src/plot_framework.rs
