//! Renderers for the chart model. Each renderer turns a [`Chart`] into the
//! full contents of one output file.

use std::fmt::{self, Write};

use tracing::debug;

use crate::{
    PlotError,
    charts::{AxisScale, Chart, Panel, Point},
};

pub trait ChartRenderer {
    /// File extension of rendered charts, without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, chart: &Chart) -> Result<String, PlotError>;
}

/// Writes the chart model itself as pretty-printed JSON.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonRenderer;

impl ChartRenderer for JsonRenderer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, chart: &Chart) -> Result<String, PlotError> {
        serde_json::to_string_pretty(chart).map_err(|e| PlotError::render(e.to_string()))
    }
}

const PANEL_WIDTH: f64 = 320.0;
const PANEL_HEIGHT: f64 = 260.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 14.0;
const MARGIN_TOP: f64 = 28.0;
const MARGIN_BOTTOM: f64 = 40.0;
const MARKER: f64 = 3.0;
const LINEAR_TICKS: usize = 5;

/// Self-contained SVG with the panels laid out side by side.
#[derive(Clone, Copy, Debug, Default)]
pub struct SvgRenderer;

impl ChartRenderer for SvgRenderer {
    fn extension(&self) -> &'static str {
        "svg"
    }

    fn render(&self, chart: &Chart) -> Result<String, PlotError> {
        let mut out = String::new();
        write_svg(&mut out, chart).map_err(|e| PlotError::render(e.to_string()))?;
        Ok(out)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Axis {
    scale: AxisScale,
    min: f64,
    max: f64,
}

impl Axis {
    fn new(scale: AxisScale, values: impl IntoIterator<Item = f64>) -> Self {
        let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
        for v in values.into_iter().filter(|v| placeable(scale, *v)) {
            min = min.min(v);
            max = max.max(v);
        }
        match scale {
            AxisScale::Log => {
                if !min.is_finite() {
                    return Self { scale, min: 1.0, max: 10.0 };
                }
                let mut lo = min.log10().floor() as i32;
                let mut hi = max.log10().ceil() as i32;
                if lo == hi {
                    lo -= 1;
                    hi += 1;
                }
                Self {
                    scale,
                    min: 10f64.powi(lo),
                    max: 10f64.powi(hi),
                }
            }
            AxisScale::Linear => {
                if !min.is_finite() {
                    return Self { scale, min: 0.0, max: 1.0 };
                }
                let pad = if max > min { (max - min) * 0.05 } else { min.abs().max(1.0) * 0.1 };
                Self {
                    scale,
                    min: min - pad,
                    max: max + pad,
                }
            }
        }
    }

    fn fixed(scale: AxisScale, min: f64, max: f64) -> Self {
        if max <= min {
            return Self::new(scale, [min, max]);
        }
        Self { scale, min, max }
    }

    /// Fraction of the axis covered up to `v`, or `None` if `v` cannot be
    /// placed on this axis.
    fn fraction(&self, v: f64) -> Option<f64> {
        if !placeable(self.scale, v) {
            return None;
        }
        Some(match self.scale {
            AxisScale::Log => (v.log10() - self.min.log10()) / (self.max.log10() - self.min.log10()),
            AxisScale::Linear => (v - self.min) / (self.max - self.min),
        })
    }

    fn ticks(&self) -> Vec<f64> {
        match self.scale {
            AxisScale::Log => {
                let lo = self.min.log10().ceil() as i32;
                let hi = self.max.log10().floor() as i32;
                (lo..=hi).map(|exp| 10f64.powi(exp)).collect()
            }
            AxisScale::Linear => {
                let step = (self.max - self.min) / (LINEAR_TICKS - 1) as f64;
                (0..LINEAR_TICKS)
                    .map(|idx| self.min + step * idx as f64)
                    .collect()
            }
        }
    }
}

fn placeable(scale: AxisScale, v: f64) -> bool {
    v.is_finite() && (scale == AxisScale::Linear || v > 0.0)
}

struct Frame {
    x: Axis,
    y: Axis,
}

impl Frame {
    fn plot_width() -> f64 {
        PANEL_WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height() -> f64 {
        PANEL_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn project(&self, point: Point) -> Option<(f64, f64)> {
        let fx = self.x.fraction(point.x)?;
        let fy = self.y.fraction(point.y)?;
        Some((
            MARGIN_LEFT + fx * Self::plot_width(),
            MARGIN_TOP + (1.0 - fy) * Self::plot_height(),
        ))
    }
}

fn write_svg(out: &mut String, chart: &Chart) -> fmt::Result {
    let width = PANEL_WIDTH * chart.panels.len().max(1) as f64;
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{PANEL_HEIGHT}" viewBox="0 0 {width} {PANEL_HEIGHT}" font-family="sans-serif" font-size="10">"#
    )?;
    writeln!(out, "<title>{}</title>", escape(&chart.name))?;
    writeln!(out, r#"<rect width="{width}" height="{PANEL_HEIGHT}" fill="white"/>"#)?;
    for (idx, panel) in chart.panels.iter().enumerate() {
        writeln!(
            out,
            r#"<g transform="translate({},0)">"#,
            PANEL_WIDTH * idx as f64
        )?;
        write_panel(out, chart, panel, idx == 0)?;
        writeln!(out, "</g>")?;
    }
    writeln!(out, "</svg>")
}

fn write_panel(out: &mut String, chart: &Chart, panel: &Panel, first: bool) -> fmt::Result {
    let x = Axis::fixed(chart.x_scale, chart.x_range.0, chart.x_range.1);
    let y_values = panel
        .series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.y))
        .chain(panel.reference.as_ref().map(|r| r.y));
    let frame = Frame {
        x,
        y: Axis::new(chart.y_scale, y_values),
    };
    let (pw, ph) = (Frame::plot_width(), Frame::plot_height());

    if let Some(title) = &panel.title {
        writeln!(
            out,
            r#"<text x="{}" y="16" text-anchor="middle" font-size="11">{}</text>"#,
            MARGIN_LEFT + pw / 2.0,
            escape(title)
        )?;
    }
    writeln!(
        out,
        r##"<rect x="{MARGIN_LEFT}" y="{MARGIN_TOP}" width="{pw}" height="{ph}" fill="none" stroke="#333333"/>"##
    )?;
    write_ticks(out, &frame, pw, ph)?;
    writeln!(
        out,
        r#"<text x="{}" y="{}" text-anchor="middle">{}</text>"#,
        MARGIN_LEFT + pw / 2.0,
        PANEL_HEIGHT - 6.0,
        escape(&chart.x_label)
    )?;
    if first {
        writeln!(
            out,
            r#"<text transform="translate(12,{}) rotate(-90)" text-anchor="middle">{}</text>"#,
            MARGIN_TOP + ph / 2.0,
            escape(&chart.y_label)
        )?;
    }

    if let Some(reference) = &panel.reference {
        let from = frame.project(Point { x: reference.x_from, y: reference.y });
        let to = frame.project(Point { x: reference.x_to, y: reference.y });
        if let (Some((x1, y1)), Some((x2, y2))) = (from, to) {
            writeln!(
                out,
                r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{}" stroke-width="1.5"/>"#,
                reference.color
            )?;
        }
    }

    for series in &panel.series {
        let projected: Vec<(f64, f64)> = series
            .points
            .iter()
            .filter_map(|p| frame.project(*p))
            .collect();
        if projected.len() < series.points.len() {
            debug!(
                chart = %chart.name,
                series = %series.label,
                dropped = series.points.len() - projected.len(),
                "points outside the axis domain"
            );
        }
        if projected.is_empty() {
            continue;
        }
        let path = projected
            .iter()
            .map(|(px, py)| format!("{px:.2},{py:.2}"))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(
            out,
            r#"<polyline points="{path}" fill="none" stroke="{}" stroke-width="1.5"/>"#,
            series.color
        )?;
        for (px, py) in projected {
            writeln!(
                out,
                r#"<path d="M{:.2},{:.2}L{:.2},{:.2}M{:.2},{:.2}L{:.2},{:.2}" stroke="{}"/>"#,
                px - MARKER,
                py - MARKER,
                px + MARKER,
                py + MARKER,
                px - MARKER,
                py + MARKER,
                px + MARKER,
                py - MARKER,
                series.color
            )?;
        }
    }

    if first {
        write_legend(out, panel)?;
    }
    Ok(())
}

fn write_ticks(out: &mut String, frame: &Frame, pw: f64, ph: f64) -> fmt::Result {
    let bottom = MARGIN_TOP + ph;
    for tick in frame.x.ticks() {
        if let Some(f) = frame.x.fraction(tick) {
            let px = MARGIN_LEFT + f * pw;
            writeln!(
                out,
                r##"<line x1="{px:.2}" y1="{bottom}" x2="{px:.2}" y2="{}" stroke="#333333"/>"##,
                bottom + 4.0
            )?;
            writeln!(
                out,
                r#"<text x="{px:.2}" y="{}" text-anchor="middle">{}</text>"#,
                bottom + 14.0,
                format_tick(tick)
            )?;
        }
    }
    for tick in frame.y.ticks() {
        if let Some(f) = frame.y.fraction(tick) {
            let py = MARGIN_TOP + (1.0 - f) * ph;
            writeln!(
                out,
                r##"<line x1="{}" y1="{py:.2}" x2="{MARGIN_LEFT}" y2="{py:.2}" stroke="#333333"/>"##,
                MARGIN_LEFT - 4.0
            )?;
            writeln!(
                out,
                r#"<text x="{}" y="{:.2}" text-anchor="end">{}</text>"#,
                MARGIN_LEFT - 6.0,
                py + 3.0,
                format_tick(tick)
            )?;
        }
    }
    Ok(())
}

fn write_legend(out: &mut String, panel: &Panel) -> fmt::Result {
    let entries = panel
        .reference
        .iter()
        .map(|r| (r.label.as_str(), r.color.as_str()))
        .chain(panel.series.iter().map(|s| (s.label.as_str(), s.color.as_str())));
    for (idx, (label, color)) in entries.enumerate() {
        let y = MARGIN_TOP + 10.0 + 11.0 * idx as f64;
        let x = MARGIN_LEFT + 6.0;
        writeln!(
            out,
            r#"<line x1="{x}" y1="{y}" x2="{}" y2="{y}" stroke="{color}" stroke-width="1.5"/>"#,
            x + 14.0
        )?;
        writeln!(
            out,
            r#"<text x="{}" y="{}" font-size="7">{}</text>"#,
            x + 18.0,
            y + 2.5,
            escape(label)
        )?;
    }
    Ok(())
}

fn format_tick(v: f64) -> String {
    let magnitude = v.abs();
    if magnitude != 0.0 && !(1e-2..1e4).contains(&magnitude) {
        return format!("{v:.0e}");
    }
    let text = format!("{v:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
