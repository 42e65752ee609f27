//! Category breakdown as a pie chart.
//!
//! Slices follow the order of [`AggregateResult::category_totals`], starting
//! at twelve o'clock (−90°) and running clockwise. Each slice sweeps
//! `value / total × 360°`, so the slices of a non-empty chart always cover
//! the full circle.

use std::f64::consts::PI;
use std::fmt::Write as _;

use eco_core::{AggregateResult, CategoryTotal};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::utils::format_currency;

/// Slice colors, reused in order once a chart has more than seven categories.
pub const PALETTE: [&str; 7] = [
    "#4CAF50", "#81C784", "#FFB74D", "#64B5F6", "#BA68C8", "#E57373", "#AED581",
];

/// Text drawn instead of a chart when there are no categories.
pub const NO_DATA_PLACEHOLDER: &str = "No expense data";

/// Size used when a front end does not pick one.
pub const DEFAULT_WIDTH: u32 = 360;
pub const DEFAULT_HEIGHT: u32 = 240;

const START_ANGLE: f64 = -90.0;
const PLACEHOLDER_COLOR: &str = "#f3f5f7";
const LEGEND_TEXT_COLOR: &str = "#111827";

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub category: String,
    pub value: Decimal,
    /// Degrees, measured clockwise from three o'clock.
    pub start_angle: f64,
    /// Degrees.
    pub sweep: f64,
    pub color: &'static str,
}

impl PieSlice {
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub color: &'static str,
    /// `"<category> — ₱<value>"`.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PieChart {
    slices: Vec<PieSlice>,
    legend: Vec<LegendEntry>,
}

impl PieChart {
    pub fn from_result(result: &AggregateResult) -> Self {
        Self::from_totals(&result.category_totals)
    }

    pub fn from_totals(totals: &[CategoryTotal]) -> Self {
        let sum = totals
            .iter()
            .fold(Decimal::ZERO, |sum, t| sum.saturating_add(t.amount));
        let chart_total = if sum.is_zero() { 1.0 } else { to_f64(sum) };

        let mut start = START_ANGLE;
        let mut slices = Vec::with_capacity(totals.len());
        let mut legend = Vec::with_capacity(totals.len());

        for (i, total) in totals.iter().enumerate() {
            let color = PALETTE[i % PALETTE.len()];
            let sweep = to_f64(total.amount) / chart_total * 360.0;

            slices.push(PieSlice {
                category: total.category.clone(),
                value: total.amount,
                start_angle: start,
                sweep,
                color,
            });
            legend.push(LegendEntry {
                color,
                label: format!("{} — {}", total.category, format_currency(total.amount)),
            });
            start += sweep;
        }

        Self { slices, legend }
    }

    /// True when the chart shows the placeholder instead of slices.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn slices(&self) -> &[PieSlice] {
        &self.slices
    }

    pub fn legend(&self) -> &[LegendEntry] {
        &self.legend
    }

    /// The legend as terminal text, one `[#color] label` line per category.
    pub fn legend_text(&self) -> String {
        if self.is_empty() {
            return NO_DATA_PLACEHOLDER.to_string();
        }
        self.legend
            .iter()
            .map(|entry| format!("[{}] {}", entry.color, entry.label))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders a standalone SVG document of the given pixel size.
    pub fn to_svg(
        &self,
        width: u32,
        height: u32,
    ) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );

        if self.is_empty() {
            let _ = writeln!(
                svg,
                r#"  <text x="10" y="20" fill="{PLACEHOLDER_COLOR}" font-family="sans-serif" font-size="14">{NO_DATA_PLACEHOLDER}</text>"#
            );
            svg.push_str("</svg>\n");
            return svg;
        }

        let cx = f64::from(width) / 2.0;
        let cy = f64::from(height) / 2.0;
        let radius = (cx.min(cy) - 10.0).max(0.0);

        for slice in &self.slices {
            let _ = writeln!(svg, "  {}", slice_element(slice, cx, cy, radius));
        }

        let mut y = 12;
        for entry in &self.legend {
            let _ = writeln!(
                svg,
                r#"  <rect x="6" y="{y}" width="10" height="10" fill="{}"/>"#,
                entry.color
            );
            let _ = writeln!(
                svg,
                r#"  <text x="22" y="{}" fill="{LEGEND_TEXT_COLOR}" font-family="sans-serif" font-size="12">{}</text>"#,
                y + 10,
                escape_xml(&entry.label)
            );
            y += 16;
        }

        svg.push_str("</svg>\n");
        svg
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn point_on_circle(
    cx: f64,
    cy: f64,
    radius: f64,
    degrees: f64,
) -> (f64, f64) {
    let radians = degrees * PI / 180.0;
    (cx + radius * radians.cos(), cy + radius * radians.sin())
}

/// An arc path for one slice. A slice covering the whole circle has no
/// distinct end point, so it is drawn as a circle.
fn slice_element(
    slice: &PieSlice,
    cx: f64,
    cy: f64,
    radius: f64,
) -> String {
    if slice.sweep.abs() >= 360.0 - 1e-9 {
        return format!(
            r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{radius:.2}" fill="{}"/>"#,
            slice.color
        );
    }

    let (x1, y1) = point_on_circle(cx, cy, radius, slice.start_angle);
    let (x2, y2) = point_on_circle(cx, cy, radius, slice.end_angle());
    let large_arc = u8::from(slice.sweep.abs() > 180.0);
    let clockwise = u8::from(slice.sweep >= 0.0);
    format!(
        r#"<path d="M {cx:.2} {cy:.2} L {x1:.2} {y1:.2} A {radius:.2} {radius:.2} 0 {large_arc} {clockwise} {x2:.2} {y2:.2} Z" fill="{}"/>"#,
        slice.color
    )
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
