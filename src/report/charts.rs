//! SVG chart generation.
//!
//! Three charts accompany a report: a histogram of global category counts,
//! a pie chart of professors meeting the threshold, and a pie chart of the
//! global category distribution. Charts are plain SVG strings so the LaTeX
//! document can include them with the `svg` package.

use crate::config::ChartsConfig;
use crate::models::{CategoryCount, ChartSet, Report};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const HISTOGRAM_COLOR: &str = "#87ceeb";
const MEETING_COLOR: &str = "#90ee90";
const BELOW_COLOR: &str = "#f08080";
const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Pie slices start here, in degrees counter-clockwise from the x axis.
const START_ANGLE: f64 = 140.0;

/// Fraction of the radius an exploded slice is pushed out by.
const EXPLODE_OFFSET: f64 = 0.1;

/// Escape text for use inside SVG elements and attributes.
pub fn escape_xml(text: &str) -> String {
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

/// Bar chart of category counts, in the given order.
pub fn histogram_svg(categories: &[CategoryCount]) -> String {
    let width = 800.0;
    let height = 520.0;
    let margin_left = 70.0;
    let margin_right = 20.0;
    let margin_top = 30.0;
    let margin_bottom = 170.0;
    let chart_width = width - margin_left - margin_right;
    let chart_height = height - margin_top - margin_bottom;
    let baseline = margin_top + chart_height;

    let max_count = categories.iter().map(|c| c.count).max().unwrap_or(0).max(1);
    let step = tick_step(max_count);
    let axis_max = max_count.div_ceil(step) * step;

    let mut ticks = String::new();
    let mut value = 0;
    while value <= axis_max {
        let y = baseline - value as f64 / axis_max as f64 * chart_height;
        ticks.push_str(&format!(
            r##"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#e5e7eb"/>
  <text x="{:.1}" y="{:.1}" font-size="14" text-anchor="end">{}</text>
"##,
            margin_left,
            y,
            margin_left + chart_width,
            y,
            margin_left - 8.0,
            y + 5.0,
            value
        ));
        value += step;
    }

    let slot = chart_width / categories.len().max(1) as f64;
    let bar_width = slot * 0.8;
    let mut bars = String::new();

    for (i, category) in categories.iter().enumerate() {
        let bar_height = category.count as f64 / axis_max as f64 * chart_height;
        let x = margin_left + i as f64 * slot + (slot - bar_width) / 2.0;
        let y = baseline - bar_height;
        let label_x = x + bar_width / 2.0;
        let label_y = baseline + 16.0;

        bars.push_str(&format!(
            r##"  <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>
  <text x="{:.1}" y="{:.1}" font-size="14" text-anchor="end" transform="rotate(-45 {:.1} {:.1})">{}</text>
"##,
            x,
            y,
            bar_width,
            bar_height,
            HISTOGRAM_COLOR,
            label_x,
            label_y,
            label_x,
            label_y,
            escape_xml(&category.category)
        ));
    }

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">
  <rect width="{w}" height="{h}" fill="white"/>
{ticks}{bars}  <line x1="{ml}" y1="{base:.1}" x2="{right:.1}" y2="{base:.1}" stroke="black"/>
  <line x1="{ml}" y1="{mt}" x2="{ml}" y2="{base:.1}" stroke="black"/>
  <text x="{cx:.1}" y="{xt:.1}" font-size="16" text-anchor="middle">Category</text>
  <text x="18" y="{cy:.1}" font-size="16" text-anchor="middle" transform="rotate(-90 18 {cy:.1})">Number of productions</text>
</svg>
"##,
        w = width,
        h = height,
        ticks = ticks,
        bars = bars,
        ml = margin_left,
        mt = margin_top,
        base = baseline,
        right = margin_left + chart_width,
        cx = margin_left + chart_width / 2.0,
        xt = height - 10.0,
        cy = margin_top + chart_height / 2.0,
    )
}

/// Pie chart of professors meeting vs. not meeting the threshold.
pub fn threshold_pie_svg(meeting: usize, below: usize, threshold: usize) -> String {
    let slices = vec![
        PieSlice {
            label: format!("Professors with {}+ productions ({})", threshold, meeting),
            value: meeting,
            color: MEETING_COLOR,
        },
        PieSlice {
            label: format!(
                "Professors with fewer than {} productions ({})",
                threshold, below
            ),
            value: below,
            color: BELOW_COLOR,
        },
    ];

    pie_svg(&slices, Some(0), 0.6, 0.0)
}

/// Pie chart of the global category distribution.
///
/// The largest slice is exploded and percentages under 1% are not printed.
pub fn categories_pie_svg(categories: &[CategoryCount]) -> String {
    let slices: Vec<PieSlice> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| PieSlice {
            label: format!("{} ({})", c.category, c.count),
            value: c.count,
            color: PALETTE[i % PALETTE.len()],
        })
        .collect();

    let largest = slices
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.value.cmp(&b.1.value).then_with(|| b.0.cmp(&a.0)))
        .map(|(i, _)| i);

    pie_svg(&slices, largest, 0.85, 1.0)
}

struct PieSlice {
    label: String,
    value: usize,
    color: &'static str,
}

/// Render slices counter-clockwise from [`START_ANGLE`], legend on the right.
fn pie_svg(
    slices: &[PieSlice],
    explode: Option<usize>,
    label_distance: f64,
    min_label_percent: f64,
) -> String {
    let legend_width = 420.0;
    let radius = 180.0;
    let cx = 230.0;
    let cy = 240.0;
    let width = cx * 2.0 + legend_width;
    let height = 480.0;

    let total: usize = slices.iter().map(|s| s.value).sum();
    let mut wedges = String::new();
    let mut angle = START_ANGLE;

    for (i, slice) in slices.iter().enumerate() {
        if slice.value == 0 || total == 0 {
            continue;
        }

        let fraction = slice.value as f64 / total as f64;
        let sweep = fraction * 360.0;
        let mid = (angle + sweep / 2.0).to_radians();
        let (ox, oy) = if explode == Some(i) {
            (
                EXPLODE_OFFSET * radius * mid.cos(),
                -EXPLODE_OFFSET * radius * mid.sin(),
            )
        } else {
            (0.0, 0.0)
        };
        let (sx, sy) = (cx + ox, cy + oy);

        if sweep >= 359.999 {
            wedges.push_str(&format!(
                r##"  <circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" stroke="white"/>
"##,
                sx, sy, radius, slice.color
            ));
        } else {
            let (x0, y0) = polar(sx, sy, radius, angle.to_radians());
            let (x1, y1) = polar(sx, sy, radius, (angle + sweep).to_radians());
            let large_arc = if sweep > 180.0 { 1 } else { 0 };
            wedges.push_str(&format!(
                r##"  <path d="M {:.2} {:.2} L {:.2} {:.2} A {:.2} {:.2} 0 {} 0 {:.2} {:.2} Z" fill="{}" stroke="white"/>
"##,
                sx, sy, x0, y0, radius, radius, large_arc, x1, y1, slice.color
            ));
        }

        let percent = fraction * 100.0;
        if percent >= min_label_percent {
            let (lx, ly) = polar(sx, sy, radius * label_distance, mid);
            wedges.push_str(&format!(
                r##"  <text x="{:.2}" y="{:.2}" font-size="14" text-anchor="middle" dominant-baseline="middle">{:.1}%</text>
"##,
                lx, ly, percent
            ));
        }

        angle += sweep;
    }

    let legend_x = cx * 2.0 + 10.0;
    let mut legend = format!(
        r##"  <text x="{:.1}" y="40" font-size="15" font-weight="bold">Legend</text>
"##,
        legend_x
    );
    for (i, slice) in slices.iter().enumerate() {
        let y = 60.0 + i as f64 * 24.0;
        legend.push_str(&format!(
            r##"  <rect x="{:.1}" y="{:.1}" width="14" height="14" fill="{}"/>
  <text x="{:.1}" y="{:.1}" font-size="13">{}</text>
"##,
            legend_x,
            y,
            slice.color,
            legend_x + 20.0,
            y + 12.0,
            escape_xml(&slice.label)
        ));
    }

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">
  <rect width="{w}" height="{h}" fill="white"/>
{wedges}{legend}</svg>
"##,
        w = width,
        h = height,
        wedges = wedges,
        legend = legend,
    )
}

/// Point at `angle` radians (counter-clockwise, y axis pointing down).
fn polar(cx: f64, cy: f64, r: f64, angle: f64) -> (f64, f64) {
    (cx + r * angle.cos(), cy - r * angle.sin())
}

/// Tick spacing giving at most about five intervals.
fn tick_step(max: usize) -> usize {
    let rough = (max as f64 / 5.0).max(1.0);
    let magnitude = 10f64.powf(rough.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= rough)
        .unwrap_or(10.0 * magnitude);
    (step.round() as usize).max(1)
}

/// Write the charts for a report and return their paths.
///
/// Charts without data are skipped with a warning.
pub fn write_charts(report: &Report, config: &ChartsConfig) -> Result<ChartSet> {
    std::fs::create_dir_all(&config.directory).with_context(|| {
        format!(
            "Failed to create charts directory {}",
            config.directory.display()
        )
    })?;

    let mut charts = ChartSet::default();

    if report.global_categories.is_empty() {
        warn!("No global category data; skipping histogram and category pie chart");
    } else {
        let path = config.directory.join(&config.histogram);
        write_chart(&path, &histogram_svg(&report.global_categories))?;
        charts.histogram = Some(path);

        let path = config.directory.join(&config.categories_pie);
        write_chart(&path, &categories_pie_svg(&report.global_categories))?;
        charts.categories_pie = Some(path);
    }

    if report.summary.total_professors == 0 {
        warn!("No professors; skipping threshold pie chart");
    } else {
        let path = config.directory.join(&config.threshold_pie);
        let svg = threshold_pie_svg(
            report.summary.professors_meeting_threshold,
            report.summary.professors_below_threshold,
            report.metadata.threshold,
        );
        write_chart(&path, &svg)?;
        charts.threshold_pie = Some(path);
    }

    Ok(charts)
}

fn write_chart(path: &Path, svg: &str) -> Result<()> {
    std::fs::write(path, svg)
        .with_context(|| format!("Failed to write chart {}", path.display()))?;
    info!("Chart written: {}", path.display());
    Ok(())
}

/// Chart path as it should be referenced from a document.
pub fn chart_reference(path: &Path) -> String {
    let path: PathBuf = path
        .strip_prefix(".")
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf());
    path.to_string_lossy().replace('\\', "/")
}
