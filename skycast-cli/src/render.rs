//! Plain-text rendering of the dashboard view model.
//!
//! Every section is a pure function from view data to a string, so the
//! layout is testable without touching the network or a terminal.

use skycast_core::normalize::{ChartSpec, TableRow};
use skycast_core::view::{DashboardView, MapPin, Metric};

/// Width of the longest chart bar, in characters.
const CHART_WIDTH: usize = 40;

/// The full dashboard, sections in reading order: metrics, narrative,
/// forecast chart and table (or the scoped forecast error), map marker.
#[must_use]
pub fn render_dashboard(view: &DashboardView) -> String {
    let mut out = String::new();

    let title = format!("Weather in {}", view.city.name);
    out.push_str(&title);
    out.push('\n');
    out.push_str(&"=".repeat(title.chars().count()));
    out.push_str("\n\n");

    out.push_str(&render_metrics(&view.metrics));

    out.push_str("\nSummary\n-------\n");
    out.push_str(&view.narrative);
    out.push('\n');

    match &view.forecast_error {
        Some(message) => {
            out.push('\n');
            out.push_str(message);
            out.push('\n');
        }
        None => {
            if let Some(chart) = &view.chart {
                out.push_str("\n5-day forecast (max temperature)\n");
                out.push_str("--------------------------------\n");
                out.push_str(&render_chart(chart));
            }
            if !view.table.is_empty() {
                out.push('\n');
                out.push_str(&render_table(&view.table));
            }
        }
    }

    out.push_str("\nMap\n---\n");
    out.push_str(&render_map(&view.map_pin));

    out
}

/// Label column padded to the widest label, one metric per line.
#[must_use]
pub fn render_metrics(metrics: &[Metric]) -> String {
    let label_width = metrics
        .iter()
        .map(|m| m.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for metric in metrics {
        out.push_str(&format!(
            "{:<width$}  {}\n",
            metric.label,
            metric.value,
            width = label_width
        ));
    }
    out
}

/// Horizontal bars scaled to the chart's y-range, annotated with the value.
///
/// A bar's length is the point's position within the range; the padding
/// built into the range guarantees every bar is at least one character.
#[must_use]
pub fn render_chart(chart: &ChartSpec) -> String {
    let (lo, hi) = chart.y_range;
    let span = hi - lo;

    let label_width = chart
        .points
        .iter()
        .map(|p| p.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for point in &chart.points {
        let fraction = (point.max_temp_c - lo) / span;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bar_len = (fraction * CHART_WIDTH as f64).round() as usize;
        out.push_str(&format!(
            "{:<label_width$}  {:<CHART_WIDTH$}  {:.1} °C\n",
            point.label,
            "█".repeat(bar_len.max(1)),
            point.max_temp_c,
        ));
    }
    out.push_str(&format!("scale: {lo:.1} °C to {hi:.1} °C\n"));
    out
}

/// Forecast table with columns sized to their widest cell.
#[must_use]
pub fn render_table(rows: &[TableRow]) -> String {
    const HEADERS: [&str; 5] = ["Date", "Condition", "Min", "Max", "Rain"];

    let cells = |row: &TableRow| -> [String; 5] {
        [
            row.date.clone(),
            row.condition.clone(),
            row.min_temp.clone(),
            row.max_temp.clone(),
            row.rain_probability.clone(),
        ]
    };

    let mut widths: [usize; 5] = HEADERS.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(cells(row)) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render_line = |cells: [String; 5]| -> String {
        let mut line = String::new();
        for (i, (cell, width)) in cells.into_iter().zip(widths).enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            line.push_str(&format!("{cell:<width$}"));
        }
        line.trim_end().to_string()
    };

    let mut out = render_line(HEADERS.map(String::from));
    out.push('\n');
    for row in rows {
        out.push_str(&render_line(cells(row)));
        out.push('\n');
    }
    out
}

/// The map marker as an OpenStreetMap link plus its tooltip text.
#[must_use]
pub fn render_map(pin: &MapPin) -> String {
    format!(
        "https://www.openstreetmap.org/?mlat={}&mlon={}\n{}\n",
        pin.latitude, pin.longitude, pin.tooltip
    )
}
