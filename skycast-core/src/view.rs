//! Presentation-agnostic view model produced by the controller.
//!
//! The UI layer (currently the CLI) renders these as-is. Any numeric field
//! the provider omitted shows the [`UNAVAILABLE`] sentinel so a missing
//! reading is never confused with a real zero.

use crate::model::{CityLocation, CurrentConditions};
use crate::normalize::{ChartSpec, TableRow};
use crate::present::{humidity_level, sky_category, uv_bucket};

/// Display marker for a field absent from the provider response.
pub const UNAVAILABLE: &str = "n/a";

/// Temperature with one decimal, or the sentinel. Non-finite readings count
/// as absent.
#[must_use]
pub fn fmt_temp(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.1} °C"),
        _ => UNAVAILABLE.to_string(),
    }
}

/// Percentage, or the sentinel.
#[must_use]
pub fn fmt_pct(value: Option<u8>) -> String {
    value.map_or_else(|| UNAVAILABLE.to_string(), |v| format!("{v}%"))
}

/// One labeled value in the metrics panel.
#[derive(Debug, Clone)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

impl Metric {
    fn new(label: &str, value: String) -> Self {
        Self { label: label.to_string(), value }
    }
}

/// Single map marker at the resolved coordinates.
#[derive(Debug, Clone)]
pub struct MapPin {
    pub latitude: f64,
    pub longitude: f64,
    pub tooltip: String,
}

/// Everything one lookup renders.
#[derive(Debug)]
pub struct DashboardView {
    pub city: CityLocation,
    pub metrics: Vec<Metric>,
    /// Generated narrative, or the failure text when generation failed.
    pub narrative: String,
    /// Absent when no forecast day had a plottable max temperature or the
    /// forecast fetch failed.
    pub chart: Option<ChartSpec>,
    pub table: Vec<TableRow>,
    pub map_pin: MapPin,
    /// Forecast-scoped failure; current conditions still rendered.
    pub forecast_error: Option<String>,
}

/// Labeled metrics in the dashboard's historic order. Every metric degrades
/// independently to the sentinel.
#[must_use]
pub fn metrics(conditions: &CurrentConditions) -> Vec<Metric> {
    let humidity = match conditions.humidity_pct {
        Some(pct) => format!("{pct}% ({})", humidity_level(pct).description()),
        None => UNAVAILABLE.to_string(),
    };

    let wind = match conditions.wind_speed_kmh {
        Some(speed) => {
            let direction = match (conditions.wind_direction_deg, &conditions.wind_direction_label)
            {
                (Some(deg), Some(label)) => format!(" ({deg}° {label})"),
                (Some(deg), None) => format!(" ({deg}°)"),
                _ => String::new(),
            };
            format!("{speed:.1} km/h{direction}")
        }
        None => UNAVAILABLE.to_string(),
    };

    let sky = match &conditions.sky_text {
        Some(text) => format!("{text} ({})", sky_category(text).description()),
        None => UNAVAILABLE.to_string(),
    };

    let uv = match (conditions.uv_index, &conditions.uv_index_text) {
        (Some(index), Some(text)) => format!("{index} ({})", uv_bucket(text).description()),
        (Some(index), None) => index.to_string(),
        (None, Some(text)) => uv_bucket(text).description().to_string(),
        (None, None) => UNAVAILABLE.to_string(),
    };

    vec![
        Metric::new("Temperature", fmt_temp(conditions.temperature_c)),
        Metric::new(
            "Min | Max (past 6 h)",
            format!(
                "{} | {}",
                fmt_temp(conditions.past6h_min_c),
                fmt_temp(conditions.past6h_max_c)
            ),
        ),
        Metric::new("Feels like", fmt_temp(conditions.feels_like_c)),
        Metric::new("Humidity", humidity),
        Metric::new(
            "Pressure",
            conditions
                .pressure_mb
                .map_or_else(|| UNAVAILABLE.to_string(), |p| format!("{p:.1} mb")),
        ),
        Metric::new("Wind", wind),
        Metric::new("Sky", sky),
        Metric::new("UV index", uv),
    ]
}

/// Map marker with the historic "city, past-6h range" tooltip.
#[must_use]
pub fn map_pin(city: &CityLocation, conditions: &CurrentConditions) -> MapPin {
    MapPin {
        latitude: city.latitude,
        longitude: city.longitude,
        tooltip: format!(
            "{}\n{} | {}",
            city.name,
            fmt_temp(conditions.past6h_min_c),
            fmt_temp(conditions.past6h_max_c)
        ),
    }
}
