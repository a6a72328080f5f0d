//! Domain types shared by the normalizer, presenter and controller.
//!
//! Everything here lives for one dashboard lookup and is discarded after
//! rendering. Numeric fields the provider may omit are `Option`: absence is
//! rendered as an explicit "unavailable" marker, never a silent zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A resolved city from the provider's search endpoint.
///
/// `location_key` is the provider-assigned opaque identifier used for the
/// conditions and forecast queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityLocation {
    pub name: String,
    pub location_key: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions after presentation-side normalization.
///
/// Every field is optional because the provider payload may omit any key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: Option<f64>,
    pub feels_like_c: Option<f64>,
    pub past6h_min_c: Option<f64>,
    pub past6h_max_c: Option<f64>,
    pub humidity_pct: Option<u8>,
    pub pressure_mb: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub wind_direction_deg: Option<u16>,
    pub wind_direction_label: Option<String>,
    pub sky_text: Option<String>,
    pub uv_index: Option<u8>,
    pub uv_index_text: Option<String>,
}

/// One normalized forecast day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Provider-local calendar date, when the date string parsed.
    pub date: Option<NaiveDate>,
    /// Human-readable "Weekday, Month DD" label derived from `date`.
    pub date_label: String,
    pub min_temp_c: Option<f64>,
    pub max_temp_c: Option<f64>,
    pub condition: Option<String>,
    pub rain_probability_pct: Option<u8>,
}

/// Ordered multi-day forecast. Provider order is preserved as-is; the chart
/// x-axis and table rows must follow it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub days: Vec<ForecastDay>,
}

impl ForecastSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
