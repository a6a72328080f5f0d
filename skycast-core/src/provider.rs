//! HTTP client for the AccuWeather-style provider API.
//!
//! Three read-only queries: city search, current conditions by location key,
//! 5-day forecast by location key. All three are retried on transient
//! failures since the service is rate-limited and occasionally flaky.
//!
//! The raw response mirrors at the bottom of this file are a versioned
//! external contract; every field the provider may omit is `Option` so a
//! missing key degrades instead of failing the whole lookup.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt::Debug;
use std::time::Duration;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::model::CityLocation;
use crate::retry::{RetryConfig, with_retry};

/// Read-only weather queries, in the order the controller issues them.
#[async_trait]
pub trait WeatherService: Send + Sync + Debug {
    /// Search for a city by free-text name. An empty list means "not found".
    async fn find_city(&self, name: &str) -> Result<Vec<CityLocation>, ProviderError>;

    /// Current conditions snapshot for a location key.
    async fn current_conditions(&self, location_key: &str)
    -> Result<RawConditions, ProviderError>;

    /// 5-day forecast for a location key, in provider order.
    async fn daily_forecast(
        &self,
        location_key: &str,
    ) -> Result<Vec<RawForecastDay>, ProviderError>;
}

#[derive(Debug, Clone)]
pub struct AccuWeatherClient {
    http: Client,
    api_key: String,
    base_url: String,
    retry: RetryConfig,
}

impl AccuWeatherClient {
    pub fn new(config: &ProviderConfig) -> anyhow::Result<Self> {
        let api_key = config.require_api_key()?.to_string();

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: config.retry.clone(),
        })
    }

    async fn get_json<T>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<T, ProviderError>
    where
        T: serde::de::DeserializeOwned,
    {
        debug!(%url, what, "querying weather provider");

        let response = with_retry(&self.retry, || async {
            self.http.get(url).query(query).send().await
        })
        .await
        .map_err(|e| ProviderError::Unavailable(format!("{what}: {e}")))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::Unavailable(format!("{what}: rate limited (HTTP 429)")));
        }
        if status.is_server_error() {
            return Err(ProviderError::Unavailable(format!("{what}: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("{what}: {e}")))?;

        if !status.is_success() {
            return Err(ProviderError::DataMissing(format!(
                "{what}: HTTP {status}: {}",
                truncate_body(&body)
            )));
        }

        serde_json::from_str(&body).map_err(|e| ProviderError::Parse(format!("{what}: {e}")))
    }
}

#[async_trait]
impl WeatherService for AccuWeatherClient {
    async fn find_city(&self, name: &str) -> Result<Vec<CityLocation>, ProviderError> {
        let url = format!("{}/locations/v1/cities/search", self.base_url);
        let raw: Vec<RawCity> = self
            .get_json(&url, &[("apikey", self.api_key.as_str()), ("q", name)], "city search")
            .await?;

        // Entries without a key or coordinates are unusable downstream.
        Ok(raw.into_iter().filter_map(RawCity::into_location).collect())
    }

    async fn current_conditions(
        &self,
        location_key: &str,
    ) -> Result<RawConditions, ProviderError> {
        let url = format!("{}/currentconditions/v1/{location_key}", self.base_url);
        let mut raw: Vec<RawConditions> = self
            .get_json(
                &url,
                &[("apikey", self.api_key.as_str()), ("details", "true")],
                "current conditions",
            )
            .await?;

        if raw.is_empty() {
            return Err(ProviderError::DataMissing(
                "current conditions payload was empty".to_string(),
            ));
        }
        Ok(raw.swap_remove(0))
    }

    async fn daily_forecast(
        &self,
        location_key: &str,
    ) -> Result<Vec<RawForecastDay>, ProviderError> {
        let url = format!("{}/forecasts/v1/daily/5day/{location_key}", self.base_url);
        let raw: RawForecastResponse = self
            .get_json(
                &url,
                &[
                    ("apikey", self.api_key.as_str()),
                    ("details", "true"),
                    ("metric", "true"),
                ],
                "daily forecast",
            )
            .await?;

        Ok(raw.daily_forecasts)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

// --- Raw response mirrors (provider wire contract) ---

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawCity {
    pub localized_name: Option<String>,
    pub key: Option<String>,
    pub geo_position: Option<RawGeoPosition>,
}

impl RawCity {
    fn into_location(self) -> Option<CityLocation> {
        let key = self.key?;
        let geo = self.geo_position?;
        Some(CityLocation {
            name: self.localized_name.unwrap_or_else(|| key.clone()),
            location_key: key,
            latitude: geo.latitude?,
            longitude: geo.longitude?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawGeoPosition {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// One current-conditions observation. The provider wraps metric readings in
/// a `Metric`/`Imperial` pair; only the metric side is consumed here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawConditions {
    pub weather_text: Option<String>,
    pub temperature: Option<RawMetricPair>,
    pub real_feel_temperature: Option<RawMetricPair>,
    pub temperature_summary: Option<RawTemperatureSummary>,
    pub relative_humidity: Option<u8>,
    pub pressure: Option<RawMetricPair>,
    pub wind: Option<RawWind>,
    #[serde(rename = "UVIndex")]
    pub uv_index: Option<u8>,
    #[serde(rename = "UVIndexText")]
    pub uv_index_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawMetricPair {
    pub metric: Option<RawUnitValue>,
}

impl RawMetricPair {
    /// Metric reading, if the provider supplied one.
    pub fn value(&self) -> Option<f64> {
        self.metric.as_ref().and_then(|m| m.value)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawUnitValue {
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTemperatureSummary {
    pub past6_hour_range: Option<RawTemperatureRange>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTemperatureRange {
    pub minimum: Option<RawMetricPair>,
    pub maximum: Option<RawMetricPair>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawWind {
    pub speed: Option<RawMetricPair>,
    pub direction: Option<RawWindDirection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawWindDirection {
    pub degrees: Option<u16>,
    pub localized: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawForecastResponse {
    #[serde(default)]
    pub daily_forecasts: Vec<RawForecastDay>,
}

/// One raw forecast day. Unlike current conditions, forecast temperatures
/// carry their value directly (no `Metric` wrapper).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawForecastDay {
    pub date: Option<String>,
    pub temperature: Option<RawForecastTemperature>,
    pub day: Option<RawDayPart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawForecastTemperature {
    pub minimum: Option<RawUnitValue>,
    pub maximum: Option<RawUnitValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawDayPart {
    pub icon_phrase: Option<String>,
    pub rain_probability: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_search_entry_parses() {
        let json = r#"
        {
            "Key": "328328",
            "LocalizedName": "London",
            "GeoPosition": { "Latitude": 51.558, "Longitude": -0.107 }
        }"#;

        let raw: RawCity = serde_json::from_str(json).expect("city entry must parse");
        let city = raw.into_location().expect("complete entry converts");

        assert_eq!(city.location_key, "328328");
        assert_eq!(city.name, "London");
        assert!((city.latitude - 51.558).abs() < f64::EPSILON);
    }

    #[test]
    fn city_without_key_is_dropped() {
        let json = r#"{ "LocalizedName": "Nowhere" }"#;
        let raw: RawCity = serde_json::from_str(json).expect("parse");
        assert!(raw.into_location().is_none());
    }

    #[test]
    fn conditions_parse_with_nested_metric_values() {
        let json = r#"
        {
            "WeatherText": "Partly sunny",
            "Temperature": { "Metric": { "Value": 21.5, "Unit": "C" } },
            "RealFeelTemperature": { "Metric": { "Value": 23.0 } },
            "TemperatureSummary": {
                "Past6HourRange": {
                    "Minimum": { "Metric": { "Value": 18.2 } },
                    "Maximum": { "Metric": { "Value": 24.9 } }
                }
            },
            "RelativeHumidity": 65,
            "Pressure": { "Metric": { "Value": 1012.0 } },
            "Wind": {
                "Speed": { "Metric": { "Value": 14.8 } },
                "Direction": { "Degrees": 180, "Localized": "S" }
            },
            "UVIndex": 7,
            "UVIndexText": "High"
        }"#;

        let raw: RawConditions = serde_json::from_str(json).expect("conditions must parse");

        assert_eq!(raw.temperature.as_ref().and_then(RawMetricPair::value), Some(21.5));
        assert_eq!(raw.relative_humidity, Some(65));
        assert_eq!(raw.uv_index_text.as_deref(), Some("High"));
        let range = raw
            .temperature_summary
            .and_then(|s| s.past6_hour_range)
            .expect("range present");
        assert_eq!(range.maximum.as_ref().and_then(RawMetricPair::value), Some(24.9));
    }

    #[test]
    fn conditions_tolerate_missing_fields() {
        let raw: RawConditions = serde_json::from_str("{}").expect("empty object must parse");
        assert!(raw.temperature.is_none());
        assert!(raw.relative_humidity.is_none());
        assert!(raw.uv_index.is_none());
    }

    #[test]
    fn forecast_day_parses_flat_temperature_values() {
        let json = r#"
        {
            "Date": "2024-05-20T07:00:00+01:00",
            "Temperature": {
                "Minimum": { "Value": 11.0, "Unit": "C" },
                "Maximum": { "Value": 19.5, "Unit": "C" }
            },
            "Day": { "IconPhrase": "Showers", "RainProbability": 55 }
        }"#;

        let raw: RawForecastDay = serde_json::from_str(json).expect("forecast day must parse");

        let temp = raw.temperature.expect("temperature present");
        assert_eq!(temp.maximum.and_then(|v| v.value), Some(19.5));
        let day = raw.day.expect("day part present");
        assert_eq!(day.icon_phrase.as_deref(), Some("Showers"));
        assert_eq!(day.rain_probability, Some(55));
    }

    #[test]
    fn client_construction_requires_an_api_key() {
        let err = AccuWeatherClient::new(&ProviderConfig::default()).unwrap_err();
        assert!(err.to_string().contains("No weather provider API key"));
        assert!(err.to_string().contains("skycast configure"));
    }

    #[test]
    fn truncate_body_caps_long_payloads() {
        let long = "x".repeat(500);
        let short = truncate_body(&long);
        assert!(short.len() <= 203);
        assert!(short.ends_with("..."));
        assert_eq!(truncate_body("ok"), "ok");
    }
}
