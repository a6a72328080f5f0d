//! Orchestrates one dashboard lookup.
//!
//! The controller walks `Idle → Searching → ConditionsLoaded → Rendering →
//! Done`, dropping into `Error` from any step. Only city search and the
//! current-conditions fetch are fatal; narrative and forecast failures are
//! scoped so the numeric output still renders.

use tracing::{debug, info, warn};

use crate::error::DashboardError;
use crate::normalize::{chart_spec, normalize, table_rows};
use crate::present::present;
use crate::provider::WeatherService;
use crate::summary::Summarizer;
use crate::view::{DashboardView, map_pin, metrics};

/// Lookup lifecycle, observable for the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardState {
    Idle,
    Searching,
    ConditionsLoaded,
    Rendering,
    Done,
    Error,
}

#[derive(Debug)]
pub struct DashboardController {
    weather: Box<dyn WeatherService>,
    summarizer: Box<dyn Summarizer>,
    state: DashboardState,
}

impl DashboardController {
    pub fn new(weather: Box<dyn WeatherService>, summarizer: Box<dyn Summarizer>) -> Self {
        Self { weather, summarizer, state: DashboardState::Idle }
    }

    #[must_use]
    pub fn state(&self) -> DashboardState {
        self.state
    }

    /// Run one lookup for `city_name` and produce the full view model.
    ///
    /// # Errors
    ///
    /// Fails with [`DashboardError`] when the city cannot be resolved or the
    /// current conditions cannot be fetched; everything downstream degrades
    /// into the view instead of failing.
    pub async fn submit(&mut self, city_name: &str) -> Result<DashboardView, DashboardError> {
        self.state = DashboardState::Searching;
        debug!(city = city_name, "searching for city");

        let cities = match self.weather.find_city(city_name).await {
            Ok(cities) => cities,
            Err(e) => return Err(self.fail(DashboardError::Search(e))),
        };

        let Some(city) = cities.into_iter().next() else {
            return Err(self.fail(DashboardError::CityNotFound));
        };
        info!(city = %city.name, key = %city.location_key, "city resolved");

        let raw = match self.weather.current_conditions(&city.location_key).await {
            Ok(raw) => raw,
            Err(e) => return Err(self.fail(DashboardError::Conditions(e))),
        };
        self.state = DashboardState::ConditionsLoaded;

        let conditions = present(&raw);
        self.state = DashboardState::Rendering;

        // Best-effort: the summarizer degrades failures into its returned
        // text, so this never aborts the lookup.
        let narrative = self.summarizer.summarize(&conditions).await;

        let (chart, table, forecast_error) =
            match self.weather.daily_forecast(&city.location_key).await {
                Ok(raw_days) => {
                    let series = normalize(&raw_days);
                    (chart_spec(&series), table_rows(&series), None)
                }
                Err(e) => {
                    warn!(error = %e, "forecast fetch failed, rendering partial view");
                    (None, Vec::new(), Some(format!("5-day forecast unavailable: {e}")))
                }
            };

        let view = DashboardView {
            map_pin: map_pin(&city, &conditions),
            metrics: metrics(&conditions),
            narrative,
            chart,
            table,
            forecast_error,
            city,
        };

        self.state = DashboardState::Done;
        Ok(view)
    }

    fn fail(&mut self, err: DashboardError) -> DashboardError {
        self.state = DashboardState::Error;
        err
    }
}
