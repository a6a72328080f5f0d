//! Core library for the `skycast` weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather-provider and text-generation HTTP clients
//! - The normalization/presentation pipeline and the dashboard controller
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or
//! services that want the controller's view model.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod normalize;
pub mod present;
pub mod provider;
pub mod retry;
pub mod summary;
pub mod view;

pub use config::{Config, ProviderConfig, SummaryConfig};
pub use controller::{DashboardController, DashboardState};
pub use error::{DashboardError, ProviderError, SummaryError};
pub use model::{CityLocation, CurrentConditions, ForecastDay, ForecastSeries};
pub use provider::{AccuWeatherClient, WeatherService};
pub use summary::{GeminiClient, Summarizer};
pub use view::DashboardView;
