//! Turns raw forecast entries into the uniform shapes the dashboard renders:
//! the ordered [`ForecastSeries`], a chart spec with y-axis bounds, and
//! table rows with explicit "unavailable" markers.

use chrono::{DateTime, NaiveDate};

use crate::model::{ForecastDay, ForecastSeries};
use crate::provider::RawForecastDay;
use crate::view::{UNAVAILABLE, fmt_pct, fmt_temp};

/// One normalized entry per raw entry, provider order preserved. Entries
/// with unparseable or missing pieces still produce a day; the gaps carry
/// `None` and render as unavailable.
#[must_use]
pub fn normalize(raw: &[RawForecastDay]) -> ForecastSeries {
    let days = raw
        .iter()
        .map(|entry| {
            let date = entry
                .date
                .as_deref()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.date_naive());

            ForecastDay {
                date,
                date_label: date.map_or_else(|| UNAVAILABLE.to_string(), date_label),
                min_temp_c: entry
                    .temperature
                    .as_ref()
                    .and_then(|t| t.minimum.as_ref())
                    .and_then(|v| v.value),
                max_temp_c: entry
                    .temperature
                    .as_ref()
                    .and_then(|t| t.maximum.as_ref())
                    .and_then(|v| v.value),
                condition: entry.day.as_ref().and_then(|d| d.icon_phrase.clone()),
                rain_probability_pct: entry.day.as_ref().and_then(|d| d.rain_probability),
            }
        })
        .collect();

    ForecastSeries { days }
}

/// "Weekday, Month DD", matching the dashboard's historic date format.
fn date_label(date: NaiveDate) -> String {
    date.format("%A, %B %d").to_string()
}

/// Chart view of the series: annotated max-temperature points plus y-axis
/// bounds.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    /// `[min(max_temp) - 1, max(max_temp) + 1]` over the finite max
    /// temperatures only. The min series deliberately plays no part in the
    /// bounds; the chart plots max temperature alone.
    pub y_range: (f64, f64),
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone)]
pub struct ChartPoint {
    pub label: String,
    pub max_temp_c: f64,
}

/// Build the chart spec, skipping days without a finite max temperature for
/// point annotation. Returns `None` when nothing is plottable.
#[must_use]
pub fn chart_spec(series: &ForecastSeries) -> Option<ChartSpec> {
    let finite_max = |day: &ForecastDay| day.max_temp_c.filter(|v| v.is_finite());

    let mut bounds: Option<(f64, f64)> = None;
    for value in series.days.iter().filter_map(finite_max) {
        bounds = Some(match bounds {
            None => (value, value),
            Some((lo, hi)) => (lo.min(value), hi.max(value)),
        });
    }
    let (lo, hi) = bounds?;

    let points = series
        .days
        .iter()
        .filter_map(|day| {
            finite_max(day).map(|max_temp_c| ChartPoint {
                label: day.date_label.clone(),
                max_temp_c,
            })
        })
        .collect();

    Some(ChartSpec { y_range: (lo - 1.0, hi + 1.0), points })
}

/// Tabular view of the series. Unlike the chart shape this one carries the
/// rain probability column; missing values render as the sentinel.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub date: String,
    pub condition: String,
    pub min_temp: String,
    pub max_temp: String,
    pub rain_probability: String,
}

#[must_use]
pub fn table_rows(series: &ForecastSeries) -> Vec<TableRow> {
    series
        .days
        .iter()
        .map(|day| TableRow {
            date: day.date_label.clone(),
            condition: day
                .condition
                .clone()
                .unwrap_or_else(|| UNAVAILABLE.to_string()),
            min_temp: fmt_temp(day.min_temp_c),
            max_temp: fmt_temp(day.max_temp_c),
            rain_probability: fmt_pct(day.rain_probability_pct),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{RawDayPart, RawForecastTemperature, RawUnitValue};

    fn raw_day(date: &str, min: Option<f64>, max: Option<f64>, phrase: &str) -> RawForecastDay {
        RawForecastDay {
            date: Some(date.to_string()),
            temperature: Some(RawForecastTemperature {
                minimum: min.map(|value| RawUnitValue { value: Some(value) }),
                maximum: max.map(|value| RawUnitValue { value: Some(value) }),
            }),
            day: Some(RawDayPart {
                icon_phrase: Some(phrase.to_string()),
                rain_probability: Some(40),
            }),
        }
    }

    fn series_with_max_temps(temps: &[f64]) -> ForecastSeries {
        let raw: Vec<RawForecastDay> = temps
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                raw_day(
                    &format!("2024-05-{:02}T07:00:00+01:00", 20 + i),
                    Some(t - 8.0),
                    Some(t),
                    "Sunny",
                )
            })
            .collect();
        normalize(&raw)
    }

    #[test]
    fn normalize_preserves_length_and_order() {
        for n in 0..6 {
            let raw: Vec<RawForecastDay> = (0..n)
                .map(|i| {
                    raw_day(
                        &format!("2024-05-{:02}T07:00:00+01:00", 20 + i),
                        Some(10.0),
                        Some(20.0 + f64::from(i)),
                        "Cloudy",
                    )
                })
                .collect();

            let series = normalize(&raw);
            assert_eq!(series.len(), n as usize);

            // Order must track provider order, never a re-sort.
            for (i, day) in series.days.iter().enumerate() {
                assert_eq!(day.max_temp_c, Some(20.0 + i as f64));
            }
        }
    }

    #[test]
    fn normalize_renders_weekday_month_day_label() {
        let series = normalize(&[raw_day("2024-05-20T07:00:00+01:00", Some(11.0), Some(19.5), "Showers")]);
        assert_eq!(series.days[0].date_label, "Monday, May 20");
    }

    #[test]
    fn normalize_tolerates_missing_date_and_temperature() {
        let series = normalize(&[RawForecastDay::default()]);

        let day = &series.days[0];
        assert!(day.date.is_none());
        assert_eq!(day.date_label, UNAVAILABLE);
        assert!(day.max_temp_c.is_none());
        assert!(day.condition.is_none());
    }

    #[test]
    fn chart_bounds_pad_the_max_series_by_one_degree() {
        let mut series = series_with_max_temps(&[20.0, 25.0, 18.0, 0.0, 22.0]);
        series.days[3].max_temp_c = Some(f64::NAN);

        let chart = chart_spec(&series).expect("chart available");

        assert!((chart.y_range.0 - 17.0).abs() < f64::EPSILON);
        assert!((chart.y_range.1 - 26.0).abs() < f64::EPSILON);
        // The NaN day is skipped for annotation...
        assert_eq!(chart.points.len(), 4);
        // ...but still appears as a table row with the sentinel.
        let rows = table_rows(&series);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[3].max_temp, UNAVAILABLE);
    }

    #[test]
    fn chart_bounds_ignore_min_temperatures() {
        let mut series = series_with_max_temps(&[20.0, 22.0]);
        series.days[0].min_temp_c = Some(-40.0);

        let chart = chart_spec(&series).expect("chart available");
        assert!((chart.y_range.0 - 19.0).abs() < f64::EPSILON);
        assert!((chart.y_range.1 - 23.0).abs() < f64::EPSILON);
    }

    #[test]
    fn chart_is_absent_when_no_finite_max_exists() {
        let mut series = series_with_max_temps(&[1.0]);
        series.days[0].max_temp_c = None;
        assert!(chart_spec(&series).is_none());

        assert!(chart_spec(&ForecastSeries::default()).is_none());
    }

    #[test]
    fn table_rows_carry_rain_probability() {
        let series = normalize(&[raw_day("2024-05-20T07:00:00+01:00", Some(11.0), Some(19.5), "Showers")]);
        let rows = table_rows(&series);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].condition, "Showers");
        assert_eq!(rows[0].rain_probability, "40%");
        assert_eq!(rows[0].max_temp, "19.5 °C");
    }
}
