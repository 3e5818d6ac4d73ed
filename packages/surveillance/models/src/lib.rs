#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Surveillance record, display parameter and trend types.
//!
//! A surveillance table holds one row per (region, disease, row kind,
//! epidemiological week). Observed rows carry reported incidence;
//! forecast rows carry model predictions with uncertainty bounds. These
//! types are shared by the loader, the series joiner and every consumer
//! of the joined output.

pub mod series;
pub mod summary;
pub mod trend;

use chrono::NaiveDate;
use epi_map_geography_models::RegionKey;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use trend::{Trend, TrendArrow};

/// Largest forecast horizon the dashboard exposes, in weeks.
pub const MAX_FORECAST_HORIZON: u32 = 16;

/// Largest horizon any configuration may allow (weeks in an
/// epidemiological year). Deserialized horizons are checked against this.
pub const MAX_HORIZON_WEEKS: u32 = 53;

/// Which stream of the table a row belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(ascii_case_insensitive)]
pub enum RecordType {
    /// Historically reported incidence.
    #[strum(to_string = "Observed", serialize = "Observado")]
    Observed,
    /// Model-predicted incidence with uncertainty bounds.
    #[strum(to_string = "Forecast", serialize = "Previsto")]
    Forecast,
}

/// Which metric drives map colors, tooltips and trend charts.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MetricMode {
    /// Cases per 100,000 population.
    #[default]
    Rate,
    /// Absolute incident case count.
    Cases,
}

impl MetricMode {
    /// Legend subtitle for this metric.
    #[must_use]
    pub const fn legend_title(self) -> &'static str {
        match self {
            Self::Rate => "Rate per 100k inhabitants",
            Self::Cases => "Total cases",
        }
    }

    /// Y-axis label for trend charts.
    #[must_use]
    pub const fn axis_label(self) -> &'static str {
        match self {
            Self::Rate => "Rate per 100k",
            Self::Cases => "Cases",
        }
    }

    /// Unit suffix appended to tooltip values.
    #[must_use]
    pub const fn unit_suffix(self) -> &'static str {
        match self {
            Self::Rate => "/100k inhabitants",
            Self::Cases => " cases",
        }
    }
}

/// Number of weeks ahead a forecast row targets, 1-indexed.
///
/// Horizon `k` selects the k-th soonest forecast week of each region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ForecastHorizon(u32);

impl ForecastHorizon {
    /// The soonest forecast week.
    pub const FIRST: Self = Self(1);

    /// Creates a horizon in `1..=max`.
    ///
    /// # Errors
    ///
    /// Returns an error if `weeks` is zero or exceeds `max`.
    pub const fn new(weeks: u32, max: u32) -> Result<Self, InvalidHorizonError> {
        if weeks == 0 || weeks > max {
            return Err(InvalidHorizonError { value: weeks, max });
        }
        Ok(Self(weeks))
    }

    /// Returns the horizon in weeks.
    #[must_use]
    pub const fn weeks(self) -> u32 {
        self.0
    }

    /// Returns the 1-based rank as an index usable on a sorted slice
    /// (`k - 1`).
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Returns "week" or "weeks" to match the horizon.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        if self.0 > 1 { "weeks" } else { "week" }
    }
}

impl Default for ForecastHorizon {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u32> for ForecastHorizon {
    type Error = InvalidHorizonError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value, MAX_HORIZON_WEEKS)
    }
}

impl From<ForecastHorizon> for u32 {
    fn from(value: ForecastHorizon) -> Self {
        value.0
    }
}

impl std::fmt::Display for ForecastHorizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.unit())
    }
}

/// Error returned when a forecast horizon is outside `1..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidHorizonError {
    /// The rejected horizon.
    pub value: u32,
    /// Largest horizon allowed at the time of the check.
    pub max: u32,
}

impl std::fmt::Display for InvalidHorizonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid forecast horizon {}: expected 1-{}",
            self.value, self.max
        )
    }
}

impl std::error::Error for InvalidHorizonError {}

/// The display parameters of one refresh.
///
/// Built once from the UI controls (disease tab, horizon slider, rate/count
/// toggle) and passed into the pipeline, which never reads UI state on
/// its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayParams {
    /// Disease identifier, matched exactly against the `disease` column.
    pub disease: String,
    /// Forecast week to show.
    pub horizon: ForecastHorizon,
    /// Metric used for colors and charts.
    pub metric: MetricMode,
}

impl DisplayParams {
    /// Creates a new parameter set.
    #[must_use]
    pub fn new(disease: impl Into<String>, horizon: ForecastHorizon, metric: MetricMode) -> Self {
        Self {
            disease: disease.into(),
            horizon,
            metric,
        }
    }
}

/// One row of the surveillance table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Canonical region key.
    pub region: RegionKey,
    /// Disease identifier (e.g. `"malaria"`).
    pub disease: String,
    /// Observed or forecast.
    pub kind: RecordType,
    /// Last day of the epidemiological week.
    pub date: NaiveDate,
    /// Epidemiological week number, 1-53.
    pub epiweek: u8,
    /// Four-digit epidemiological year.
    pub epiyear: i32,
    /// Cases per 100,000 population.
    pub rate: f64,
    /// Lower bound of `rate` (forecast rows).
    pub rate_low: Option<f64>,
    /// Upper bound of `rate` (forecast rows).
    pub rate_up: Option<f64>,
    /// Absolute case count.
    pub incident_cases: f64,
    /// Lower bound of `incident_cases` (forecast rows).
    pub incident_cases_low: Option<f64>,
    /// Upper bound of `incident_cases` (forecast rows).
    pub incident_cases_upp: Option<f64>,
}

impl Record {
    /// Returns the value of `metric` for this row.
    #[must_use]
    pub const fn value(&self, metric: MetricMode) -> f64 {
        match metric {
            MetricMode::Rate => self.rate,
            MetricMode::Cases => self.incident_cases,
        }
    }

    /// Returns the `(low, up)` bounds of `metric`, if the row has them.
    #[must_use]
    pub const fn bounds(&self, metric: MetricMode) -> (Option<f64>, Option<f64>) {
        match metric {
            MetricMode::Rate => (self.rate_low, self.rate_up),
            MetricMode::Cases => (self.incident_cases_low, self.incident_cases_upp),
        }
    }

    /// Returns the epidemiological week label of this row.
    #[must_use]
    pub const fn week(&self) -> WeekLabel {
        WeekLabel {
            epiweek: self.epiweek,
            epiyear: self.epiyear,
            date: self.date,
        }
    }

    /// Returns `true` for observed rows.
    #[must_use]
    pub fn is_observed(&self) -> bool {
        self.kind == RecordType::Observed
    }

    /// Returns `true` for forecast rows.
    #[must_use]
    pub fn is_forecast(&self) -> bool {
        self.kind == RecordType::Forecast
    }
}

/// Identifies an epidemiological week for titles and footers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekLabel {
    /// Epidemiological week number.
    pub epiweek: u8,
    /// Epidemiological year.
    pub epiyear: i32,
    /// Last day of the week.
    pub date: NaiveDate,
}

impl WeekLabel {
    /// Short `week/year-2000` form used on chart ticks (e.g. `"2/24"`,
    /// `"5/5"` for 2005).
    #[must_use]
    pub fn short(&self) -> String {
        format!("{}/{}", self.epiweek, self.epiyear - 2000)
    }
}

impl std::fmt::Display for WeekLabel {
    /// Renders as `2/24 (14-Jan-24)`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.short(), self.date.format("%d-%b-%y"))
    }
}

/// Metrics of the latest observed week of a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedMetrics {
    /// Observed rate.
    pub rate: f64,
    /// Observed case count.
    pub incident_cases: f64,
    /// Epidemiological week.
    pub epiweek: u8,
    /// Epidemiological year.
    pub epiyear: i32,
    /// Last day of the week.
    pub date: NaiveDate,
}

impl From<&Record> for ObservedMetrics {
    fn from(record: &Record) -> Self {
        Self {
            rate: record.rate,
            incident_cases: record.incident_cases,
            epiweek: record.epiweek,
            epiyear: record.epiyear,
            date: record.date,
        }
    }
}

/// Metrics of the forecast week selected by the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastMetrics {
    /// Forecast rate.
    pub rate: f64,
    /// Lower bound of the forecast rate.
    pub rate_low: Option<f64>,
    /// Upper bound of the forecast rate.
    pub rate_up: Option<f64>,
    /// Forecast case count.
    pub incident_cases: f64,
    /// Lower bound of the forecast case count.
    pub incident_cases_low: Option<f64>,
    /// Upper bound of the forecast case count.
    pub incident_cases_upp: Option<f64>,
    /// Epidemiological week.
    pub epiweek: u8,
    /// Epidemiological year.
    pub epiyear: i32,
    /// Last day of the week.
    pub date: NaiveDate,
}

impl From<&Record> for ForecastMetrics {
    fn from(record: &Record) -> Self {
        Self {
            rate: record.rate,
            rate_low: record.rate_low,
            rate_up: record.rate_up,
            incident_cases: record.incident_cases,
            incident_cases_low: record.incident_cases_low,
            incident_cases_upp: record.incident_cases_upp,
            epiweek: record.epiweek,
            epiyear: record.epiyear,
            date: record.date,
        }
    }
}

/// One region's observed and forecast metrics side by side.
///
/// `observed` is `None` when the region has forecast rows but no observed
/// rows; consumers render such rows partially instead of dropping them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedRecord {
    /// Canonical region key.
    pub region: RegionKey,
    /// Latest observed week, if any.
    pub observed: Option<ObservedMetrics>,
    /// Forecast at the selected horizon.
    pub forecast: ForecastMetrics,
    /// Relative change from observed to forecast rate.
    pub trend: Trend,
}

impl JoinedRecord {
    /// Week label of the observed side.
    #[must_use]
    pub fn observed_week(&self) -> Option<WeekLabel> {
        self.observed.as_ref().map(|o| WeekLabel {
            epiweek: o.epiweek,
            epiyear: o.epiyear,
            date: o.date,
        })
    }

    /// Week label of the forecast side.
    #[must_use]
    pub const fn forecast_week(&self) -> WeekLabel {
        WeekLabel {
            epiweek: self.forecast.epiweek,
            epiyear: self.forecast.epiyear,
            date: self.forecast.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_type_accepts_both_spellings() {
        assert_eq!("Observed".parse::<RecordType>().unwrap(), RecordType::Observed);
        assert_eq!("Observado".parse::<RecordType>().unwrap(), RecordType::Observed);
        assert_eq!("previsto".parse::<RecordType>().unwrap(), RecordType::Forecast);
        assert_eq!("FORECAST".parse::<RecordType>().unwrap(), RecordType::Forecast);
        assert!("Projected".parse::<RecordType>().is_err());
        assert_eq!(RecordType::Forecast.to_string(), "Forecast");
    }

    #[test]
    fn metric_mode_parses_lowercase() {
        assert_eq!("rate".parse::<MetricMode>().unwrap(), MetricMode::Rate);
        assert_eq!("Cases".parse::<MetricMode>().unwrap(), MetricMode::Cases);
        assert_eq!(MetricMode::Cases.to_string(), "cases");
    }

    #[test]
    fn horizon_bounds() {
        assert!(ForecastHorizon::new(0, MAX_FORECAST_HORIZON).is_err());
        assert!(ForecastHorizon::new(17, MAX_FORECAST_HORIZON).is_err());
        let k = ForecastHorizon::new(16, MAX_FORECAST_HORIZON).unwrap();
        assert_eq!(k.weeks(), 16);
        assert_eq!(k.index(), 15);
        assert_eq!(k.to_string(), "16 weeks");
        assert_eq!(ForecastHorizon::FIRST.to_string(), "1 week");
    }

    #[test]
    fn horizon_error_message() {
        let err = ForecastHorizon::new(20, 16).unwrap_err();
        assert_eq!(err.to_string(), "invalid forecast horizon 20: expected 1-16");
    }

    #[test]
    fn horizon_deserialization_is_validated() {
        let ok: ForecastHorizon = serde_json::from_str("2").unwrap();
        assert_eq!(ok.weeks(), 2);
        assert!(serde_json::from_str::<ForecastHorizon>("0").is_err());
        assert!(serde_json::from_str::<ForecastHorizon>("54").is_err());
    }

    #[test]
    fn params_beyond_default_horizon_round_trip() {
        let params = DisplayParams::new(
            "malaria",
            ForecastHorizon::new(20, MAX_HORIZON_WEEKS).unwrap(),
            MetricMode::Cases,
        );
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(serde_json::from_str::<DisplayParams>(&json).unwrap(), params);
    }

    #[test]
    fn week_label_formats() {
        let week = WeekLabel {
            epiweek: 2,
            epiyear: 2024,
            date: NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
        };
        assert_eq!(week.short(), "2/24");
        assert_eq!(week.to_string(), "2/24 (14-Jan-24)");
    }

    #[test]
    fn short_week_label_does_not_pad_the_year() {
        let week = WeekLabel {
            epiweek: 5,
            epiyear: 2005,
            date: NaiveDate::from_ymd_opt(2005, 2, 5).unwrap(),
        };
        assert_eq!(week.short(), "5/5");
    }
}
