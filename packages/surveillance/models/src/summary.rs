//! Display rows of the observed/forecast summary table.

use epi_map_geography_models::RegionKey;
use serde::{Deserialize, Serialize};

use crate::{ForecastHorizon, Trend, TrendArrow, WeekLabel};

/// One formatted row of the summary table.
///
/// Numeric fields keep their raw value for sorting; the `*_label` fields
/// are what the table shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub region: RegionKey,
    pub trend: Trend,
    pub arrow: Option<TrendArrow>,
    pub trend_label: String,
    pub observed_cases: Option<f64>,
    pub observed_cases_label: String,
    pub forecast_cases: f64,
    pub forecast_cases_label: String,
    pub cases_interval_label: String,
    pub observed_rate: Option<f64>,
    pub observed_rate_label: String,
    pub forecast_rate: f64,
    pub forecast_rate_label: String,
    pub rate_interval_label: String,
}

/// Week labels shown under the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableFooter {
    /// Most recent observed week. `None` when the first row has no
    /// observed side.
    pub observed_week: Option<WeekLabel>,
    /// Forecast week selected by the horizon.
    pub forecast_week: WeekLabel,
}

impl std::fmt::Display for TableFooter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.observed_week {
            Some(week) => write!(f, "Observed week: {week}")?,
            None => f.write_str("Observed week: -")?,
        }
        write!(f, " | Forecast week: {}", self.forecast_week)
    }
}

/// Title of the forecast map for a horizon.
#[must_use]
pub fn forecast_title(horizon: ForecastHorizon) -> String {
    format!("Forecast within {horizon}")
}

/// Title of the summary table for a horizon.
#[must_use]
pub fn table_title(horizon: ForecastHorizon) -> String {
    format!("Observed and forecast cases (within {horizon})")
}
