//! Per-region time series for the trend charts.

use chrono::NaiveDate;
use epi_map_geography_models::RegionKey;
use serde::{Deserialize, Serialize};

use crate::{MetricMode, RecordType};

/// One week of a region's trend chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// Last day of the week.
    pub date: NaiveDate,
    /// Epidemiological week.
    pub epiweek: u8,
    /// Epidemiological year.
    pub epiyear: i32,
    /// Observed or forecast.
    pub kind: RecordType,
    /// Metric value.
    pub value: f64,
    /// Lower band edge. Equal to `value` when the row has no bound.
    pub low: f64,
    /// Upper band edge. Equal to `value` when the row has no bound.
    pub up: f64,
    /// Tick label (`week/yy`).
    pub tick_label: String,
}

/// A region's full trend chart: observed history followed by forecasts,
/// with a confidence band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSeries {
    /// Canonical region key.
    pub region: RegionKey,
    /// Chart element identifier for the region.
    pub chart_id: String,
    /// Metric plotted.
    pub metric: MetricMode,
    /// Points sorted by date.
    pub points: Vec<SeriesPoint>,
    /// First and last date of the series, if any.
    pub date_extent: Option<(NaiveDate, NaiveDate)>,
    /// Upper bound of the y axis (10% headroom over the highest band
    /// edge). Zero for an empty series.
    pub y_max: f64,
}

impl RegionSeries {
    /// Returns `true` if the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
