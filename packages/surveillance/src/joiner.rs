//! Observed/forecast series joiner.
//!
//! For one set of [`DisplayParams`] the joiner:
//!
//! 1. keeps the rows of the selected disease,
//! 2. reduces each region's observed rows to the most recent week,
//! 3. reduces each region's forecast rows to the k-th soonest week,
//! 4. joins the two by region key,
//! 5. computes the relative change from observed to forecast rate.
//!
//! Every step is a pure function over borrowed records, so each refresh
//! recomputes from the table without any cached state.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use epi_map_geography_models::RegionKey;
use epi_map_surveillance_models::{
    DisplayParams, ForecastHorizon, ForecastMetrics, JoinedRecord, MetricMode, ObservedMetrics,
    Record, Trend, WeekLabel,
};

/// Latest observed row of each region.
pub type ObservedMap<'a> = BTreeMap<RegionKey, &'a Record>;

/// Forecast row at the selected horizon for each region that has forecast
/// rows. `None` marks a region with fewer than k forecast weeks.
pub type ForecastMap<'a> = BTreeMap<RegionKey, Option<&'a Record>>;

/// Keeps the rows whose disease equals `disease` exactly.
#[must_use]
pub fn select_disease<'a>(records: &'a [Record], disease: &str) -> Vec<&'a Record> {
    records.iter().filter(|r| r.disease == disease).collect()
}

/// Picks the most recent observed row of each region.
///
/// Forecast rows are ignored. When two observed rows of a region share the
/// latest date, the one that comes first in `records` wins.
#[must_use]
pub fn latest_observed<'a>(records: impl IntoIterator<Item = &'a Record>) -> ObservedMap<'a> {
    let mut latest = ObservedMap::new();

    for record in records.into_iter().filter(|r| r.is_observed()) {
        match latest.entry(record.region.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(record);
            }
            Entry::Occupied(mut entry) => {
                if record.date > entry.get().date {
                    entry.insert(record);
                }
            }
        }
    }

    latest
}

/// Picks the k-th soonest forecast row of each region.
///
/// Rows are stably sorted by date, so rows sharing a date keep their input
/// order. Regions with fewer than k forecast rows map to `None`.
#[must_use]
pub fn nth_forecast<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    horizon: ForecastHorizon,
) -> ForecastMap<'a> {
    let mut by_region: BTreeMap<RegionKey, Vec<&'a Record>> = BTreeMap::new();
    for record in records.into_iter().filter(|r| r.is_forecast()) {
        by_region
            .entry(record.region.clone())
            .or_default()
            .push(record);
    }

    by_region
        .into_iter()
        .map(|(region, mut rows)| {
            rows.sort_by_key(|r| r.date);
            let row = rows.get(horizon.index()).copied();
            if row.is_none() {
                log::debug!(
                    "Region {region} has {} forecast weeks, fewer than {}",
                    rows.len(),
                    horizon.weeks()
                );
            }
            (region, row)
        })
        .collect()
}

/// Joins the observed and forecast maps by region.
///
/// Only regions with a present forecast produce a row. A region without
/// observed data still produces a row, with `observed` left empty. The
/// trend is left [`Trend::Undefined`] until [`compute_trend`] runs.
#[must_use]
pub fn join(observed: &ObservedMap<'_>, forecast: &ForecastMap<'_>) -> Vec<JoinedRecord> {
    forecast
        .iter()
        .filter_map(|(region, row)| {
            let row = (*row)?;
            let observed = observed.get(region).map(|r| ObservedMetrics::from(*r));
            if observed.is_none() {
                log::debug!("Region {region} has a forecast but no observed rows");
            }
            Some(JoinedRecord {
                region: region.clone(),
                observed,
                forecast: ForecastMetrics::from(row),
                trend: Trend::Undefined,
            })
        })
        .collect()
}

/// Fills in the trend of every joined row.
#[must_use]
pub fn compute_trend(joined: Vec<JoinedRecord>) -> Vec<JoinedRecord> {
    joined
        .into_iter()
        .map(|mut row| {
            row.trend = Trend::between(row.observed.as_ref().map(|o| o.rate), row.forecast.rate);
            row
        })
        .collect()
}

/// Output of one joiner run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinOutput {
    /// Joined rows sorted by region key.
    pub rows: Vec<JoinedRecord>,
    /// Regions of the selected disease that produced no row (no forecast
    /// rows, or fewer than k of them).
    pub missing: BTreeSet<RegionKey>,
}

/// Runs the join pipeline over a loaded table.
#[derive(Debug, Clone, Copy)]
pub struct SeriesJoiner<'a> {
    records: &'a [Record],
}

impl<'a> SeriesJoiner<'a> {
    #[must_use]
    pub const fn new(records: &'a [Record]) -> Self {
        Self { records }
    }

    /// Rows of one disease, in table order.
    #[must_use]
    pub fn select(&self, disease: &str) -> Vec<&'a Record> {
        select_disease(self.records, disease)
    }

    /// Latest observed row per region for one disease.
    #[must_use]
    pub fn observed_map(&self, disease: &str) -> ObservedMap<'a> {
        latest_observed(self.select(disease))
    }

    /// k-th forecast row per region for one disease.
    #[must_use]
    pub fn forecast_map(&self, disease: &str, horizon: ForecastHorizon) -> ForecastMap<'a> {
        nth_forecast(self.select(disease), horizon)
    }

    /// Runs the full pipeline for `params`.
    #[must_use]
    pub fn run(&self, params: &DisplayParams) -> JoinOutput {
        let selected = self.select(&params.disease);
        if selected.is_empty() {
            log::warn!("No rows found for disease '{}'", params.disease);
        }

        let observed = latest_observed(selected.iter().copied());
        let forecast = nth_forecast(selected.iter().copied(), params.horizon);
        let rows = compute_trend(join(&observed, &forecast));

        let joined: BTreeSet<&RegionKey> = rows.iter().map(|r| &r.region).collect();
        let missing: BTreeSet<RegionKey> = selected
            .iter()
            .map(|r| &r.region)
            .filter(|region| !joined.contains(region))
            .cloned()
            .collect();

        log::debug!(
            "Joined {} regions for {} at {} ({} missing)",
            rows.len(),
            params.disease,
            params.horizon,
            missing.len()
        );

        JoinOutput { rows, missing }
    }
}

/// Metric values of the observed map, for coloring.
#[must_use]
pub fn observed_values(
    observed: &ObservedMap<'_>,
    metric: MetricMode,
) -> BTreeMap<RegionKey, Option<f64>> {
    observed
        .iter()
        .map(|(region, row)| (region.clone(), Some(row.value(metric))))
        .collect()
}

/// Metric values of the forecast map, for coloring. Absent horizons stay
/// `None`.
#[must_use]
pub fn forecast_values(
    forecast: &ForecastMap<'_>,
    metric: MetricMode,
) -> BTreeMap<RegionKey, Option<f64>> {
    forecast
        .iter()
        .map(|(region, row)| (region.clone(), row.map(|r| r.value(metric))))
        .collect()
}

/// Smallest and largest value of `metric` over `records`, or `None` when
/// there are no records.
#[must_use]
pub fn metric_extent<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    metric: MetricMode,
) -> Option<(f64, f64)> {
    records
        .into_iter()
        .map(|r| r.value(metric))
        .fold(None, |extent, v| match extent {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}

/// Week label of the most recent row in `records`.
#[must_use]
pub fn latest_week<'a>(records: impl IntoIterator<Item = &'a Record>) -> Option<WeekLabel> {
    records
        .into_iter()
        .map(Record::week)
        .max_by_key(|week| week.date)
}
