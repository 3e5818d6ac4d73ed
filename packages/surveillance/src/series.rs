//! Per-region trend chart series.

use std::collections::BTreeMap;

use epi_map_geography_models::{RegionKey, provinces};
use epi_map_surveillance_models::series::{RegionSeries, SeriesPoint};
use epi_map_surveillance_models::{MetricMode, Record};

/// Headroom added above the highest band edge on the y axis.
const Y_AXIS_HEADROOM: f64 = 1.1;

fn point(record: &Record, metric: MetricMode) -> SeriesPoint {
    let value = record.value(metric);
    let (low, up) = record.bounds(metric);
    SeriesPoint {
        date: record.date,
        epiweek: record.epiweek,
        epiyear: record.epiyear,
        kind: record.kind,
        value,
        low: low.unwrap_or(value),
        up: up.unwrap_or(value),
        tick_label: record.week().short(),
    }
}

/// Builds the trend series of one region from already disease-filtered
/// rows. Both observed and forecast rows are included, sorted by date.
#[must_use]
pub fn region_series<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    region: &RegionKey,
    metric: MetricMode,
) -> RegionSeries {
    let mut rows: Vec<&Record> = records
        .into_iter()
        .filter(|r| &r.region == region)
        .collect();
    rows.sort_by_key(|r| r.date);

    let points: Vec<SeriesPoint> = rows.iter().map(|r| point(r, metric)).collect();
    let date_extent = points.first().zip(points.last()).map(|(a, b)| (a.date, b.date));
    let y_max = points.iter().map(|p| p.up).fold(0.0_f64, f64::max) * Y_AXIS_HEADROOM;

    RegionSeries {
        region: region.clone(),
        chart_id: provinces::chart_id(region.as_str()).to_string(),
        metric,
        points,
        date_extent,
        y_max,
    }
}

/// Position of a region in the chart layout: known provinces in
/// [`provinces::PROVINCES`] order, every other region after them.
fn layout_rank(region: &RegionKey) -> usize {
    provinces::PROVINCES
        .iter()
        .position(|p| *p == region.as_str())
        .unwrap_or(provinces::PROVINCES.len())
}

/// Builds the trend series of every region present in `records`, in chart
/// layout order. Regions outside the province list follow in key order.
#[must_use]
pub fn all_region_series<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    metric: MetricMode,
) -> Vec<RegionSeries> {
    let mut by_region: BTreeMap<RegionKey, Vec<&Record>> = BTreeMap::new();
    for record in records {
        by_region.entry(record.region.clone()).or_default().push(record);
    }

    let mut all: Vec<RegionSeries> = by_region
        .into_iter()
        .map(|(region, rows)| region_series(rows, &region, metric))
        .collect();
    // Stable, so unknown regions keep their key order.
    all.sort_by_key(|series| layout_rank(&series.region));
    all
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use epi_map_surveillance_models::RecordType;

    use super::*;

    fn row(
        region: &str,
        kind: RecordType,
        day: u32,
        rate: f64,
        bounds: Option<(f64, f64)>,
    ) -> Record {
        Record {
            region: RegionKey::canonical(region),
            disease: "malaria".to_string(),
            kind,
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            epiweek: 2,
            epiyear: 2024,
            rate,
            rate_low: bounds.map(|b| b.0),
            rate_up: bounds.map(|b| b.1),
            incident_cases: rate * 100.0,
            incident_cases_low: None,
            incident_cases_upp: None,
        }
    }

    #[test]
    fn series_is_sorted_and_bands_fall_back_to_value() {
        let table = vec![
            row("CABO DELGADO", RecordType::Forecast, 21, 13.0, Some((11.0, 20.0))),
            row("CABO DELGADO", RecordType::Observed, 14, 12.0, None),
            row("GAZA", RecordType::Observed, 14, 50.0, None),
        ];
        let series = region_series(&table, &RegionKey::from("cabo delgado"), MetricMode::Rate);

        assert_eq!(series.chart_id, "CABODELGADO");
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].kind, RecordType::Observed);
        assert!((series.points[0].low - 12.0).abs() < f64::EPSILON);
        assert!((series.points[0].up - 12.0).abs() < f64::EPSILON);
        assert!((series.points[1].up - 20.0).abs() < f64::EPSILON);
        assert_eq!(series.points[1].tick_label, "2/24");
        assert!((series.y_max - 22.0).abs() < 1e-9);
        assert_eq!(
            series.date_extent,
            Some((
                NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 21).unwrap()
            ))
        );
    }

    #[test]
    fn cases_metric_uses_case_columns() {
        let table = vec![row("TETE", RecordType::Observed, 14, 2.0, Some((1.0, 3.0)))];
        let series = region_series(&table, &RegionKey::from("TETE"), MetricMode::Cases);
        assert!((series.points[0].value - 200.0).abs() < f64::EPSILON);
        assert!((series.points[0].up - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_series_for_unknown_region() {
        let table = vec![row("TETE", RecordType::Observed, 14, 2.0, None)];
        let series = region_series(&table, &RegionKey::from("NIASSA"), MetricMode::Rate);
        assert!(series.is_empty());
        assert_eq!(series.date_extent, None);
        assert!(series.y_max.abs() < f64::EPSILON);
    }

    #[test]
    fn groups_every_region_in_layout_order() {
        let table = vec![
            row("TETE", RecordType::Observed, 14, 2.0, None),
            row("ATLANTIS", RecordType::Observed, 14, 2.0, None),
            row("MAPUTO CITY", RecordType::Observed, 14, 2.0, None),
            row("TETE", RecordType::Forecast, 21, 2.0, None),
            row("GAZA", RecordType::Observed, 14, 2.0, None),
        ];
        let all = all_region_series(&table, MetricMode::Rate);
        let order: Vec<_> = all.iter().map(|s| s.region.as_str()).collect();
        assert_eq!(order, vec!["GAZA", "MAPUTO CITY", "TETE", "ATLANTIS"]);
        assert_eq!(all[1].chart_id, "MAPUTOCIDADE");
        assert_eq!(all[2].points.len(), 2);
    }
}
