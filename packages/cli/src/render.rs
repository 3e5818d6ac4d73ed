//! Plain-text rendering of dashboard output for the terminal.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use epi_map_choropleth_models::Legend;
use epi_map_dashboard_models::{MapView, TableView};
use epi_map_geography_models::{RegionCoverage, RegionKey};
use epi_map_surveillance_models::series::RegionSeries;
use epi_map_surveillance_models::MetricMode;

/// Legend stops printed in text mode (every tenth percent).
const LEGEND_STEP: usize = 10;

/// Renders the summary table.
#[must_use]
pub fn table(view: &TableView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(
        out,
        "{:<14} {:^5} {:>10} {:>12} {:>12} {:>22} {:>10} {:>10} {:>18}",
        "Region",
        "Trend",
        "Change",
        "Obs. cases",
        "Fcst. cases",
        "Fcst. cases (range)",
        "Obs. rate",
        "Fcst. rate",
        "Fcst. rate (range)",
    );
    let _ = writeln!(out, "{}", "-".repeat(124));

    for row in &view.rows {
        let _ = writeln!(
            out,
            "{:<14} {:^5} {:>10} {:>12} {:>12} {:>22} {:>10} {:>10} {:>18}",
            row.region.as_str(),
            row.arrow.map_or("", |a| a.symbol()),
            row.trend_label,
            row.observed_cases_label,
            row.forecast_cases_label,
            row.cases_interval_label,
            row.observed_rate_label,
            row.forecast_rate_label,
            row.rate_interval_label,
        );
    }

    if view.rows.is_empty() {
        let _ = writeln!(out, "(no regions have data for this horizon)");
    }
    if let Some(footer) = &view.footer {
        let _ = writeln!(out, "{footer}");
    }
    out
}

/// Renders one map as a region/value/color list.
#[must_use]
pub fn map(view: &MapView, metric: MetricMode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);
    if let Some(week) = &view.week {
        let _ = writeln!(out, "Week {week}");
    }
    for fill in &view.fills {
        let value = fill.value.map_or_else(
            || "no data".to_string(),
            |v| format!("{v:.1}{}", metric.unit_suffix()),
        );
        let _ = writeln!(out, "{:<14} {:<28} {}", fill.region.as_str(), value, fill.color);
    }
    out
}

/// Renders the legend gradient, one line per ten percent.
#[must_use]
pub fn legend(legend: &Legend) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", legend.title);
    for stop in legend.stops.iter().step_by(LEGEND_STEP) {
        let _ = writeln!(out, "{:>4}%  {:>10.1}  {}", stop.offset, stop.value, stop.color);
    }
    out
}

/// Renders a region's trend series.
#[must_use]
pub fn series(series: &RegionSeries) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}) - {}",
        series.region,
        series.chart_id,
        series.metric.axis_label()
    );
    if series.is_empty() {
        let _ = writeln!(out, "(no rows)");
        return out;
    }
    for point in &series.points {
        let _ = writeln!(
            out,
            "{:<6} {}  {:<8} {:>10.1}  [{:.1}, {:.1}]",
            point.tick_label, point.date, point.kind, point.value, point.low, point.up
        );
    }
    let _ = writeln!(out, "y max: {:.1}", series.y_max);
    out
}

fn join_keys(keys: &BTreeSet<RegionKey>) -> String {
    keys.iter()
        .map(RegionKey::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders the region coverage report.
#[must_use]
pub fn coverage(coverage: &RegionCoverage, skipped_rows: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Matched:               {}", join_keys(&coverage.matched));
    let _ = writeln!(out, "No table rows:         {}", join_keys(&coverage.missing_in_table));
    let _ = writeln!(
        out,
        "No boundary feature:   {}",
        join_keys(&coverage.missing_in_boundaries)
    );
    let _ = writeln!(out, "Skipped table rows:    {skipped_rows}");
    out
}

#[cfg(test)]
mod tests {
    use epi_map_choropleth_models::{Color, RegionFill};

    use super::*;

    #[test]
    fn map_marks_regions_without_data() {
        let view = MapView {
            title: "Forecast within 1 week".to_string(),
            week: None,
            fills: vec![
                RegionFill {
                    region: RegionKey::from("SOFALA"),
                    name: "Sofala".to_string(),
                    value: Some(12.0),
                    color: Color::rgb(0x44, 0x01, 0x54),
                },
                RegionFill {
                    region: RegionKey::from("TETE"),
                    name: "Tete".to_string(),
                    value: None,
                    color: Color::BLACK,
                },
            ],
        };
        let text = map(&view, MetricMode::Rate);
        assert!(text.contains("12.0/100k inhabitants"));
        assert!(text.contains("no data"));
        assert!(text.contains("#000000"));
    }

    #[test]
    fn empty_table_says_so() {
        let view = TableView {
            title: "Observed and forecast cases (within 1 week)".to_string(),
            rows: Vec::new(),
            footer: None,
        };
        assert!(table(&view).contains("no regions have data"));
    }

    #[test]
    fn coverage_lists_keys() {
        let report = RegionCoverage {
            matched: [RegionKey::from("GAZA"), RegionKey::from("TETE")].into(),
            ..RegionCoverage::default()
        };
        let text = coverage(&report, 3);
        assert!(text.contains("GAZA, TETE"));
        assert!(text.contains("Skipped table rows:    3"));
    }
}
