//! Formatting of joined rows for the summary table.

use epi_map_surveillance_models::summary::{SummaryRow, TableFooter};
pub use epi_map_surveillance_models::trend::format_number;
use epi_map_surveillance_models::JoinedRecord;

/// Shown in place of a value that a row does not have.
pub const EMPTY_CELL: &str = "-";

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| EMPTY_CELL.to_string(), format_number)
}

fn format_interval(low: Option<f64>, up: Option<f64>) -> String {
    match (low, up) {
        (Some(low), Some(up)) => format!("{} to {}", format_number(low), format_number(up)),
        _ => EMPTY_CELL.to_string(),
    }
}

/// Formats one joined row.
#[must_use]
pub fn summary_row(row: &JoinedRecord) -> SummaryRow {
    let observed_cases = row.observed.as_ref().map(|o| o.incident_cases);
    let observed_rate = row.observed.as_ref().map(|o| o.rate);
    let forecast = &row.forecast;

    SummaryRow {
        region: row.region.clone(),
        trend: row.trend,
        arrow: row.trend.arrow(),
        trend_label: row.trend.percent_label(),
        observed_cases,
        observed_cases_label: format_optional(observed_cases),
        forecast_cases: forecast.incident_cases,
        forecast_cases_label: format_number(forecast.incident_cases),
        cases_interval_label: format_interval(
            forecast.incident_cases_low,
            forecast.incident_cases_upp,
        ),
        observed_rate,
        observed_rate_label: format_optional(observed_rate),
        forecast_rate: forecast.rate,
        forecast_rate_label: format_number(forecast.rate),
        rate_interval_label: format_interval(forecast.rate_low, forecast.rate_up),
    }
}

/// Formats every joined row, keeping their order.
#[must_use]
pub fn summary_rows(rows: &[JoinedRecord]) -> Vec<SummaryRow> {
    rows.iter().map(summary_row).collect()
}

/// Week labels for the table footer, taken from the first row.
#[must_use]
pub fn table_footer(rows: &[JoinedRecord]) -> Option<TableFooter> {
    rows.first().map(|first| TableFooter {
        observed_week: first.observed_week(),
        forecast_week: first.forecast_week(),
    })
}
