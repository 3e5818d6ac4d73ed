#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard configuration and snapshot types.
//!
//! [`DashboardConfig`] is read from TOML. [`DashboardSnapshot`] is the
//! complete output of one refresh: both maps, the legend and the summary
//! table.

use std::collections::BTreeSet;

use epi_map_choropleth_models::{ColorDomain, Legend, RegionFill};
use epi_map_geography_models::RegionKey;
use epi_map_surveillance_models::summary::{SummaryRow, TableFooter};
use epi_map_surveillance_models::{
    DisplayParams, ForecastHorizon, InvalidHorizonError, MAX_FORECAST_HORIZON, MAX_HORIZON_WEEKS,
    WeekLabel,
};
use serde::{Deserialize, Serialize};

/// Largest horizon a configuration may allow (weeks in a year).
pub const MAX_CONFIGURABLE_HORIZON: u32 = MAX_HORIZON_WEEKS;

/// Title of the observed map.
pub const OBSERVED_TITLE: &str = "Most recent observed week";

fn default_region_property() -> String {
    "ADM1_PT".to_string()
}

const fn default_max_horizon() -> u32 {
    MAX_FORECAST_HORIZON
}

/// A disease tab of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseConfig {
    /// Value of the `disease` column.
    pub id: String,
    /// Display name.
    pub label: String,
}

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Surveillance table: a path or an `http(s)://` URL. `.gz` sources
    /// are decompressed.
    pub data: String,
    /// Boundary `GeoJSON`: a path or an `http(s)://` URL.
    pub boundaries: String,
    /// Feature property holding the region name.
    #[serde(default = "default_region_property")]
    pub region_property: String,
    /// Largest horizon the slider offers.
    #[serde(default = "default_max_horizon")]
    pub max_horizon: u32,
    /// Disease selected when a request names none.
    pub default_disease: String,
    /// Color domain of both maps and the legend.
    #[serde(default)]
    pub color_domain: ColorDomain,
    /// Disease tabs, in display order.
    pub diseases: Vec<DiseaseConfig>,
    /// Directory of the static front end, if it should be served.
    #[serde(default)]
    pub static_dir: Option<String>,
}

impl DashboardConfig {
    /// Looks up a configured disease.
    #[must_use]
    pub fn disease(&self, id: &str) -> Option<&DiseaseConfig> {
        self.diseases.iter().find(|d| d.id == id)
    }

    /// Display name of a disease, or the id itself if it is not
    /// configured.
    #[must_use]
    pub fn label_for<'a>(&'a self, id: &'a str) -> &'a str {
        self.disease(id).map_or(id, |d| d.label.as_str())
    }

    /// Validates a horizon against this configuration's limit.
    ///
    /// # Errors
    ///
    /// Returns an error if `weeks` is outside `1..=max_horizon`.
    pub const fn horizon(&self, weeks: u32) -> Result<ForecastHorizon, InvalidHorizonError> {
        ForecastHorizon::new(weeks, self.max_horizon)
    }
}

/// One of the two maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub title: String,
    /// Week of the most recent row colored on this map.
    pub week: Option<WeekLabel>,
    pub fills: Vec<RegionFill>,
}

/// The summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub title: String,
    pub rows: Vec<SummaryRow>,
    pub footer: Option<TableFooter>,
}

/// Everything one refresh produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub disease: DiseaseConfig,
    pub params: DisplayParams,
    pub observed_map: MapView,
    pub forecast_map: MapView,
    pub legend: Legend,
    pub table: TableView,
    /// Regions of the disease with no row at this horizon.
    pub missing: BTreeSet<RegionKey>,
    /// Table rows skipped while loading.
    pub skipped_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
data = "data/data.csv"
boundaries = "map/mozambique.geojson"
default_disease = "malaria"

[[diseases]]
id = "malaria"
label = "Malária"

[[diseases]]
id = "diarrhea"
label = "Doenças Diarréicas"
"#;

    #[test]
    fn fills_defaults() {
        let config: DashboardConfig = toml::from_str(CONFIG).unwrap();
        assert_eq!(config.region_property, "ADM1_PT");
        assert_eq!(config.max_horizon, 16);
        assert_eq!(config.color_domain, ColorDomain::default());
        assert_eq!(config.static_dir, None);
        assert_eq!(config.diseases.len(), 2);
    }

    #[test]
    fn labels_fall_back_to_id() {
        let config: DashboardConfig = toml::from_str(CONFIG).unwrap();
        assert_eq!(config.label_for("diarrhea"), "Doenças Diarréicas");
        assert_eq!(config.label_for("dengue"), "dengue");
    }

    #[test]
    fn horizon_uses_configured_limit() {
        let mut config: DashboardConfig = toml::from_str(CONFIG).unwrap();
        assert!(config.horizon(16).is_ok());
        assert!(config.horizon(17).is_err());
        config.max_horizon = 20;
        assert_eq!(config.horizon(20).unwrap().weeks(), 20);
    }
}
