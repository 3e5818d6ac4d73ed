#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the epi map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the dashboard snapshot types to allow independent evolution of the
//! API contract.

use std::collections::BTreeSet;

use epi_map_dashboard_models::{DashboardConfig, DiseaseConfig, TableView};
use epi_map_geography_models::{RegionCoverage, RegionKey};
use epi_map_surveillance_models::MetricMode;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Disease tabs and slider limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDiseases {
    /// Configured diseases, in display order.
    pub diseases: Vec<DiseaseConfig>,
    /// Disease selected by default.
    pub default_disease: String,
    /// Largest forecast horizon accepted.
    pub max_horizon: u32,
}

impl From<&DashboardConfig> for ApiDiseases {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            diseases: config.diseases.clone(),
            default_disease: config.default_disease.clone(),
            max_horizon: config.max_horizon,
        }
    }
}

/// Query parameters of the dashboard and table endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQueryParams {
    /// Disease id. Defaults to the configured default disease.
    pub disease: Option<String>,
    /// Forecast horizon in weeks. Defaults to 1.
    pub horizon: Option<u32>,
    /// `rate` or `cases`. Defaults to `rate`.
    pub metric: Option<MetricMode>,
}

/// Query parameters of the series endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesQueryParams {
    /// Disease id. Defaults to the configured default disease.
    pub disease: Option<String>,
    /// `rate` or `cases`. Defaults to `rate`.
    pub metric: Option<MetricMode>,
}

/// Summary table with the regions that produced no row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTable {
    #[serde(flatten)]
    pub table: TableView,
    /// Regions without a forecast at the requested horizon.
    pub missing: BTreeSet<RegionKey>,
}

/// Region key agreement between the boundary file and the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRegions {
    #[serde(flatten)]
    pub coverage: RegionCoverage,
    /// Number of table rows skipped while loading.
    pub skipped_rows: usize,
}
