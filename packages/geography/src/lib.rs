#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Boundary file parsing and region key resolution.
//!
//! Reads the country `GeoJSON` `FeatureCollection`, pulls the region name
//! out of each feature's properties and canonicalizes it into a
//! [`RegionKey`](epi_map_geography_models::RegionKey) so map features can
//! be joined against the surveillance table.

pub mod boundaries;
pub mod coverage;

use thiserror::Error;

/// Default feature property holding the first-level region name.
pub const DEFAULT_REGION_PROPERTY: &str = "ADM1_PT";

/// Errors that can occur while reading boundary data.
#[derive(Debug, Error)]
pub enum GeographyError {
    /// The boundary document is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// A geometry could not be converted to JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but does not have the expected shape.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
