//! Region key agreement between the boundary file and the table.

use std::collections::BTreeSet;

use epi_map_geography_models::{BoundaryFeature, RegionCoverage, RegionKey};

use crate::boundaries::boundary_keys;

/// Compares the canonical keys of the boundary features with the keys
/// found in the surveillance table and logs every mismatch.
#[must_use]
pub fn region_coverage(
    features: &[BoundaryFeature],
    table_keys: &BTreeSet<RegionKey>,
) -> RegionCoverage {
    let coverage = RegionCoverage::between(&boundary_keys(features), table_keys);

    for key in &coverage.missing_in_table {
        log::warn!("Boundary region {key} has no rows in the data table");
    }
    for key in &coverage.missing_in_boundaries {
        log::warn!("Table region {key} does not match any boundary feature");
    }

    coverage
}
