#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Administrative region keys and boundary feature types.
//!
//! Both the surveillance table and the boundary file name regions in
//! their own spelling ("Sofala", "SOFALA", " sofala "). Every join in
//! the system goes through [`RegionKey`], which canonicalizes a name the
//! same way on both sides.

pub mod provinces;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Canonical, upper-cased region name used as the join key between the
/// surveillance table and the boundary file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RegionKey(String);

impl RegionKey {
    /// Canonicalizes a region name: surrounding whitespace is trimmed
    /// and the name is upper-cased.
    #[must_use]
    pub fn canonical(name: &str) -> Self {
        Self(name.trim().to_uppercase())
    }

    /// Returns the canonical key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the canonical key is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for RegionKey {
    fn from(value: String) -> Self {
        Self::canonical(&value)
    }
}

impl From<&str> for RegionKey {
    fn from(value: &str) -> Self {
        Self::canonical(value)
    }
}

impl From<RegionKey> for String {
    fn from(value: RegionKey) -> Self {
        value.0
    }
}

impl AsRef<str> for RegionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RegionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One feature of the boundary `FeatureCollection`, reduced to what the
/// map layer needs to color it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryFeature {
    /// Region name exactly as it appears in the boundary file.
    pub name: String,
    /// Canonical join key derived from `name`.
    pub key: RegionKey,
    /// Feature geometry as a `GeoJSON` object, passed through untouched
    /// for the rendering layer.
    pub geometry: Option<serde_json::Value>,
}

/// How well the boundary file and the surveillance table agree on
/// region names after canonicalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionCoverage {
    /// Keys present on both sides.
    pub matched: BTreeSet<RegionKey>,
    /// Boundary regions with no rows in the table. These render with the
    /// sentinel fill.
    pub missing_in_table: BTreeSet<RegionKey>,
    /// Table regions that no boundary feature resolves to. Their data is
    /// never drawn on the map.
    pub missing_in_boundaries: BTreeSet<RegionKey>,
}

impl RegionCoverage {
    /// Builds a coverage report from the two key sets.
    #[must_use]
    pub fn between(boundaries: &BTreeSet<RegionKey>, table: &BTreeSet<RegionKey>) -> Self {
        Self {
            matched: boundaries.intersection(table).cloned().collect(),
            missing_in_table: boundaries.difference(table).cloned().collect(),
            missing_in_boundaries: table.difference(boundaries).cloned().collect(),
        }
    }

    /// Returns `true` when every table region resolves to a boundary
    /// feature.
    #[must_use]
    pub fn table_fully_mapped(&self) -> bool {
        self.missing_in_boundaries.is_empty()
    }
}
