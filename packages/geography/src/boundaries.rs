//! Parses a `GeoJSON` `FeatureCollection` into [`BoundaryFeature`]s.
//!
//! Features without a usable region name are skipped with a warning; one
//! bad feature never blocks the rest of the map.

use std::collections::BTreeSet;

use epi_map_geography_models::{BoundaryFeature, RegionKey};
use geojson::{Feature, GeoJson};

use crate::GeographyError;

/// Parses boundary features from a `GeoJSON` document.
///
/// `region_property` names the feature property holding the region name
/// (usually [`crate::DEFAULT_REGION_PROPERTY`]).
///
/// # Errors
///
/// Returns [`GeographyError`] if the text is not `GeoJSON` or is not a
/// `FeatureCollection`.
pub fn parse_boundaries(
    text: &str,
    region_property: &str,
) -> Result<Vec<BoundaryFeature>, GeographyError> {
    let geojson: GeoJson = text.parse()?;

    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(GeographyError::Conversion {
            message: "Boundary file is not a GeoJSON FeatureCollection".to_string(),
        });
    };

    let mut features = Vec::with_capacity(collection.features.len());
    for (idx, feature) in collection.features.iter().enumerate() {
        match boundary_feature(feature, region_property)? {
            Some(boundary) => features.push(boundary),
            None => log::warn!(
                "Boundary feature #{idx} has no '{region_property}' property, skipping"
            ),
        }
    }

    log::debug!(
        "Parsed {} boundary features ({} in file)",
        features.len(),
        collection.features.len()
    );

    Ok(features)
}

/// Converts one `GeoJSON` feature. Returns `None` when the region name is
/// missing, not a string, or blank.
fn boundary_feature(
    feature: &Feature,
    region_property: &str,
) -> Result<Option<BoundaryFeature>, GeographyError> {
    let Some(name) = feature
        .property(region_property)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
    else {
        return Ok(None);
    };

    let geometry = feature
        .geometry
        .as_ref()
        .map(serde_json::to_value)
        .transpose()?;

    Ok(Some(BoundaryFeature {
        name: name.to_string(),
        key: RegionKey::canonical(name),
        geometry,
    }))
}

/// Collects the distinct canonical keys of a feature set.
#[must_use]
pub fn boundary_keys(features: &[BoundaryFeature]) -> BTreeSet<RegionKey> {
    features.iter().map(|f| f.key.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_REGION_PROPERTY;

    const BOUNDARIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "ADM1_PT": "Sofala", "ADM1_PCODE": "MZ07" },
                "geometry": { "type": "Polygon", "coordinates": [[[34.0, -19.0], [35.0, -19.0], [35.0, -20.0], [34.0, -19.0]]] }
            },
            {
                "type": "Feature",
                "properties": { "ADM1_PT": "Maputo City" },
                "geometry": null
            },
            {
                "type": "Feature",
                "properties": { "ADM1_EN": "Nameless" },
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn parses_named_features() {
        let features = parse_boundaries(BOUNDARIES, DEFAULT_REGION_PROPERTY).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].name, "Sofala");
        assert_eq!(features[0].key.as_str(), "SOFALA");
        assert!(features[0].geometry.is_some());
        assert_eq!(features[1].key.as_str(), "MAPUTO CITY");
        assert!(features[1].geometry.is_none());
    }

    #[test]
    fn honours_custom_property() {
        let features = parse_boundaries(BOUNDARIES, "ADM1_EN").unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].key.as_str(), "NAMELESS");
    }

    #[test]
    fn rejects_non_collection() {
        let point = r#"{ "type": "Point", "coordinates": [1.0, 2.0] }"#;
        assert!(matches!(
            parse_boundaries(point, DEFAULT_REGION_PROPERTY),
            Err(GeographyError::Conversion { .. })
        ));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(parse_boundaries("not geojson", DEFAULT_REGION_PROPERTY).is_err());
    }

    #[test]
    fn collects_distinct_keys() {
        let features = parse_boundaries(BOUNDARIES, DEFAULT_REGION_PROPERTY).unwrap();
        let keys = boundary_keys(&features);
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&RegionKey::from("sofala")));
    }
}
