//! Region fills for the observed and forecast maps.

use std::collections::BTreeMap;

use epi_map_choropleth_models::{Color, RegionFill};
use epi_map_geography_models::{BoundaryFeature, RegionKey};

use crate::scale::ColorScale;

/// Colors every boundary feature from a region-to-value map.
///
/// Features whose key is missing from `values`, or maps to `None`, get the
/// [`Color::BLACK`] sentinel. Missing data is logged, never an error.
#[must_use]
pub fn region_fills(
    features: &[BoundaryFeature],
    values: &BTreeMap<RegionKey, Option<f64>>,
    scale: &ColorScale,
) -> Vec<RegionFill> {
    features
        .iter()
        .map(|feature| {
            let value = values.get(&feature.key).copied().flatten();
            let color = value.map_or_else(
                || {
                    log::warn!("No data found for region: {}", feature.name);
                    Color::BLACK
                },
                |v| scale.color(v),
            );
            RegionFill {
                region: feature.key.clone(),
                name: feature.name.clone(),
                value,
                color,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use epi_map_choropleth_models::ResolvedDomain;

    use super::*;

    fn feature(name: &str) -> BoundaryFeature {
        BoundaryFeature {
            name: name.to_string(),
            key: RegionKey::canonical(name),
            geometry: None,
        }
    }

    #[test]
    fn fills_known_regions_and_blacks_out_the_rest() {
        let features = vec![feature("Sofala"), feature("Niassa"), feature("Gaza")];
        let values = BTreeMap::from([
            (RegionKey::from("SOFALA"), Some(1000.0)),
            (RegionKey::from("GAZA"), None),
        ]);
        let scale = ColorScale::new(ResolvedDomain::new(0.0, 1000.0));

        let fills = region_fills(&features, &values, &scale);

        assert_eq!(fills.len(), 3);
        assert_eq!(fills[0].region.as_str(), "SOFALA");
        assert_eq!(fills[0].color.hex(), "#fde725");
        assert!(fills[0].has_data());

        assert_eq!(fills[1].name, "Niassa");
        assert_eq!(fills[1].color, Color::BLACK);
        assert!(!fills[1].has_data());

        assert_eq!(fills[2].color, Color::BLACK);
    }
}
