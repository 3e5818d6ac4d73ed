#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Choropleth coloring.
//!
//! Region values are mapped onto the viridis scale over a
//! [`ResolvedDomain`]. Boundary features without a value get the
//! [`Color::BLACK`] sentinel fill.

pub mod fill;
pub mod legend;
pub mod scale;

use epi_map_choropleth_models::{ColorDomain, ResolvedDomain};

pub use epi_map_choropleth_models::Color;

/// Resolves a configured domain against the data extent of the active
/// disease.
///
/// A data-extent domain without any data resolves to `[0, 0]`, which maps
/// every value to the low end of the scale.
#[must_use]
pub fn resolve_domain(domain: ColorDomain, extent: Option<(f64, f64)>) -> ResolvedDomain {
    match domain {
        ColorDomain::Fixed { min, max } => ResolvedDomain::new(min, max),
        ColorDomain::DataExtent => {
            let (min, max) = extent.unwrap_or_else(|| {
                log::debug!("No values to derive a color domain from");
                (0.0, 0.0)
            });
            ResolvedDomain::new(min, max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_domain_ignores_extent() {
        let domain = resolve_domain(ColorDomain::default(), Some((3.0, 4.0)));
        assert_eq!(domain, ResolvedDomain::new(0.0, 1000.0));
    }

    #[test]
    fn data_extent_uses_extent() {
        let domain = resolve_domain(ColorDomain::DataExtent, Some((3.0, 40.0)));
        assert_eq!(domain, ResolvedDomain::new(3.0, 40.0));
        let empty = resolve_domain(ColorDomain::DataExtent, None);
        assert_eq!(empty, ResolvedDomain::new(0.0, 0.0));
    }
}
