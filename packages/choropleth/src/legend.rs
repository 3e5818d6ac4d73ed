//! Legend gradient for the active color domain.

use epi_map_choropleth_models::{Legend, LegendStop, ResolvedDomain};
use epi_map_surveillance_models::MetricMode;

use crate::scale::ColorScale;

/// Number of gradient stops, one per percent from 0 to 100.
pub const LEGEND_STOPS: u8 = 101;

/// Builds the legend gradient. Stop `i` sits at offset `i%` and shows the
/// value `(100 - i)%` of the way up the domain, so the top of the legend
/// is the domain maximum.
#[must_use]
pub fn legend(domain: ResolvedDomain, metric: MetricMode) -> Legend {
    let scale = ColorScale::new(domain);
    let stops = (0..LEGEND_STOPS)
        .map(|offset| {
            let value = domain.value_at(f64::from(100 - offset) / 100.0);
            LegendStop {
                offset,
                value,
                color: scale.color(value),
            }
        })
        .collect();

    Legend {
        title: metric.legend_title().to_string(),
        domain,
        stops,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_one_hundred_and_one_stops_top_down() {
        let legend = legend(ResolvedDomain::new(0.0, 1000.0), MetricMode::Rate);

        assert_eq!(legend.stops.len(), 101);
        assert_eq!(legend.title, "Rate per 100k inhabitants");

        let top = legend.stops[0];
        assert_eq!(top.offset, 0);
        assert!((top.value - 1000.0).abs() < f64::EPSILON);
        assert_eq!(top.color.hex(), "#fde725");

        let bottom = legend.stops[100];
        assert_eq!(bottom.offset, 100);
        assert!(bottom.value.abs() < f64::EPSILON);
        assert_eq!(bottom.color.hex(), "#440154");

        assert!(legend.stops.windows(2).all(|w| w[0].value >= w[1].value));
    }

    #[test]
    fn cases_title() {
        let legend = legend(ResolvedDomain::new(0.0, 10.0), MetricMode::Cases);
        assert_eq!(legend.title, "Total cases");
    }
}
