#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Color domain, color and map fill types shared by the map renderer
//! and the API.

use epi_map_geography_models::RegionKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Upper end of the default fixed color domain.
pub const DEFAULT_DOMAIN_MAX: f64 = 1000.0;

/// How the color scale's input range is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum ColorDomain {
    /// A configured range.
    Fixed { min: f64, max: f64 },
    /// The smallest and largest value of the active disease's metric
    /// across all regions, weeks and row types.
    DataExtent,
}

impl Default for ColorDomain {
    fn default() -> Self {
        Self::Fixed {
            min: 0.0,
            max: DEFAULT_DOMAIN_MAX,
        }
    }
}

/// A concrete `[min, max]` color domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDomain {
    pub min: f64,
    pub max: f64,
}

impl ResolvedDomain {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Maps `value` onto `[0, 1]`. Values outside the domain are clamped;
    /// a degenerate domain maps everything to `0`.
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 || !span.is_finite() || !value.is_finite() {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    /// Value at position `t` of the domain (`0` = min, `1` = max).
    #[must_use]
    pub fn value_at(&self, t: f64) -> f64 {
        (self.max - self.min).mul_add(t, self.min)
    }
}

/// An sRGB color, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Fill used for regions without data.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation between two colors, `t` in `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mix = |a: u8, b: u8| -> u8 {
            (f64::from(b) - f64::from(a))
                .mul_add(t, f64::from(a))
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Self::rgb(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }

    /// Lower-case `#rrggbb` form.
    #[must_use]
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim().trim_start_matches('#');
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{s}'")))
    }
}

/// Fill of one boundary feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionFill {
    /// Canonical key of the feature.
    pub region: RegionKey,
    /// Feature name as written in the boundary file.
    pub name: String,
    /// Metric value, if the region has data.
    pub value: Option<f64>,
    /// Scale color, or [`Color::BLACK`] without data.
    pub color: Color,
}

impl RegionFill {
    /// Returns `true` if the region had a value to color.
    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.value.is_some()
    }
}

/// One stop of the legend gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendStop {
    /// Position along the gradient in percent, `0` at the top.
    pub offset: u8,
    /// Domain value at this stop.
    pub value: f64,
    pub color: Color,
}

/// Vertical legend gradient, highest value at the top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub title: String,
    pub domain: ResolvedDomain,
    pub stops: Vec<LegendStop>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_domain_is_fixed() {
        assert_eq!(
            ColorDomain::default(),
            ColorDomain::Fixed {
                min: 0.0,
                max: 1000.0
            }
        );
    }

    #[test]
    fn domain_deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            color_domain: ColorDomain,
        }

        let fixed: Wrapper =
            toml::from_str("color_domain = { mode = \"fixed\", min = 0.0, max = 50.0 }").unwrap();
        assert_eq!(
            fixed.color_domain,
            ColorDomain::Fixed { min: 0.0, max: 50.0 }
        );

        let extent: Wrapper = toml::from_str("color_domain = { mode = \"data-extent\" }").unwrap();
        assert_eq!(extent.color_domain, ColorDomain::DataExtent);
    }

    #[test]
    fn normalize_clamps() {
        let domain = ResolvedDomain::new(0.0, 1000.0);
        assert!((domain.normalize(250.0) - 0.25).abs() < f64::EPSILON);
        assert!(domain.normalize(-5.0).abs() < f64::EPSILON);
        assert!((domain.normalize(5000.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn degenerate_domain_maps_to_zero() {
        let domain = ResolvedDomain::new(7.0, 7.0);
        assert!(domain.normalize(7.0).abs() < f64::EPSILON);
        assert!(domain.normalize(100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn color_hex_round_trip() {
        let color = Color::rgb(0x44, 0x01, 0x54);
        assert_eq!(color.hex(), "#440154");
        assert_eq!(Color::from_hex("#440154"), Some(color));
        assert_eq!(Color::from_hex("FDE725"), Some(Color::rgb(0xfd, 0xe7, 0x25)));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"#440154\"");
    }

    #[test]
    fn lerp_midpoint() {
        let mid = Color::BLACK.lerp(Color::rgb(200, 100, 50), 0.5);
        assert_eq!(mid, Color::rgb(100, 50, 25));
    }
}
