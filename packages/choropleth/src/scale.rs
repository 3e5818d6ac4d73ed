//! Viridis color scale.

use epi_map_choropleth_models::{Color, ResolvedDomain};

/// Viridis sampled at ten evenly spaced positions; colors between samples
/// are interpolated linearly.
const VIRIDIS: [Color; 10] = [
    Color::rgb(0x44, 0x01, 0x54),
    Color::rgb(0x48, 0x28, 0x78),
    Color::rgb(0x3e, 0x4a, 0x89),
    Color::rgb(0x31, 0x68, 0x8e),
    Color::rgb(0x26, 0x82, 0x8e),
    Color::rgb(0x1f, 0x9e, 0x89),
    Color::rgb(0x35, 0xb7, 0x79),
    Color::rgb(0x6d, 0xcd, 0x59),
    Color::rgb(0xb4, 0xde, 0x2c),
    Color::rgb(0xfd, 0xe7, 0x25),
];

/// Viridis color at position `t`, clamped to `[0, 1]`.
#[must_use]
pub fn viridis(t: f64) -> Color {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let last = VIRIDIS.len() - 1;
    #[allow(clippy::cast_precision_loss)]
    let scaled = t * last as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let i = (scaled.floor() as usize).min(last - 1);
    #[allow(clippy::cast_precision_loss)]
    let local = scaled - i as f64;
    VIRIDIS[i].lerp(VIRIDIS[i + 1], local)
}

/// Maps metric values to colors over a fixed domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    domain: ResolvedDomain,
}

impl ColorScale {
    #[must_use]
    pub const fn new(domain: ResolvedDomain) -> Self {
        Self { domain }
    }

    #[must_use]
    pub const fn domain(&self) -> ResolvedDomain {
        self.domain
    }

    /// Color of `value`.
    #[must_use]
    pub fn color(&self, value: f64) -> Color {
        viridis(self.domain.normalize(value))
    }
}
