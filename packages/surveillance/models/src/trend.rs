//! Relative change between an observed rate and a forecast rate.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Text used for [`Trend::Undefined`] wherever a trend is rendered.
pub const UNDEFINED_LABEL: &str = "Undefined";

/// Relative change from the observed rate to the forecast rate.
///
/// The change is a plain ratio (`0.5` is a 50% increase). It is
/// `Undefined` when the observed rate is zero or missing, or when the
/// ratio is not finite, so it never carries `NaN` or an infinity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trend {
    /// No observed baseline to compare against.
    Undefined,
    /// `forecast / observed - 1`.
    Change(f64),
}

impl Trend {
    /// Computes the trend from an optional observed rate and a forecast
    /// rate.
    #[must_use]
    pub fn between(observed_rate: Option<f64>, forecast_rate: f64) -> Self {
        match observed_rate {
            Some(observed) if observed != 0.0 => {
                let ratio = forecast_rate / observed - 1.0;
                if ratio.is_finite() {
                    Self::Change(ratio)
                } else {
                    Self::Undefined
                }
            }
            _ => Self::Undefined,
        }
    }

    /// Returns the ratio, or `None` for [`Trend::Undefined`].
    #[must_use]
    pub const fn ratio(self) -> Option<f64> {
        match self {
            Self::Undefined => None,
            Self::Change(ratio) => Some(ratio),
        }
    }

    /// Returns the direction indicator, or `None` for
    /// [`Trend::Undefined`].
    ///
    /// The magnitude check uses the ratio rounded to whole percent while
    /// the direction uses the raw ratio.
    #[must_use]
    pub fn arrow(self) -> Option<TrendArrow> {
        let ratio = self.ratio()?;
        let rounded_percent = round_half_up(100.0 * ratio);
        Some(if rounded_percent.abs() < 0.1 {
            TrendArrow::Steady
        } else if ratio > 0.0 {
            TrendArrow::Up
        } else {
            TrendArrow::Down
        })
    }

    /// Formats the trend as a percentage with at most one fractional
    /// digit and comma grouping (`0.25` -> `"25%"`, `12.345` ->
    /// `"1,234.5%"`).
    #[must_use]
    pub fn percent_label(self) -> String {
        self.ratio().map_or_else(
            || UNDEFINED_LABEL.to_string(),
            |ratio| format!("{}%", format_number(ratio * 100.0)),
        )
    }
}

impl Serialize for Trend {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Undefined => serializer.serialize_str(UNDEFINED_LABEL),
            Self::Change(ratio) => serializer.serialize_f64(*ratio),
        }
    }
}

impl<'de> Deserialize<'de> for Trend {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Ratio(f64),
            Label(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Ratio(ratio) => Ok(Self::Change(ratio)),
            Raw::Label(label) if label == UNDEFINED_LABEL => Ok(Self::Undefined),
            Raw::Label(label) => Err(serde::de::Error::custom(format!(
                "invalid trend '{label}': expected a number or \"{UNDEFINED_LABEL}\""
            ))),
        }
    }
}

/// Direction of a [`Trend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendArrow {
    /// Less than half a percent of change either way.
    Steady,
    /// Forecast above observed.
    Up,
    /// Forecast below observed.
    Down,
}

impl TrendArrow {
    /// The glyph shown in the table.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Steady => "≈",
            Self::Up => "↑",
            Self::Down => "↓",
        }
    }
}

impl std::fmt::Display for TrendArrow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Rounds half-way cases toward positive infinity (`-0.5` -> `0`,
/// `0.5` -> `1`).
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Formats a number with at most one fractional digit, dropping a
/// trailing `.0` (`12.0` -> `"12"`, `12.34` -> `"12.3"`).
#[must_use]
pub fn format_one_decimal(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    // Avoid printing "-0".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

/// Formats a number with at most one fractional digit and comma thousands
/// separators (`12345.67` -> `"12,345.7"`).
#[must_use]
pub fn format_number(value: f64) -> String {
    let plain = format_one_decimal(value);
    let (sign, unsigned) = plain
        .strip_prefix('-')
        .map_or(("", plain.as_str()), |rest| ("-", rest));
    let (int_part, frac_part) = unsigned
        .split_once('.')
        .map_or((unsigned, None), |(i, f)| (i, Some(f)));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_observed_is_undefined() {
        assert_eq!(Trend::between(Some(0.0), 75.0), Trend::Undefined);
        assert_eq!(Trend::between(Some(0.0), 0.0), Trend::Undefined);
    }

    #[test]
    fn missing_observed_is_undefined() {
        assert_eq!(Trend::between(None, 10.0), Trend::Undefined);
    }

    #[test]
    fn overflowing_ratio_is_undefined() {
        let trend = Trend::between(Some(1e-320), 5.0);
        assert_eq!(trend, Trend::Undefined);
        assert_eq!(trend.percent_label(), "Undefined");
        assert_eq!(serde_json::to_string(&trend).unwrap(), "\"Undefined\"");
    }

    #[test]
    fn relative_change() {
        assert_eq!(Trend::between(Some(50.0), 75.0), Trend::Change(0.5));
        assert_eq!(Trend::between(Some(50.0), 25.0), Trend::Change(-0.5));
    }

    #[test]
    fn arrows() {
        assert_eq!(Trend::Change(0.0009).arrow(), Some(TrendArrow::Steady));
        assert_eq!(Trend::Change(0.02).arrow(), Some(TrendArrow::Up));
        assert_eq!(Trend::Change(-0.02).arrow(), Some(TrendArrow::Down));
        assert_eq!(Trend::Undefined.arrow(), None);
    }

    #[test]
    fn arrow_magnitude_uses_rounded_percent_but_sign_uses_raw_ratio() {
        // 0.4% rounds to 0% -> steady even though the ratio is positive.
        assert_eq!(Trend::Change(0.004).arrow(), Some(TrendArrow::Steady));
        assert_eq!(Trend::Change(-0.004).arrow(), Some(TrendArrow::Steady));
        // 0.6% rounds to 1% -> the raw ratio decides the direction.
        assert_eq!(Trend::Change(0.006).arrow(), Some(TrendArrow::Up));
        assert_eq!(Trend::Change(-0.006).arrow(), Some(TrendArrow::Down));
    }

    #[test]
    fn rounds_half_toward_positive_infinity() {
        assert!((round_half_up(0.5) - 1.0).abs() < f64::EPSILON);
        assert!(round_half_up(-0.5).abs() < f64::EPSILON);
        assert!((round_half_up(-1.5) + 1.0).abs() < f64::EPSILON);
        assert!((round_half_up(2.4) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn percent_labels() {
        assert_eq!(Trend::Change(0.25).percent_label(), "25%");
        assert_eq!(Trend::Change(0.1234).percent_label(), "12.3%");
        assert_eq!(Trend::Change(-0.5).percent_label(), "-50%");
        assert_eq!(Trend::Change(-0.0001).percent_label(), "0%");
        assert_eq!(Trend::Undefined.percent_label(), "Undefined");
    }

    #[test]
    fn large_percent_labels_are_grouped() {
        assert_eq!(Trend::Change(12.345).percent_label(), "1,234.5%");
        assert_eq!(Trend::Change(-0.999).percent_label(), "-99.9%");
    }

    #[test]
    fn serializes_sentinel_as_text() {
        assert_eq!(serde_json::to_string(&Trend::Undefined).unwrap(), "\"Undefined\"");
        assert_eq!(serde_json::to_string(&Trend::Change(0.5)).unwrap(), "0.5");
        assert_eq!(
            serde_json::from_str::<Trend>("\"Undefined\"").unwrap(),
            Trend::Undefined
        );
        assert_eq!(serde_json::from_str::<Trend>("-0.25").unwrap(), Trend::Change(-0.25));
        assert!(serde_json::from_str::<Trend>("\"NaN\"").is_err());
    }

    #[test]
    fn one_decimal_formatting() {
        assert_eq!(format_one_decimal(12.0), "12");
        assert_eq!(format_one_decimal(12.34), "12.3");
        assert_eq!(format_one_decimal(1234.56), "1234.6");
        assert_eq!(format_one_decimal(-0.01), "0");
    }
}
