//! Mozambique province names.
//!
//! The dashboard ships with Mozambique's eleven first-level
//! administrative regions (ten provinces plus Maputo City). The table and
//! boundary file are free to cover other regions; this list only backs
//! the per-region chart layout and the default coverage checks.

/// Canonical (upper-cased) names of the first-level regions, in the
/// order the trend charts are laid out.
pub const PROVINCES: &[&str] = &[
    "CABO DELGADO",
    "GAZA",
    "INHAMBANE",
    "MANICA",
    "MAPUTO",
    "MAPUTO CITY",
    "NAMPULA",
    "NIASSA",
    "SOFALA",
    "TETE",
    "ZAMBEZIA",
];

/// Maps a canonical region name to the identifier of its trend chart
/// element.
///
/// Multi-word names get a fixed identifier without spaces; every other
/// region uses its canonical name as-is.
#[must_use]
pub fn chart_id(canonical: &str) -> &str {
    match canonical {
        "CABO DELGADO" => "CABODELGADO",
        "MAPUTO CITY" => "MAPUTOCIDADE",
        other => other,
    }
}

/// Returns `true` if `canonical` is one of the known [`PROVINCES`].
#[must_use]
pub fn is_known(canonical: &str) -> bool {
    PROVINCES.contains(&canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn province_count() {
        assert_eq!(PROVINCES.len(), 11);
    }

    #[test]
    fn provinces_are_canonical() {
        for name in PROVINCES {
            assert_eq!(*name, name.trim().to_uppercase(), "not canonical: {name}");
        }
    }

    #[test]
    fn chart_ids_have_no_spaces() {
        for name in PROVINCES {
            assert!(!chart_id(name).contains(' '), "chart id for {name} has a space");
        }
    }

    #[test]
    fn chart_id_aliases() {
        assert_eq!(chart_id("CABO DELGADO"), "CABODELGADO");
        assert_eq!(chart_id("MAPUTO CITY"), "MAPUTOCIDADE");
        assert_eq!(chart_id("SOFALA"), "SOFALA");
    }

    #[test]
    fn unknown_region() {
        assert!(!is_known("ATLANTIS"));
        assert!(is_known("TETE"));
    }
}
