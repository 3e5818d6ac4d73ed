//! Dashboard configuration loading.
//!
//! A default configuration is embedded at compile time. The
//! `EPI_MAP_CONFIG` environment variable, or an explicit path, points to
//! an override file that replaces it entirely.

use std::collections::BTreeSet;
use std::path::Path;

use epi_map_choropleth_models::ColorDomain;
use epi_map_dashboard_models::{DashboardConfig, MAX_CONFIGURABLE_HORIZON};

use crate::DashboardError;

/// Environment variable naming an override configuration file.
pub const CONFIG_ENV: &str = "EPI_MAP_CONFIG";

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Parses and validates configuration text.
///
/// # Errors
///
/// * [`DashboardError::Toml`] if the text is not a valid configuration
/// * [`DashboardError::Config`] if the configuration is inconsistent
pub fn parse_config(text: &str) -> Result<DashboardConfig, DashboardError> {
    let config: DashboardConfig = toml::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

/// Returns the embedded default configuration.
///
/// # Errors
///
/// Returns an error if the embedded file does not parse or validate.
pub fn default_config() -> Result<DashboardConfig, DashboardError> {
    parse_config(DEFAULT_CONFIG)
}

/// Loads the configuration from `path`, or from the file named by
/// `EPI_MAP_CONFIG`, or falls back to the embedded default.
///
/// # Errors
///
/// Returns an error if the override file cannot be read, parsed or
/// validated.
pub fn load_config(path: Option<&Path>) -> Result<DashboardConfig, DashboardError> {
    let env_path = std::env::var(CONFIG_ENV).ok().filter(|p| !p.trim().is_empty());

    let path = match (path, env_path.as_deref()) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(env)) => Path::new(env).to_path_buf(),
        (None, None) => {
            log::debug!("Using embedded default configuration");
            return default_config();
        }
    };

    log::info!("Loading configuration from {}", path.display());
    let text = std::fs::read_to_string(&path)?;
    parse_config(&text)
}

/// Checks a configuration for internal consistency.
///
/// # Errors
///
/// Returns [`DashboardError::Config`] describing the first problem found.
pub fn validate(config: &DashboardConfig) -> Result<(), DashboardError> {
    let fail = |message: String| Err(DashboardError::Config { message });

    if config.diseases.is_empty() {
        return fail("at least one disease must be configured".to_string());
    }

    let mut seen = BTreeSet::new();
    for disease in &config.diseases {
        if disease.id.trim().is_empty() {
            return fail("disease id must not be empty".to_string());
        }
        if !seen.insert(disease.id.as_str()) {
            return fail(format!("duplicate disease id '{}'", disease.id));
        }
    }

    if config.disease(&config.default_disease).is_none() {
        return fail(format!(
            "default disease '{}' is not in the disease list",
            config.default_disease
        ));
    }

    if config.max_horizon == 0 || config.max_horizon > MAX_CONFIGURABLE_HORIZON {
        return fail(format!(
            "max_horizon must be between 1 and {MAX_CONFIGURABLE_HORIZON}, got {}",
            config.max_horizon
        ));
    }

    if let ColorDomain::Fixed { min, max } = config.color_domain
        && !(min.is_finite() && max.is_finite() && min < max)
    {
        return fail(format!(
            "fixed color domain needs finite min < max, got [{min}, {max}]"
        ));
    }

    if config.data.trim().is_empty() || config.boundaries.trim().is_empty() {
        return fail("data and boundaries sources must be set".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
data = "data.csv"
boundaries = "map.geojson"
default_disease = "malaria"

[[diseases]]
id = "malaria"
label = "Malária"
"#;

    fn with(extra: &str) -> String {
        format!("{MINIMAL}\n{extra}")
    }

    #[test]
    fn embedded_default_is_valid() {
        let config = default_config().unwrap();
        assert_eq!(config.default_disease, "malaria");
        assert_eq!(config.label_for("malaria"), "Malária");
        assert_eq!(config.label_for("diarrhea"), "Doenças Diarréicas");
        assert_eq!(config.max_horizon, 16);
    }

    #[test]
    fn minimal_config_parses() {
        let config = parse_config(MINIMAL).unwrap();
        assert_eq!(config.diseases.len(), 1);
    }

    #[test]
    fn rejects_unknown_default_disease() {
        let text = MINIMAL.replace("default_disease = \"malaria\"", "default_disease = \"dengue\"");
        assert!(matches!(
            parse_config(&text),
            Err(DashboardError::Config { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_disease_ids() {
        let text = with("[[diseases]]\nid = \"malaria\"\nlabel = \"Again\"\n");
        let err = parse_config(&text).unwrap_err();
        assert!(err.to_string().contains("duplicate disease id"));
    }

    #[test]
    fn rejects_out_of_range_horizon() {
        let text = MINIMAL.replace("data = ", "max_horizon = 0\ndata = ");
        assert!(parse_config(&text).is_err());
        let text = MINIMAL.replace("data = ", "max_horizon = 54\ndata = ");
        assert!(parse_config(&text).is_err());
    }

    #[test]
    fn rejects_inverted_fixed_domain() {
        let text = MINIMAL.replace(
            "data = ",
            "color_domain = { mode = \"fixed\", min = 10.0, max = 1.0 }\ndata = ",
        );
        let err = parse_config(&text).unwrap_err();
        assert!(err.to_string().contains("fixed color domain"));
    }

    #[test]
    fn accepts_data_extent_domain() {
        let text = MINIMAL.replace(
            "data = ",
            "color_domain = { mode = \"data-extent\" }\ndata = ",
        );
        let config = parse_config(&text).unwrap();
        assert_eq!(config.color_domain, ColorDomain::DataExtent);
    }

    #[test]
    fn invalid_toml_is_a_toml_error() {
        assert!(matches!(
            parse_config("data = "),
            Err(DashboardError::Toml(_))
        ));
    }

    #[test]
    fn explicit_path_overrides_default() {
        let dir = std::env::temp_dir().join("epi_map_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("override.toml");
        std::fs::write(&path, MINIMAL.replace("data.csv", "other.csv")).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.data, "other.csv");
    }
}
