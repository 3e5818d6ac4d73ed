#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard refresh pipeline.
//!
//! Loads the configuration, fetches the surveillance table and the
//! boundary file, then runs the joiner and the map coloring for one set
//! of display parameters. Sources are re-read on every refresh.

pub mod config;
pub mod pipeline;
pub mod source;

use epi_map_surveillance_models::InvalidHorizonError;
use thiserror::Error;

pub use pipeline::{Dashboard, Sources};

/// Errors that can occur while refreshing the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The surveillance table could not be loaded.
    #[error("Surveillance error: {0}")]
    Surveillance(#[from] epi_map_surveillance::SurveillanceError),

    /// The boundary file could not be loaded.
    #[error("Geography error: {0}")]
    Geography(#[from] epi_map_geography::GeographyError),

    /// A remote source could not be fetched.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A local source could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid TOML.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configuration parsed but is inconsistent.
    #[error("Config error: {message}")]
    Config {
        /// Description of the problem.
        message: String,
    },

    /// A request named a disease that is not configured.
    #[error("Unknown disease '{id}'")]
    UnknownDisease {
        /// The rejected disease id.
        id: String,
    },

    /// A request asked for a horizon outside the configured range.
    #[error(transparent)]
    Horizon(#[from] InvalidHorizonError),

    /// Source content could not be decoded.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

impl DashboardError {
    /// Returns `true` if the error was caused by the request parameters
    /// rather than by the data sources.
    #[must_use]
    pub const fn is_bad_request(&self) -> bool {
        matches!(self, Self::UnknownDisease { .. } | Self::Horizon(_))
    }
}
