#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Surveillance table loading and the observed/forecast series joiner.
//!
//! The table is parsed from CSV into [`Record`]s, then
//! [`joiner::SeriesJoiner`] reduces each region to its latest observed
//! week and its k-th forecast week, joins the two and computes the trend.
//! Everything downstream (map colors, the summary table, trend charts) is
//! derived from these outputs; nothing is cached between refreshes.

pub mod joiner;
pub mod parsing;
pub mod series;
pub mod summary;
pub mod table;

use thiserror::Error;

pub use epi_map_surveillance_models::Record;

/// Errors that can occur while loading the surveillance table.
#[derive(Debug, Error)]
pub enum SurveillanceError {
    /// The CSV reader failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Reading the table failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required column is missing from the header row.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },
}
