#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone epi map API server.
//!
//! Reads the configuration from `EPI_MAP_CONFIG` (or the embedded
//! default) and the listen address from `BIND_ADDR`/`PORT`.

use epi_map_server::{ServerOptions, run_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = epi_map_dashboard::config::load_config(None).map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        std::io::Error::other(e.to_string())
    })?;

    run_server(config, ServerOptions::from_env()).await
}
