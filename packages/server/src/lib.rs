#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the epi map dashboard.
//!
//! Serves the JSON API the map front end polls (maps, legend, summary
//! table, trend series) and, when configured, the static front end
//! itself. Every request reloads the sources, so a replaced data file is
//! picked up on the next request.

mod handlers;
pub mod interactive;

use std::path::Path;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use epi_map_dashboard::Dashboard;
use epi_map_dashboard_models::DashboardConfig;

/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default port.
pub const DEFAULT_PORT: u16 = 8080;

/// Shared application state.
pub struct AppState {
    /// Dashboard bound to the loaded configuration.
    pub dashboard: Dashboard,
}

/// Where the server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    pub bind_addr: String,
    pub port: u16,
}

impl ServerOptions {
    /// Reads `BIND_ADDR` and `PORT`, falling back to `127.0.0.1:8080`.
    #[must_use]
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        Self { bind_addr, port }
    }
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(query_config()).service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/diseases", web::get().to(handlers::diseases))
            .route("/dashboard", web::get().to(handlers::dashboard))
            .route("/table", web::get().to(handlers::table))
            .route("/series", web::get().to(handlers::all_series))
            .route("/series/{region}", web::get().to(handlers::series))
            .route("/regions", web::get().to(handlers::regions)),
    );
}

/// Answers malformed query strings with a JSON 400.
fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let body = serde_json::json!({ "error": err.to_string() });
        actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body))
            .into()
    })
}

/// Starts the epi map API server.
///
/// This is a regular async function; the caller is responsible for
/// providing the async runtime (e.g. via `#[actix_web::main]`) and for
/// initializing logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: DashboardConfig, options: ServerOptions) -> std::io::Result<()> {
    let static_dir = config
        .static_dir
        .clone()
        .filter(|dir| Path::new(dir).is_dir());
    if let Some(dir) = &config.static_dir
        && static_dir.is_none()
    {
        log::warn!("Static directory {dir} does not exist, serving the API only");
    }

    let state = web::Data::new(AppState {
        dashboard: Dashboard::new(config),
    });

    let ServerOptions { bind_addr, port } = options;
    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        let app = App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api);

        // Serve front-end static files
        match &static_dir {
            Some(dir) => app.service(Files::new("/", dir).index_file("index.html")),
            None => app,
        }
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
