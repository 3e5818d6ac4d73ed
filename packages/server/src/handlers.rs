//! HTTP handler functions for the epi map API.

use actix_web::{HttpResponse, web};
use epi_map_dashboard::DashboardError;
use epi_map_geography_models::RegionKey;
use epi_map_server_models::{
    ApiDiseases, ApiHealth, ApiRegions, ApiTable, DashboardQueryParams, SeriesQueryParams,
};
use epi_map_surveillance_models::DisplayParams;

use crate::AppState;

/// Maps a dashboard error onto a JSON error response: 400 for bad request
/// parameters, 503 when the data cannot be loaded.
fn error_response(context: &str, e: &DashboardError) -> HttpResponse {
    if e.is_bad_request() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": e.to_string()
        }));
    }
    log::error!("{context}: {e}");
    HttpResponse::ServiceUnavailable().json(serde_json::json!({
        "error": format!("{context}: no data available")
    }))
}

fn display_params(
    state: &AppState,
    params: &DashboardQueryParams,
) -> Result<DisplayParams, DashboardError> {
    state
        .dashboard
        .params(params.disease.as_deref(), params.horizon, params.metric)
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/diseases`
///
/// Returns the configured disease tabs and the horizon limit.
pub async fn diseases(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiDiseases::from(state.dashboard.config()))
}

/// `GET /api/dashboard`
///
/// Returns both maps, the legend and the summary table for one disease,
/// horizon and metric.
pub async fn dashboard(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let params = match display_params(&state, &params) {
        Ok(params) => params,
        Err(e) => return error_response("Invalid dashboard parameters", &e),
    };

    match state.dashboard.refresh(&params).await {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(e) => error_response("Failed to build dashboard", &e),
    }
}

/// `GET /api/table`
///
/// Returns only the summary table.
pub async fn table(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let params = match display_params(&state, &params) {
        Ok(params) => params,
        Err(e) => return error_response("Invalid table parameters", &e),
    };

    match state.dashboard.refresh(&params).await {
        Ok(snapshot) => HttpResponse::Ok().json(ApiTable {
            table: snapshot.table,
            missing: snapshot.missing,
        }),
        Err(e) => error_response("Failed to build table", &e),
    }
}

/// `GET /api/series/{region}`
///
/// Returns the trend series of one region. The region name is matched
/// case-insensitively.
pub async fn series(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<SeriesQueryParams>,
) -> HttpResponse {
    let region = RegionKey::canonical(&path.into_inner());
    let params = match state
        .dashboard
        .params(params.disease.as_deref(), None, params.metric)
    {
        Ok(params) => params,
        Err(e) => return error_response("Invalid series parameters", &e),
    };

    match state.dashboard.load().await {
        Ok(sources) => {
            let series = state
                .dashboard
                .series(&sources, &params.disease, &region, params.metric);
            if series.is_empty() {
                log::debug!("No {} rows for region {region}", params.disease);
            }
            HttpResponse::Ok().json(series)
        }
        Err(e) => error_response("Failed to load series", &e),
    }
}

/// `GET /api/series`
///
/// Returns the trend series of every region of a disease, in chart layout
/// order.
pub async fn all_series(
    state: web::Data<AppState>,
    params: web::Query<SeriesQueryParams>,
) -> HttpResponse {
    let params = match state
        .dashboard
        .params(params.disease.as_deref(), None, params.metric)
    {
        Ok(params) => params,
        Err(e) => return error_response("Invalid series parameters", &e),
    };

    match state.dashboard.load().await {
        Ok(sources) => HttpResponse::Ok().json(state.dashboard.all_series(
            &sources,
            &params.disease,
            params.metric,
        )),
        Err(e) => error_response("Failed to load series", &e),
    }
}

/// `GET /api/regions`
///
/// Reports how the boundary regions and the table regions line up.
pub async fn regions(state: web::Data<AppState>) -> HttpResponse {
    match state.dashboard.load().await {
        Ok(sources) => HttpResponse::Ok().json(ApiRegions {
            coverage: state.dashboard.coverage(&sources),
            skipped_rows: sources.table.skipped,
        }),
        Err(e) => error_response("Failed to load regions", &e),
    }
}
