#![allow(clippy::module_name_repetitions)]

//! Interactive menu for browsing the dashboard from the terminal.
//!
//! Loads the sources once, asks for the disease, horizon and metric, then
//! loops over the views until the user quits.

use std::collections::BTreeSet;

use dialoguer::{Input, Select};
use epi_map_dashboard::{Dashboard, Sources};
use epi_map_dashboard_models::DashboardConfig;
use epi_map_geography_models::RegionKey;
use epi_map_surveillance_models::{DisplayParams, MetricMode};

use crate::render;

/// Views available in the interactive menu.
enum ViewAction {
    Table,
    ObservedMap,
    ForecastMap,
    Series,
    AllSeries,
    Legend,
    Regions,
    ChangeParams,
    Serve,
    Quit,
}

impl ViewAction {
    const ALL: &[Self] = &[
        Self::Table,
        Self::ObservedMap,
        Self::ForecastMap,
        Self::Series,
        Self::AllSeries,
        Self::Legend,
        Self::Regions,
        Self::ChangeParams,
        Self::Serve,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Table => "Summary table",
            Self::ObservedMap => "Observed map",
            Self::ForecastMap => "Forecast map",
            Self::Series => "Region trend series",
            Self::AllSeries => "All trend series",
            Self::Legend => "Legend",
            Self::Regions => "Region coverage",
            Self::ChangeParams => "Change disease / horizon / metric",
            Self::Serve => "Start the API server",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive menu loop.
///
/// # Errors
///
/// Returns an error if the sources cannot be loaded, a prompt fails, or
/// the server fails to start.
pub async fn run(config: DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    let dashboard = Dashboard::new(config);
    let sources = dashboard.load().await?;
    log::info!(
        "Loaded {} table rows ({} skipped) and {} boundary features",
        sources.table.records.len(),
        sources.table.skipped,
        sources.boundaries.len()
    );

    let mut params = prompt_params(&dashboard)?;
    let labels: Vec<&str> = ViewAction::ALL.iter().map(ViewAction::label).collect();

    loop {
        let idx = Select::new()
            .with_prompt(format!(
                "{} / horizon {} / {}",
                dashboard.config().label_for(&params.disease),
                params.horizon,
                params.metric
            ))
            .items(&labels)
            .default(0)
            .interact()?;

        match ViewAction::ALL[idx] {
            ViewAction::Table => {
                let snapshot = dashboard.snapshot(&sources, &params);
                print!("{}", render::table(&snapshot.table));
            }
            ViewAction::ObservedMap => {
                let snapshot = dashboard.snapshot(&sources, &params);
                print!("{}", render::map(&snapshot.observed_map, params.metric));
            }
            ViewAction::ForecastMap => {
                let snapshot = dashboard.snapshot(&sources, &params);
                print!("{}", render::map(&snapshot.forecast_map, params.metric));
            }
            ViewAction::Series => {
                if let Some(region) = prompt_region(&dashboard, &sources)? {
                    let series =
                        dashboard.series(&sources, &params.disease, &region, params.metric);
                    print!("{}", render::series(&series));
                }
            }
            ViewAction::AllSeries => {
                for series in dashboard.all_series(&sources, &params.disease, params.metric) {
                    print!("{}", render::series(&series));
                }
            }
            ViewAction::Legend => {
                let snapshot = dashboard.snapshot(&sources, &params);
                print!("{}", render::legend(&snapshot.legend));
            }
            ViewAction::Regions => {
                let coverage = dashboard.coverage(&sources);
                print!("{}", render::coverage(&coverage, sources.table.skipped));
            }
            ViewAction::ChangeParams => params = prompt_params(&dashboard)?,
            ViewAction::Serve => {
                let config = dashboard.config().clone();
                // The server prompts for its own bind address and port.
                tokio::task::spawn_blocking(move || {
                    actix_web::rt::System::new()
                        .block_on(epi_map_server::interactive::run(config))
                })
                .await??;
                return Ok(());
            }
            ViewAction::Quit => return Ok(()),
        }
        println!();
    }
}

/// Prompts for the disease tab, the forecast horizon and the metric.
fn prompt_params(dashboard: &Dashboard) -> Result<DisplayParams, Box<dyn std::error::Error>> {
    let config = dashboard.config();

    let disease_labels: Vec<&str> = config.diseases.iter().map(|d| d.label.as_str()).collect();
    let default_disease = config
        .diseases
        .iter()
        .position(|d| d.id == config.default_disease)
        .unwrap_or(0);
    let disease_idx = Select::new()
        .with_prompt("Disease")
        .items(&disease_labels)
        .default(default_disease)
        .interact()?;
    let disease = config.diseases[disease_idx].id.clone();

    let max_horizon = config.max_horizon;
    let horizon: u32 = Input::new()
        .with_prompt(format!("Forecast horizon in weeks (1-{max_horizon})"))
        .default(1)
        .validate_with(|weeks: &u32| {
            if (1..=max_horizon).contains(weeks) {
                Ok(())
            } else {
                Err(format!("must be between 1 and {max_horizon}"))
            }
        })
        .interact_text()?;

    let metrics = [MetricMode::Rate, MetricMode::Cases];
    let metric_labels: Vec<&str> = metrics.iter().map(|m| m.legend_title()).collect();
    let metric_idx = Select::new()
        .with_prompt("Metric")
        .items(&metric_labels)
        .default(0)
        .interact()?;

    Ok(dashboard.params(Some(&disease), Some(horizon), Some(metrics[metric_idx]))?)
}

/// Prompts for one of the regions present in the table. Returns `None`
/// when the table has no regions.
fn prompt_region(
    dashboard: &Dashboard,
    sources: &Sources,
) -> Result<Option<RegionKey>, Box<dyn std::error::Error>> {
    let coverage = dashboard.coverage(sources);
    let regions: BTreeSet<RegionKey> = coverage
        .matched
        .into_iter()
        .chain(coverage.missing_in_boundaries)
        .collect();
    if regions.is_empty() {
        println!("The table has no regions.");
        return Ok(None);
    }

    let regions: Vec<RegionKey> = regions.into_iter().collect();
    let labels: Vec<&str> = regions.iter().map(RegionKey::as_str).collect();
    let idx = Select::new()
        .with_prompt("Region")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(regions.into_iter().nth(idx))
}
