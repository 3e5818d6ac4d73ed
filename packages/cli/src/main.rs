#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line interface for the epi map dashboard.
//!
//! Every command loads the configured sources once, runs the pipeline for
//! the requested disease, horizon and metric, and prints the result as
//! text or JSON. Without a command it starts the interactive menu.

mod interactive;
mod render;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use epi_map_dashboard::Dashboard;
use epi_map_dashboard::config::load_config;
use epi_map_geography_models::RegionKey;
use epi_map_server::ServerOptions;
use epi_map_server_models::ApiRegions;
use epi_map_surveillance_models::MetricMode;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "epi_map", about = "Epidemiological forecast map")]
struct Cli {
    /// Configuration file (overrides `EPI_MAP_CONFIG`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Display parameters shared by the view commands.
#[derive(Args, Clone, Debug, Default)]
struct ViewArgs {
    /// Disease id (e.g. "malaria"); defaults to the configured default
    #[arg(long)]
    disease: Option<String>,
    /// Forecast horizon in weeks
    #[arg(long)]
    horizon: Option<u32>,
    /// Metric: "rate" or "cases"
    #[arg(long)]
    metric: Option<MetricMode>,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MapKind {
    Observed,
    Forecast,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the observed and forecast summary table
    Table {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Print the region values and colors of one map
    Map {
        /// Which map to print
        #[arg(long, value_enum, default_value = "forecast")]
        view: MapKind,
        #[command(flatten)]
        args: ViewArgs,
    },
    /// Print the trend series of one region, or of every region
    Series {
        /// Region name (case-insensitive)
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        region: Option<String>,
        /// Print every region in chart layout order
        #[arg(long)]
        all: bool,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Report how boundary regions and table regions line up
    Regions {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the legend gradient
    Legend {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Start the HTTP API server (`BIND_ADDR`/`PORT`)
    Serve,
    /// Start the interactive menu
    Interactive,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    let Some(command) = cli.command else {
        return interactive::run(config).await;
    };

    let dashboard = Dashboard::new(config);

    match command {
        Commands::Table { view } => {
            let params = dashboard.params(view.disease.as_deref(), view.horizon, view.metric)?;
            let snapshot = dashboard.refresh(&params).await?;
            if view.json {
                print_json(&snapshot.table)?;
            } else {
                print!("{}", render::table(&snapshot.table));
            }
        }
        Commands::Map { view, args } => {
            let params = dashboard.params(args.disease.as_deref(), args.horizon, args.metric)?;
            let snapshot = dashboard.refresh(&params).await?;
            let map = match view {
                MapKind::Observed => &snapshot.observed_map,
                MapKind::Forecast => &snapshot.forecast_map,
            };
            if args.json {
                print_json(map)?;
            } else {
                print!("{}", render::map(map, params.metric));
            }
        }
        Commands::Series { region, view, .. } => {
            let params = dashboard.params(view.disease.as_deref(), None, view.metric)?;
            let sources = dashboard.load().await?;
            if let Some(region) = region {
                let series = dashboard.series(
                    &sources,
                    &params.disease,
                    &RegionKey::canonical(&region),
                    params.metric,
                );
                if view.json {
                    print_json(&series)?;
                } else {
                    print!("{}", render::series(&series));
                }
            } else {
                let all = dashboard.all_series(&sources, &params.disease, params.metric);
                if view.json {
                    print_json(&all)?;
                } else {
                    for series in &all {
                        print!("{}", render::series(series));
                    }
                }
            }
        }
        Commands::Regions { json } => {
            let sources = dashboard.load().await?;
            let coverage = dashboard.coverage(&sources);
            if json {
                print_json(&ApiRegions {
                    coverage,
                    skipped_rows: sources.table.skipped,
                })?;
            } else {
                print!("{}", render::coverage(&coverage, sources.table.skipped));
            }
        }
        Commands::Legend { view } => {
            let params = dashboard.params(view.disease.as_deref(), view.horizon, view.metric)?;
            let snapshot = dashboard.refresh(&params).await?;
            if view.json {
                print_json(&snapshot.legend)?;
            } else {
                print!("{}", render::legend(&snapshot.legend));
            }
        }
        Commands::Serve => {
            let config = dashboard.config().clone();
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new()
                    .block_on(epi_map_server::run_server(config, ServerOptions::from_env()))
            })
            .await??;
        }
        Commands::Interactive => interactive::run(dashboard.config().clone()).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_metric_on_view_commands() {
        let cli = Cli::try_parse_from(["epi_map", "table", "--metric", "cases"]).unwrap();
        let Some(Commands::Table { view }) = cli.command else {
            panic!("expected the table command");
        };
        assert_eq!(view.metric, Some(MetricMode::Cases));

        let cli = Cli::try_parse_from([
            "epi_map", "map", "--view", "observed", "--metric", "RATE", "--horizon", "3",
        ])
        .unwrap();
        let Some(Commands::Map { view, args }) = cli.command else {
            panic!("expected the map command");
        };
        assert!(matches!(view, MapKind::Observed));
        assert_eq!(args.metric, Some(MetricMode::Rate));
        assert_eq!(args.horizon, Some(3));
    }

    #[test]
    fn rejects_unknown_metric() {
        assert!(Cli::try_parse_from(["epi_map", "legend", "--metric", "percent"]).is_err());
    }

    #[test]
    fn series_needs_a_region_or_all() {
        assert!(Cli::try_parse_from(["epi_map", "series"]).is_err());
        assert!(Cli::try_parse_from(["epi_map", "series", "tete", "--all"]).is_err());

        let cli = Cli::try_parse_from(["epi_map", "series", "--all", "--json"]).unwrap();
        let Some(Commands::Series { region, all, view }) = cli.command else {
            panic!("expected the series command");
        };
        assert_eq!(region, None);
        assert!(all);
        assert!(view.json);
    }

    #[test]
    fn no_command_means_interactive() {
        let cli = Cli::try_parse_from(["epi_map", "--config", "dash.toml"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, Some(PathBuf::from("dash.toml")));
    }
}
