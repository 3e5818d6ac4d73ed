//! The refresh pipeline.
//!
//! [`Dashboard::load`] fetches the sources; [`Dashboard::snapshot`] runs
//! the joiner and the coloring for one set of [`DisplayParams`]. The two
//! are separate so callers that need several views of the same load (the
//! interactive CLI) fetch once.

use epi_map_choropleth::fill::region_fills;
use epi_map_choropleth::legend::legend;
use epi_map_choropleth::resolve_domain;
use epi_map_choropleth::scale::ColorScale;
use epi_map_dashboard_models::{
    DashboardConfig, DashboardSnapshot, DiseaseConfig, MapView, OBSERVED_TITLE, TableView,
};
use epi_map_geography::boundaries::parse_boundaries;
use epi_map_geography::coverage::region_coverage;
use epi_map_geography_models::{BoundaryFeature, RegionCoverage, RegionKey, provinces};
use epi_map_surveillance::joiner::{
    SeriesJoiner, forecast_values, latest_week, metric_extent, observed_values,
};
use epi_map_surveillance::series::{all_region_series, region_series};
use epi_map_surveillance::summary::{summary_rows, table_footer};
use epi_map_surveillance::table::{TableLoad, diseases, parse_table, region_keys};
use epi_map_surveillance_models::series::RegionSeries;
use epi_map_surveillance_models::summary::{forecast_title, table_title};
use epi_map_surveillance_models::{DisplayParams, ForecastHorizon, MetricMode};

use crate::DashboardError;
use crate::source::fetch_text;

/// Loaded sources of one refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct Sources {
    pub table: TableLoad,
    pub boundaries: Vec<BoundaryFeature>,
}

/// Dashboard bound to a configuration.
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: DashboardConfig,
    client: reqwest::Client,
}

impl Dashboard {
    #[must_use]
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Fetches and parses the table and the boundary file.
    ///
    /// # Errors
    ///
    /// Returns an error if either source cannot be fetched or parsed.
    pub async fn load(&self) -> Result<Sources, DashboardError> {
        self.load_sources()
            .await
            .inspect_err(|e| log::error!("Failed to load dashboard sources: {e}"))
    }

    async fn load_sources(&self) -> Result<Sources, DashboardError> {
        let table_text = fetch_text(&self.client, &self.config.data).await?;
        let table = parse_table(&table_text)?;

        let boundary_text = fetch_text(&self.client, &self.config.boundaries).await?;
        let boundaries = parse_boundaries(&boundary_text, &self.config.region_property)?;

        log::info!(
            "Loaded {} table rows and {} boundary features",
            table.records.len(),
            boundaries.len()
        );

        let sources = Sources { table, boundaries };
        for warning in self.source_warnings(&sources) {
            log::warn!("{warning}");
        }
        Ok(sources)
    }

    /// Consistency problems between the loaded sources and the
    /// configuration. None of them stop a refresh.
    #[must_use]
    pub fn source_warnings(&self, sources: &Sources) -> Vec<String> {
        let mut warnings = Vec::new();

        let present = diseases(&sources.table.records);
        for disease in &self.config.diseases {
            if !present.contains(&disease.id) {
                warnings.push(format!("No table rows for disease {}", disease.id));
            }
        }

        let coverage = self.coverage(sources);
        if !coverage.table_fully_mapped() {
            let names: Vec<&str> = coverage
                .missing_in_boundaries
                .iter()
                .map(RegionKey::as_str)
                .collect();
            warnings.push(format!(
                "Table regions without a boundary feature: {}",
                names.join(", ")
            ));
        }

        let keys = region_keys(&sources.table.records);
        let unknown: Vec<&str> = keys
            .iter()
            .map(RegionKey::as_str)
            .filter(|name| !provinces::is_known(name))
            .collect();
        if !unknown.is_empty() {
            warnings.push(format!(
                "Regions outside the province list (charted last): {}",
                unknown.join(", ")
            ));
        }

        warnings
    }

    /// Builds display parameters from optional request values, filling in
    /// the configured defaults.
    ///
    /// # Errors
    ///
    /// * [`DashboardError::UnknownDisease`] if `disease` is not configured
    /// * [`DashboardError::Horizon`] if `horizon` is out of range
    pub fn params(
        &self,
        disease: Option<&str>,
        horizon: Option<u32>,
        metric: Option<MetricMode>,
    ) -> Result<DisplayParams, DashboardError> {
        let disease = disease.unwrap_or(self.config.default_disease.as_str());
        if self.config.disease(disease).is_none() {
            return Err(DashboardError::UnknownDisease {
                id: disease.to_string(),
            });
        }
        let horizon = match horizon {
            Some(weeks) => self.config.horizon(weeks)?,
            None => ForecastHorizon::FIRST,
        };
        Ok(DisplayParams::new(
            disease,
            horizon,
            metric.unwrap_or_default(),
        ))
    }

    /// Loads the sources and builds a snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the sources cannot be loaded.
    pub async fn refresh(&self, params: &DisplayParams) -> Result<DashboardSnapshot, DashboardError> {
        let sources = self.load().await?;
        Ok(self.snapshot(&sources, params))
    }

    /// Builds both maps, the legend and the summary table.
    #[must_use]
    pub fn snapshot(&self, sources: &Sources, params: &DisplayParams) -> DashboardSnapshot {
        let joiner = SeriesJoiner::new(&sources.table.records);
        let selected = joiner.select(&params.disease);

        let extent = metric_extent(selected.iter().copied(), params.metric);
        let domain = resolve_domain(self.config.color_domain, extent);
        let scale = ColorScale::new(domain);

        let observed = joiner.observed_map(&params.disease);
        let forecast = joiner.forecast_map(&params.disease, params.horizon);

        // ── Maps ────────────────────────────────────────────────────────
        let observed_map = MapView {
            title: OBSERVED_TITLE.to_string(),
            week: latest_week(observed.values().copied()),
            fills: region_fills(
                &sources.boundaries,
                &observed_values(&observed, params.metric),
                &scale,
            ),
        };
        let forecast_map = MapView {
            title: forecast_title(params.horizon),
            week: latest_week(forecast.values().filter_map(|row| *row)),
            fills: region_fills(
                &sources.boundaries,
                &forecast_values(&forecast, params.metric),
                &scale,
            ),
        };

        // ── Table ───────────────────────────────────────────────────────
        let output = joiner.run(params);
        let table = TableView {
            title: table_title(params.horizon),
            rows: summary_rows(&output.rows),
            footer: table_footer(&output.rows),
        };

        DashboardSnapshot {
            disease: self.disease_config(&params.disease),
            params: params.clone(),
            observed_map,
            forecast_map,
            legend: legend(scale.domain(), params.metric),
            table,
            missing: output.missing,
            skipped_rows: sources.table.skipped,
        }
    }

    /// Trend series of one region for a disease.
    #[must_use]
    pub fn series(
        &self,
        sources: &Sources,
        disease: &str,
        region: &RegionKey,
        metric: MetricMode,
    ) -> RegionSeries {
        let joiner = SeriesJoiner::new(&sources.table.records);
        region_series(joiner.select(disease), region, metric)
    }

    /// Trend series of every region of a disease, in chart layout order.
    #[must_use]
    pub fn all_series(
        &self,
        sources: &Sources,
        disease: &str,
        metric: MetricMode,
    ) -> Vec<RegionSeries> {
        let joiner = SeriesJoiner::new(&sources.table.records);
        all_region_series(joiner.select(disease), metric)
    }

    /// How the boundary keys and the table keys line up.
    #[must_use]
    pub fn coverage(&self, sources: &Sources) -> RegionCoverage {
        region_coverage(&sources.boundaries, &region_keys(&sources.table.records))
    }

    fn disease_config(&self, id: &str) -> DiseaseConfig {
        self.config.disease(id).cloned().unwrap_or_else(|| DiseaseConfig {
            id: id.to_string(),
            label: id.to_string(),
        })
    }
}
