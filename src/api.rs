use std::path::{Path, PathBuf};

use log::info;

use crate::config::AnalysisConfig;
use crate::export::ArtifactExporter;
use crate::pipeline::{
    BuildReport, ChangeDetector, GridAggregator, GrowthRateComputer, GrowthResult, GrowthTable,
    LayerProducts, RegionAggregator, TimeSeriesBuilder,
};
use crate::raster::catalog::load_collection;
use crate::raster::RasterLayer;
use crate::region::Region;
use crate::utils::logger::Logger;

/// Result of one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    /// Series plus omitted layers
    pub report: BuildReport,
    /// Growth records derived from the series
    pub table: GrowthTable,
}

/// Aggregate a collection over a region and compute growth rates
///
/// # Arguments
/// * `config` - Band, scale, divisor, period rule and missing policy
/// * `aggregator` - Region aggregation backend
/// * `layers` - Layers in any order
/// * `region` - Area of interest
/// * `show_progress` - Draw a progress bar while aggregating
pub fn run_analysis(config: &AnalysisConfig,
                    aggregator: &dyn RegionAggregator,
                    layers: &[RasterLayer],
                    region: &Region,
                    show_progress: bool) -> GrowthResult<AnalysisRun> {
    let report = TimeSeriesBuilder::new(aggregator, &config.band)
        .unit_divisor(config.unit_divisor)
        .period_rule(config.period_rule()?)
        .missing_policy(config.missing)
        .show_progress(show_progress)
        .build(layers, region)?;

    let table = GrowthRateComputer::new().compute(&report.series);
    Ok(AnalysisRun { report, table })
}

/// Clip snapshots, stack and change grid for the periods of a finished run
pub fn prepare_products(config: &AnalysisConfig,
                        layers: &[RasterLayer],
                        region: &Region,
                        run: &AnalysisRun) -> GrowthResult<LayerProducts> {
    let aggregator = GridAggregator::new(config.scale).with_max_samples(config.max_samples);
    let resolved = TimeSeriesBuilder::new(&aggregator, &config.band)
        .period_rule(config.period_rule()?)
        .resolve_periods(layers)?;

    ChangeDetector::new(&config.band, region).prepare(
        &resolved,
        &run.report.series,
        &config.export.snapshot_periods,
        config.export.write_stack,
    )
}

/// Main interface to the urban growth library
pub struct UrbanGrowth {
    logger: Logger,
    config: AnalysisConfig,
}

impl UrbanGrowth {
    /// Create a new UrbanGrowth instance
    ///
    /// # Arguments
    /// * `log_file` - Optional path to log file, defaults to "urbangrowth.log"
    /// * `config` - Analysis configuration; validated here
    pub fn new(log_file: Option<&str>, config: AnalysisConfig) -> GrowthResult<Self> {
        config.validate()?;
        let log_path = log_file.unwrap_or("urbangrowth.log");
        let logger = Logger::new(log_path)?;
        Ok(UrbanGrowth { logger, config })
    }

    /// Load a catalog file or a directory of GeoTIFFs
    pub fn load_layers<P: AsRef<Path>>(&self, path: P) -> GrowthResult<Vec<RasterLayer>> {
        load_collection(path, &self.config.band)
    }

    /// Build the series and growth table and log them to the run log
    pub fn analyze(&self, layers: &[RasterLayer], region: &Region) -> GrowthResult<AnalysisRun> {
        let aggregator = GridAggregator::new(self.config.scale).with_max_samples(self.config.max_samples);
        let run = run_analysis(&self.config, &aggregator, layers, region, false)?;

        self.logger.log_growth_table(&run.table)?;
        if !run.report.skipped.is_empty() {
            self.logger.log(&format!("{} layer(s) omitted:", run.report.skipped.len()))?;
            self.logger.log_skipped(&run.report.skipped)?;
        }
        Ok(run)
    }

    /// Write all artifacts of a run
    ///
    /// # Arguments
    /// * `output_dir` - Overrides the configured output directory
    ///
    /// # Returns
    /// Paths of the written files
    pub fn export(&self,
                  layers: &[RasterLayer],
                  region: &Region,
                  run: &AnalysisRun,
                  output_dir: Option<&Path>) -> GrowthResult<Vec<PathBuf>> {
        let products = prepare_products(&self.config, layers, region, run)?;

        let mut exporter = ArtifactExporter::new(&self.config.export, self.config.scale);
        if let Some(dir) = output_dir {
            exporter = exporter.with_output_dir(dir);
        }
        let written = exporter.export(&run.table, &products, region)?;

        for path in &written {
            self.logger.log(&format!("Wrote {}", path.display()))?;
        }
        info!("Export finished: {} file(s) in {}", written.len(), exporter.output_dir().display());
        Ok(written)
    }
}
