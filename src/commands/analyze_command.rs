//! Built-up area analysis command
//!
//! Aggregates the collection over the region, computes growth rates and
//! prints the table to the console and the run log.

use clap::ArgMatches;
use log::{info, warn};

use crate::api::{run_analysis, AnalysisRun};
use crate::commands::command_traits::Command;
use crate::commands::run_options::RunOptions;
use crate::pipeline::errors::GrowthResult;
use crate::pipeline::GridAggregator;
use crate::raster::catalog::load_collection;
use crate::raster::RasterLayer;
use crate::utils::format_utils::format_growth_table;
use crate::utils::logger::Logger;

/// Command that builds and reports the growth table
pub struct AnalyzeCommand<'a> {
    options: RunOptions,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> AnalyzeCommand<'a> {
    /// Create a new analyze command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> GrowthResult<Self> {
        Ok(AnalyzeCommand {
            options: RunOptions::from_args(args)?,
            logger,
        })
    }

    pub(crate) fn from_options(options: RunOptions, logger: &'a Logger) -> Self {
        AnalyzeCommand { options, logger }
    }

    pub(crate) fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Load layers and run the pipeline
    pub(crate) fn run(&self) -> GrowthResult<(Vec<RasterLayer>, AnalysisRun)> {
        let config = &self.options.config;
        let layers = load_collection(&self.options.input, &config.band)?;
        info!("Loaded {} layer(s) from {}", layers.len(), self.options.input.display());

        let aggregator = GridAggregator::new(config.scale).with_max_samples(config.max_samples);
        let run = run_analysis(config, &aggregator, &layers, &self.options.region, self.options.verbose)?;
        Ok((layers, run))
    }

    /// Print and log the growth table
    pub(crate) fn report(&self, run: &AnalysisRun) -> GrowthResult<()> {
        if run.table.is_empty() {
            warn!("No samples aggregated; the growth table is empty");
        }

        println!("{}", format_growth_table(&run.table, "km²"));
        self.logger.log_growth_table(&run.table)?;

        if !run.report.skipped.is_empty() {
            warn!("Omitted periods: {:?}", run.report.skipped_periods());
            self.logger.log_skipped(&run.report.skipped)?;
        }

        let undefined = run.table.undefined_periods();
        if !undefined.is_empty() {
            warn!("Growth undefined (zero or near-zero predecessor) for: {:?}", undefined);
        }
        Ok(())
    }
}

impl<'a> Command for AnalyzeCommand<'a> {
    fn execute(&self) -> GrowthResult<()> {
        let (_, run) = self.run()?;
        self.report(&run)
    }
}
