//! Analysis plus artifact export

use clap::ArgMatches;
use log::info;

use crate::api::prepare_products;
use crate::commands::analyze_command::AnalyzeCommand;
use crate::commands::command_traits::Command;
use crate::commands::run_options::RunOptions;
use crate::export::ArtifactExporter;
use crate::pipeline::errors::GrowthResult;
use crate::utils::logger::Logger;

/// Runs the analysis, then writes CSV, maps, stack and AOI files
pub struct ExportCommand<'a> {
    analyze: AnalyzeCommand<'a>,
    logger: &'a Logger,
}

impl<'a> ExportCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> GrowthResult<Self> {
        let options = RunOptions::from_args(args)?;
        Ok(ExportCommand {
            analyze: AnalyzeCommand::from_options(options, logger),
            logger,
        })
    }
}

impl<'a> Command for ExportCommand<'a> {
    fn execute(&self) -> GrowthResult<()> {
        let (layers, run) = self.analyze.run()?;
        self.analyze.report(&run)?;

        let options = self.analyze.options();
        let products = prepare_products(&options.config, &layers, &options.region, &run)?;
        let exporter = ArtifactExporter::new(&options.config.export, options.config.scale);
        let written = exporter.export(&run.table, &products, &options.region)?;

        for path in &written {
            info!("Wrote {}", path.display());
            self.logger.log(&format!("Wrote {}", path.display()))?;
        }
        Ok(())
    }
}
