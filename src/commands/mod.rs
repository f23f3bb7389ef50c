//! CLI command implementations
//!
//! This module contains implementations of the commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod analyze_command;
pub mod export_command;
mod run_options;

pub use command_traits::{Command, CommandFactory};
pub use analyze_command::AnalyzeCommand;
pub use export_command::ExportCommand;
pub use run_options::RunOptions;

use clap::ArgMatches;
use crate::utils::logger::Logger;
use crate::pipeline::errors::GrowthResult;

/// Factory for creating command instances based on CLI arguments
pub struct UrbanGrowthCommandFactory;

impl UrbanGrowthCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        UrbanGrowthCommandFactory
    }
}

impl<'a> CommandFactory<'a> for UrbanGrowthCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> GrowthResult<Box<dyn Command + 'a>> {
        if args.get_flag("export") {
            Ok(Box::new(ExportCommand::new(args, logger)?))
        } else {
            // Default to analyze command
            Ok(Box::new(AnalyzeCommand::new(args, logger)?))
        }
    }
}
