//! Shared argument handling for the analysis commands
//!
//! Merges the optional config file with CLI overrides and resolves the
//! region from `--region` or `--bbox`.

use std::path::PathBuf;

use clap::ArgMatches;
use log::debug;

use crate::config::{AnalysisConfig, PeriodConfig};
use crate::coordinate::BoundingBox;
use crate::pipeline::errors::{GrowthError, GrowthResult};
use crate::pipeline::time_series::MissingSamplePolicy;
use crate::region::{read_geojson, Region};

/// Inputs common to every analysis command
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub region: Region,
    pub config: AnalysisConfig,
    pub verbose: bool,
}

impl RunOptions {
    pub fn from_args(args: &ArgMatches) -> GrowthResult<Self> {
        let input = args.get_one::<String>("input")
            .map(PathBuf::from)
            .ok_or_else(|| GrowthError::GenericError("Missing input catalog or directory".to_string()))?;

        let mut config = match args.get_one::<String>("config") {
            Some(path) => AnalysisConfig::from_file(path)?,
            None => AnalysisConfig::default(),
        };
        apply_overrides(&mut config, args)?;
        config.validate()?;
        debug!("Effective configuration: {:?}", config);

        let region = resolve_region(args)?;

        Ok(RunOptions {
            input,
            region,
            config,
            verbose: args.get_flag("verbose"),
        })
    }
}

fn apply_overrides(config: &mut AnalysisConfig, args: &ArgMatches) -> GrowthResult<()> {
    if let Some(band) = args.get_one::<String>("band") {
        config.band = band.clone();
    }

    if let Some(scale) = args.get_one::<String>("scale") {
        config.scale = scale.parse::<f64>()
            .map_err(|_| GrowthError::Config(format!("Invalid scale: {}", scale)))?;
    }

    if let Some(pattern) = args.get_one::<String>("period-pattern") {
        config.period = PeriodConfig::Pattern { pattern: pattern.clone() };
    }

    if args.get_flag("abort-on-missing") {
        config.missing = MissingSamplePolicy::Abort;
    }

    if let Some(output) = args.get_one::<String>("output") {
        config.export.output_dir = PathBuf::from(output);
    }

    Ok(())
}

fn resolve_region(args: &ArgMatches) -> GrowthResult<Region> {
    match (args.get_one::<String>("region"), args.get_one::<String>("bbox")) {
        (Some(path), None) => read_geojson(path),
        (None, Some(bbox)) => {
            let bbox = BoundingBox::from_string(bbox).map_err(GrowthError::InvalidRegion)?;
            Region::from_bbox(&bbox)
        }
        (Some(_), Some(_)) => Err(GrowthError::InvalidRegion(
            "Use either --region or --bbox, not both".to_string()
        )),
        (None, None) => Err(GrowthError::InvalidRegion(
            "A region is required: pass --region <GEOJSON> or --bbox minx,miny,maxx,maxy".to_string()
        )),
    }
}
