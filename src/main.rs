use clap::{Arg, Command as ClapCommand, ArgAction};
use std::process;
use log::{error, Level};

use urbangrowth::utils::logger::Logger;
use urbangrowth::commands::{CommandFactory, UrbanGrowthCommandFactory};

fn main() {
    let matches = ClapCommand::new("urbangrowth")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Built-up area time series and growth rates from GHSL-style raster collections")
        .arg(
            Arg::new("input")
                .help("Catalog file (TOML) or directory of GeoTIFFs")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("region")
                .short('r')
                .long("region")
                .help("Area of interest as GeoJSON (Polygon, MultiPolygon, Feature or FeatureCollection)")
                .value_name("GEOJSON")
                .required(false),
        )
        .arg(
            Arg::new("bbox")
                .long("bbox")
                .help("Area of interest as bounding box (minx,miny,maxx,maxy) in layer coordinates")
                .value_name("BBOX")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Analysis configuration file (TOML)")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("band")
                .short('b')
                .long("band")
                .help("Band to aggregate (default: built_surface)")
                .value_name("NAME")
                .required(false),
        )
        .arg(
            Arg::new("scale")
                .short('s')
                .long("scale")
                .help("Sampling resolution in map units (default: 100)")
                .value_name("METERS")
                .required(false),
        )
        .arg(
            Arg::new("period-pattern")
                .long("period-pattern")
                .help("Regex whose first capture group in the layer label is the period, e.g. 'E(\\d{4})'")
                .value_name("REGEX")
                .required(false),
        )
        .arg(
            Arg::new("abort-on-missing")
                .long("abort-on-missing")
                .help("Fail instead of omitting layers that cannot be aggregated")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("export")
                .short('e')
                .long("export")
                .help("Write CSV, snapshot and change maps, stack and AOI files")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output directory for exported artifacts")
                .value_name("DIR")
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output and progress bar")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") { Level::Debug } else { Level::Info };

    let log_file = "urbangrowth.log";
    let logger = match Logger::new(log_file) {
        Ok(l) => l.with_level(level),
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = Logger::init_global_logger("urbangrowth-global.log", level) {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let factory = UrbanGrowthCommandFactory::new();

    let command_result = factory.create_command(&matches, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
