pub mod api;
pub mod commands;
pub mod config;
pub mod coordinate;
pub mod export;
pub mod pipeline;
pub mod raster;
pub mod region;
pub mod utils;

pub use crate::api::{AnalysisRun, UrbanGrowth};
pub use crate::config::AnalysisConfig;

pub use coordinate::{BoundingBox, GeoTransform};
pub use export::ArtifactExporter;
pub use pipeline::{
    GridAggregator, GrowthError, GrowthRateComputer, GrowthResult, GrowthTable, RegionAggregator,
    TimeSeries, TimeSeriesBuilder,
};
pub use raster::RasterLayer;
pub use region::Region;
