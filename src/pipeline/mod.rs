//! Aggregation and growth pipeline
//!
//! RegionAggregator -> TimeSeriesBuilder -> GrowthRateComputer, plus the
//! change products prepared for export.

pub mod aggregator;
pub mod change;
pub mod errors;
pub mod growth;
pub mod period;
pub mod time_series;
#[cfg(test)]
mod tests;

pub use aggregator::{GridAggregator, RegionAggregator};
pub use change::{ChangeDetector, ChangeLayer, LayerProducts, Snapshot};
pub use errors::{AggregationError, GrowthError, GrowthResult};
pub use growth::{GrowthRate, GrowthRateComputer, GrowthRecord, GrowthTable};
pub use period::PeriodRule;
pub use time_series::{
    AggregatedSample, BuildReport, MissingSamplePolicy, SkippedSample, TimeSeries, TimeSeriesBuilder,
    SQ_METERS_PER_SQ_KM,
};
