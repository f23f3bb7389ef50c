//! Time series construction
//!
//! Resolves each layer's period, aggregates it over the region and
//! collects the unit-converted sums into a series ordered by period.

use std::collections::HashMap;

use log::{info, warn};
use serde::Deserialize;

use crate::pipeline::aggregator::RegionAggregator;
use crate::pipeline::errors::{AggregationError, GrowthError, GrowthResult};
use crate::pipeline::period::PeriodRule;
use crate::raster::RasterLayer;
use crate::region::Region;
use crate::utils::progress::ProgressTracker;

/// Square meters per square kilometer
pub const SQ_METERS_PER_SQ_KM: f64 = 1e6;

/// Aggregated value of one period, in converted units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatedSample {
    pub period: i32,
    pub value: f64,
}

impl AggregatedSample {
    pub fn new(period: i32, value: f64) -> Self {
        AggregatedSample { period, value }
    }
}

/// Samples strictly ascending by period
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    samples: Vec<AggregatedSample>,
}

impl TimeSeries {
    /// Sort samples by period; fails if a period appears twice
    pub fn from_samples(mut samples: Vec<AggregatedSample>) -> GrowthResult<Self> {
        samples.sort_by_key(|s| s.period);

        if let Some(pair) = samples.windows(2).find(|w| w[0].period == w[1].period) {
            return Err(GrowthError::DuplicateSample { period: pair[0].period });
        }

        Ok(TimeSeries { samples })
    }

    pub fn samples(&self) -> &[AggregatedSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AggregatedSample> {
        self.samples.iter()
    }

    pub fn first(&self) -> Option<&AggregatedSample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&AggregatedSample> {
        self.samples.last()
    }

    /// Periods in ascending order
    pub fn periods(&self) -> Vec<i32> {
        self.samples.iter().map(|s| s.period).collect()
    }
}

/// What to do when a layer cannot be aggregated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingSamplePolicy {
    /// Leave the period out and report it in `BuildReport::skipped`
    Omit,
    /// Fail the whole run
    Abort,
}

impl Default for MissingSamplePolicy {
    fn default() -> Self {
        MissingSamplePolicy::Omit
    }
}

/// A layer left out of the series
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSample {
    pub label: String,
    pub period: i32,
    pub reason: AggregationError,
}

/// Output of a build: the series plus every omitted layer
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub series: TimeSeries,
    pub skipped: Vec<SkippedSample>,
}

impl BuildReport {
    /// Periods that were omitted, ascending
    pub fn skipped_periods(&self) -> Vec<i32> {
        let mut periods: Vec<i32> = self.skipped.iter().map(|s| s.period).collect();
        periods.sort_unstable();
        periods
    }
}

/// Builds a time series from an unordered layer collection
pub struct TimeSeriesBuilder<'a> {
    aggregator: &'a dyn RegionAggregator,
    band: String,
    unit_divisor: f64,
    period_rule: PeriodRule,
    missing: MissingSamplePolicy,
    show_progress: bool,
}

impl<'a> TimeSeriesBuilder<'a> {
    /// Create a builder for one band, with m² -> km² conversion and
    /// calendar-year periods
    pub fn new(aggregator: &'a dyn RegionAggregator, band: &str) -> Self {
        TimeSeriesBuilder {
            aggregator,
            band: band.to_string(),
            unit_divisor: SQ_METERS_PER_SQ_KM,
            period_rule: PeriodRule::CalendarYear,
            missing: MissingSamplePolicy::Omit,
            show_progress: false,
        }
    }

    pub fn unit_divisor(mut self, divisor: f64) -> Self {
        self.unit_divisor = divisor;
        self
    }

    pub fn period_rule(mut self, rule: PeriodRule) -> Self {
        self.period_rule = rule;
        self
    }

    pub fn missing_policy(mut self, policy: MissingSamplePolicy) -> Self {
        self.missing = policy;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Resolve every layer's period and reject duplicates
    ///
    /// Returns (period, layer) pairs in input order.
    pub fn resolve_periods<'l>(&self, layers: &'l [RasterLayer]) -> GrowthResult<Vec<(i32, &'l RasterLayer)>> {
        let mut seen: HashMap<i32, &str> = HashMap::new();
        let mut resolved = Vec::with_capacity(layers.len());

        for layer in layers {
            let period = self.period_rule.resolve(layer)?;
            if let Some(first) = seen.insert(period, layer.label()) {
                return Err(GrowthError::DuplicatePeriod {
                    period,
                    first: first.to_string(),
                    second: layer.label().to_string(),
                });
            }
            resolved.push((period, layer));
        }

        Ok(resolved)
    }

    /// Aggregate every layer and return the period-ordered series
    pub fn build(&self, layers: &[RasterLayer], region: &Region) -> GrowthResult<BuildReport> {
        if !self.unit_divisor.is_finite() || self.unit_divisor <= 0.0 {
            return Err(GrowthError::Config(format!(
                "unit divisor must be a positive number, got {}", self.unit_divisor
            )));
        }

        if layers.is_empty() {
            info!("No layers supplied, returning an empty series");
            return Ok(BuildReport::default());
        }

        let resolved = self.resolve_periods(layers)?;
        info!("Aggregating band '{}' for {} layer(s), periods by {}",
              self.band, resolved.len(), self.period_rule.describe());

        let progress = if self.show_progress {
            Some(ProgressTracker::new(resolved.len() as u64, "Aggregating layers"))
        } else {
            None
        };

        let mut samples = Vec::with_capacity(resolved.len());
        let mut skipped = Vec::new();

        for (period, layer) in resolved {
            if let Some(p) = &progress {
                p.set_message(layer.label());
            }

            let outcome = self.aggregator.aggregate(layer, region, &self.band)
                .and_then(|raw| if raw.is_finite() { Ok(raw) } else { Err(AggregationError::NonFiniteSum(raw)) });

            match outcome {
                Ok(raw) => {
                    let value = raw / self.unit_divisor;
                    info!("Period {} ({}): {} -> {}", period, layer.label(), raw, value);
                    samples.push(AggregatedSample::new(period, value));
                }
                Err(reason) => match self.missing {
                    MissingSamplePolicy::Omit => {
                        warn!("Skipping period {} ({}): {}", period, layer.label(), reason);
                        skipped.push(SkippedSample {
                            label: layer.label().to_string(),
                            period,
                            reason,
                        });
                    }
                    MissingSamplePolicy::Abort => {
                        if let Some(p) = &progress {
                            p.abandon();
                        }
                        return Err(GrowthError::Aggregation {
                            label: layer.label().to_string(),
                            source: reason,
                        });
                    }
                },
            }

            if let Some(p) = &progress {
                p.increment(1);
            }
        }

        if let Some(p) = &progress {
            p.finish();
        }

        let series = TimeSeries::from_samples(samples)?;
        if !skipped.is_empty() {
            warn!("{} of {} layer(s) omitted from the series", skipped.len(), layers.len());
        }

        Ok(BuildReport { series, skipped })
    }
}
