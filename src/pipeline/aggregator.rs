//! Region aggregation
//!
//! Sums a band of one layer over the region at a fixed sampling
//! resolution.

use log::debug;

use crate::pipeline::errors::AggregationError;
use crate::raster::RasterLayer;
use crate::region::Region;

/// Computes the sum of a band over a region
///
/// Implementations must be pure: the same layer, region and band always
/// yield the same value. The returned value is in raw backend units
/// (square meters for GHSL built-up surface).
pub trait RegionAggregator {
    fn aggregate(&self, layer: &RasterLayer, region: &Region, band: &str) -> Result<f64, AggregationError>;
}

/// Default upper bound on sample cells per layer
pub const DEFAULT_MAX_SAMPLES: u64 = 1_000_000_000;

/// Sum aggregator over a sampling grid of fixed cell size
///
/// The sampling grid is anchored at the layer origin with cells of
/// `scale` map units. Every cell whose center lies inside the region reads
/// the layer pixel under that center and contributes
/// `value * scale² / pixel_area`, which keeps totals of per-cell area
/// bands independent of the sampling resolution.
///
/// A layer whose sampling grid over the region's bounds has more than
/// `max_samples` cells fails with `TooManySamples` before any pixel is read.
#[derive(Debug, Clone, Copy)]
pub struct GridAggregator {
    scale: f64,
    max_samples: u64,
}

impl GridAggregator {
    /// Create an aggregator sampling at `scale` map units
    pub fn new(scale: f64) -> Self {
        GridAggregator { scale, max_samples: DEFAULT_MAX_SAMPLES }
    }

    pub fn with_max_samples(mut self, max_samples: u64) -> Self {
        self.max_samples = max_samples;
        self
    }
}

impl RegionAggregator for GridAggregator {
    fn aggregate(&self, layer: &RasterLayer, region: &Region, band: &str) -> Result<f64, AggregationError> {
        let data = layer.band(band)
            .ok_or_else(|| AggregationError::BandNotFound(band.to_string()))?;

        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(AggregationError::InvalidScale(self.scale));
        }

        let overlap = layer.extent()
            .intersection(&region.bounds())
            .ok_or(AggregationError::NoIntersection)?;

        let gt = layer.transform();
        let step_x = self.scale * gt.pixel_width.signum();
        let step_y = self.scale * gt.pixel_height.signum();
        let (i_start, i_end) = sample_range(overlap.min_x, overlap.max_x, gt.origin_x, step_x);
        let (j_start, j_end) = sample_range(overlap.min_y, overlap.max_y, gt.origin_y, step_y);
        let weight = self.scale * self.scale / gt.pixel_area();

        let cells = (i_end.saturating_sub(i_start).max(0) as u64)
            .saturating_mul(j_end.saturating_sub(j_start).max(0) as u64);
        if cells > self.max_samples {
            return Err(AggregationError::TooManySamples { samples: cells, limit: self.max_samples });
        }

        let mut sum = 0.0;
        let mut samples = 0usize;
        for j in j_start..j_end {
            let y = gt.origin_y + (j as f64 + 0.5) * step_y;
            for i in i_start..i_end {
                let x = gt.origin_x + (i as f64 + 0.5) * step_x;
                if !region.contains(x, y) {
                    continue;
                }

                let Some((col, row)) = gt.pixel_at(x, y, layer.width(), layer.height()) else {
                    continue;
                };
                let value = data[row * layer.width() + col];
                if layer.is_valid(value) {
                    sum += value * weight;
                    samples += 1;
                }
            }
        }

        debug!("Layer '{}': {} valid samples, sum {}", layer.label(), samples, sum);
        if samples == 0 {
            return Err(AggregationError::NoData);
        }
        Ok(sum)
    }
}

/// Index range of sample cells covering [low, high] along one axis
fn sample_range(low: f64, high: f64, origin: f64, step: f64) -> (i64, i64) {
    let a = (low - origin) / step;
    let b = (high - origin) / step;
    (a.min(b).floor() as i64, a.max(b).ceil() as i64)
}
