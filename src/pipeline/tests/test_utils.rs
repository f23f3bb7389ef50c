use std::collections::HashMap;

use chrono::{TimeZone, Utc};

use crate::coordinate::{BoundingBox, GeoTransform};
use crate::pipeline::aggregator::RegionAggregator;
use crate::pipeline::errors::AggregationError;
use crate::raster::RasterLayer;
use crate::region::Region;

pub const BAND: &str = "built_surface";

/// Aggregator returning canned raw sums keyed by layer label
pub struct FixedAggregator {
    sums: HashMap<String, Result<f64, AggregationError>>,
}

impl FixedAggregator {
    pub fn new(sums: &[(&str, f64)]) -> Self {
        FixedAggregator {
            sums: sums.iter().map(|(label, v)| (label.to_string(), Ok(*v))).collect(),
        }
    }

    pub fn failing(mut self, label: &str, error: AggregationError) -> Self {
        self.sums.insert(label.to_string(), Err(error));
        self
    }
}

impl RegionAggregator for FixedAggregator {
    fn aggregate(&self, layer: &RasterLayer, _region: &Region, band: &str) -> Result<f64, AggregationError> {
        if layer.band(band).is_none() {
            return Err(AggregationError::BandNotFound(band.to_string()));
        }
        self.sums.get(layer.label())
            .cloned()
            .unwrap_or(Err(AggregationError::NoData))
    }
}

/// 1x1 layer stamped January 1st of `year`
pub fn stamped_layer(label: &str, year: i32) -> RasterLayer {
    RasterLayer::new(label, GeoTransform::new(0.0, 100.0, 100.0, -100.0), 1, 1)
        .with_timestamp(Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap())
        .with_band(BAND, vec![0.0])
        .unwrap()
}

/// size x size grid of 100 m pixels anchored at (0, size*100), every pixel `value`
pub fn uniform_layer(label: &str, year: i32, size: usize, value: f64) -> RasterLayer {
    let origin_y = size as f64 * 100.0;
    RasterLayer::new(label, GeoTransform::new(0.0, origin_y, 100.0, -100.0), size, size)
        .with_timestamp(Utc.with_ymd_and_hms(year, 6, 30, 12, 0, 0).unwrap())
        .with_band(BAND, vec![value; size * size])
        .unwrap()
}

pub fn bbox_region(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Region {
    Region::from_bbox(&BoundingBox::new(min_x, min_y, max_x, max_y)).unwrap()
}

pub fn assert_close(actual: f64, expected: f64) {
    std::assert!((actual - expected).abs() < 1e-9, "expected {}, got {}", expected, actual);
}
