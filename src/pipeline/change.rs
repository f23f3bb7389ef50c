//! Layer products handed to the exporter
//!
//! Region-clipped snapshots of selected periods, the full clipped stack
//! and the pixel-wise change between the first and last observed period.

use std::collections::{BTreeMap, BTreeSet};

use log::{info, warn};

use crate::coordinate::GeoTransform;
use crate::pipeline::errors::{GrowthError, GrowthResult};
use crate::pipeline::time_series::TimeSeries;
use crate::raster::{RasterLayer, ScalarGrid};
use crate::region::Region;

/// Clipped grid of one period
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub period: i32,
    pub grid: ScalarGrid,
}

/// Last-minus-first difference grid
#[derive(Debug, Clone)]
pub struct ChangeLayer {
    pub first_period: i32,
    pub last_period: i32,
    pub grid: ScalarGrid,
}

/// Everything raster-shaped the exporter receives
#[derive(Debug, Clone, Default)]
pub struct LayerProducts {
    pub snapshots: Vec<Snapshot>,
    pub stack: Vec<Snapshot>,
    pub change: Option<ChangeLayer>,
}

/// Crop a band to the region's bounding window and blank pixels outside it
///
/// A pixel is kept when its center lies inside the region; everything
/// else becomes NaN.
pub fn clip_to_region(layer: &RasterLayer, band: &str, region: &Region) -> GrowthResult<ScalarGrid> {
    let source = layer.to_grid(band).ok_or_else(|| GrowthError::Config(format!(
        "layer '{}' has no band '{}'", layer.label(), band
    )))?;

    let gt = layer.transform();
    let window = region.bounds().to_pixel_window(gt, layer.width(), layer.height());
    if window.is_empty() {
        return Err(GrowthError::InvalidRegion(format!(
            "region does not overlap layer '{}'", layer.label()
        )));
    }

    let transform = GeoTransform::new(
        gt.origin_x + window.x as f64 * gt.pixel_width,
        gt.origin_y + window.y as f64 * gt.pixel_height,
        gt.pixel_width,
        gt.pixel_height,
    );
    let mut clipped = ScalarGrid::empty(layer.label(), transform, window.width, window.height);

    for (col, row) in window.pixels() {
        let (x, y) = gt.pixel_center(col, row);
        if region.contains(x, y) {
            if let Some(v) = source.get(col, row) {
                clipped.set(col - window.x, row - window.y, v);
            }
        }
    }

    Ok(clipped)
}

/// Pixel-wise `later - earlier`; NaN where either input is NaN
pub fn difference(later: &ScalarGrid, earlier: &ScalarGrid, name: &str) -> GrowthResult<ScalarGrid> {
    if !later.same_grid(earlier) {
        return Err(GrowthError::GridMismatch(format!(
            "cannot subtract '{}' ({}x{}) from '{}' ({}x{})",
            earlier.name, earlier.width, earlier.height,
            later.name, later.width, later.height
        )));
    }

    let data = later.data.iter()
        .zip(earlier.data.iter())
        .map(|(a, b)| a - b)
        .collect();

    Ok(ScalarGrid {
        name: name.to_string(),
        transform: later.transform,
        width: later.width,
        height: later.height,
        data,
    })
}

/// Prepares clipped snapshots, stack and change grid for export
pub struct ChangeDetector<'a> {
    band: &'a str,
    region: &'a Region,
}

impl<'a> ChangeDetector<'a> {
    pub fn new(band: &'a str, region: &'a Region) -> Self {
        ChangeDetector { band, region }
    }

    /// Build layer products for the periods present in `series`
    ///
    /// # Arguments
    /// * `layers` - (period, layer) pairs as resolved by the series builder
    /// * `series` - the built series; only its periods are exported
    /// * `requested` - snapshot periods, repeats ignored; empty means first and last
    /// * `with_stack` - also clip every period for the stack export
    pub fn prepare(&self,
                   layers: &[(i32, &RasterLayer)],
                   series: &TimeSeries,
                   requested: &[i32],
                   with_stack: bool) -> GrowthResult<LayerProducts> {
        let by_period: BTreeMap<i32, &RasterLayer> = layers.iter()
            .filter(|(period, _)| series.iter().any(|s| s.period == *period))
            .map(|(period, layer)| (*period, *layer))
            .collect();

        let (first, last) = match (series.first(), series.last()) {
            (Some(f), Some(l)) => (f.period, l.period),
            _ => {
                info!("Empty series, no layer products to prepare");
                return Ok(LayerProducts::default());
            }
        };

        let wanted: Vec<i32> = if requested.is_empty() {
            if first == last { vec![first] } else { vec![first, last] }
        } else {
            let mut seen = BTreeSet::new();
            requested.iter().copied().filter(|p| seen.insert(*p)).collect()
        };

        let mut clipped: BTreeMap<i32, ScalarGrid> = BTreeMap::new();
        let mut snapshots = Vec::new();
        for period in wanted {
            let Some(layer) = by_period.get(&period) else {
                warn!("No aggregated layer for snapshot period {}, skipping", period);
                continue;
            };
            let grid = self.clipped(&mut clipped, period, layer)?;
            snapshots.push(Snapshot { period, grid });
        }

        let change = if first != last {
            let earlier = self.clipped(&mut clipped, first, layer_for(&by_period, first)?)?;
            let later = self.clipped(&mut clipped, last, layer_for(&by_period, last)?)?;
            let name = format!("builtup_change_{}_{}", first, last);
            Some(ChangeLayer {
                first_period: first,
                last_period: last,
                grid: difference(&later, &earlier, &name)?,
            })
        } else {
            None
        };

        let mut stack = Vec::new();
        if with_stack {
            for (period, layer) in &by_period {
                let grid = self.clipped(&mut clipped, *period, layer)?;
                stack.push(Snapshot { period: *period, grid });
            }
        }

        Ok(LayerProducts { snapshots, stack, change })
    }

    fn clipped(&self, cache: &mut BTreeMap<i32, ScalarGrid>, period: i32, layer: &RasterLayer) -> GrowthResult<ScalarGrid> {
        if let Some(grid) = cache.get(&period) {
            return Ok(grid.clone());
        }
        let grid = clip_to_region(layer, self.band, self.region)?;
        cache.insert(period, grid.clone());
        Ok(grid)
    }
}

fn layer_for<'l>(by_period: &BTreeMap<i32, &'l RasterLayer>, period: i32) -> GrowthResult<&'l RasterLayer> {
    by_period.get(&period).copied().ok_or_else(|| GrowthError::GenericError(format!(
        "no layer resolved for period {}", period
    )))
}
