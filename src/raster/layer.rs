//! Raster layers and derived scalar grids

use chrono::{DateTime, Utc};

use crate::coordinate::{BoundingBox, GeoTransform};
use crate::pipeline::errors::{GrowthError, GrowthResult};

/// One named scalar band of a layer, row-major
#[derive(Debug, Clone)]
pub struct Band {
    pub name: String,
    pub data: Vec<f64>,
}

/// A timestamped snapshot of one or more scalar bands on a north-up grid
///
/// Layers are produced by the raster backend and only ever read by the
/// pipeline.
#[derive(Debug, Clone)]
pub struct RasterLayer {
    label: String,
    timestamp: Option<DateTime<Utc>>,
    transform: GeoTransform,
    width: usize,
    height: usize,
    nodata: Option<f64>,
    bands: Vec<Band>,
}

impl RasterLayer {
    /// Create a layer without bands
    pub fn new(label: &str, transform: GeoTransform, width: usize, height: usize) -> Self {
        RasterLayer {
            label: label.to_string(),
            timestamp: None,
            transform,
            width,
            height,
            nodata: None,
            bands: Vec::new(),
        }
    }

    /// Attach the acquisition timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Declare the value that marks missing pixels
    pub fn with_nodata(mut self, nodata: Option<f64>) -> Self {
        self.nodata = nodata;
        self
    }

    /// Add a band; fails if its size does not match the grid
    pub fn with_band(mut self, name: &str, data: Vec<f64>) -> GrowthResult<Self> {
        if data.len() != self.width * self.height {
            return Err(GrowthError::GridMismatch(format!(
                "band '{}' of layer '{}' has {} values, grid is {}x{}",
                name, self.label, data.len(), self.width, self.height
            )));
        }
        if self.band(name).is_some() {
            return Err(GrowthError::Config(format!(
                "layer '{}' already has a band named '{}'", self.label, name
            )));
        }

        self.bands.push(Band { name: name.to_string(), data });
        Ok(self)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel values of a band, if present
    pub fn band(&self, name: &str) -> Option<&[f64]> {
        self.bands.iter()
            .find(|b| b.name == name)
            .map(|b| b.data.as_slice())
    }

    /// Map extent of the layer
    pub fn extent(&self) -> BoundingBox {
        self.transform.extent(self.width, self.height)
    }

    /// True if a pixel value is usable (finite and not nodata)
    pub fn is_valid(&self, value: f64) -> bool {
        value.is_finite() && self.nodata.map_or(true, |nd| value != nd)
    }

    /// Band as a scalar grid with nodata pixels replaced by NaN
    pub fn to_grid(&self, band: &str) -> Option<ScalarGrid> {
        let data = self.band(band)?
            .iter()
            .map(|&v| if self.is_valid(v) { v } else { f64::NAN })
            .collect();

        Some(ScalarGrid {
            name: self.label.clone(),
            transform: self.transform,
            width: self.width,
            height: self.height,
            data,
        })
    }
}

/// A single-band grid with NaN as nodata
///
/// Used for everything derived from layers: clipped snapshots,
/// change maps and rendered boundaries.
#[derive(Debug, Clone)]
pub struct ScalarGrid {
    pub name: String,
    pub transform: GeoTransform,
    pub width: usize,
    pub height: usize,
    pub data: Vec<f64>,
}

impl ScalarGrid {
    /// Create a grid filled with NaN
    pub fn empty(name: &str, transform: GeoTransform, width: usize, height: usize) -> Self {
        ScalarGrid {
            name: name.to_string(),
            transform,
            width,
            height,
            data: vec![f64::NAN; width * height],
        }
    }

    /// Value at (col, row); None when out of bounds
    pub fn get(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    /// Set value at (col, row); ignored when out of bounds
    pub fn set(&mut self, col: usize, row: usize, value: f64) {
        if col < self.width && row < self.height {
            self.data[row * self.width + col] = value;
        }
    }

    /// Number of non-NaN pixels
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }

    /// True if both grids share size and georeferencing
    pub fn same_grid(&self, other: &ScalarGrid) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.transform.approx_eq(&other.transform)
    }
}
