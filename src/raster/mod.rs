//! Raster data as seen by the pipeline
//!
//! Layers, derived grids, pixel windows and the file-backed loaders
//! that stand in for the raster backend.

pub mod catalog;
pub mod geotiff;
mod layer;
mod window;

pub use layer::{Band, RasterLayer, ScalarGrid};
pub use window::PixelWindow;
