//! Coordinate handling for georeferenced rasters
//!
//! This module provides the bounding box and north-up geotransform
//! used to map between map coordinates and pixel positions.

mod bbox;
mod transform;

// Re-export key types
pub use self::bbox::BoundingBox;
pub use self::transform::GeoTransform;
