//! Artifact export
//!
//! CSV growth table, georeferenced and rendered layer products, and the
//! region as GeoJSON plus an outline figure.

pub mod boundary;
pub mod csv_export;
mod exporter;
pub mod palette;
pub mod render;

pub use csv_export::{write_growth_csv, write_growth_csv_to};
pub use exporter::{ArtifactExporter, AOI_FILE, BOUNDARY_FILE, STACK_FILE};
pub use palette::{Palette, RgbColor};
