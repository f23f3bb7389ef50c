//! Loading raster collections from disk
//!
//! A collection is either a TOML catalog listing one GeoTIFF per layer
//! together with its timestamp, or a plain directory of GeoTIFFs whose
//! periods are later derived from the file names.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use log::{debug, info};
use serde::Deserialize;

use crate::pipeline::errors::{GrowthError, GrowthResult};
use crate::raster::geotiff;
use crate::raster::layer::RasterLayer;

/// Catalog file contents
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    /// Collection name, informational only
    #[serde(default)]
    pub name: Option<String>,
    /// Band name given to layers that do not name their own
    #[serde(default)]
    pub band: Option<String>,
    #[serde(default)]
    pub layers: Vec<CatalogEntry>,
}

/// One layer of a catalog
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    /// GeoTIFF path, relative to the catalog file
    pub path: PathBuf,
    /// Layer label; defaults to the file stem
    #[serde(default)]
    pub name: Option<String>,
    /// RFC 3339 acquisition time
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Acquisition time in epoch milliseconds
    #[serde(default)]
    pub time_start: Option<i64>,
    /// Band name for this file
    #[serde(default)]
    pub band: Option<String>,
}

impl CatalogEntry {
    /// Resolve the entry's timestamp, if it has one
    pub fn resolve_timestamp(&self) -> GrowthResult<Option<DateTime<Utc>>> {
        if let Some(text) = &self.timestamp {
            let parsed = DateTime::parse_from_rfc3339(text)
                .map_err(|e| GrowthError::Config(format!(
                    "Invalid timestamp '{}' for {}: {}", text, self.path.display(), e
                )))?;
            return Ok(Some(parsed.with_timezone(&Utc)));
        }

        if let Some(millis) = self.time_start {
            return Utc.timestamp_millis_opt(millis)
                .single()
                .map(Some)
                .ok_or_else(|| GrowthError::Config(format!(
                    "Invalid time_start {} for {}", millis, self.path.display()
                )));
        }

        Ok(None)
    }
}

impl Catalog {
    /// Parse a catalog from TOML text
    pub fn from_str(content: &str) -> GrowthResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read a catalog file
    pub fn from_file<P: AsRef<Path>>(path: P) -> GrowthResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_str(&content)
    }
}

/// Load a collection from a catalog file or a directory
pub fn load_collection<P: AsRef<Path>>(path: P, default_band: &str) -> GrowthResult<Vec<RasterLayer>> {
    let path = path.as_ref();
    if path.is_dir() {
        load_directory(path, default_band)
    } else {
        load_catalog(path, default_band)
    }
}

/// Load every layer listed in a TOML catalog
pub fn load_catalog<P: AsRef<Path>>(path: P, default_band: &str) -> GrowthResult<Vec<RasterLayer>> {
    let path = path.as_ref();
    info!("Loading catalog {}", path.display());

    let catalog = Catalog::from_file(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let collection_band = catalog.band.as_deref().unwrap_or(default_band);

    let mut layers = Vec::with_capacity(catalog.layers.len());
    for entry in &catalog.layers {
        let file = if entry.path.is_absolute() {
            entry.path.clone()
        } else {
            base.join(&entry.path)
        };

        let label = entry.name.clone().unwrap_or_else(|| file_label(&file));
        let band = entry.band.as_deref().unwrap_or(collection_band);

        let mut layer = read_layer(&file, &label, band)?;
        if let Some(ts) = entry.resolve_timestamp()? {
            layer = layer.with_timestamp(ts);
        }
        layers.push(layer);
    }

    info!("Catalog '{}' has {} layer(s)", catalog.name.as_deref().unwrap_or("unnamed"), layers.len());
    Ok(layers)
}

/// Load every `.tif`/`.tiff` file in a directory, in file-name order
pub fn load_directory<P: AsRef<Path>>(dir: P, band: &str) -> GrowthResult<Vec<RasterLayer>> {
    let dir = dir.as_ref();
    info!("Scanning directory {} for GeoTIFFs", dir.display());

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| is_geotiff(p))
        .collect();
    files.sort();

    files.iter()
        .map(|file| read_layer(file, &file_label(file), band))
        .collect()
}

/// Read one GeoTIFF as a single-band layer
pub fn read_layer(path: &Path, label: &str, band: &str) -> GrowthResult<RasterLayer> {
    let decoded = geotiff::read_band(path)?;
    debug!("Layer '{}' band '{}' from {}", label, band, path.display());

    RasterLayer::new(label, decoded.transform, decoded.width, decoded.height)
        .with_nodata(decoded.nodata)
        .with_band(band, decoded.data)
}

fn is_geotiff(path: &Path) -> bool {
    path.is_file()
        && path.extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                ext == "tif" || ext == "tiff"
            })
            .unwrap_or(false)
}

fn file_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
