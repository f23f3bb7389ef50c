//! Writes every run artifact to the output directory

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::{ExportConfig, RenderStyle};
use crate::export::boundary::render_boundary;
use crate::export::csv_export::write_growth_csv;
use crate::export::palette::Palette;
use crate::export::render::{render_grid, save_png};
use crate::pipeline::change::LayerProducts;
use crate::pipeline::errors::GrowthResult;
use crate::pipeline::growth::GrowthTable;
use crate::raster::{geotiff, ScalarGrid};
use crate::region::{write_geojson, Region};

pub const STACK_FILE: &str = "urban_stack.tif";
pub const AOI_FILE: &str = "aoi.geojson";
pub const BOUNDARY_FILE: &str = "aoi_boundary.png";

/// Writes the growth table, layer products and region artifacts
pub struct ArtifactExporter<'a> {
    config: &'a ExportConfig,
    output_dir: PathBuf,
    scale: f64,
}

impl<'a> ArtifactExporter<'a> {
    /// # Arguments
    /// * `config` - Export options; `config.output_dir` is used unless overridden
    /// * `scale` - Sampling resolution, used as boundary figure pixel size
    pub fn new(config: &'a ExportConfig, scale: f64) -> Self {
        ArtifactExporter {
            config,
            output_dir: config.output_dir.clone(),
            scale,
        }
    }

    pub fn with_output_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write everything and return the paths written, in write order
    pub fn export(&self, table: &GrowthTable, products: &LayerProducts, region: &Region) -> GrowthResult<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir)?;
        info!("Exporting artifacts to {}", self.output_dir.display());

        let mut written = Vec::new();
        written.push(self.export_table(table)?);

        for snapshot in &products.snapshots {
            let stem = format!("builtup_{}", snapshot.period);
            written.extend(self.export_grid(&snapshot.grid, &stem, &self.config.builtup_style)?);
        }

        if let Some(change) = &products.change {
            let stem = format!("builtup_change_{}_{}", change.first_period, change.last_period);
            written.extend(self.export_grid(&change.grid, &stem, &self.config.change_style)?);
        }

        if self.config.write_stack && !products.stack.is_empty() {
            let path = self.output_dir.join(STACK_FILE);
            let pages: Vec<&ScalarGrid> = products.stack.iter().map(|s| &s.grid).collect();
            geotiff::write_pages(&pages, &path)?;
            debug!("Wrote {} stack page(s) to {}", pages.len(), path.display());
            written.push(path);
        }

        written.extend(self.export_region(region)?);

        info!("Wrote {} artifact(s)", written.len());
        Ok(written)
    }

    /// CSV table named after the configured stem
    pub fn export_table(&self, table: &GrowthTable) -> GrowthResult<PathBuf> {
        let path = self.output_dir.join(format!("{}.csv", self.config.table_name));
        write_growth_csv(table, &path)?;
        info!("Wrote growth table ({} row(s)) to {}", table.len(), path.display());
        Ok(path)
    }

    /// GeoTIFF plus rendered PNG of one grid
    fn export_grid(&self, grid: &ScalarGrid, stem: &str, style: &RenderStyle) -> GrowthResult<Vec<PathBuf>> {
        let tif = self.output_dir.join(format!("{}.tif", stem));
        geotiff::write_grid(grid, &tif)?;

        let image = render_grid(grid, style)?;
        let png = save_png(&image, &self.output_dir.join(stem))?;

        debug!("Wrote {} and {}", tif.display(), png.display());
        Ok(vec![tif, png])
    }

    /// AOI as GeoJSON and as an outline figure
    fn export_region(&self, region: &Region) -> GrowthResult<Vec<PathBuf>> {
        let geojson = self.output_dir.join(AOI_FILE);
        write_geojson(region, &geojson)?;

        let color = Palette::resolve(&self.config.boundary_palette)?.primary();
        let outline = render_boundary(region, self.scale, self.config.boundary_width, color)?;
        let png = save_png(&outline, &self.output_dir.join(BOUNDARY_FILE))?;

        Ok(vec![geojson, png])
    }
}
