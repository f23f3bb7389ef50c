//! Grid rendering
//!
//! Turns scalar grids into RGBA images through a palette. NaN pixels
//! become fully transparent, so only PNG output keeps them meaningful.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use log::info;

use crate::config::RenderStyle;
use crate::export::palette::Palette;
use crate::pipeline::errors::{GrowthError, GrowthResult};
use crate::raster::ScalarGrid;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Render a grid with a palette stretched over `style.min..style.max`
pub fn render_grid(grid: &ScalarGrid, style: &RenderStyle) -> GrowthResult<RgbaImage> {
    let palette = Palette::resolve(&style.palette)?;
    let (width, height) = image_size(grid)?;
    let mut image = RgbaImage::new(width, height);

    for row in 0..grid.height {
        for col in 0..grid.width {
            let pixel = match grid.get(col, row) {
                Some(v) if !v.is_nan() => {
                    let color = palette.color_for(v, style.min, style.max);
                    Rgba([color.r, color.g, color.b, 255])
                }
                _ => TRANSPARENT,
            };
            image.put_pixel(col as u32, row as u32, pixel);
        }
    }

    Ok(image)
}

/// Ensure a file path has PNG extension for transparency support
///
/// # Arguments
/// * `file_path` - The original file path
///
/// # Returns
/// A path with .png extension
pub fn ensure_png_extension(file_path: &Path) -> PathBuf {
    let is_png = file_path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase() == "png")
        .unwrap_or(false);
    if is_png {
        file_path.to_path_buf()
    } else {
        file_path.with_extension("png")
    }
}

/// Save an RGBA image as PNG, returning the path actually written
pub fn save_png(image: &RgbaImage, output_path: &Path) -> GrowthResult<PathBuf> {
    let final_path = ensure_png_extension(output_path);
    if final_path != output_path {
        info!("Changed output extension to PNG for transparency support: {}", final_path.display());
    }

    image.save_with_format(&final_path, image::ImageFormat::Png)?;
    Ok(final_path)
}

fn image_size(grid: &ScalarGrid) -> GrowthResult<(u32, u32)> {
    let width = u32::try_from(grid.width).map_err(|_| GrowthError::GenericError(
        format!("grid '{}' too wide to render", grid.name)
    ))?;
    let height = u32::try_from(grid.height).map_err(|_| GrowthError::GenericError(
        format!("grid '{}' too tall to render", grid.name)
    ))?;
    if width == 0 || height == 0 {
        return Err(GrowthError::GenericError(format!("grid '{}' is empty", grid.name)));
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::GeoTransform;

    #[test]
    fn test_nan_is_transparent() {
        let mut grid = ScalarGrid::empty("g", GeoTransform::new(0.0, 2.0, 1.0, -1.0), 2, 1);
        grid.set(0, 0, 1.0);

        let image = render_grid(&grid, &RenderStyle::new("builtup", 0.0, 1.0)).unwrap();
        assert_eq!(image.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(image.get_pixel(1, 0)[3], 0);
    }

    #[test]
    fn test_png_extension() {
        assert_eq!(ensure_png_extension(Path::new("out/map.tif")), PathBuf::from("out/map.png"));
        assert_eq!(ensure_png_extension(Path::new("map.PNG")), PathBuf::from("map.PNG"));
        assert_eq!(ensure_png_extension(Path::new("map")), PathBuf::from("map.png"));
    }

    #[test]
    fn test_empty_grid_rejected() {
        let grid = ScalarGrid::empty("e", GeoTransform::new(0.0, 0.0, 1.0, -1.0), 0, 0);
        assert!(render_grid(&grid, &RenderStyle::new("builtup", 0.0, 1.0)).is_err());
    }
}
