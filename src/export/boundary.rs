//! Region outline figure
//!
//! Paints the region's rings onto a transparent canvas covering its
//! bounding box at the sampling resolution.

use image::{Rgba, RgbaImage};

use crate::coordinate::GeoTransform;
use crate::export::palette::RgbColor;
use crate::pipeline::errors::{GrowthError, GrowthResult};
use crate::region::Region;

/// Upper bound on either side of the outline canvas
pub const MAX_CANVAS_SIDE: usize = 4096;

/// Draw the region outline `line_width` pixels wide
///
/// Pixel size is `scale`, enlarged when the bounding box would exceed
/// `MAX_CANVAS_SIDE` pixels. The canvas is padded by the line width.
pub fn render_boundary(region: &Region, scale: f64, line_width: u32, color: RgbColor) -> GrowthResult<RgbaImage> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(GrowthError::Config(format!("scale must be positive, got {}", scale)));
    }

    let bounds = region.bounds();
    let longest = bounds.width().max(bounds.height());
    let pixel = scale.max(longest / MAX_CANVAS_SIDE as f64);
    let pad = line_width as usize;

    let width = (bounds.width() / pixel).ceil() as usize + 2 * pad;
    let height = (bounds.height() / pixel).ceil() as usize + 2 * pad;
    let transform = GeoTransform::new(
        bounds.min_x - pad as f64 * pixel,
        bounds.max_y + pad as f64 * pixel,
        pixel,
        -pixel,
    );

    let half = line_width as f64 * pixel / 2.0;
    let stroke = Rgba([color.r, color.g, color.b, 255]);
    let mut image = RgbaImage::new(width as u32, height as u32);

    for row in 0..height {
        for col in 0..width {
            let (x, y) = transform.pixel_center(col, row);
            if region.distance_to_boundary(x, y) <= half {
                image.put_pixel(col as u32, row as u32, stroke);
            }
        }
    }

    Ok(image)
}
