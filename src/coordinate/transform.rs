//! North-up affine geotransform

use super::bbox::BoundingBox;

/// Pixel <-> map coordinate mapping for a north-up raster
///
/// Rotated grids are not supported; GHSL tiles and everything the
/// GeoTIFF reader produces from ModelPixelScale/ModelTiepoint are north-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Pixel width in map units
    pub pixel_width: f64,
    /// Pixel height in map units (negative for north-up)
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Create a new geotransform
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        GeoTransform {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        }
    }

    /// Build from GeoTIFF ModelPixelScale + ModelTiepoint values
    ///
    /// # Arguments
    /// * `scale` - [ScaleX, ScaleY, ScaleZ]
    /// * `tiepoint` - [I, J, K, X, Y, Z]
    pub fn from_tiepoint(scale: &[f64], tiepoint: &[f64]) -> Option<Self> {
        if scale.len() < 2 || tiepoint.len() < 6 {
            return None;
        }

        let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
        let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
        Some(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]))
    }

    /// Area of one pixel in squared map units
    pub fn pixel_area(&self) -> f64 {
        (self.pixel_width * self.pixel_height).abs()
    }

    /// Map coordinates of the center of pixel (col, row)
    pub fn pixel_center(&self, col: usize, row: usize) -> (f64, f64) {
        (
            self.origin_x + (col as f64 + 0.5) * self.pixel_width,
            self.origin_y + (row as f64 + 0.5) * self.pixel_height,
        )
    }

    /// Pixel (col, row) containing a map coordinate, if inside the grid
    pub fn pixel_at(&self, x: f64, y: f64, width: usize, height: usize) -> Option<(usize, usize)> {
        let col = ((x - self.origin_x) / self.pixel_width).floor();
        let row = ((y - self.origin_y) / self.pixel_height).floor();

        if !col.is_finite() || !row.is_finite() || col < 0.0 || row < 0.0 {
            return None;
        }

        let (col, row) = (col as usize, row as usize);
        if col >= width || row >= height {
            return None;
        }
        Some((col, row))
    }

    /// Map extent covered by a grid of the given size
    pub fn extent(&self, width: usize, height: usize) -> BoundingBox {
        let x2 = self.origin_x + width as f64 * self.pixel_width;
        let y2 = self.origin_y + height as f64 * self.pixel_height;
        BoundingBox::new(
            self.origin_x.min(x2),
            self.origin_y.min(y2),
            self.origin_x.max(x2),
            self.origin_y.max(y2),
        )
    }

    /// Same grid within floating point tolerance
    pub fn approx_eq(&self, other: &GeoTransform) -> bool {
        let tol = 1e-9 * self.pixel_width.abs().max(1.0);
        (self.origin_x - other.origin_x).abs() <= tol
            && (self.origin_y - other.origin_y).abs() <= tol
            && (self.pixel_width - other.pixel_width).abs() <= tol
            && (self.pixel_height - other.pixel_height).abs() <= tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiepoint_roundtrip_center() {
        let gt = GeoTransform::from_tiepoint(&[100.0, 100.0, 0.0], &[0.0, 0.0, 0.0, 1000.0, 5000.0, 0.0]).unwrap();
        assert_eq!(gt.pixel_center(0, 0), (1050.0, 4950.0));
        assert_eq!(gt.pixel_at(1050.0, 4950.0, 10, 10), Some((0, 0)));
        assert_eq!(gt.pixel_at(999.0, 4950.0, 10, 10), None);
        assert_eq!(gt.pixel_area(), 10_000.0);
    }

    #[test]
    fn test_extent() {
        let gt = GeoTransform::new(0.0, 300.0, 100.0, -100.0);
        let ext = gt.extent(2, 3);
        assert_eq!((ext.min_x, ext.min_y, ext.max_x, ext.max_y), (0.0, 0.0, 200.0, 300.0));
    }
}
