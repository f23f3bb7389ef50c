//! Bounding box structure for defining regions

use geo::{Coord, Rect};

use super::transform::GeoTransform;
use crate::raster::PixelWindow;

/// A bounding box in map coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum X coordinate
    pub min_x: f64,
    /// Minimum Y coordinate
    pub min_y: f64,
    /// Maximum X coordinate
    pub max_x: f64,
    /// Maximum Y coordinate
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox { min_x, min_y, max_x, max_y }
    }

    /// Parse a bounding box from a string (format: "minx,miny,maxx,maxy")
    pub fn from_string(bbox_str: &str) -> Result<Self, String> {
        let parts: Vec<&str> = bbox_str.split(',').collect();
        if parts.len() != 4 {
            return Err("Bounding box must have 4 comma-separated values".to_string());
        }

        let min_x = parts[0].trim().parse::<f64>()
            .map_err(|_| "Invalid min_x value".to_string())?;
        let min_y = parts[1].trim().parse::<f64>()
            .map_err(|_| "Invalid min_y value".to_string())?;
        let max_x = parts[2].trim().parse::<f64>()
            .map_err(|_| "Invalid max_x value".to_string())?;
        let max_y = parts[3].trim().parse::<f64>()
            .map_err(|_| "Invalid max_y value".to_string())?;

        if min_x >= max_x || min_y >= max_y {
            return Err("Bounding box min values must be smaller than max values".to_string());
        }

        Ok(BoundingBox::new(min_x, min_y, max_x, max_y))
    }

    /// Get the width of the bounding box
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Get the height of the bounding box
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if this bounding box contains a map coordinate
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Overlapping part of two boxes, or None when they are disjoint
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let min_x = self.min_x.max(other.min_x);
        let min_y = self.min_y.max(other.min_y);
        let max_x = self.max_x.min(other.max_x);
        let max_y = self.max_y.min(other.max_y);

        if min_x >= max_x || min_y >= max_y {
            return None;
        }
        Some(BoundingBox::new(min_x, min_y, max_x, max_y))
    }

    /// Convert to a pixel window given a geotransform
    ///
    /// The window is clamped to the raster size; a box outside the raster
    /// yields an empty window.
    pub fn to_pixel_window(&self, transform: &GeoTransform, width: usize, height: usize) -> PixelWindow {
        let x_a = (self.min_x - transform.origin_x) / transform.pixel_width;
        let x_b = (self.max_x - transform.origin_x) / transform.pixel_width;
        let y_a = (self.max_y - transform.origin_y) / transform.pixel_height;
        let y_b = (self.min_y - transform.origin_y) / transform.pixel_height;

        let col_min = x_a.min(x_b).floor().max(0.0) as usize;
        let col_max = (x_a.max(x_b).ceil().max(0.0) as usize).min(width);
        let row_min = y_a.min(y_b).floor().max(0.0) as usize;
        let row_max = (y_a.max(y_b).ceil().max(0.0) as usize).min(height);

        PixelWindow::new(
            col_min.min(col_max),
            row_min.min(row_max),
            col_max.saturating_sub(col_min),
            row_max.saturating_sub(row_min),
        )
    }

    /// Convert into a geo rectangle
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord { x: self.min_x, y: self.min_y },
            Coord { x: self.max_x, y: self.max_y },
        )
    }
}

impl From<Rect<f64>> for BoundingBox {
    fn from(rect: Rect<f64>) -> Self {
        BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bbox() {
        let bbox = BoundingBox::from_string("1, 2, 3, 4").unwrap();
        assert_eq!(bbox, BoundingBox::new(1.0, 2.0, 3.0, 4.0));
        assert!(BoundingBox::from_string("1,2,3").is_err());
        assert!(BoundingBox::from_string("3,2,1,4").is_err());
    }

    #[test]
    fn test_intersection() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 5.0, 15.0, 15.0);
        assert_eq!(a.intersection(&b), Some(BoundingBox::new(5.0, 5.0, 10.0, 10.0)));
        assert_eq!(a.intersection(&BoundingBox::new(20.0, 20.0, 30.0, 30.0)), None);
    }

    #[test]
    fn test_pixel_window_clamped() {
        let gt = GeoTransform::new(0.0, 1000.0, 100.0, -100.0);
        let window = BoundingBox::new(150.0, 450.0, 2000.0, 950.0).to_pixel_window(&gt, 10, 10);
        assert_eq!((window.x, window.y, window.width, window.height), (1, 0, 9, 6));
    }
}
