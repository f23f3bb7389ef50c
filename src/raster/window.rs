//! Pixel window over a raster grid
//!
//! A rectangular block of pixels, used to restrict sampling and rendering
//! to the part of a layer covered by the region. Coordinates follow the image
//! convention where (0,0) is the top-left pixel.

/// Rectangular pixel window (in pixel coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    /// Column of the top-left corner
    pub x: usize,

    /// Row of the top-left corner
    pub y: usize,

    /// Width of the window in pixels
    pub width: usize,

    /// Height of the window in pixels
    pub height: usize,
}

impl PixelWindow {
    /// Create a new window
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        PixelWindow { x, y, width, height }
    }

    /// Column immediately to the right of the window (exclusive)
    pub fn end_x(&self) -> usize {
        self.x + self.width
    }

    /// Row immediately below the window (exclusive)
    pub fn end_y(&self) -> usize {
        self.y + self.height
    }

    /// True when the window holds no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Iterate (col, row) over every pixel in the window, row-major
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.y..self.end_y()).flat_map(move |row| (self.x..self.end_x()).map(move |col| (col, row)))
    }
}
