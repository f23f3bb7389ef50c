//! Area of interest
//!
//! The region is validated once, before any aggregation runs, and then
//! shared read-only by every aggregation and export call of a run.

mod geojson;

use geo::{Area, BoundingRect, Contains, Coord, EuclideanDistance, LineString, MultiPolygon, Point, Polygon};

use crate::coordinate::BoundingBox;
use crate::pipeline::errors::{GrowthError, GrowthResult};

pub use geojson::{read_geojson, region_to_geojson, write_geojson};

/// A validated polygonal region in the layers' coordinate system
#[derive(Debug, Clone)]
pub struct Region {
    geometry: MultiPolygon<f64>,
    bounds: BoundingBox,
}

impl Region {
    /// Validate and wrap a multipolygon
    ///
    /// Fails with `InvalidRegion` for empty geometries, non-finite
    /// coordinates, rings with fewer than 3 distinct vertices and
    /// zero-area shapes.
    pub fn new(geometry: MultiPolygon<f64>) -> GrowthResult<Self> {
        if geometry.0.is_empty() {
            return Err(GrowthError::InvalidRegion("region has no polygons".to_string()));
        }

        for (i, polygon) in geometry.0.iter().enumerate() {
            let ring = polygon.exterior();
            let all_rings = std::iter::once(ring).chain(polygon.interiors().iter());
            if all_rings.flat_map(|r| r.coords()).any(|c| !c.x.is_finite() || !c.y.is_finite()) {
                return Err(GrowthError::InvalidRegion(format!(
                    "polygon {} has non-finite coordinates", i
                )));
            }

            let mut distinct: Vec<Coord<f64>> = Vec::new();
            for c in ring.coords() {
                if !distinct.contains(c) {
                    distinct.push(*c);
                }
            }
            if distinct.len() < 3 {
                return Err(GrowthError::InvalidRegion(format!(
                    "polygon {} has fewer than 3 distinct vertices", i
                )));
            }
        }

        if !(geometry.unsigned_area() > 0.0) {
            return Err(GrowthError::InvalidRegion("region has zero area".to_string()));
        }

        let bounds = geometry.bounding_rect()
            .map(BoundingBox::from)
            .ok_or_else(|| GrowthError::InvalidRegion("region has no extent".to_string()))?;

        Ok(Region { geometry, bounds })
    }

    /// Single polygon region
    pub fn from_polygon(polygon: Polygon<f64>) -> GrowthResult<Self> {
        Region::new(MultiPolygon::new(vec![polygon]))
    }

    /// Rectangular region
    pub fn from_bbox(bbox: &BoundingBox) -> GrowthResult<Self> {
        Region::from_polygon(bbox.to_rect().to_polygon())
    }

    /// Polygon from exterior ring vertices (closing vertex optional)
    pub fn from_vertices(vertices: &[(f64, f64)]) -> GrowthResult<Self> {
        let ring: LineString<f64> = vertices.iter()
            .map(|&(x, y)| Coord { x, y })
            .collect::<Vec<_>>()
            .into();
        Region::from_polygon(Polygon::new(ring, vec![]))
    }

    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }

    /// Bounding box of the region
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Area in squared map units
    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }

    /// True if the map coordinate is strictly inside the region
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.bounds.contains(x, y) && self.geometry.contains(&Point::new(x, y))
    }

    /// Distance from a map coordinate to the nearest ring of the region
    pub fn distance_to_boundary(&self, x: f64, y: f64) -> f64 {
        let point = Point::new(x, y);
        self.geometry.0.iter()
            .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors().iter()))
            .map(|ring| point.euclidean_distance(ring))
            .fold(f64::INFINITY, f64::min)
    }
}
