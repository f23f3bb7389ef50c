//! GeoJSON reading and writing for regions

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use geo::{Coord, LineString, MultiPolygon, Polygon};
use log::{debug, info};
use serde_json::{json, Value};

use super::Region;
use crate::pipeline::errors::{GrowthError, GrowthResult};

/// Read a region from a GeoJSON file
///
/// Accepts a FeatureCollection, a Feature or a bare geometry. Every
/// Polygon and MultiPolygon found is merged into one region.
pub fn read_geojson<P: AsRef<Path>>(path: P) -> GrowthResult<Region> {
    let path = path.as_ref();
    info!("Reading region from {}", path.display());

    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    region_from_value(&value)
}

/// Build a region from a parsed GeoJSON value
pub fn region_from_value(value: &Value) -> GrowthResult<Region> {
    let mut polygons = Vec::new();
    collect_polygons(value, &mut polygons)?;
    debug!("GeoJSON yielded {} polygon(s)", polygons.len());

    Region::new(MultiPolygon::new(polygons))
}

/// Region as a FeatureCollection with a single feature
pub fn region_to_geojson(region: &Region) -> Value {
    let polygons: Vec<Value> = region.geometry().0.iter()
        .map(|polygon| {
            let mut rings = vec![ring_to_value(polygon.exterior())];
            rings.extend(polygon.interiors().iter().map(ring_to_value));
            Value::Array(rings)
        })
        .collect();

    let geometry = if polygons.len() == 1 {
        json!({ "type": "Polygon", "coordinates": polygons[0] })
    } else {
        json!({ "type": "MultiPolygon", "coordinates": polygons })
    };

    json!({
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": {}, "geometry": geometry }
        ]
    })
}

/// Write a region as a GeoJSON FeatureCollection
pub fn write_geojson<P: AsRef<Path>>(region: &Region, path: P) -> GrowthResult<()> {
    let path = path.as_ref();
    info!("Writing region to {}", path.display());

    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &region_to_geojson(region))?;
    Ok(())
}

fn collect_polygons(value: &Value, out: &mut Vec<Polygon<f64>>) -> GrowthResult<()> {
    let kind = value.get("type").and_then(Value::as_str).unwrap_or("");
    match kind {
        "FeatureCollection" => {
            let features = value.get("features")
                .and_then(Value::as_array)
                .ok_or_else(|| invalid("FeatureCollection without features"))?;
            for feature in features {
                collect_polygons(feature, out)?;
            }
        }
        "Feature" => {
            if let Some(geometry) = value.get("geometry").filter(|g| !g.is_null()) {
                collect_polygons(geometry, out)?;
            }
        }
        "Polygon" => {
            out.push(parse_polygon(coordinates(value)?)?);
        }
        "MultiPolygon" => {
            let parts = coordinates(value)?
                .as_array()
                .ok_or_else(|| invalid("MultiPolygon coordinates must be an array"))?;
            for part in parts {
                out.push(parse_polygon(part)?);
            }
        }
        "GeometryCollection" => {
            if let Some(geometries) = value.get("geometries").and_then(Value::as_array) {
                for geometry in geometries {
                    collect_polygons(geometry, out)?;
                }
            }
        }
        // Points and lines carry no area
        _ => debug!("Skipping GeoJSON object of type '{}'", kind),
    }
    Ok(())
}

fn coordinates(value: &Value) -> GrowthResult<&Value> {
    value.get("coordinates").ok_or_else(|| invalid("geometry without coordinates"))
}

fn parse_polygon(value: &Value) -> GrowthResult<Polygon<f64>> {
    let rings = value.as_array().ok_or_else(|| invalid("polygon must be an array of rings"))?;
    let mut rings = rings.iter().map(parse_ring);

    let exterior = rings.next().ok_or_else(|| invalid("polygon without exterior ring"))??;
    let interiors = rings.collect::<GrowthResult<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn parse_ring(value: &Value) -> GrowthResult<LineString<f64>> {
    let positions = value.as_array().ok_or_else(|| invalid("ring must be an array of positions"))?;
    let coords = positions.iter()
        .map(|p| {
            let x = p.get(0).and_then(Value::as_f64);
            let y = p.get(1).and_then(Value::as_f64);
            match (x, y) {
                (Some(x), Some(y)) => Ok(Coord { x, y }),
                _ => Err(invalid("position must hold two numbers")),
            }
        })
        .collect::<GrowthResult<Vec<_>>>()?;
    Ok(LineString::new(coords))
}

fn ring_to_value(ring: &LineString<f64>) -> Value {
    Value::Array(ring.coords().map(|c| json!([c.x, c.y])).collect())
}

fn invalid(msg: &str) -> GrowthError {
    GrowthError::InvalidRegion(format!("GeoJSON: {}", msg))
}
