//! Single-band GeoTIFF reading and writing
//!
//! Uses the `tiff` crate for decoding/encoding and reads/writes the minimal
//! GeoTIFF tag set needed for north-up grids (ModelPixelScale,
//! ModelTiepoint, GeoKeyDirectory) plus the GDAL nodata tag.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use log::{debug, info, warn};
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;
use tiff::ColorType;

use crate::coordinate::GeoTransform;
use crate::pipeline::errors::{GrowthError, GrowthResult};
use crate::raster::layer::ScalarGrid;

/// GeoTIFF tag numbers
pub mod tags {
    pub const MODEL_PIXEL_SCALE: u16 = 33550;
    pub const MODEL_TIEPOINT: u16 = 33922;
    pub const GEO_KEY_DIRECTORY: u16 = 34735;
    pub const GDAL_NODATA: u16 = 42113;
}

/// Decoded contents of a single-band GeoTIFF
#[derive(Debug, Clone)]
pub struct GeoTiffBand {
    pub transform: GeoTransform,
    pub width: usize,
    pub height: usize,
    pub nodata: Option<f64>,
    pub data: Vec<f64>,
}

/// Read the first image of a single-band GeoTIFF file
pub fn read_band<P: AsRef<Path>>(path: P) -> GrowthResult<GeoTiffBand> {
    let path = path.as_ref();
    info!("Reading GeoTIFF: {}", path.display());

    let file = File::open(path)?;
    decode_band(BufReader::with_capacity(1024 * 1024, file))
}

/// Decode a single-band GeoTIFF from any `Read + Seek` source
pub fn decode_band<R: Read + Seek>(reader: R) -> GrowthResult<GeoTiffBand> {
    let mut decoder = Decoder::new(reader)?;

    match decoder.colortype()? {
        ColorType::Gray(_) => {}
        other => {
            return Err(GrowthError::GenericError(format!(
                "Expected a single-band GeoTIFF, found color type {:?}", other
            )))
        }
    }

    let (width, height) = decoder.dimensions()?;
    let (width, height) = (width as usize, height as usize);

    let scale = decoder.get_tag_f64_vec(tag(tags::MODEL_PIXEL_SCALE));
    let tiepoint = decoder.get_tag_f64_vec(tag(tags::MODEL_TIEPOINT));
    let transform = match (scale, tiepoint) {
        (Ok(scale), Ok(tiepoint)) => GeoTransform::from_tiepoint(&scale, &tiepoint),
        _ => None,
    }
    .ok_or_else(|| GrowthError::GenericError(
        "GeoTIFF has no ModelPixelScale/ModelTiepoint georeferencing".to_string()
    ))?;

    let nodata = match decoder.get_tag_ascii_string(tag(tags::GDAL_NODATA)) {
        Ok(text) => parse_nodata(&text),
        Err(_) => None,
    };
    debug!("GeoTIFF {}x{}, transform {:?}, nodata {:?}", width, height, transform, nodata);

    let data: Vec<f64> = match decoder.read_image()? {
        DecodingResult::F32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::F64(buf) => buf,
        DecodingResult::U8(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U16(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I8(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I16(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I32(buf) => buf.into_iter().map(f64::from).collect(),
        _ => return Err(GrowthError::GenericError("Unsupported GeoTIFF pixel format".to_string())),
    };

    if data.len() != width * height {
        return Err(GrowthError::GridMismatch(format!(
            "decoded {} values for a {}x{} image", data.len(), width, height
        )));
    }

    Ok(GeoTiffBand { transform, width, height, nodata, data })
}

/// Write one grid as a Float32 GeoTIFF
pub fn write_grid<P: AsRef<Path>>(grid: &ScalarGrid, path: P) -> GrowthResult<()> {
    write_pages(&[grid], path)
}

/// Write several grids as pages of one multi-page Float32 GeoTIFF
pub fn write_pages<P: AsRef<Path>>(grids: &[&ScalarGrid], path: P) -> GrowthResult<()> {
    let path = path.as_ref();
    if grids.is_empty() {
        return Err(GrowthError::GenericError(format!(
            "Nothing to write to {}", path.display()
        )));
    }

    info!("Writing {} page(s) to {}", grids.len(), path.display());
    let file = File::create(path)?;
    encode_pages(grids, BufWriter::new(file))
}

/// Encode grids as GeoTIFF pages into any `Write + Seek` sink
pub fn encode_pages<W: Write + Seek>(grids: &[&ScalarGrid], writer: W) -> GrowthResult<()> {
    let mut encoder = TiffEncoder::new(writer)?;

    for grid in grids {
        if grid.data.len() != grid.width * grid.height {
            return Err(GrowthError::GridMismatch(format!(
                "grid '{}' has {} values, expected {}x{}",
                grid.name, grid.data.len(), grid.width, grid.height
            )));
        }

        let data: Vec<f32> = grid.data.iter().map(|&v| v as f32).collect();
        let mut image = encoder.new_image::<Gray32Float>(grid.width as u32, grid.height as u32)?;

        let gt = grid.transform;
        let scale = [gt.pixel_width, gt.pixel_height.abs(), 0.0];
        let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
        // Version 1.1.0, 2 keys: GTModelType = Projected, GTRasterType = PixelIsArea
        let geokeys: [u16; 12] = [1, 1, 0, 2, 1024, 0, 1, 1, 1025, 0, 1, 1];

        image.encoder().write_tag(tag(tags::MODEL_PIXEL_SCALE), &scale[..])?;
        image.encoder().write_tag(tag(tags::MODEL_TIEPOINT), &tiepoint[..])?;
        image.encoder().write_tag(tag(tags::GEO_KEY_DIRECTORY), &geokeys[..])?;
        image.encoder().write_tag(tag(tags::GDAL_NODATA), "nan")?;
        image.write_data(&data)?;
    }

    Ok(())
}

/// Resolve a numeric tag to the decoder's tag enum, known or not
fn tag(code: u16) -> Tag {
    Tag::from_u16_exhaustive(code)
}

fn parse_nodata(text: &str) -> Option<f64> {
    let trimmed = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    match trimmed.to_lowercase().as_str() {
        "nan" | "-nan" => Some(f64::NAN),
        other => match other.parse::<f64>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring unparseable GDAL_NODATA value '{}'", trimmed);
                None
            }
        },
    }
}
