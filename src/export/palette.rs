//! Color palettes
//!
//! Linear color ramps used to render grids to PNG. Built-in ramps come
//! from the embedded `palettes.toml`; anything else is read as a
//! comma-separated list of hex colors.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::pipeline::errors::{GrowthError, GrowthResult};

lazy_static! {
    // Parsed once on first use
    static ref BUILTIN_PALETTES: HashMap<String, Palette> = {
        let content = include_str!("../../palettes.toml");
        parse_palettes(content).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse built-in palettes: {}", e);
            fallback_palettes()
        })
    };
}

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        RgbColor { r, g, b }
    }

    /// Convert to hex string (#RRGGBB format)
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Create from hex string, with or without `#` prefix
    pub fn from_hex(hex: &str) -> GrowthResult<Self> {
        let hex = hex.trim().trim_start_matches('#');

        if hex.len() != 6 || !hex.is_ascii() {
            return Err(GrowthError::Config(
                format!("Invalid hex color code: {} - must be 6 hexadecimal digits", hex)
            ));
        }

        let r = parse_hex_component(&hex[0..2], hex)?;
        let g = parse_hex_component(&hex[2..4], hex)?;
        let b = parse_hex_component(&hex[4..6], hex)?;

        Ok(RgbColor { r, g, b })
    }

    /// Linear blend, `t` in 0..=1
    pub fn lerp(&self, other: &RgbColor, t: f64) -> RgbColor {
        let mix = |a: u8, b: u8| (a as f64 * (1.0 - t) + b as f64 * t).round() as u8;
        RgbColor::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

fn parse_hex_component(hex_part: &str, full_hex: &str) -> GrowthResult<u8> {
    u8::from_str_radix(hex_part, 16)
        .map_err(|_| GrowthError::Config(format!("Invalid hex color: {}", full_hex)))
}

/// Evenly spaced color stops
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    stops: Vec<RgbColor>,
}

impl Palette {
    pub fn new(stops: Vec<RgbColor>) -> GrowthResult<Self> {
        if stops.is_empty() {
            return Err(GrowthError::Config("palette needs at least one color".to_string()));
        }
        Ok(Palette { stops })
    }

    /// Parse `"ffffff,ff0000"` style lists
    pub fn from_hex_list(list: &str) -> GrowthResult<Self> {
        let stops = list.split(',')
            .filter(|s| !s.trim().is_empty())
            .map(RgbColor::from_hex)
            .collect::<GrowthResult<Vec<_>>>()?;
        Palette::new(stops)
    }

    /// Built-in palette by name
    pub fn builtin(name: &str) -> Option<Palette> {
        BUILTIN_PALETTES.get(name).cloned()
    }

    /// Built-in name first, then a hex list
    pub fn resolve(name: &str) -> GrowthResult<Self> {
        if let Some(palette) = Palette::builtin(name) {
            return Ok(palette);
        }
        Palette::from_hex_list(name).map_err(|_| GrowthError::Config(format!(
            "unknown palette '{}': not a built-in name or a hex color list", name
        )))
    }

    pub fn stops(&self) -> &[RgbColor] {
        &self.stops
    }

    /// First stop; used for single-color drawing
    pub fn primary(&self) -> RgbColor {
        self.stops[0]
    }

    /// Color for `value` stretched over `min..max`; values outside are clamped
    pub fn color_for(&self, value: f64, min: f64, max: f64) -> RgbColor {
        if self.stops.len() == 1 || !(max > min) {
            return self.stops[0];
        }

        let t = ((value - min) / (max - min)).clamp(0.0, 1.0);
        let segments = (self.stops.len() - 1) as f64;
        let position = t * segments;
        let index = (position.floor() as usize).min(self.stops.len() - 2);
        let local = position - index as f64;

        self.stops[index].lerp(&self.stops[index + 1], local)
    }
}

fn parse_palettes(content: &str) -> GrowthResult<HashMap<String, Palette>> {
    let value: toml::Value = toml::from_str(content)?;
    let table = value.get("palettes")
        .and_then(|v| v.as_table())
        .ok_or_else(|| GrowthError::Config("missing [palettes] table".to_string()))?;

    let mut palettes = HashMap::new();
    for (name, colors) in table {
        let colors = colors.as_array()
            .ok_or_else(|| GrowthError::Config(format!("palette '{}' must be a list", name)))?;
        let stops = colors.iter()
            .map(|c| c.as_str()
                .ok_or_else(|| GrowthError::Config(format!("palette '{}' has a non-string color", name)))
                .and_then(RgbColor::from_hex))
            .collect::<GrowthResult<Vec<_>>>()?;
        palettes.insert(name.clone(), Palette::new(stops)?);
    }
    Ok(palettes)
}

fn fallback_palettes() -> HashMap<String, Palette> {
    let white = RgbColor::new(255, 255, 255);
    let red = RgbColor::new(255, 0, 0);
    let blue = RgbColor::new(0, 0, 255);

    let mut palettes = HashMap::new();
    palettes.insert("builtup".to_string(), Palette { stops: vec![white, red] });
    palettes.insert("change".to_string(), Palette { stops: vec![blue, white, red] });
    palettes.insert("boundary".to_string(), Palette { stops: vec![blue] });
    palettes
}
