//! Analysis configuration
//!
//! Everything that parameterizes one run: band, sampling scale, unit
//! conversion, period rule, missing-sample policy and export options.
//! Loaded from TOML; every field has a default matching the GHSL
//! built-up surface product.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::export::palette::Palette;
use crate::pipeline::aggregator::DEFAULT_MAX_SAMPLES;
use crate::pipeline::errors::{GrowthError, GrowthResult};
use crate::pipeline::period::PeriodRule;
use crate::pipeline::time_series::{MissingSamplePolicy, SQ_METERS_PER_SQ_KM};

/// Default built-up band name
pub const DEFAULT_BAND: &str = "built_surface";
/// Default sampling resolution in map units
pub const DEFAULT_SCALE: f64 = 100.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub band: String,
    pub scale: f64,
    /// Upper bound on sample cells per layer
    pub max_samples: u64,
    pub unit_divisor: f64,
    pub period: PeriodConfig,
    pub missing: MissingSamplePolicy,
    pub export: ExportConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            band: DEFAULT_BAND.to_string(),
            scale: DEFAULT_SCALE,
            max_samples: DEFAULT_MAX_SAMPLES,
            unit_divisor: SQ_METERS_PER_SQ_KM,
            period: PeriodConfig::default(),
            missing: MissingSamplePolicy::default(),
            export: ExportConfig::default(),
        }
    }
}

/// How layer periods are derived
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum PeriodConfig {
    CalendarYear,
    Pattern { pattern: String },
}

impl Default for PeriodConfig {
    fn default() -> Self {
        PeriodConfig::CalendarYear
    }
}

/// Color ramp and value range used to render a grid
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderStyle {
    /// Built-in palette name or comma-separated hex colors
    pub palette: String,
    pub min: f64,
    pub max: f64,
}

impl RenderStyle {
    pub fn new(palette: &str, min: f64, max: f64) -> Self {
        RenderStyle { palette: palette.to_string(), min, max }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    /// File stem of the CSV table
    pub table_name: String,
    /// Periods to export as snapshot maps; empty means first and last
    pub snapshot_periods: Vec<i32>,
    pub builtup_style: RenderStyle,
    pub change_style: RenderStyle,
    pub boundary_palette: String,
    /// Boundary line width in pixels
    pub boundary_width: u32,
    /// Export the clipped multi-page stack
    pub write_stack: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            output_dir: PathBuf::from("output"),
            table_name: "GHSL_Builtup_Area_and_Growth".to_string(),
            snapshot_periods: Vec::new(),
            builtup_style: RenderStyle::new("builtup", 0.0, 1.0),
            change_style: RenderStyle::new("change", -1.0, 1.0),
            boundary_palette: "boundary".to_string(),
            boundary_width: 3,
            write_stack: true,
        }
    }
}

impl AnalysisConfig {
    /// Parse configuration from TOML text and validate it
    pub fn from_str(content: &str) -> GrowthResult<Self> {
        let config: AnalysisConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> GrowthResult<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Check value ranges, the period pattern and palette names
    pub fn validate(&self) -> GrowthResult<()> {
        if self.band.trim().is_empty() {
            return Err(GrowthError::Config("band name must not be empty".to_string()));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(GrowthError::Config(format!("scale must be positive, got {}", self.scale)));
        }
        if self.max_samples == 0 {
            return Err(GrowthError::Config("max_samples must be at least 1".to_string()));
        }
        if !self.unit_divisor.is_finite() || self.unit_divisor <= 0.0 {
            return Err(GrowthError::Config(format!(
                "unit_divisor must be positive, got {}", self.unit_divisor
            )));
        }

        self.period_rule()?;

        for style in [&self.export.builtup_style, &self.export.change_style] {
            if !(style.min < style.max) {
                return Err(GrowthError::Config(format!(
                    "palette '{}' needs min < max, got {}..{}", style.palette, style.min, style.max
                )));
            }
            Palette::resolve(&style.palette)?;
        }
        Palette::resolve(&self.export.boundary_palette)?;

        if self.export.boundary_width == 0 {
            return Err(GrowthError::Config("boundary_width must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Compiled period rule
    pub fn period_rule(&self) -> GrowthResult<PeriodRule> {
        match &self.period {
            PeriodConfig::CalendarYear => Ok(PeriodRule::CalendarYear),
            PeriodConfig::Pattern { pattern } => PeriodRule::pattern(pattern),
        }
    }
}
