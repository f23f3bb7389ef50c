//! Period label resolution
//!
//! Maps a layer to the integer reporting period it belongs to.

use chrono::Datelike;
use regex::Regex;

use crate::pipeline::errors::{GrowthError, GrowthResult};
use crate::raster::RasterLayer;

/// Rule for deriving a layer's period
#[derive(Debug, Clone)]
pub enum PeriodRule {
    /// UTC calendar year of the layer timestamp
    CalendarYear,
    /// First capture group (or whole match) of a regex applied to the layer label
    Pattern(Regex),
}

impl Default for PeriodRule {
    fn default() -> Self {
        PeriodRule::CalendarYear
    }
}

impl PeriodRule {
    /// Compile a label pattern rule
    pub fn pattern(pattern: &str) -> GrowthResult<Self> {
        Ok(PeriodRule::Pattern(Regex::new(pattern)?))
    }

    /// Resolve the period of a layer
    pub fn resolve(&self, layer: &RasterLayer) -> GrowthResult<i32> {
        match self {
            PeriodRule::CalendarYear => layer.timestamp()
                .map(|ts| ts.year())
                .ok_or_else(|| GrowthError::PeriodResolution {
                    label: layer.label().to_string(),
                    reason: "layer has no timestamp".to_string(),
                }),
            PeriodRule::Pattern(regex) => {
                let label = layer.label();
                let captures = regex.captures(label).ok_or_else(|| GrowthError::PeriodResolution {
                    label: label.to_string(),
                    reason: format!("label does not match pattern '{}'", regex.as_str()),
                })?;

                let text = captures.get(1)
                    .or_else(|| captures.get(0))
                    .map(|m| m.as_str())
                    .unwrap_or_default();

                text.parse::<i32>().map_err(|_| GrowthError::PeriodResolution {
                    label: label.to_string(),
                    reason: format!("'{}' is not an integer period", text),
                })
            }
        }
    }

    /// Short description for logs
    pub fn describe(&self) -> String {
        match self {
            PeriodRule::CalendarYear => "calendar year of timestamp".to_string(),
            PeriodRule::Pattern(regex) => format!("label pattern '{}'", regex.as_str()),
        }
    }
}
