//! Error types for the aggregation and growth pipeline

use std::fmt;
use std::io;

/// Failure to aggregate a single layer over the region
///
/// These are per-layer problems. Depending on the configured
/// missing-sample policy the time series builder either skips the
/// layer or turns this into a fatal `GrowthError::Aggregation`.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationError {
    /// The requested band does not exist on the layer
    BandNotFound(String),
    /// The region does not overlap the layer extent at all
    NoIntersection,
    /// The region overlaps the layer but every sampled pixel is nodata
    NoData,
    /// The sampling resolution is not a positive finite number
    InvalidScale(f64),
    /// The aggregated sum is infinite or NaN
    NonFiniteSum(f64),
    /// The sampling grid over the region exceeds the sample budget
    TooManySamples { samples: u64, limit: u64 },
}

impl fmt::Display for AggregationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationError::BandNotFound(band) => write!(f, "band '{}' not found on layer", band),
            AggregationError::NoIntersection => write!(f, "region does not intersect layer extent"),
            AggregationError::NoData => write!(f, "no valid pixels inside region"),
            AggregationError::InvalidScale(s) => write!(f, "invalid sampling scale: {}", s),
            AggregationError::NonFiniteSum(v) => write!(f, "aggregated sum is not finite: {}", v),
            AggregationError::TooManySamples { samples, limit } => write!(
                f, "{} samples exceed the limit of {}; use a coarser scale or raise max_samples", samples, limit
            ),
        }
    }
}

impl std::error::Error for AggregationError {}

/// Pipeline error types
#[derive(Debug)]
pub enum GrowthError {
    /// I/O error
    IoError(io::Error),
    /// A layer could not be aggregated and the run is configured to abort
    Aggregation {
        label: String,
        source: AggregationError,
    },
    /// Two layers resolved to the same period
    DuplicatePeriod {
        period: i32,
        first: String,
        second: String,
    },
    /// Two samples of a series share a period
    DuplicateSample { period: i32 },
    /// A layer's period label could not be determined
    PeriodResolution {
        label: String,
        reason: String,
    },
    /// Region geometry is empty or unusable
    InvalidRegion(String),
    /// Two layers that must share a grid do not
    GridMismatch(String),
    /// Invalid configuration value
    Config(String),
    /// CSV writer error
    Csv(csv::Error),
    /// Image encoding error
    Image(image::ImageError),
    /// GeoTIFF decoding/encoding error
    Tiff(tiff::TiffError),
    /// JSON parse/serialize error
    Json(serde_json::Error),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for GrowthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrowthError::IoError(e) => write!(f, "I/O error: {}", e),
            GrowthError::Aggregation { label, source } => {
                write!(f, "Aggregation failed for layer '{}': {}", label, source)
            }
            GrowthError::DuplicatePeriod { period, first, second } => write!(
                f,
                "Duplicate period {}: layers '{}' and '{}' resolve to the same period",
                period, first, second
            ),
            GrowthError::DuplicateSample { period } => {
                write!(f, "Duplicate period {}: a time series holds one sample per period", period)
            }
            GrowthError::PeriodResolution { label, reason } => {
                write!(f, "Cannot resolve period for layer '{}': {}", label, reason)
            }
            GrowthError::InvalidRegion(msg) => write!(f, "Invalid region: {}", msg),
            GrowthError::GridMismatch(msg) => write!(f, "Grid mismatch: {}", msg),
            GrowthError::Config(msg) => write!(f, "Configuration error: {}", msg),
            GrowthError::Csv(e) => write!(f, "CSV error: {}", e),
            GrowthError::Image(e) => write!(f, "Image error: {}", e),
            GrowthError::Tiff(e) => write!(f, "GeoTIFF error: {}", e),
            GrowthError::Json(e) => write!(f, "JSON error: {}", e),
            GrowthError::GenericError(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for GrowthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GrowthError::IoError(e) => Some(e),
            GrowthError::Aggregation { source, .. } => Some(source),
            GrowthError::Csv(e) => Some(e),
            GrowthError::Image(e) => Some(e),
            GrowthError::Tiff(e) => Some(e),
            GrowthError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for GrowthError {
    fn from(error: io::Error) -> Self {
        GrowthError::IoError(error)
    }
}

impl From<String> for GrowthError {
    fn from(msg: String) -> Self {
        GrowthError::GenericError(msg)
    }
}

impl From<csv::Error> for GrowthError {
    fn from(error: csv::Error) -> Self {
        GrowthError::Csv(error)
    }
}

impl From<image::ImageError> for GrowthError {
    fn from(error: image::ImageError) -> Self {
        GrowthError::Image(error)
    }
}

impl From<tiff::TiffError> for GrowthError {
    fn from(error: tiff::TiffError) -> Self {
        GrowthError::Tiff(error)
    }
}

impl From<serde_json::Error> for GrowthError {
    fn from(error: serde_json::Error) -> Self {
        GrowthError::Json(error)
    }
}

impl From<toml::de::Error> for GrowthError {
    fn from(error: toml::de::Error) -> Self {
        GrowthError::Config(format!("Failed to parse TOML: {}", error))
    }
}

impl From<regex::Error> for GrowthError {
    fn from(error: regex::Error) -> Self {
        GrowthError::Config(format!("Invalid period pattern: {}", error))
    }
}

/// Result type for pipeline operations
pub type GrowthResult<T> = Result<T, GrowthError>;
