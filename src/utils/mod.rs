//! Utility modules for common functionality
//!
//! Logging, progress reporting and console formatting used by the
//! pipeline and the CLI.

pub mod logger;
pub(crate) mod progress;
pub mod format_utils;
