//! Logger utility for application-wide logging
//!
//! A file-backed logger that doubles as the `log` crate backend, so
//! library `info!`/`warn!` output and run summaries end up in the same
//! run log.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::pipeline::growth::GrowthTable;
use crate::pipeline::time_series::SkippedSample;

/// Custom logger implementation
pub struct Logger {
    /// File handle for log output
    file: Mutex<Option<File>>,
    level: Level,
}

impl Logger {
    /// Creates a new logger writing to `log_file` at Info level
    ///
    /// # Arguments
    ///
    /// * `log_file` - Path to the log file
    pub fn new<P: AsRef<Path>>(log_file: P) -> io::Result<Self> {
        let file = File::create(log_file.as_ref())?;
        Ok(Logger {
            file: Mutex::new(Some(file)),
            level: Level::Info,
        })
    }

    /// Same logger with a different maximum level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Logs a message to the log file
    ///
    /// # Arguments
    ///
    /// * `message` - The message to log
    pub fn log(&self, message: &str) -> io::Result<()> {
        let mut guard = self.file.lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        if let Some(file) = guard.as_mut() {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Logs the growth table, one line per period
    pub fn log_growth_table(&self, table: &GrowthTable) -> io::Result<()> {
        self.log("Built-up area time series:")?;

        for record in table.iter() {
            let growth = match record.growth_rate() {
                Some(rate) => format!("{:.2}%", rate),
                None => "-".to_string(),
            };
            self.log(&format!("  {}: {:.4} km², growth {}", record.period, record.value, growth))?;
        }

        let undefined = table.undefined_periods();
        if !undefined.is_empty() {
            self.log(&format!("  Growth undefined for: {:?}", undefined))?;
        }

        Ok(())
    }

    /// Logs layers that were left out of the series
    pub fn log_skipped(&self, skipped: &[SkippedSample]) -> io::Result<()> {
        for sample in skipped {
            self.log(&format!("  Skipped {} ({}): {}", sample.period, sample.label, sample.reason))?;
        }
        Ok(())
    }

    /// Static method to initialize the global logger
    pub fn init_global_logger<P: AsRef<Path>>(log_file: P, level: Level) -> io::Result<()> {
        let global_logger = Logger::new(log_file)?.with_level(level);

        if log::set_boxed_logger(Box::new(global_logger)).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(level.to_level_filter().max(LevelFilter::Error));
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}", record.level(), record.args());
            let _ = Logger::log(self, &message);

            // Also print to console
            println!("{}", message);
        }
    }

    fn flush(&self) {
        // Already flushing in the log method
    }
}
