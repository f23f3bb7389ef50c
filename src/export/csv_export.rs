//! Growth table as CSV
//!
//! Columns `period,value,growth_rate`. An undefined growth rate is an
//! empty cell, never `inf` or `NaN`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::pipeline::errors::GrowthResult;
use crate::pipeline::growth::GrowthTable;

pub const CSV_HEADER: [&str; 3] = ["period", "value", "growth_rate"];

#[derive(Debug, Serialize)]
struct Row {
    period: i32,
    value: f64,
    growth_rate: Option<f64>,
}

/// Write the table to any writer; the header is written even for an empty table
pub fn write_growth_csv_to<W: Write>(table: &GrowthTable, writer: W) -> GrowthResult<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv.write_record(CSV_HEADER)?;
    for record in table.iter() {
        csv.serialize(Row {
            period: record.period,
            value: record.value,
            growth_rate: record.growth_rate(),
        })?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the table to a file
pub fn write_growth_csv<P: AsRef<Path>>(table: &GrowthTable, path: P) -> GrowthResult<()> {
    let file = File::create(path.as_ref())?;
    write_growth_csv_to(table, file)
}
