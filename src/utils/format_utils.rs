//! Console formatting utilities
//!
//! Renders the growth table as fixed-width text with a proportional
//! bar column for the area values.

use crate::pipeline::growth::GrowthTable;

/// Width of the longest bar, in characters
pub const BAR_WIDTH: usize = 40;

/// Formats an optional growth rate, `-` when undefined
pub fn format_growth(rate: Option<f64>) -> String {
    match rate {
        Some(r) => format!("{:+.2}%", r),
        None => "-".to_string(),
    }
}

/// Bar proportional to `value / max`
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if !(max > 0.0) || !(value > 0.0) {
        return String::new();
    }
    let len = ((value / max) * width as f64).round() as usize;
    "#".repeat(len.min(width))
}

/// Formats the whole table
///
/// # Arguments
/// * `table` - The growth table to print
/// * `unit` - Unit label for the value column
///
/// # Returns
/// The table as a multi-line string, header included
pub fn format_growth_table(table: &GrowthTable, unit: &str) -> String {
    let max = table.iter().map(|r| r.value).fold(0.0_f64, f64::max);
    let value_header = format!("Area ({})", unit);

    let mut out = format!("{:<8} {:>14} {:>10}  {}\n", "Period", value_header, "Growth", "");
    out.push_str(&format!("{}\n", "-".repeat(8 + 1 + 14 + 1 + 10 + 2 + BAR_WIDTH)));

    for record in table.iter() {
        out.push_str(&format!(
            "{:<8} {:>14.4} {:>10}  {}\n",
            record.period,
            record.value,
            format_growth(record.growth_rate()),
            bar(record.value, max, BAR_WIDTH)
        ));
    }

    if let Some(total) = table.overall_growth() {
        out.push_str(&format!("Overall growth: {}\n", format_growth(Some(total))));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::growth::GrowthRateComputer;
    use crate::pipeline::time_series::{AggregatedSample, TimeSeries};

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(5.0, 5.0, 10), "##########");
        assert_eq!(bar(2.5, 5.0, 10), "#####");
        assert_eq!(bar(0.0, 5.0, 10), "");
        assert_eq!(bar(1.0, 0.0, 10), "");
    }

    #[test]
    fn test_table_rows() {
        let series = TimeSeries::from_samples(vec![
            AggregatedSample::new(1975, 2.0),
            AggregatedSample::new(2020, 5.0),
        ]).unwrap();
        let table = GrowthRateComputer::new().compute(&series);
        let text = format_growth_table(&table, "km²");

        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("Period"));
        assert!(lines[2].starts_with("1975"));
        assert!(lines[2].contains(" -"));
        assert!(lines[3].contains("+150.00%"));
        assert!(lines[3].ends_with(&"#".repeat(BAR_WIDTH)));
        assert!(text.contains("Overall growth: +150.00%"));
    }
}
