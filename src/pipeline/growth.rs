//! Period-over-period growth rates

use log::warn;

use crate::pipeline::time_series::TimeSeries;

/// Growth of one record relative to its predecessor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrowthRate {
    /// First record of the series; there is nothing to compare against
    Baseline,
    /// Relative change in percent
    Percent(f64),
    /// The preceding value was zero, so no rate exists
    DivisionByZero { previous_period: i32 },
    /// The quotient overflowed (predecessor too close to zero)
    NonFinite { previous_period: i32 },
}

impl GrowthRate {
    /// Rate in percent, or None when undefined
    pub fn percent(&self) -> Option<f64> {
        match self {
            GrowthRate::Percent(p) => Some(*p),
            _ => None,
        }
    }
}

/// One row of the growth table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthRecord {
    pub period: i32,
    pub value: f64,
    pub rate: GrowthRate,
}

impl GrowthRecord {
    /// Growth rate in percent; None for the first record and after a zero value
    pub fn growth_rate(&self) -> Option<f64> {
        self.rate.percent()
    }
}

/// Growth records in the order of the series they were derived from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrowthTable {
    records: Vec<GrowthRecord>,
}

impl GrowthTable {
    pub fn records(&self) -> &[GrowthRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GrowthRecord> {
        self.records.iter()
    }

    /// Record for a period
    pub fn get(&self, period: i32) -> Option<&GrowthRecord> {
        self.records.iter().find(|r| r.period == period)
    }

    /// Periods whose predecessor value was zero
    pub fn division_by_zero_periods(&self) -> Vec<i32> {
        self.records.iter()
            .filter(|r| matches!(r.rate, GrowthRate::DivisionByZero { .. }))
            .map(|r| r.period)
            .collect()
    }

    /// Periods whose growth rate is undefined for any reason other than being first
    pub fn undefined_periods(&self) -> Vec<i32> {
        self.records.iter()
            .filter(|r| matches!(r.rate, GrowthRate::DivisionByZero { .. } | GrowthRate::NonFinite { .. }))
            .map(|r| r.period)
            .collect()
    }

    /// Total change between the first and the last record, in percent
    pub fn overall_growth(&self) -> Option<f64> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        if self.records.len() < 2 || first.value == 0.0 {
            return None;
        }
        Some((last.value - first.value) / first.value * 100.0).filter(|g| g.is_finite())
    }
}

/// Derives growth rates from a time series
#[derive(Debug, Clone, Copy, Default)]
pub struct GrowthRateComputer;

impl GrowthRateComputer {
    pub fn new() -> Self {
        GrowthRateComputer
    }

    /// One record per sample, same order
    ///
    /// A zero predecessor yields `GrowthRate::DivisionByZero` and a quotient
    /// that is not finite yields `GrowthRate::NonFinite`, for that record
    /// only. No record ever carries `inf` or `NaN`.
    pub fn compute(&self, series: &TimeSeries) -> GrowthTable {
        let samples = series.samples();
        let mut records = Vec::with_capacity(samples.len());

        for (i, sample) in samples.iter().enumerate() {
            let rate = if i == 0 {
                GrowthRate::Baseline
            } else {
                let previous = &samples[i - 1];
                if previous.value == 0.0 {
                    warn!("Growth for {} undefined: value for {} is zero", sample.period, previous.period);
                    GrowthRate::DivisionByZero { previous_period: previous.period }
                } else {
                    let percent = (sample.value - previous.value) / previous.value * 100.0;
                    if percent.is_finite() {
                        GrowthRate::Percent(percent)
                    } else {
                        warn!("Growth for {} undefined: rate relative to {} is not finite", sample.period, previous.period);
                        GrowthRate::NonFinite { previous_period: previous.period }
                    }
                }
            };

            records.push(GrowthRecord {
                period: sample.period,
                value: sample.value,
                rate,
            });
        }

        GrowthTable { records }
    }
}
