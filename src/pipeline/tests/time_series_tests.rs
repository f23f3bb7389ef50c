//! Tests for time series construction

extern crate std;

use crate::pipeline::errors::{AggregationError, GrowthError};
use crate::pipeline::period::PeriodRule;
use crate::pipeline::time_series::{AggregatedSample, MissingSamplePolicy, TimeSeries, TimeSeriesBuilder};
use crate::raster::RasterLayer;

use super::test_utils::{assert_close, bbox_region, stamped_layer, FixedAggregator, BAND};

#[test]
fn test_series_sorted_regardless_of_input_order() {
    let aggregator = FixedAggregator::new(&[("b", 2_500_000.0), ("a", 2_000_000.0), ("c", 5_000_000.0)]);
    let layers = vec![stamped_layer("b", 1990), stamped_layer("a", 1975), stamped_layer("c", 2020)];

    let report = TimeSeriesBuilder::new(&aggregator, BAND)
        .build(&layers, &bbox_region(0.0, 0.0, 1.0, 1.0))
        .unwrap();

    std::assert_eq!(report.series.periods(), vec![1975, 1990, 2020]);
    let values: Vec<f64> = report.series.iter().map(|s| s.value).collect();
    std::assert_eq!(values, vec![2.0, 2.5, 5.0]);
    std::assert!(report.skipped.is_empty());
}

#[test]
fn test_unit_conversion() {
    let aggregator = FixedAggregator::new(&[("x", 5_000_000.0)]);
    let report = TimeSeriesBuilder::new(&aggregator, BAND)
        .build(&[stamped_layer("x", 2000)], &bbox_region(0.0, 0.0, 1.0, 1.0))
        .unwrap();
    std::assert_eq!(report.series.samples(), &[AggregatedSample::new(2000, 5.0)]);

    let hectares = TimeSeriesBuilder::new(&aggregator, BAND)
        .unit_divisor(1e4)
        .build(&[stamped_layer("x", 2000)], &bbox_region(0.0, 0.0, 1.0, 1.0))
        .unwrap();
    assert_close(hectares.series.samples()[0].value, 500.0);
}

#[test]
fn test_duplicate_period_is_fatal() {
    let aggregator = FixedAggregator::new(&[("a", 1.0), ("b", 2.0)]);
    let layers = vec![stamped_layer("a", 2000), stamped_layer("b", 2000)];

    let result = TimeSeriesBuilder::new(&aggregator, BAND).build(&layers, &bbox_region(0.0, 0.0, 1.0, 1.0));
    match result {
        Err(GrowthError::DuplicatePeriod { period, first, second }) => {
            std::assert_eq!(period, 2000);
            std::assert_eq!(first, "a");
            std::assert_eq!(second, "b");
        }
        other => panic!("expected DuplicatePeriod, got {:?}", other),
    }
}

#[test]
fn test_empty_input_is_empty_series() {
    let aggregator = FixedAggregator::new(&[]);
    let report = TimeSeriesBuilder::new(&aggregator, BAND)
        .build(&[], &bbox_region(0.0, 0.0, 1.0, 1.0))
        .unwrap();
    std::assert!(report.series.is_empty());
    std::assert!(report.skipped.is_empty());
}

#[test]
fn test_failed_aggregation_omitted_and_reported() {
    let aggregator = FixedAggregator::new(&[("a", 1e6), ("c", 3e6)])
        .failing("b", AggregationError::NoIntersection);
    let layers = vec![stamped_layer("a", 1975), stamped_layer("b", 1990), stamped_layer("c", 2020)];

    let report = TimeSeriesBuilder::new(&aggregator, BAND)
        .build(&layers, &bbox_region(0.0, 0.0, 1.0, 1.0))
        .unwrap();

    std::assert_eq!(report.series.periods(), vec![1975, 2020]);
    std::assert_eq!(report.skipped.len(), 1);
    std::assert_eq!(report.skipped[0].label, "b");
    std::assert_eq!(report.skipped[0].period, 1990);
    std::assert_eq!(report.skipped[0].reason, AggregationError::NoIntersection);
    std::assert_eq!(report.skipped_periods(), vec![1990]);
}

#[test]
fn test_failed_aggregation_aborts_when_configured() {
    let aggregator = FixedAggregator::new(&[("a", 1e6)]).failing("b", AggregationError::NoData);
    let layers = vec![stamped_layer("a", 1975), stamped_layer("b", 1990)];

    let result = TimeSeriesBuilder::new(&aggregator, BAND)
        .missing_policy(MissingSamplePolicy::Abort)
        .build(&layers, &bbox_region(0.0, 0.0, 1.0, 1.0));

    std::assert!(matches!(
        result,
        Err(GrowthError::Aggregation { ref label, source: AggregationError::NoData }) if label == "b"
    ));
}

#[test]
fn test_missing_band_is_an_aggregation_error() {
    let aggregator = FixedAggregator::new(&[("a", 1e6)]);
    let report = TimeSeriesBuilder::new(&aggregator, "other_band")
        .build(&[stamped_layer("a", 1975)], &bbox_region(0.0, 0.0, 1.0, 1.0))
        .unwrap();
    std::assert!(report.series.is_empty());
    std::assert_eq!(report.skipped[0].reason, AggregationError::BandNotFound("other_band".to_string()));
}

#[test]
fn test_period_from_label_pattern() {
    let aggregator = FixedAggregator::new(&[("GHS_BUILT_S_E2020", 2e6), ("GHS_BUILT_S_E1975", 1e6)]);
    let layers: Vec<RasterLayer> = ["GHS_BUILT_S_E2020", "GHS_BUILT_S_E1975"].iter()
        .map(|label| stamped_layer(label, 1900))
        .collect();

    let report = TimeSeriesBuilder::new(&aggregator, BAND)
        .period_rule(PeriodRule::pattern(r"_E(\d{4})").unwrap())
        .build(&layers, &bbox_region(0.0, 0.0, 1.0, 1.0))
        .unwrap();
    std::assert_eq!(report.series.periods(), vec![1975, 2020]);
}

#[test]
fn test_unresolvable_period_is_fatal() {
    let aggregator = FixedAggregator::new(&[("no_year_here", 1.0)]);
    let result = TimeSeriesBuilder::new(&aggregator, BAND)
        .period_rule(PeriodRule::pattern(r"(\d{4})").unwrap())
        .build(&[stamped_layer("no_year_here", 2000)], &bbox_region(0.0, 0.0, 1.0, 1.0));
    std::assert!(matches!(result, Err(GrowthError::PeriodResolution { .. })));
}

#[test]
fn test_invalid_unit_divisor_rejected() {
    let aggregator = FixedAggregator::new(&[]);
    let result = TimeSeriesBuilder::new(&aggregator, BAND)
        .unit_divisor(0.0)
        .build(&[], &bbox_region(0.0, 0.0, 1.0, 1.0));
    std::assert!(matches!(result, Err(GrowthError::Config(_))));
}

#[test]
fn test_from_samples_rejects_duplicates() {
    let result = TimeSeries::from_samples(vec![
        AggregatedSample::new(2000, 1.0),
        AggregatedSample::new(1990, 1.0),
        AggregatedSample::new(2000, 2.0),
    ]);
    std::assert!(matches!(result, Err(GrowthError::DuplicateSample { period: 2000 })));
}

#[test]
fn test_non_finite_sum_follows_missing_policy() {
    let aggregator = FixedAggregator::new(&[("a", 1e6), ("b", f64::INFINITY), ("c", f64::NAN)]);
    let layers = vec![stamped_layer("a", 2000), stamped_layer("b", 2010), stamped_layer("c", 2020)];
    let region = bbox_region(0.0, 0.0, 1.0, 1.0);

    let report = TimeSeriesBuilder::new(&aggregator, BAND).build(&layers, &region).unwrap();
    std::assert_eq!(report.series.periods(), vec![2000]);
    std::assert_eq!(report.skipped_periods(), vec![2010, 2020]);
    std::assert!(matches!(report.skipped[0].reason, AggregationError::NonFiniteSum(v) if v.is_infinite()));

    let result = TimeSeriesBuilder::new(&aggregator, BAND)
        .missing_policy(MissingSamplePolicy::Abort)
        .build(&layers, &region);
    std::assert!(matches!(
        result,
        Err(GrowthError::Aggregation { source: AggregationError::NonFiniteSum(_), .. })
    ));
}
