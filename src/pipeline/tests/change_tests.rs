//! Tests for clipping and change products

extern crate std;

use crate::pipeline::change::{clip_to_region, difference, ChangeDetector};
use crate::pipeline::errors::GrowthError;
use crate::pipeline::time_series::{AggregatedSample, TimeSeries};
use crate::region::Region;

use super::test_utils::{bbox_region, uniform_layer, BAND};

#[test]
fn test_clip_crops_to_region_window_and_masks() {
    let layer = uniform_layer("l", 2000, 4, 1.0);
    let triangle = Region::from_vertices(&[(0.0, 0.0), (400.0, 0.0), (0.0, 400.0)]).unwrap();

    let grid = clip_to_region(&layer, BAND, &triangle).unwrap();
    std::assert_eq!((grid.width, grid.height), (4, 4));
    std::assert_eq!(grid.valid_count(), 6);
    std::assert_eq!(grid.get(0, 3), Some(1.0));
    std::assert!(grid.get(3, 0).unwrap().is_nan());

    let quarter = clip_to_region(&layer, BAND, &bbox_region(200.0, 0.0, 400.0, 200.0)).unwrap();
    std::assert_eq!((quarter.width, quarter.height), (2, 2));
    std::assert_eq!(quarter.transform.origin_x, 200.0);
    std::assert_eq!(quarter.transform.origin_y, 200.0);
    std::assert_eq!(quarter.valid_count(), 4);
}

#[test]
fn test_difference_requires_same_grid() {
    let region = bbox_region(0.0, 0.0, 400.0, 400.0);
    let a = clip_to_region(&uniform_layer("a", 1975, 4, 1.0), BAND, &region).unwrap();
    let b = clip_to_region(&uniform_layer("b", 2020, 4, 3.0), BAND, &region).unwrap();

    let diff = difference(&b, &a, "change").unwrap();
    std::assert!(diff.data.iter().all(|&v| v == 2.0));

    let small = clip_to_region(&uniform_layer("c", 2020, 2, 3.0), BAND, &region).unwrap();
    std::assert!(matches!(difference(&small, &a, "x"), Err(GrowthError::GridMismatch(_))));
}

#[test]
fn test_prepare_endpoints_change_and_stack() {
    let region = bbox_region(0.0, 0.0, 400.0, 400.0);
    let l1975 = uniform_layer("a", 1975, 4, 1.0);
    let l1990 = uniform_layer("b", 1990, 4, 2.0);
    let l2020 = uniform_layer("c", 2020, 4, 5.0);
    let layers = vec![(1990, &l1990), (1975, &l1975), (2020, &l2020)];
    let series = TimeSeries::from_samples(vec![
        AggregatedSample::new(1975, 0.16),
        AggregatedSample::new(1990, 0.32),
        AggregatedSample::new(2020, 0.8),
    ]).unwrap();

    let products = ChangeDetector::new(BAND, &region).prepare(&layers, &series, &[], true).unwrap();

    let snapshot_periods: Vec<i32> = products.snapshots.iter().map(|s| s.period).collect();
    std::assert_eq!(snapshot_periods, vec![1975, 2020]);

    let change = products.change.unwrap();
    std::assert_eq!((change.first_period, change.last_period), (1975, 2020));
    std::assert!(change.grid.data.iter().all(|&v| v == 4.0));

    let stack_periods: Vec<i32> = products.stack.iter().map(|s| s.period).collect();
    std::assert_eq!(stack_periods, vec![1975, 1990, 2020]);
}

#[test]
fn test_prepare_skips_periods_not_in_series() {
    let region = bbox_region(0.0, 0.0, 400.0, 400.0);
    let l1975 = uniform_layer("a", 1975, 4, 1.0);
    let l1990 = uniform_layer("b", 1990, 4, 2.0);
    let layers = vec![(1975, &l1975), (1990, &l1990)];
    // 1990 was omitted from the series
    let series = TimeSeries::from_samples(vec![AggregatedSample::new(1975, 0.16)]).unwrap();

    let products = ChangeDetector::new(BAND, &region)
        .prepare(&layers, &series, &[1975, 1990], false)
        .unwrap();

    std::assert_eq!(products.snapshots.len(), 1);
    std::assert!(products.change.is_none());
    std::assert!(products.stack.is_empty());
}

#[test]
fn test_prepare_repeated_snapshot_periods_once() {
    let region = bbox_region(0.0, 0.0, 400.0, 400.0);
    let l1975 = uniform_layer("a", 1975, 4, 1.0);
    let l2020 = uniform_layer("b", 2020, 4, 5.0);
    let layers = vec![(1975, &l1975), (2020, &l2020)];
    let series = TimeSeries::from_samples(vec![
        AggregatedSample::new(1975, 0.16),
        AggregatedSample::new(2020, 0.8),
    ]).unwrap();

    let products = ChangeDetector::new(BAND, &region)
        .prepare(&layers, &series, &[2020, 1975, 2020, 2020], false)
        .unwrap();

    let snapshot_periods: Vec<i32> = products.snapshots.iter().map(|s| s.period).collect();
    std::assert_eq!(snapshot_periods, vec![2020, 1975]);
}

#[test]
fn test_prepare_empty_series() {
    let region = bbox_region(0.0, 0.0, 400.0, 400.0);
    let products = ChangeDetector::new(BAND, &region)
        .prepare(&[], &TimeSeries::default(), &[], true)
        .unwrap();
    std::assert!(products.snapshots.is_empty() && products.stack.is_empty() && products.change.is_none());
}
