//! Unit tests for the aggregation and growth pipeline

mod test_utils;
mod time_series_tests;
mod change_tests;
