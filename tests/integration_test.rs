//! End-to-end tests: GeoTIFFs on disk through analysis and export

extern crate std;

use std::fs;
use std::path::Path;

use urbangrowth::config::{AnalysisConfig, PeriodConfig};
use urbangrowth::coordinate::{BoundingBox, GeoTransform};
use urbangrowth::export::{AOI_FILE, BOUNDARY_FILE, STACK_FILE};
use urbangrowth::pipeline::{AggregationError, GrowthError, MissingSamplePolicy};
use urbangrowth::raster::geotiff;
use urbangrowth::raster::ScalarGrid;
use urbangrowth::region::{read_geojson, Region};
use urbangrowth::UrbanGrowth;

const SIDE: usize = 40;
const PIXEL: f64 = 100.0;

/// 40x40 grid of 100 m pixels covering (0,0)-(4000,4000), uniform value
fn write_layer(path: &Path, value: f64) {
    let transform = GeoTransform::new(0.0, SIDE as f64 * PIXEL, PIXEL, -PIXEL);
    let mut grid = ScalarGrid::empty("layer", transform, SIDE, SIDE);
    grid.data = vec![value; SIDE * SIDE];
    geotiff::write_grid(&grid, path).unwrap();
}

fn full_region() -> Region {
    Region::from_bbox(&BoundingBox::new(0.0, 0.0, SIDE as f64 * PIXEL, SIDE as f64 * PIXEL)).unwrap()
}

/// Catalog with 1990, 1975, 2020 in that order; sums 2.5e6, 2e6, 5e6 m²
fn write_catalog(dir: &Path) -> std::path::PathBuf {
    write_layer(&dir.join("built_1990.tif"), 1562.5);
    write_layer(&dir.join("built_1975.tif"), 1250.0);
    write_layer(&dir.join("built_2020.tif"), 3125.0);

    let catalog = dir.join("catalog.toml");
    fs::write(&catalog, r#"
name = "GHS_BUILT_S"
band = "built_surface"

[[layers]]
path = "built_1990.tif"
timestamp = "1990-01-01T00:00:00Z"

[[layers]]
path = "built_1975.tif"
time_start = 157766400000

[[layers]]
path = "built_2020.tif"
timestamp = "2020-01-01T00:00:00Z"
"#).unwrap();
    catalog
}

fn app(dir: &Path, config: AnalysisConfig) -> UrbanGrowth {
    let log = dir.join("run.log");
    UrbanGrowth::new(Some(log.to_str().unwrap()), config).unwrap()
}

#[test]
fn test_catalog_to_growth_table() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());
    let app = app(dir.path(), AnalysisConfig::default());

    let layers = app.load_layers(&catalog).unwrap();
    std::assert_eq!(layers.len(), 3);

    let run = app.analyze(&layers, &full_region()).unwrap();
    std::assert_eq!(run.report.series.periods(), vec![1975, 1990, 2020]);
    std::assert!(run.report.skipped.is_empty());

    let rows: Vec<(i32, f64, Option<f64>)> = run.table.iter()
        .map(|r| (r.period, r.value, r.growth_rate()))
        .collect();
    std::assert_eq!(rows, vec![
        (1975, 2.0, None),
        (1990, 2.5, Some(25.0)),
        (2020, 5.0, Some(100.0)),
    ]);

    let log = fs::read_to_string(dir.path().join("run.log")).unwrap();
    std::assert!(log.contains("1990: 2.5000 km², growth 25.00%"));
}

#[test]
fn test_export_writes_all_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());
    let out = dir.path().join("out");
    let app = app(dir.path(), AnalysisConfig::default());

    let layers = app.load_layers(&catalog).unwrap();
    let region = full_region();
    let run = app.analyze(&layers, &region).unwrap();
    let written = app.export(&layers, &region, &run, Some(&out)).unwrap();

    let expected = [
        "GHSL_Builtup_Area_and_Growth.csv",
        "builtup_1975.tif",
        "builtup_1975.png",
        "builtup_2020.tif",
        "builtup_2020.png",
        "builtup_change_1975_2020.tif",
        "builtup_change_1975_2020.png",
        STACK_FILE,
        AOI_FILE,
        BOUNDARY_FILE,
    ];
    std::assert_eq!(written.len(), expected.len());
    for name in expected {
        std::assert!(out.join(name).is_file(), "missing {}", name);
    }

    let csv = fs::read_to_string(out.join("GHSL_Builtup_Area_and_Growth.csv")).unwrap();
    std::assert_eq!(csv, "period,value,growth_rate\n1975,2.0,\n1990,2.5,25.0\n2020,5.0,100.0\n");

    let change = geotiff::read_band(out.join("builtup_change_1975_2020.tif")).unwrap();
    std::assert_eq!((change.width, change.height), (SIDE, SIDE));
    std::assert_eq!(change.data[0], 1875.0);

    let aoi = read_geojson(out.join(AOI_FILE)).unwrap();
    std::assert_eq!(aoi.bounds(), region.bounds());
}

#[test]
fn test_directory_with_period_pattern() {
    let dir = tempfile::tempdir().unwrap();
    write_layer(&dir.path().join("GHS_BUILT_S_E2000.tif"), 0.0);
    write_layer(&dir.path().join("GHS_BUILT_S_E2010.tif"), 1875.0);

    let config = AnalysisConfig {
        period: PeriodConfig::Pattern { pattern: r"E(\d{4})".to_string() },
        ..AnalysisConfig::default()
    };
    let app = app(dir.path(), config);

    let layers = app.load_layers(dir.path()).unwrap();
    let run = app.analyze(&layers, &full_region()).unwrap();

    std::assert_eq!(run.report.series.periods(), vec![2000, 2010]);
    std::assert_eq!(run.table.records()[1].value, 3.0);
    std::assert_eq!(run.table.records()[1].growth_rate(), None);
    std::assert_eq!(run.table.division_by_zero_periods(), vec![2010]);
}

#[test]
fn test_missing_sample_policies() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write_catalog(dir.path());
    // Covers only the western half of the grid
    let west = Region::from_bbox(&BoundingBox::new(-5000.0, 0.0, 2000.0, 4000.0)).unwrap();
    // Entirely outside the layers
    let away = Region::from_bbox(&BoundingBox::new(10_000.0, 10_000.0, 12_000.0, 12_000.0)).unwrap();

    let omit = app(dir.path(), AnalysisConfig::default());
    let layers = omit.load_layers(&catalog).unwrap();

    let run = omit.analyze(&layers, &west).unwrap();
    std::assert_eq!(run.table.records()[0].value, 1.0);

    let run = omit.analyze(&layers, &away).unwrap();
    std::assert!(run.table.is_empty());
    std::assert_eq!(run.report.skipped_periods(), vec![1975, 1990, 2020]);

    let abort = app(dir.path(), AnalysisConfig {
        missing: MissingSamplePolicy::Abort,
        ..AnalysisConfig::default()
    });
    match abort.analyze(&layers, &away) {
        Err(GrowthError::Aggregation { source, .. }) => {
            std::assert_eq!(source, AggregationError::NoIntersection)
        }
        other => panic!("expected aggregation error, got {:?}", other),
    }
}

#[test]
fn test_duplicate_period_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_layer(&dir.path().join("a.tif"), 1.0);
    write_layer(&dir.path().join("b.tif"), 2.0);
    let catalog = dir.path().join("catalog.toml");
    fs::write(&catalog, r#"
[[layers]]
path = "a.tif"
timestamp = "2000-01-01T00:00:00Z"

[[layers]]
path = "b.tif"
timestamp = "2000-06-01T00:00:00Z"
"#).unwrap();

    let app = app(dir.path(), AnalysisConfig::default());
    let layers = app.load_layers(&catalog).unwrap();
    match app.analyze(&layers, &full_region()) {
        Err(GrowthError::DuplicatePeriod { period, first, second }) => {
            std::assert_eq!(period, 2000);
            std::assert_eq!((first.as_str(), second.as_str()), ("a", "b"));
        }
        other => panic!("expected duplicate period, got {:?}", other),
    }
}
