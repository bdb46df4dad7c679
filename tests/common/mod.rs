//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use geo::{MultiPolygon, polygon};

use geojoin::crs::Crs;
use geojoin::models::{RegionCollection, RegionGeometry};

/// Initialize test logging once per process
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A 1-degree (or 1-unit) square with its lower-left corner at (x, y)
pub fn square(x: f64, y: f64, side: f64) -> MultiPolygon<f64> {
    MultiPolygon(vec![polygon![
        (x: x, y: y),
        (x: x + side, y: y),
        (x: x + side, y: y + side),
        (x: x, y: y + side),
        (x: x, y: y),
    ]])
}

/// A region with a square geometry
pub fn region(code: &str, designation: Option<&str>, x: f64, y: f64, side: f64) -> RegionGeometry {
    RegionGeometry {
        code: code.to_string(),
        name: None,
        designation: designation.map(str::to_string),
        geometry: square(x, y, side),
    }
}

/// A CBSA-like mainland collection in WGS 84
///
/// Three metro squares (New York-ish, Los Angeles-ish, Chicago-ish), one
/// micropolitan square, and one Anchorage-ish square outside the mainland
/// bounds.
pub fn cbsa_like_collection() -> RegionCollection {
    RegionCollection::new(
        Crs::Wgs84,
        vec![
            region("35620", Some("M1"), -74.5, 40.0, 1.0),
            region("31080", Some("M1"), -118.5, 33.5, 1.0),
            region("16980", Some("M1"), -88.0, 41.5, 1.0),
            region("10300", Some("M2"), -98.0, 38.0, 1.0),
            region("11260", Some("M1"), -150.0, 61.0, 1.0),
        ],
    )
}

/// A state-boundary-like collection in WGS 84
pub fn boundary_collection() -> RegionCollection {
    RegionCollection::new(
        Crs::Wgs84,
        vec![
            region("36", None, -75.0, 39.5, 2.0),
            region("06", None, -119.0, 33.0, 2.0),
        ],
    )
}

/// Write a GeoJSON FeatureCollection of square CBSA-like features
///
/// Each entry is (code value as JSON, name, lsad, x, y).
pub fn write_cbsa_geojson(path: &Path, entries: &[(serde_json::Value, &str, &str, f64, f64)]) {
    let features: Vec<serde_json::Value> = entries
        .iter()
        .map(|(code, name, lsad, x, y)| {
            serde_json::json!({
                "type": "Feature",
                "properties": { "CBSAFP": code, "NAME": name, "LSAD": lsad },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [x, y],
                        [x + 1.0, y],
                        [x + 1.0, y + 1.0],
                        [x, y + 1.0],
                        [x, y],
                    ]]
                }
            })
        })
        .collect();
    let fc = serde_json::json!({ "type": "FeatureCollection", "features": features });
    std::fs::write(path, fc.to_string()).expect("write geojson fixture");
}

/// Build a two-column metric record batch
pub fn metric_batch(code_column: &str, value_column: &str, rows: &[(&str, f64)]) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new(code_column, DataType::Utf8, false),
        Field::new(value_column, DataType::Float64, true),
    ]));
    let codes = StringArray::from(rows.iter().map(|(c, _)| *c).collect::<Vec<_>>());
    let values = Float64Array::from(rows.iter().map(|(_, v)| *v).collect::<Vec<_>>());
    RecordBatch::try_new(schema, vec![Arc::new(codes), Arc::new(values)])
        .expect("build metric batch")
}

/// Write a metric record batch to a parquet file
pub fn write_metric_parquet(path: &Path, batch: &RecordBatch) {
    let file = std::fs::File::create(path).expect("create parquet fixture");
    let mut writer = parquet::arrow::ArrowWriter::try_new(file, batch.schema(), None)
        .expect("open parquet writer");
    writer.write(batch).expect("write parquet fixture");
    writer.close().expect("close parquet fixture");
}
