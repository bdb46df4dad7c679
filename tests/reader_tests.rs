//! GeoJSON source loading

mod common;

use geojoin::config::ReaderOptions;
use geojoin::crs::Crs;
use geojoin::error::GeoJoinError;
use geojoin::reader::{read_region_file, read_regions};

use serde_json::json;

#[test]
fn reads_polygon_features_with_attributes() {
    common::init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cbsa.geojson");
    common::write_cbsa_geojson(
        &path,
        &[
            (json!("35620"), "New York-Newark-Jersey City", "M1", -74.5, 40.0),
            (json!("31080"), "Los Angeles-Long Beach-Anaheim", "M1", -118.5, 33.5),
        ],
    );

    let collection = read_region_file(&path, &ReaderOptions::cbsa()).unwrap();

    assert_eq!(collection.crs, Crs::Wgs84);
    assert_eq!(collection.len(), 2);
    assert_eq!(collection.regions[0].code, "35620");
    assert_eq!(collection.regions[0].designation.as_deref(), Some("M1"));
    assert_eq!(
        collection.regions[0].name.as_deref(),
        Some("New York-Newark-Jersey City")
    );
}

#[test]
fn numeric_codes_are_rendered_to_strings() {
    common::init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cbsa.geojson");
    common::write_cbsa_geojson(&path, &[(json!(35620), "New York", "M1", -74.5, 40.0)]);

    let collection = read_region_file(&path, &ReaderOptions::cbsa()).unwrap();

    assert_eq!(collection.regions[0].code, "35620");
}

#[test]
fn missing_code_property_names_the_property() {
    common::init_logging();
    let fc = json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "NAME": "Nowhere" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]
            }
        }]
    });

    let err = read_regions(fc.to_string().parse().unwrap(), &ReaderOptions::cbsa()).unwrap_err();

    match err {
        GeoJoinError::MissingProperty { property, index } => {
            assert_eq!(property, "CBSAFP");
            assert_eq!(index, 0);
        }
        other => panic!("expected MissingProperty, got {other}"),
    }
}

#[test]
fn non_areal_features_are_skipped() {
    common::init_logging();
    let fc = json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "CBSAFP": "35620" },
                "geometry": { "type": "Point", "coordinates": [-74.0, 40.7] }
            },
            {
                "type": "Feature",
                "properties": { "CBSAFP": "31080" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]
                }
            }
        ]
    });

    let collection = read_regions(fc.to_string().parse().unwrap(), &ReaderOptions::cbsa()).unwrap();

    assert_eq!(collection.len(), 1);
    assert_eq!(collection.regions[0].code, "31080");
}

#[test]
fn all_non_areal_is_an_empty_collection() {
    common::init_logging();
    let fc = json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "CBSAFP": "35620" },
            "geometry": { "type": "Point", "coordinates": [-74.0, 40.7] }
        }]
    });

    let err = read_regions(fc.to_string().parse().unwrap(), &ReaderOptions::cbsa()).unwrap_err();

    assert!(matches!(err, GeoJoinError::EmptyCollection { .. }));
}

#[test]
fn missing_file_reports_path_and_purpose() {
    common::init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does_not_exist.geojson");

    let err = read_region_file(&path, &ReaderOptions::cbsa()).unwrap_err();

    match err {
        GeoJoinError::Io { path: p, .. } => assert_eq!(p, path),
        other => panic!("expected Io, got {other}"),
    }
}
