//! Geometry source loading
//!
//! Loads region collections from GeoJSON. RFC 7946 fixes the coordinate
//! reference system of GeoJSON to WGS 84, so every collection read here
//! starts in `Crs::Wgs84`.

use std::io::Read;
use std::path::Path;

use geo::{MultiPolygon, Polygon};
use geojson::{Feature, GeoJson, Value};
use serde_json::Value as JsonValue;

use crate::config::ReaderOptions;
use crate::crs::Crs;
use crate::error::{GeoJoinError, Result, open_file};
use crate::models::{RegionCollection, RegionGeometry};
use crate::utils::{log_stage_complete, log_stage_start, log_warning};

/// Read a region collection from a GeoJSON file
///
/// # Errors
/// Returns an error if the file cannot be read, the GeoJSON does not parse,
/// a feature lacks the code property, or no areal features remain.
pub fn read_region_file(path: &Path, options: &ReaderOptions) -> Result<RegionCollection> {
    log_stage_start("load", &format!("{} from {}", options.source_name, path.display()));

    let mut file = open_file(path, "reading geometry source")?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|source| GeoJoinError::Io {
            path: path.to_path_buf(),
            purpose: "reading geometry source".to_string(),
            source,
        })?;

    let geojson: GeoJson = contents.parse()?;
    read_regions(geojson, options)
}

/// Convert parsed GeoJSON into a region collection
///
/// Non-areal geometries (points, lines) are skipped with a warning; the
/// source shapefiles contain only polygons, so a skip is a data-quality
/// signal rather than a fatal condition. An empty result is fatal.
///
/// # Errors
/// Returns an error if a feature lacks the code property or the collection
/// ends up with no areal features.
pub fn read_regions(geojson: GeoJson, options: &ReaderOptions) -> Result<RegionCollection> {
    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: None,
            foreign_members: None,
        }],
    };
    let total = features.len();

    let mut regions = Vec::with_capacity(total);
    let mut skipped = 0usize;
    for (index, feature) in features.into_iter().enumerate() {
        let Some(geometry) = areal_geometry(&feature)? else {
            skipped += 1;
            continue;
        };

        let code = required_string_property(&feature, &options.code_property, index)?;
        let name = options
            .name_property
            .as_deref()
            .and_then(|key| optional_string_property(&feature, key));
        let designation = options
            .designation_property
            .as_deref()
            .and_then(|key| optional_string_property(&feature, key));

        regions.push(RegionGeometry {
            code,
            name,
            designation,
            geometry,
        });
    }

    if skipped > 0 {
        log_warning(
            &format!("skipped {skipped} non-areal features"),
            Some(&options.source_name),
        );
    }

    if regions.is_empty() {
        return Err(GeoJoinError::EmptyCollection {
            name: options.source_name.clone(),
        });
    }

    log_stage_complete("load", regions.len(), total);
    Ok(RegionCollection::new(Crs::Wgs84, regions))
}

/// Extract the areal geometry of a feature, if it has one
fn areal_geometry(feature: &Feature) -> Result<Option<MultiPolygon<f64>>> {
    let Some(geometry) = &feature.geometry else {
        return Ok(None);
    };
    match &geometry.value {
        Value::Polygon(_) => {
            let polygon: Polygon<f64> = geometry.value.clone().try_into()?;
            Ok(Some(MultiPolygon(vec![polygon])))
        }
        Value::MultiPolygon(_) => {
            let multi: MultiPolygon<f64> = geometry.value.clone().try_into()?;
            Ok(Some(multi))
        }
        _ => Ok(None),
    }
}

/// Read a property that must be present and non-empty
///
/// Numeric property values are accepted and rendered to string; the upstream
/// tabular tooling produces both forms.
fn required_string_property(feature: &Feature, key: &str, index: usize) -> Result<String> {
    match property_as_string(feature, key) {
        Some(value) => Ok(value),
        None => Err(GeoJoinError::MissingProperty {
            property: key.to_string(),
            index,
        }),
    }
}

fn optional_string_property(feature: &Feature, key: &str) -> Option<String> {
    property_as_string(feature, key)
}

fn property_as_string(feature: &Feature, key: &str) -> Option<String> {
    let rendered = match feature.property(key)? {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Number(n) => n.to_string(),
        _ => return None,
    };
    if rendered.is_empty() {
        None
    } else {
        Some(rendered)
    }
}
