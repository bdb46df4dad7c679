//! Configuration for the geo-join pipeline.

/// Which bound family the mainland filter tests representative points against
///
/// The two families are not equivalent and produce different inclusion sets;
/// the geographic set is the default because it covers the full continental
/// U.S. The filter refuses to apply bounds to a collection in the wrong
/// coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundSet {
    /// Longitude/latitude bounds in EPSG:4326 degrees
    #[default]
    Geographic,
    /// X/Y bounds in EPSG:5070 meters
    Projected,
}

/// What to substitute for regions with no matching metric record
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MissingFill {
    /// Leave the metric absent
    #[default]
    Null,
    /// Substitute a fixed sentinel value; the region still counts as
    /// unmatched in the join statistics
    Sentinel(f64),
}

/// Options for extracting region attributes from a GeoJSON source
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Label used in errors and logs for this source
    pub source_name: String,
    /// Property holding the region code; required on every feature
    pub code_property: String,
    /// Property holding the display name, if any
    pub name_property: Option<String>,
    /// Property holding the classification code, if any
    pub designation_property: Option<String>,
}

impl ReaderOptions {
    /// Attribute layout of the Census CBSA shapefile export
    #[must_use]
    pub fn cbsa() -> Self {
        Self {
            source_name: "cbsa".to_string(),
            code_property: "CBSAFP".to_string(),
            name_property: Some("NAME".to_string()),
            designation_property: Some("LSAD".to_string()),
        }
    }

    /// Attribute layout of the Census state shapefile export
    #[must_use]
    pub fn states() -> Self {
        Self {
            source_name: "states".to_string(),
            code_property: "STATEFP".to_string(),
            name_property: Some("NAME".to_string()),
            designation_property: Some("LSAD".to_string()),
        }
    }
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self::cbsa()
    }
}

/// Configuration for the geo-join pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Bound family for the mainland filter
    pub bound_set: BoundSet,
    /// Keep only regions whose designation equals `metro_designation`
    pub metro_only: bool,
    /// Designation that marks a metropolitan statistical area
    pub metro_designation: String,
    /// Simplification tolerance for region geometries, meters
    pub region_tolerance: f64,
    /// Simplification tolerance for enclosing boundaries, meters
    pub boundary_tolerance: f64,
    /// Substitution policy for regions without a metric record
    pub missing_fill: MissingFill,
    /// Reject the join when the match rate (percent) falls below this
    pub min_match_rate: Option<f64>,
    /// Count and log metric values outside [0, 1]
    pub validate_metric_range: bool,
    /// Canonical zero-padded width of a region code
    pub code_width: usize,
    /// Attribute layout of the region source
    pub region_reader: ReaderOptions,
    /// Attribute layout of the boundary source
    pub boundary_reader: ReaderOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bound_set: BoundSet::Geographic,
            metro_only: true,
            metro_designation: "M1".to_string(),
            region_tolerance: 1000.0,
            boundary_tolerance: 2000.0,
            missing_fill: MissingFill::Null,
            min_match_rate: None,
            validate_metric_range: false,
            code_width: 5,
            region_reader: ReaderOptions::cbsa(),
            boundary_reader: ReaderOptions::states(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_source_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.bound_set, BoundSet::Geographic);
        assert!(config.metro_only);
        assert_eq!(config.metro_designation, "M1");
        assert_eq!(config.region_tolerance, 1000.0);
        assert_eq!(config.boundary_tolerance, 2000.0);
        assert_eq!(config.missing_fill, MissingFill::Null);
        assert_eq!(config.code_width, 5);
        assert_eq!(config.region_reader.code_property, "CBSAFP");
    }
}
