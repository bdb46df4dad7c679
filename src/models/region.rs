//! Region geometry entities
//!
//! A region is one areal record from a vector source: a CBSA polygon, a
//! state boundary, or any comparable unit keyed by a fixed-width code.

use geo::MultiPolygon;

use crate::crs::Crs;

/// One areal feature from a geometry source
///
/// Immutable after load, except that simplification and reprojection replace
/// the geometry wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionGeometry {
    /// Region code as stored in the source (e.g. CBSAFP), unnormalized
    pub code: String,
    /// Human-readable name, when the source carries one
    pub name: Option<String>,
    /// Classification code (e.g. LSAD), used to filter to metro-only records
    pub designation: Option<String>,
    /// Areal geometry
    pub geometry: MultiPolygon<f64>,
}

/// A snapshot of one geometry source
///
/// All regions in a collection share one coordinate reference system.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionCollection {
    /// Coordinate reference system of every geometry in `regions`
    pub crs: Crs,
    /// The areal features
    pub regions: Vec<RegionGeometry>,
}

impl RegionCollection {
    /// Create a collection from parts
    #[must_use]
    pub fn new(crs: Crs, regions: Vec<RegionGeometry>) -> Self {
        Self { crs, regions }
    }

    /// Number of regions in the collection
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the collection holds no regions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Whether any region carries a designation code
    #[must_use]
    pub fn has_designations(&self) -> bool {
        self.regions.iter().any(|r| r.designation.is_some())
    }
}

/// A region geometry combined with at most one metric record
///
/// `metric` is the render-ready value: `None` means "no data for this
/// region" unless a sentinel fill was configured, in which case `metric`
/// holds the sentinel and `matched` stays false.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRegion {
    /// The region geometry, passed through unchanged
    pub region: RegionGeometry,
    /// The joined metric value, if any
    pub metric: Option<f64>,
    /// Whether a metric record actually matched this region's code
    pub matched: bool,
}

impl JoinedRegion {
    /// Whether this region carries a real (non-fill) metric value
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.matched
    }
}
