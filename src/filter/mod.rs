//! Region filtering
//!
//! This module defines the filter seam used by the pipeline and the two
//! concrete filters: classification (metro-only) filtering and the mainland
//! bounds filter.

pub mod mainland;

use crate::error::Result;
use crate::models::RegionCollection;

pub use mainland::{BoundRect, MainlandFilter, retain_in_bounds};

/// Trait for objects that can filter a region collection
pub trait RegionFilter {
    /// Filter a collection, returning the retained regions
    ///
    /// # Errors
    /// Returns an error if the filter cannot be applied to the collection.
    fn filter(&self, collection: &RegionCollection) -> Result<RegionCollection>;

    /// Short description of the filter for diagnostics
    fn describe(&self) -> String;
}

/// A filter that retains regions with a matching designation code
///
/// Regions without a designation are dropped. Whether to apply this filter
/// at all is the pipeline's call: when no region in the collection carries a
/// designation, the pipeline skips the stage, mirroring the source data's
/// optional classification column.
#[derive(Debug, Clone)]
pub struct DesignationFilter {
    designation: String,
}

impl DesignationFilter {
    /// Create a filter for one designation code
    #[must_use]
    pub fn new(designation: impl Into<String>) -> Self {
        Self {
            designation: designation.into(),
        }
    }
}

impl RegionFilter for DesignationFilter {
    fn filter(&self, collection: &RegionCollection) -> Result<RegionCollection> {
        let regions = collection
            .regions
            .iter()
            .filter(|r| r.designation.as_deref() == Some(self.designation.as_str()))
            .cloned()
            .collect();
        Ok(RegionCollection::new(collection.crs, regions))
    }

    fn describe(&self) -> String {
        format!("designation == '{}'", self.designation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use crate::models::RegionGeometry;
    use geo::{MultiPolygon, polygon};

    fn region(code: &str, designation: Option<&str>) -> RegionGeometry {
        RegionGeometry {
            code: code.to_string(),
            name: None,
            designation: designation.map(str::to_string),
            geometry: MultiPolygon(vec![polygon![
                (x: 0.0, y: 0.0),
                (x: 1.0, y: 0.0),
                (x: 1.0, y: 1.0),
                (x: 0.0, y: 1.0),
                (x: 0.0, y: 0.0),
            ]]),
        }
    }

    #[test]
    fn designation_filter_keeps_only_matches() {
        let collection = RegionCollection::new(
            Crs::Wgs84,
            vec![
                region("10180", Some("M1")),
                region("10300", Some("M2")),
                region("10420", None),
            ],
        );
        let filtered = DesignationFilter::new("M1").filter(&collection).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.regions[0].code, "10180");
    }
}
