//! Mainland bounds filtering
//!
//! Retains geometries whose representative interior point falls inside a
//! fixed rectangle. Two bound families exist in the source data, one in
//! EPSG:4326 degrees and one in EPSG:5070 meters; they are not equivalent,
//! so the filter refuses to test bounds against a collection in a different
//! coordinate system.

use geo::Point;
use geo::algorithm::{Centroid, InteriorPoint};

use crate::config::BoundSet;
use crate::crs::Crs;
use crate::error::{GeoJoinError, Result};
use crate::models::{RegionCollection, RegionGeometry};
use crate::utils::log_warning;

use super::RegionFilter;

/// An axis-aligned rectangle in the coordinate space of one CRS
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundRect {
    /// CRS the bounds are expressed in
    pub crs: Crs,
    /// Minimum x (longitude or easting)
    pub min_x: f64,
    /// Maximum x
    pub max_x: f64,
    /// Minimum y (latitude or northing)
    pub min_y: f64,
    /// Maximum y
    pub max_y: f64,
}

impl BoundRect {
    /// Mainland bounds in EPSG:4326 degrees
    #[must_use]
    pub fn mainland_geographic() -> Self {
        Self {
            crs: Crs::Wgs84,
            min_x: -125.0,
            max_x: -66.0,
            min_y: 24.0,
            max_y: 50.0,
        }
    }

    /// Wider geographic fallback bounds
    #[must_use]
    pub fn mainland_geographic_wide() -> Self {
        Self {
            crs: Crs::Wgs84,
            min_x: -130.0,
            max_x: -60.0,
            min_y: 18.0,
            max_y: 55.0,
        }
    }

    /// Mainland bounds in EPSG:5070 meters
    #[must_use]
    pub fn mainland_projected() -> Self {
        Self {
            crs: Crs::ConusAlbers,
            min_x: -2_500_000.0,
            max_x: -1_000_000.0,
            min_y: 1_000_000.0,
            max_y: 3_000_000.0,
        }
    }

    /// Wider projected fallback bounds
    #[must_use]
    pub fn mainland_projected_wide() -> Self {
        Self {
            crs: Crs::ConusAlbers,
            min_x: -3_000_000.0,
            max_x: -500_000.0,
            min_y: 500_000.0,
            max_y: 3_500_000.0,
        }
    }

    /// Whether a point lies inside the rectangle (edges inclusive)
    #[must_use]
    pub fn contains(&self, point: Point<f64>) -> bool {
        point.x() >= self.min_x
            && point.x() <= self.max_x
            && point.y() >= self.min_y
            && point.y() <= self.max_y
    }
}

/// A filter that retains geometries whose representative point is in bounds
///
/// When the primary bounds reject every geometry and a fallback is
/// configured, the filter retries once with the fallback. This is a
/// defensive guard against an empty result, not a correctness guarantee.
#[derive(Debug, Clone)]
pub struct MainlandFilter {
    primary: BoundRect,
    fallback: Option<BoundRect>,
}

impl MainlandFilter {
    /// Create a filter from explicit bounds
    #[must_use]
    pub fn new(primary: BoundRect, fallback: Option<BoundRect>) -> Self {
        Self { primary, fallback }
    }

    /// The standard filter for a bound family, fallback included
    #[must_use]
    pub fn for_bound_set(bound_set: BoundSet) -> Self {
        match bound_set {
            BoundSet::Geographic => Self::new(
                BoundRect::mainland_geographic(),
                Some(BoundRect::mainland_geographic_wide()),
            ),
            BoundSet::Projected => Self::new(
                BoundRect::mainland_projected(),
                Some(BoundRect::mainland_projected_wide()),
            ),
        }
    }

    /// CRS the filter's bounds are expressed in
    #[must_use]
    pub fn crs(&self) -> Crs {
        self.primary.crs
    }

    /// Filter a collection and report which bounds were settled on
    ///
    /// # Errors
    /// Returns `CrsMismatch` if the collection is in a different CRS, or
    /// `EmptyAfterFilter` if the fallback bounds also reject everything.
    pub fn filter_with_outcome(
        &self,
        collection: &RegionCollection,
    ) -> Result<(RegionCollection, BoundRect)> {
        let retained = retain_in_bounds(collection, &self.primary)?;
        if !retained.is_empty() {
            return Ok((retained, self.primary));
        }

        if let Some(fallback) = self.fallback {
            log_warning(
                "no geometries in primary mainland bounds, retrying with wider bounds",
                Some("mainland"),
            );
            let retained = retain_in_bounds(collection, &fallback)?;
            if !retained.is_empty() {
                return Ok((retained, fallback));
            }
        }

        Err(GeoJoinError::EmptyAfterFilter {
            stage: "mainland".to_string(),
        })
    }
}

/// Retain the regions whose representative point lies inside `bounds`
///
/// # Errors
/// Returns `CrsMismatch` if the collection is in a different CRS than the
/// bounds.
pub fn retain_in_bounds(
    collection: &RegionCollection,
    bounds: &BoundRect,
) -> Result<RegionCollection> {
    if collection.crs != bounds.crs {
        return Err(GeoJoinError::CrsMismatch {
            expected: bounds.crs,
            found: collection.crs,
        });
    }

    let regions = collection
        .regions
        .iter()
        .filter(|region| representative_point(region).is_some_and(|point| bounds.contains(point)))
        .cloned()
        .collect();
    Ok(RegionCollection::new(collection.crs, regions))
}

impl RegionFilter for MainlandFilter {
    fn filter(&self, collection: &RegionCollection) -> Result<RegionCollection> {
        self.filter_with_outcome(collection).map(|(c, _)| c)
    }

    fn describe(&self) -> String {
        format!(
            "representative point in [{}, {}] x [{}, {}] ({})",
            self.primary.min_x, self.primary.max_x, self.primary.min_y, self.primary.max_y,
            self.primary.crs
        )
    }
}

/// One interior point per geometry, centroid as the degenerate fallback
fn representative_point(region: &RegionGeometry) -> Option<Point<f64>> {
    region
        .geometry
        .interior_point()
        .or_else(|| region.geometry.centroid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{MultiPolygon, polygon};

    fn square_at(code: &str, x: f64, y: f64) -> RegionGeometry {
        RegionGeometry {
            code: code.to_string(),
            name: None,
            designation: None,
            geometry: MultiPolygon(vec![polygon![
                (x: x, y: y),
                (x: x + 1.0, y: y),
                (x: x + 1.0, y: y + 1.0),
                (x: x, y: y + 1.0),
                (x: x, y: y),
            ]]),
        }
    }

    #[test]
    fn contains_is_edge_inclusive() {
        let bounds = BoundRect::mainland_geographic();
        assert!(bounds.contains(Point::new(-125.0, 24.0)));
        assert!(bounds.contains(Point::new(-66.0, 50.0)));
        assert!(!bounds.contains(Point::new(-65.9, 40.0)));
    }

    #[test]
    fn mainland_filter_rejects_crs_mismatch() {
        let collection = RegionCollection::new(Crs::ConusAlbers, vec![square_at("a", 0.0, 0.0)]);
        let filter = MainlandFilter::for_bound_set(BoundSet::Geographic);
        let err = filter.filter(&collection).unwrap_err();
        assert!(matches!(err, GeoJoinError::CrsMismatch { .. }));
    }

    #[test]
    fn mainland_filter_drops_outlying_regions() {
        // Anchorage-ish and Denver-ish representative points
        let collection = RegionCollection::new(
            Crs::Wgs84,
            vec![square_at("alaska", -150.0, 61.0), square_at("denver", -105.0, 39.0)],
        );
        let filter = MainlandFilter::for_bound_set(BoundSet::Geographic);
        let filtered = filter.filter(&collection).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.regions[0].code, "denver");
    }

    #[test]
    fn mainland_filter_is_idempotent() {
        let collection = RegionCollection::new(
            Crs::Wgs84,
            vec![square_at("a", -100.0, 40.0), square_at("b", -90.0, 35.0)],
        );
        let filter = MainlandFilter::for_bound_set(BoundSet::Geographic);
        let once = filter.filter(&collection).unwrap();
        let twice = filter.filter(&once).unwrap();
        assert_eq!(once, twice);
    }
}
