//! Topology-preserving geometry simplification
//!
//! Vertex reduction is a quality/performance trade-off: lossy and
//! one-directional. The Visvalingam-Whyatt variant used here moves no ring
//! into self-intersection and drops no polygon, so the geometry count before
//! and after is unchanged.

use geo::algorithm::SimplifyVwPreserve;

use crate::models::RegionCollection;
use crate::utils::log_stage_complete;

/// Simplify every geometry in a collection
///
/// `tolerance` is a linear tolerance in the collection's coordinate units
/// (meters in the projected CRS). It maps to the Visvalingam effective-area
/// threshold as `tolerance^2 / 2`, the area of the triangle the tolerance
/// sweeps. A tolerance of zero or less is a no-op.
#[must_use]
pub fn simplify_collection(collection: &RegionCollection, tolerance: f64) -> RegionCollection {
    if tolerance <= 0.0 {
        return collection.clone();
    }

    let epsilon = tolerance * tolerance / 2.0;
    let regions = collection
        .regions
        .iter()
        .map(|region| {
            let mut simplified = region.clone();
            simplified.geometry = region.geometry.simplify_vw_preserve(&epsilon);
            simplified
        })
        .collect();

    let out = RegionCollection::new(collection.crs, regions);
    log_stage_complete("simplify", out.len(), collection.len());
    out
}
