//! Coordinate reference systems and reprojection.
//!
//! The pipeline works in two coordinate systems: geographic WGS 84
//! (EPSG:4326, degrees) for representative-point filtering, and Conus Albers
//! (EPSG:5070, meters) for simplification and output. The Albers equal-area
//! conic projection is implemented here directly with the EPSG:5070
//! parameters on the GRS 80 ellipsoid.

use geo::{Coord, MultiPolygon};
use geo::algorithm::MapCoords;
use serde::{Deserialize, Serialize};

use crate::models::RegionCollection;

/// Coordinate reference system of a geometry collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crs {
    /// Geographic WGS 84 coordinates in degrees (EPSG:4326)
    Wgs84,
    /// Conus Albers equal-area coordinates in meters (EPSG:5070)
    ConusAlbers,
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wgs84 => write!(f, "EPSG:4326"),
            Self::ConusAlbers => write!(f, "EPSG:5070"),
        }
    }
}

// GRS 80 ellipsoid
const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
const ECCENTRICITY_SQ: f64 = 0.006_694_380_022_90;

// EPSG:5070 projection parameters, degrees
const STANDARD_PARALLEL_1: f64 = 29.5;
const STANDARD_PARALLEL_2: f64 = 45.5;
const LATITUDE_OF_ORIGIN: f64 = 23.0;
const CENTRAL_MERIDIAN: f64 = -96.0;

/// Albers equal-area conic projection with the EPSG:5070 parameters
///
/// Forward maps (longitude, latitude) degrees to (x, y) meters; inverse maps
/// back. Formulas follow Snyder, "Map Projections: A Working Manual", eqs.
/// 14-12..14-21.
#[derive(Debug, Clone, Copy)]
pub struct AlbersConus {
    cone_constant: f64,
    c: f64,
    rho0: f64,
}

impl Default for AlbersConus {
    fn default() -> Self {
        Self::new()
    }
}

impl AlbersConus {
    /// Precompute the projection constants
    #[must_use]
    pub fn new() -> Self {
        let phi1 = STANDARD_PARALLEL_1.to_radians();
        let phi2 = STANDARD_PARALLEL_2.to_radians();
        let phi0 = LATITUDE_OF_ORIGIN.to_radians();

        let m1 = meridional_radius(phi1);
        let m2 = meridional_radius(phi2);
        let q0 = authalic_q(phi0);
        let q1 = authalic_q(phi1);
        let q2 = authalic_q(phi2);

        let cone_constant = (m1 * m1 - m2 * m2) / (q2 - q1);
        let c = m1 * m1 + cone_constant * q1;
        let rho0 = SEMI_MAJOR_AXIS * (c - cone_constant * q0).sqrt() / cone_constant;

        Self {
            cone_constant,
            c,
            rho0,
        }
    }

    /// Project geographic coordinates (degrees) to Albers meters
    #[must_use]
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let q = authalic_q(lat.to_radians());
        let rho = SEMI_MAJOR_AXIS * (self.c - self.cone_constant * q).sqrt() / self.cone_constant;
        let theta = self.cone_constant * (lon - CENTRAL_MERIDIAN).to_radians();
        (rho * theta.sin(), self.rho0 - rho * theta.cos())
    }

    /// Invert Albers meters back to geographic coordinates (degrees)
    #[must_use]
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let e = ECCENTRICITY_SQ.sqrt();
        let rho = (x * x + (self.rho0 - y) * (self.rho0 - y)).sqrt();
        let theta = x.atan2(self.rho0 - y);
        let q = (self.c - (rho * self.cone_constant / SEMI_MAJOR_AXIS).powi(2))
            / self.cone_constant;

        // Iterate Snyder eq. 3-16 from the spherical seed latitude
        let mut phi = (q / 2.0).clamp(-1.0, 1.0).asin();
        for _ in 0..15 {
            let sin_phi = phi.sin();
            let denom = 1.0 - ECCENTRICITY_SQ * sin_phi * sin_phi;
            let correction = (denom * denom) / (2.0 * phi.cos())
                * (q / (1.0 - ECCENTRICITY_SQ) - sin_phi / denom
                    + (1.0 / (2.0 * e)) * ((1.0 - e * sin_phi) / (1.0 + e * sin_phi)).ln());
            phi += correction;
            if correction.abs() < 1e-12 {
                break;
            }
        }

        let lon = CENTRAL_MERIDIAN + (theta / self.cone_constant).to_degrees();
        (lon, phi.to_degrees())
    }
}

fn meridional_radius(phi: f64) -> f64 {
    let sin_phi = phi.sin();
    phi.cos() / (1.0 - ECCENTRICITY_SQ * sin_phi * sin_phi).sqrt()
}

fn authalic_q(phi: f64) -> f64 {
    let e = ECCENTRICITY_SQ.sqrt();
    let sin_phi = phi.sin();
    (1.0 - ECCENTRICITY_SQ)
        * (sin_phi / (1.0 - ECCENTRICITY_SQ * sin_phi * sin_phi)
            - (1.0 / (2.0 * e)) * ((1.0 - e * sin_phi) / (1.0 + e * sin_phi)).ln())
}

/// Reproject a single multipolygon between the two supported systems
#[must_use]
pub fn reproject_geometry(
    geometry: &MultiPolygon<f64>,
    from: Crs,
    to: Crs,
) -> MultiPolygon<f64> {
    if from == to {
        return geometry.clone();
    }
    let albers = AlbersConus::new();
    match to {
        Crs::ConusAlbers => geometry.map_coords(|Coord { x, y }| {
            let (px, py) = albers.forward(x, y);
            Coord { x: px, y: py }
        }),
        Crs::Wgs84 => geometry.map_coords(|Coord { x, y }| {
            let (lon, lat) = albers.inverse(x, y);
            Coord { x: lon, y: lat }
        }),
    }
}

/// Reproject a whole collection, no-op when the CRS already matches
#[must_use]
pub fn reproject_collection(collection: &RegionCollection, to: Crs) -> RegionCollection {
    if collection.crs == to {
        return collection.clone();
    }
    let regions = collection
        .regions
        .iter()
        .map(|region| {
            let mut reprojected = region.clone();
            reprojected.geometry = reproject_geometry(&region.geometry, collection.crs, to);
            reprojected
        })
        .collect();
    RegionCollection::new(to, regions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::polygon;

    #[test]
    fn origin_projects_to_zero() {
        let albers = AlbersConus::new();
        let (x, y) = albers.forward(CENTRAL_MERIDIAN, LATITUDE_OF_ORIGIN);
        assert_relative_eq!(x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn west_of_central_meridian_is_negative_x() {
        let albers = AlbersConus::new();
        let (x_west, _) = albers.forward(-120.0, 40.0);
        let (x_east, _) = albers.forward(-75.0, 40.0);
        assert!(x_west < 0.0);
        assert!(x_east > 0.0);
    }

    #[test]
    fn round_trip_over_conus() {
        let albers = AlbersConus::new();
        let points = [
            (-122.33, 47.61),
            (-118.24, 34.05),
            (-96.0, 23.0),
            (-87.63, 41.88),
            (-74.01, 40.71),
            (-66.1, 24.5),
        ];
        for (lon, lat) in points {
            let (x, y) = albers.forward(lon, lat);
            let (lon2, lat2) = albers.inverse(x, y);
            assert_relative_eq!(lon, lon2, epsilon = 1e-6);
            assert_relative_eq!(lat, lat2, epsilon = 1e-6);
        }
    }

    #[test]
    fn reproject_same_crs_is_identity() {
        let square = polygon![
            (x: -100.0, y: 40.0),
            (x: -99.0, y: 40.0),
            (x: -99.0, y: 41.0),
            (x: -100.0, y: 41.0),
            (x: -100.0, y: 40.0),
        ];
        let mp = MultiPolygon(vec![square]);
        let out = reproject_geometry(&mp, Crs::Wgs84, Crs::Wgs84);
        assert_eq!(mp, out);
    }
}
