//! Great-circle distance math for radius matching.

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Radii (miles) tried in order when a search comes up empty, smallest first.
pub const RADIUS_EXPANSION_SEQUENCE: [f64; 7] = [1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 500.0];

/// Largest radius the expansion sequence will ever reach.
pub const MAX_EXPANSION_RADIUS_MILES: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Haversine great-circle distance between two points, in miles.
///
/// Inputs are decimal degrees. No range validation happens here; callers are
/// expected to have validated coordinates at the request boundary.
#[must_use]
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_MILES * c
}

/// True when `business` lies within `radius_miles` of `search`.
///
/// The boundary is inclusive: a point exactly at the radius counts.
#[must_use]
pub fn is_within_radius(business: GeoPoint, search: GeoPoint, radius_miles: f64) -> bool {
    haversine_distance(business, search) <= radius_miles
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOS_ANGELES: GeoPoint = GeoPoint {
        lat: 34.0522,
        lng: -118.2437,
    };
    const SAN_FRANCISCO: GeoPoint = GeoPoint {
        lat: 37.7749,
        lng: -122.4194,
    };
    const NEW_YORK: GeoPoint = GeoPoint {
        lat: 40.7128,
        lng: -74.0060,
    };

    #[test]
    fn distance_between_identical_points_is_zero() {
        for point in [LOS_ANGELES, NEW_YORK, GeoPoint { lat: 0.0, lng: 0.0 }] {
            assert!(haversine_distance(point, point).abs() < 0.01);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine_distance(LOS_ANGELES, NEW_YORK);
        let ba = haversine_distance(NEW_YORK, LOS_ANGELES);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn la_to_sf_is_about_347_miles() {
        let d = haversine_distance(LOS_ANGELES, SAN_FRANCISCO);
        assert!((d - 347.0).abs() < 10.0, "got {d}");
    }

    #[test]
    fn nyc_to_la_is_about_2445_miles() {
        let d = haversine_distance(NEW_YORK, LOS_ANGELES);
        assert!((d - 2445.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        let d = haversine_distance(LOS_ANGELES, SAN_FRANCISCO);
        assert!(is_within_radius(SAN_FRANCISCO, LOS_ANGELES, d));
        assert!(!is_within_radius(SAN_FRANCISCO, LOS_ANGELES, d - 0.01));
    }

    #[test]
    fn radius_membership_is_monotonic() {
        let d = haversine_distance(LOS_ANGELES, SAN_FRANCISCO);
        for extra in [0.0, 1.0, 50.0, 2000.0] {
            assert!(is_within_radius(SAN_FRANCISCO, LOS_ANGELES, d + extra));
        }
    }

    #[test]
    fn tolerates_poles_antipodes_and_meridian() {
        let north_pole = GeoPoint { lat: 90.0, lng: 0.0 };
        let south_pole = GeoPoint { lat: -90.0, lng: 0.0 };
        let half_circumference = EARTH_RADIUS_MILES * std::f64::consts::PI;
        let pole_to_pole = haversine_distance(north_pole, south_pole);
        assert!((pole_to_pole - half_circumference).abs() < 1.0);

        // Two points straddling the ±180° meridian are close, not half a world apart.
        let west = GeoPoint {
            lat: 0.0,
            lng: 179.9,
        };
        let east = GeoPoint {
            lat: 0.0,
            lng: -179.9,
        };
        assert!(haversine_distance(west, east) < 20.0);
    }
}
