//! Radius expansion: escalate the search radius through a fixed sequence
//! until at least one business matches, and record the trace.

use std::collections::HashSet;

use crate::business::Business;
use crate::geo::{
    haversine_distance, GeoPoint, MAX_EXPANSION_RADIUS_MILES, RADIUS_EXPANSION_SEQUENCE,
};

/// A business that fell inside a search radius, with its derived distance.
///
/// Distance is carried for downstream consumers; the expansion itself never
/// sorts by it — matches keep their scan order.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatch {
    pub business: Business,
    pub distance_miles: f64,
}

/// Outcome of one radius-expansion run.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusExpansion {
    pub matches: Vec<DistanceMatch>,
    /// Radius at which matching stopped, or 500.0 when the sequence ran out.
    pub radius_used: f64,
    /// True when any radius beyond the initial one was scanned.
    pub expanded: bool,
    /// Every radius scanned, in the order it was tried (always ascending).
    pub radii_tried: Vec<f64>,
}

/// Scan `businesses` for records within `radius_miles` of `point`.
///
/// Input order is preserved; each match carries its computed distance.
#[must_use]
pub fn matches_within_radius(
    businesses: &[Business],
    point: GeoPoint,
    radius_miles: f64,
) -> Vec<DistanceMatch> {
    businesses
        .iter()
        .filter_map(|business| {
            let distance_miles = haversine_distance(business.point(), point);
            (distance_miles <= radius_miles).then(|| DistanceMatch {
                business: business.clone(),
                distance_miles,
            })
        })
        .collect()
}

/// Single-point radius expansion.
///
/// Equivalent to [`expand_radius_multi`] with one point: the cross-point
/// union and dedup degenerate to a plain scan.
#[must_use]
pub fn expand_radius(
    businesses: &[Business],
    point: GeoPoint,
    initial_radius: f64,
) -> RadiusExpansion {
    expand_radius_multi(businesses, &[point], initial_radius)
}

/// Multi-point radius expansion.
///
/// The initial radius is scanned first; if the union of matches across all
/// points (deduplicated by id, first-seen order) is empty, the fixed
/// [`RADIUS_EXPANSION_SEQUENCE`] is walked in ascending order, skipping any
/// step `<=` the initial radius. A step succeeds as soon as the unioned set
/// at that radius is non-empty — expansion is global across points, not
/// per-point. Exhausting the sequence returns an empty match set with
/// `radius_used = 500.0`.
#[must_use]
pub fn expand_radius_multi(
    businesses: &[Business],
    points: &[GeoPoint],
    initial_radius: f64,
) -> RadiusExpansion {
    let mut radii_tried = vec![initial_radius];

    let matches = scan_points(businesses, points, initial_radius);
    if !matches.is_empty() {
        return RadiusExpansion {
            matches,
            radius_used: initial_radius,
            expanded: false,
            radii_tried,
        };
    }

    for radius in RADIUS_EXPANSION_SEQUENCE {
        if radius <= initial_radius {
            continue;
        }
        radii_tried.push(radius);
        let matches = scan_points(businesses, points, radius);
        if !matches.is_empty() {
            return RadiusExpansion {
                matches,
                radius_used: radius,
                expanded: true,
                radii_tried,
            };
        }
    }

    RadiusExpansion {
        matches: Vec::new(),
        radius_used: MAX_EXPANSION_RADIUS_MILES,
        expanded: true,
        radii_tried,
    }
}

/// Union of per-point scans at one radius, deduplicated by business id.
/// First-seen order wins: all of the first point's matches come first.
fn scan_points(businesses: &[Business], points: &[GeoPoint], radius_miles: f64) -> Vec<DistanceMatch> {
    let mut seen = HashSet::new();
    let mut unioned = Vec::new();
    for point in points {
        for entry in matches_within_radius(businesses, *point, radius_miles) {
            if seen.insert(entry.business.id) {
                unioned.push(entry);
            }
        }
    }
    unioned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn business(id: i64, name: &str, lat: f64, lng: f64) -> Business {
        Business {
            id,
            name: name.to_string(),
            city: "Testville".to_string(),
            state: "KS".to_string(),
            latitude: lat,
            longitude: lng,
        }
    }

    // One degree of latitude is ~69 miles, so 1.3° ≈ 90 miles.
    const ORIGIN: GeoPoint = GeoPoint {
        lat: 40.0,
        lng: -100.0,
    };

    #[test]
    fn match_at_requested_radius_does_not_expand() {
        let store = vec![business(1, "At Origin", 40.0, -100.0)];
        let result = expand_radius(&store, ORIGIN, 5.0);

        assert_eq!(result.matches.len(), 1);
        assert!((result.radius_used - 5.0).abs() < f64::EPSILON);
        assert!(!result.expanded);
        assert_eq!(result.radii_tried, vec![5.0]);
        assert!(result.matches[0].distance_miles < 0.01);
    }

    #[test]
    fn expands_until_a_distant_record_is_found() {
        // Nearest record ~90 miles out: 1 and 5 and 10 and 25 and 50 all miss.
        let store = vec![business(1, "Far Away", 41.3, -100.0)];
        let result = expand_radius(&store, ORIGIN, 1.0);

        assert_eq!(result.matches.len(), 1);
        assert!((result.radius_used - 100.0).abs() < f64::EPSILON);
        assert!(result.expanded);
        assert_eq!(result.radii_tried, vec![1.0, 5.0, 10.0, 25.0, 50.0, 100.0]);
    }

    #[test]
    fn exhausted_sequence_returns_empty_at_max_radius() {
        let result = expand_radius(&[], ORIGIN, 1.0);

        assert!(result.matches.is_empty());
        assert!((result.radius_used - 500.0).abs() < f64::EPSILON);
        assert!(result.expanded);
        assert_eq!(
            result.radii_tried,
            vec![1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 500.0]
        );
    }

    #[test]
    fn steps_at_or_below_the_initial_radius_are_skipped() {
        let result = expand_radius(&[], ORIGIN, 25.0);
        assert_eq!(result.radii_tried, vec![25.0, 50.0, 100.0, 500.0]);
    }

    #[test]
    fn non_sequence_initial_radius_keeps_strictly_larger_steps() {
        let result = expand_radius(&[], ORIGIN, 30.0);
        assert_eq!(result.radii_tried, vec![30.0, 50.0, 100.0, 500.0]);
    }

    #[test]
    fn radii_tried_is_ascending_and_ends_at_radius_used() {
        let store = vec![business(1, "Far Away", 41.3, -100.0)];
        for initial in [0.5, 1.0, 7.0, 25.0] {
            let result = expand_radius(&store, ORIGIN, initial);
            assert!(
                result.radii_tried.windows(2).all(|w| w[0] < w[1]),
                "not ascending: {:?}",
                result.radii_tried
            );
            if result.expanded {
                assert_eq!(*result.radii_tried.last().unwrap(), result.radius_used);
            }
            assert!(result.radii_tried.len() <= 8);
        }
    }

    #[test]
    fn multi_point_union_preserves_first_point_order_and_dedups() {
        let near_a = business(1, "Near A", 40.0, -100.0);
        let near_b = business(2, "Near B", 34.05, -118.24);
        let store = vec![near_b.clone(), near_a.clone()];

        let points = [
            ORIGIN,
            GeoPoint {
                lat: 34.05,
                lng: -118.24,
            },
        ];
        let result = expand_radius_multi(&store, &points, 5.0);

        // First point's match leads even though the store lists B first.
        let ids: Vec<i64> = result.matches.iter().map(|m| m.business.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(!result.expanded);
    }

    #[test]
    fn duplicate_points_yield_each_business_once() {
        let store = vec![business(1, "Near A", 40.0, -100.0)];
        let result = expand_radius_multi(&store, &[ORIGIN, ORIGIN, ORIGIN], 5.0);
        assert_eq!(result.matches.len(), 1);
    }

    #[test]
    fn one_matching_point_stops_expansion_for_all_points() {
        // Second point has nothing nearby; the step still succeeds globally.
        let store = vec![business(1, "Near A", 40.0, -100.0)];
        let remote = GeoPoint {
            lat: -33.0,
            lng: 151.0,
        };
        let result = expand_radius_multi(&store, &[ORIGIN, remote], 5.0);

        assert_eq!(result.matches.len(), 1);
        assert!(!result.expanded);
        assert_eq!(result.radii_tried, vec![5.0]);
    }
}
