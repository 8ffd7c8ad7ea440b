//! Boundary validation of raw search requests.
//!
//! All violations are collected into one aggregated error rather than
//! failing on the first, so the client sees the full list at once.

use serde::Deserialize;
use thiserror::Error;

use crate::search::{LocationFilter, SearchParams, DEFAULT_RADIUS_MILES};
use crate::states;

pub const MAX_LOCATIONS: usize = 20;
pub const MIN_RADIUS_MILES: f64 = 0.1;
pub const MAX_RADIUS_MILES: f64 = 1000.0;

/// The search request exactly as it arrives on the wire, before any checks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchRequest {
    #[serde(default)]
    pub locations: Vec<RawLocation>,
    pub radius_miles: Option<f64>,
    pub text: Option<String>,
}

/// One raw location entry; which fields are populated decides its variant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLocation {
    pub state: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Aggregated validation failure. Recoverable; maps to a 400 at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid search request: {}", .issues.join("; "))]
pub struct ValidationError {
    pub issues: Vec<String>,
}

/// Check every rule from the request contract and either produce validated
/// [`SearchParams`] or the full list of violations.
///
/// State codes are upper-cased before the membership check. A location with
/// only one of lat/lng counts as having neither. When any geo location is
/// present and no radius was given, [`DEFAULT_RADIUS_MILES`] is injected.
///
/// # Errors
///
/// Returns [`ValidationError`] listing every violation found.
pub fn validate_search_request(raw: &RawSearchRequest) -> Result<SearchParams, ValidationError> {
    let mut issues = Vec::new();

    if raw.locations.is_empty() {
        issues.push("at least one location filter is required".to_string());
    } else if raw.locations.len() > MAX_LOCATIONS {
        issues.push(format!("too many location filters (max {MAX_LOCATIONS})"));
    }

    let mut locations = Vec::with_capacity(raw.locations.len());
    let mut has_geo = false;

    for (index, location) in raw.locations.iter().enumerate() {
        let state = location
            .state
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let coords = location.lat.zip(location.lng);

        match (state, coords) {
            (Some(_), Some(_)) => {
                issues.push(format!(
                    "location {index}: cannot have both state and lat/lng coordinates"
                ));
            }
            (None, None) => {
                issues.push(format!(
                    "location {index}: must have either state or lat/lng coordinates"
                ));
            }
            (Some(code), None) => {
                let normalized = code.to_ascii_uppercase();
                if states::is_valid_state_code(&normalized) {
                    locations.push(LocationFilter::State { state: normalized });
                } else {
                    issues.push(format!("location {index}: invalid state code: {code}"));
                }
            }
            (None, Some((lat, lng))) => {
                has_geo = true;
                let mut in_range = true;
                if !(-90.0..=90.0).contains(&lat) {
                    issues.push(format!(
                        "location {index}: latitude must be between -90 and 90, got {lat}"
                    ));
                    in_range = false;
                }
                if !(-180.0..=180.0).contains(&lng) {
                    issues.push(format!(
                        "location {index}: longitude must be between -180 and 180, got {lng}"
                    ));
                    in_range = false;
                }
                if in_range {
                    locations.push(LocationFilter::Geo { lat, lng });
                }
            }
        }
    }

    if let Some(radius) = raw.radius_miles {
        if !(MIN_RADIUS_MILES..=MAX_RADIUS_MILES).contains(&radius) {
            issues.push(format!(
                "radius_miles must be between {MIN_RADIUS_MILES} and {MAX_RADIUS_MILES}, got {radius}"
            ));
        }
    }

    if !issues.is_empty() {
        return Err(ValidationError { issues });
    }

    let radius_miles = match raw.radius_miles {
        Some(radius) => Some(radius),
        None if has_geo => Some(DEFAULT_RADIUS_MILES),
        None => None,
    };

    Ok(SearchParams {
        locations,
        radius_miles,
        text: raw.text.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_entry(code: &str) -> RawLocation {
        RawLocation {
            state: Some(code.to_string()),
            ..RawLocation::default()
        }
    }

    fn geo_entry(lat: f64, lng: f64) -> RawLocation {
        RawLocation {
            lat: Some(lat),
            lng: Some(lng),
            ..RawLocation::default()
        }
    }

    fn request(locations: Vec<RawLocation>) -> RawSearchRequest {
        RawSearchRequest {
            locations,
            ..RawSearchRequest::default()
        }
    }

    #[test]
    fn empty_locations_are_rejected() {
        let err = validate_search_request(&request(Vec::new())).unwrap_err();
        assert_eq!(err.issues, vec!["at least one location filter is required"]);
    }

    #[test]
    fn more_than_twenty_locations_are_rejected() {
        let err =
            validate_search_request(&request(vec![state_entry("CA"); 21])).unwrap_err();
        assert_eq!(err.issues, vec!["too many location filters (max 20)"]);
    }

    #[test]
    fn twenty_locations_are_accepted() {
        let params = validate_search_request(&request(vec![state_entry("CA"); 20])).unwrap();
        assert_eq!(params.locations.len(), 20);
    }

    #[test]
    fn state_and_coordinates_together_are_rejected() {
        let location = RawLocation {
            state: Some("CA".to_string()),
            lat: Some(1.0),
            lng: Some(2.0),
        };
        let err = validate_search_request(&request(vec![location])).unwrap_err();
        assert_eq!(
            err.issues,
            vec!["location 0: cannot have both state and lat/lng coordinates"]
        );
    }

    #[test]
    fn empty_location_is_rejected() {
        let err = validate_search_request(&request(vec![RawLocation::default()])).unwrap_err();
        assert_eq!(
            err.issues,
            vec!["location 0: must have either state or lat/lng coordinates"]
        );
    }

    #[test]
    fn partial_coordinates_count_as_missing() {
        let lat_only = RawLocation {
            lat: Some(34.0),
            ..RawLocation::default()
        };
        let lng_only = RawLocation {
            lng: Some(-118.0),
            ..RawLocation::default()
        };
        let err = validate_search_request(&request(vec![lat_only, lng_only])).unwrap_err();
        assert_eq!(err.issues.len(), 2);
        for issue in &err.issues {
            assert!(issue.contains("must have either state or lat/lng coordinates"));
        }
    }

    #[test]
    fn state_codes_are_uppercased() {
        let params = validate_search_request(&request(vec![state_entry("ca")])).unwrap();
        assert_eq!(
            params.locations,
            vec![LocationFilter::State {
                state: "CA".to_string()
            }]
        );
    }

    #[test]
    fn unknown_state_code_is_named_in_the_error() {
        let err = validate_search_request(&request(vec![state_entry("ZZ")])).unwrap_err();
        assert_eq!(err.issues, vec!["location 0: invalid state code: ZZ"]);
    }

    #[test]
    fn out_of_range_coordinates_name_the_violated_bound() {
        let err =
            validate_search_request(&request(vec![geo_entry(91.0, -200.0)])).unwrap_err();
        assert_eq!(err.issues.len(), 2);
        assert!(err.issues[0].contains("latitude must be between -90 and 90"));
        assert!(err.issues[1].contains("longitude must be between -180 and 180"));
    }

    #[test]
    fn radius_out_of_bounds_is_rejected() {
        for radius in [0.05, 1000.5, -3.0] {
            let raw = RawSearchRequest {
                locations: vec![geo_entry(34.0, -118.0)],
                radius_miles: Some(radius),
                text: None,
            };
            let err = validate_search_request(&raw).unwrap_err();
            assert_eq!(err.issues.len(), 1, "radius {radius} should fail");
            assert!(err.issues[0].contains("radius_miles must be between"));
        }
    }

    #[test]
    fn default_radius_is_injected_for_geo_searches() {
        let params =
            validate_search_request(&request(vec![geo_entry(34.0, -118.0)])).unwrap();
        assert_eq!(params.radius_miles, Some(DEFAULT_RADIUS_MILES));
    }

    #[test]
    fn state_only_searches_get_no_default_radius() {
        let params = validate_search_request(&request(vec![state_entry("CA")])).unwrap();
        assert_eq!(params.radius_miles, None);
    }

    #[test]
    fn explicit_radius_is_kept() {
        let raw = RawSearchRequest {
            locations: vec![geo_entry(34.0, -118.0)],
            radius_miles: Some(12.5),
            text: None,
        };
        let params = validate_search_request(&raw).unwrap();
        assert_eq!(params.radius_miles, Some(12.5));
    }

    #[test]
    fn all_violations_are_reported_together() {
        let raw = RawSearchRequest {
            locations: vec![state_entry("ZZ"), RawLocation::default(), geo_entry(95.0, 0.0)],
            radius_miles: Some(0.0),
            text: None,
        };
        let err = validate_search_request(&raw).unwrap_err();
        assert_eq!(err.issues.len(), 4);
    }

    #[test]
    fn blank_text_passes_validation() {
        let raw = RawSearchRequest {
            locations: vec![state_entry("CA")],
            radius_miles: None,
            text: Some("   ".to_string()),
        };
        let params = validate_search_request(&raw).unwrap();
        assert_eq!(params.text.as_deref(), Some("   "));
    }

    #[test]
    fn raw_request_deserializes_from_wire_shape() {
        let raw: RawSearchRequest = serde_json::from_str(
            r#"{"locations":[{"state":"CA"},{"lat":34.05,"lng":-118.24}],"radius_miles":25,"text":"coffee"}"#,
        )
        .unwrap();
        assert_eq!(raw.locations.len(), 2);
        assert_eq!(raw.radius_miles, Some(25.0));
        let params = validate_search_request(&raw).unwrap();
        assert_eq!(params.locations.len(), 2);
    }
}
