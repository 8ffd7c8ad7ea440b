//! Search orchestration: classify location filters, drive the record store
//! and the radius-expansion engine, and merge the result sets.

use std::collections::HashSet;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::business::Business;
use crate::expand::expand_radius_multi;
use crate::geo::GeoPoint;

/// Hard cap on the number of records returned to the client.
pub const MAX_RESULTS: usize = 100;

/// Radius injected when a geo search arrives without an explicit one. Also
/// reported as `radius_used` for searches with no geo filter at all.
pub const DEFAULT_RADIUS_MILES: f64 = 50.0;

/// One atomic location matcher: a state code or a coordinate point.
///
/// The serde tag makes this serialize directly into the response's
/// `search_locations` summary shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LocationFilter {
    State { state: String },
    Geo { lat: f64, lng: f64 },
}

/// A validated, immutable search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub locations: Vec<LocationFilter>,
    /// Requested radius; validation injects [`DEFAULT_RADIUS_MILES`] when geo
    /// filters are present and none was supplied.
    pub radius_miles: Option<f64>,
    pub text: Option<String>,
}

/// Composable predicate handed to the record store.
///
/// Both filters combine with AND; an empty `states` slice means no state
/// restriction. The store returns matching rows in name-ascending order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreFilter {
    pub name_contains: Option<String>,
    pub states: Vec<String>,
}

impl StoreFilter {
    fn text_only(text: Option<&str>) -> Self {
        Self {
            name_contains: text.map(ToOwned::to_owned),
            states: Vec::new(),
        }
    }
}

/// Read-only view of the business record store.
pub trait BusinessStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch every business matching `filter`, name-ascending.
    fn query(
        &self,
        filter: &StoreFilter,
    ) -> impl Future<Output = Result<Vec<Business>, Self::Error>> + Send;
}

/// Everything the response layer needs to describe one executed search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Deduplicated matches, capped at [`MAX_RESULTS`], merge order preserved.
    pub businesses: Vec<Business>,
    /// Post-dedup, pre-truncation count of the authoritative pool.
    pub total_found: usize,
    /// Distinct labels in check order: "text", then "state", then "geo".
    pub filters_applied: Vec<&'static str>,
    /// The request's location filters, as validated.
    pub locations: Vec<LocationFilter>,
    /// The geo subset of `locations`, input order preserved.
    pub geo_points: Vec<GeoPoint>,
    pub radius_used: f64,
    pub radius_expanded: bool,
    /// Radii scanned by the expansion engine; empty without geo filters.
    pub radii_tried: Vec<f64>,
    /// Radius as requested (after default injection), for response metadata.
    pub radius_requested: Option<f64>,
}

/// The search orchestrator. Stateless aside from its store handle, so a
/// single instance is safely shared across request handlers.
#[derive(Debug, Clone)]
pub struct SearchService<S> {
    store: S,
}

impl<S: BusinessStore> SearchService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Execute a validated search request.
    ///
    /// State and geo filters combine with OR semantics: the state path
    /// filters text-matched records by code, the geo path runs radius
    /// expansion over a fresh text-only base, and the two pools merge
    /// geo-first before dedup and truncation.
    ///
    /// # Errors
    ///
    /// Propagates the store's error unmodified; no retries happen here.
    pub async fn search(&self, params: &SearchParams) -> Result<SearchOutcome, S::Error> {
        let text = params
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let mut filters_applied = Vec::new();
        if text.is_some() {
            filters_applied.push("text");
        }

        let mut state_codes = Vec::new();
        let mut geo_points = Vec::new();
        for location in &params.locations {
            match location {
                LocationFilter::State { state } => state_codes.push(state.clone()),
                LocationFilter::Geo { lat, lng } => geo_points.push(GeoPoint {
                    lat: *lat,
                    lng: *lng,
                }),
            }
        }

        let state_matches = if state_codes.is_empty() {
            None
        } else {
            filters_applied.push("state");
            let filter = StoreFilter {
                name_contains: text.map(ToOwned::to_owned),
                states: state_codes,
            };
            Some(self.store.query(&filter).await?)
        };

        let mut radius_used = params.radius_miles.unwrap_or(DEFAULT_RADIUS_MILES);
        let mut radius_expanded = false;
        let mut radii_tried = Vec::new();

        let combined = if geo_points.is_empty() {
            match state_matches {
                Some(matches) => matches,
                None => self.store.query(&StoreFilter::text_only(text)).await?,
            }
        } else {
            filters_applied.push("geo");

            // Geo filtering runs against a fresh text-only base: state and
            // geo are alternative paths, never composed.
            let base = self.store.query(&StoreFilter::text_only(text)).await?;
            let expansion = expand_radius_multi(&base, &geo_points, radius_used);
            radius_used = expansion.radius_used;
            radius_expanded = expansion.expanded;
            radii_tried = expansion.radii_tried;

            let mut merged: Vec<Business> = expansion
                .matches
                .into_iter()
                .map(|entry| entry.business)
                .collect();
            if let Some(matches) = state_matches {
                merged.extend(matches);
            }
            merged
        };

        let mut businesses = dedup_by_id(combined);
        let total_found = businesses.len();
        businesses.truncate(MAX_RESULTS);

        Ok(SearchOutcome {
            businesses,
            total_found,
            filters_applied,
            locations: params.locations.clone(),
            geo_points,
            radius_used,
            radius_expanded,
            radii_tried,
            radius_requested: params.radius_miles,
        })
    }
}

/// Drop repeated ids, keeping the first occurrence of each.
fn dedup_by_id(businesses: Vec<Business>) -> Vec<Business> {
    let mut seen = HashSet::new();
    businesses
        .into_iter()
        .filter(|business| seen.insert(business.id))
        .collect()
}
