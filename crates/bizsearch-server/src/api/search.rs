//! The search endpoint: validate, consult the cache, run the search, shape
//! the response, and record metrics for every exit path.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use bizsearch_core::{
    validate_search_request, Business, LocationFilter, RawSearchRequest, SearchOutcome,
    MAX_RESULTS,
};

use crate::cache;

use super::AppState;

#[derive(Debug, Serialize)]
struct SearchResponse {
    results: Vec<Business>,
    search_metadata: SearchMetadata,
}

#[derive(Debug, Serialize)]
struct SearchMetadata {
    total_count: usize,
    total_found: usize,
    radius_used: f64,
    radius_expanded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    radius_requested: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    radius_expansion_sequence: Option<Vec<f64>>,
    filters_applied: Vec<&'static str>,
    search_locations: Vec<LocationFilter>,
    performance: Performance,
}

#[derive(Debug, Serialize)]
struct Performance {
    search_id: String,
    processing_time_ms: f64,
    cached: bool,
}

#[derive(Debug, Serialize)]
struct ValidationErrorBody {
    error: &'static str,
    details: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ServerErrorBody {
    error: &'static str,
    search_id: String,
    message: &'static str,
}

pub async fn search_businesses(
    State(state): State<AppState>,
    Json(raw): Json<Value>,
) -> Response {
    let search_id = state.metrics.start_tracking().await;

    let request: RawSearchRequest = match serde_json::from_value(raw.clone()) {
        Ok(request) => request,
        Err(e) => {
            let issues = vec![format!("malformed request body: {e}")];
            state.metrics.log_rejected(&search_id, &issues).await;
            return invalid_input(issues);
        }
    };

    let params = match validate_search_request(&request) {
        Ok(params) => params,
        Err(e) => {
            state.metrics.log_rejected(&search_id, &e.issues).await;
            return invalid_input(e.issues);
        }
    };

    let cache_key = cache::fingerprint(&raw);
    if let Some(mut body) = state.cache.get(&cache_key).await {
        let elapsed = state.metrics.elapsed_ms(&search_id).await;
        rewrite_cached_metadata(&mut body, &search_id, elapsed, &cache_key);
        state.metrics.log_cache_hit(&search_id, &cache_key).await;
        return (StatusCode::OK, Json(body)).into_response();
    }

    match state.search.search(&params).await {
        Ok(outcome) => {
            let processing_time_ms = state.metrics.elapsed_ms(&search_id).await;
            state.metrics.log_success(&search_id, &outcome).await;
            let response = build_response(outcome, search_id, processing_time_ms);
            if let Ok(body) = serde_json::to_value(&response) {
                state.cache.set(cache_key, body).await;
            }
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            state.metrics.log_failure(&search_id, &e).await;
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ServerErrorBody {
                    error: "Internal server error",
                    search_id,
                    message: "An error occurred while processing your search. Please try again.",
                }),
            )
                .into_response()
        }
    }
}

fn invalid_input(details: Vec<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ValidationErrorBody {
            error: "Invalid input",
            details,
        }),
    )
        .into_response()
}

fn build_response(outcome: SearchOutcome, search_id: String, processing_time_ms: f64) -> SearchResponse {
    let had_geo = !outcome.geo_points.is_empty();
    SearchResponse {
        search_metadata: SearchMetadata {
            total_count: outcome.businesses.len(),
            total_found: outcome.total_found.min(MAX_RESULTS),
            radius_used: outcome.radius_used,
            radius_expanded: outcome.radius_expanded,
            radius_requested: if had_geo { outcome.radius_requested } else { None },
            radius_expansion_sequence: if had_geo {
                Some(outcome.radii_tried)
            } else {
                None
            },
            filters_applied: outcome.filters_applied,
            search_locations: outcome.locations,
            performance: Performance {
                search_id,
                processing_time_ms,
                cached: false,
            },
        },
        results: outcome.businesses,
    }
}

/// Patch a cached response body so the client sees this hit's identity and
/// timing rather than the original miss's.
fn rewrite_cached_metadata(body: &mut Value, search_id: &str, elapsed_ms: f64, cache_key: &str) {
    if let Some(metadata) = body
        .get_mut("search_metadata")
        .and_then(Value::as_object_mut)
    {
        metadata.insert("cache_key".to_string(), Value::String(cache_key.to_string()));
        if let Some(performance) = metadata
            .get_mut("performance")
            .and_then(Value::as_object_mut)
        {
            performance.insert("cached".to_string(), Value::Bool(true));
            performance.insert(
                "search_id".to_string(),
                Value::String(search_id.to_string()),
            );
            performance.insert("processing_time_ms".to_string(), elapsed_ms.into());
        }
    }
}
