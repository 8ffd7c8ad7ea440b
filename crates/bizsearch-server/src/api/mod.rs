mod search;

use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use bizsearch_core::SearchService;
use bizsearch_db::PgBusinessStore;

use crate::cache::SearchCache;
use crate::metrics::SearchMetrics;
use crate::middleware::request_id;

/// Shared handler state. Everything inside is cheaply cloneable; the search
/// service itself is stateless, so one instance serves all requests.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub search: SearchService<PgBusinessStore>,
    pub cache: SearchCache,
    pub metrics: SearchMetrics,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, cache_ttl: Duration) -> Self {
        let search = SearchService::new(PgBusinessStore::new(pool.clone()));
        Self {
            pool,
            search,
            cache: SearchCache::new(cache_ttl),
            metrics: SearchMetrics::new(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/businesses/search", post(search::search_businesses))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match bizsearch_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthData {
                status: "ok",
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthData {
                    status: "degraded",
                    database: "unavailable",
                }),
            )
        }
    }
}
