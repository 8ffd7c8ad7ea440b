//! Per-search timing and lifecycle logging.

use std::{
    collections::HashMap,
    sync::Arc,
    time::Instant,
};

use tokio::sync::Mutex;

use bizsearch_core::SearchOutcome;

/// Tracks wall-clock time per search and emits structured lifecycle events.
///
/// Every search that starts tracking must end in exactly one of the `log_*`
/// calls, which also release the stored start time.
#[derive(Clone, Default)]
pub struct SearchMetrics {
    start_times: Arc<Mutex<HashMap<String, Instant>>>,
}

impl SearchMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin tracking a search, returning its correlation id.
    pub async fn start_tracking(&self) -> String {
        let search_id = format!("search_{}", chrono::Utc::now().timestamp_millis());
        self.start_times
            .lock()
            .await
            .insert(search_id.clone(), Instant::now());
        tracing::info!(search_id, "business search started");
        search_id
    }

    /// Milliseconds elapsed since `start_tracking`, or 0.0 for unknown ids.
    /// Rounded to two decimals.
    pub async fn elapsed_ms(&self, search_id: &str) -> f64 {
        let start_times = self.start_times.lock().await;
        start_times.get(search_id).map_or(0.0, |start| {
            round2(start.elapsed().as_secs_f64() * 1000.0)
        })
    }

    /// Log a completed search and stop tracking it.
    pub async fn log_success(&self, search_id: &str, outcome: &SearchOutcome) {
        let processing_time_ms = self.finish(search_id).await;
        tracing::info!(
            search_id,
            processing_time_ms,
            total_results = outcome.businesses.len(),
            filters_applied = ?outcome.filters_applied,
            radius_expanded = outcome.radius_expanded,
            cached = false,
            "search completed successfully"
        );
    }

    /// Log a cache hit and stop tracking the search.
    pub async fn log_cache_hit(&self, search_id: &str, cache_key: &str) {
        let processing_time_ms = self.finish(search_id).await;
        tracing::info!(search_id, processing_time_ms, cache_key, "cache hit");
    }

    /// Log a rejected (invalid) request and stop tracking it. Validation
    /// failures are expected traffic, so this stays at warn level.
    pub async fn log_rejected(&self, search_id: &str, issues: &[String]) {
        let processing_time_ms = self.finish(search_id).await;
        tracing::warn!(
            search_id,
            processing_time_ms,
            validation_errors = ?issues,
            "invalid search request"
        );
    }

    /// Log a failed search and stop tracking it.
    pub async fn log_failure(&self, search_id: &str, error: &(dyn std::fmt::Display + Sync)) {
        let processing_time_ms = self.finish(search_id).await;
        tracing::error!(search_id, processing_time_ms, error = %error, "search failed");
    }

    async fn finish(&self, search_id: &str) -> f64 {
        let mut start_times = self.start_times.lock().await;
        start_times.remove(search_id).map_or(0.0, |start| {
            round2(start.elapsed().as_secs_f64() * 1000.0)
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn elapsed_is_zero_for_unknown_ids() {
        let metrics = SearchMetrics::new();
        assert!(metrics.elapsed_ms("search_nope").await.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn tracking_releases_after_success() {
        let metrics = SearchMetrics::new();
        let id = metrics.start_tracking().await;
        assert!(metrics.elapsed_ms(&id).await >= 0.0);

        let outcome = bizsearch_core::SearchOutcome {
            businesses: Vec::new(),
            total_found: 0,
            filters_applied: vec!["state"],
            locations: Vec::new(),
            geo_points: Vec::new(),
            radius_used: 50.0,
            radius_expanded: false,
            radii_tried: Vec::new(),
            radius_requested: None,
        };
        metrics.log_success(&id, &outcome).await;
        assert!(metrics.elapsed_ms(&id).await.abs() < f64::EPSILON);
    }

    #[test]
    fn round2_rounds_to_hundredths() {
        assert!((round2(12.3456) - 12.35).abs() < 1e-9);
        assert!((round2(0.004) - 0.0).abs() < 1e-9);
    }
}
