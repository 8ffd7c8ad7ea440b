//! In-process TTL cache for search responses, keyed by a normalized request
//! fingerprint so semantically identical requests collide.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use serde_json::Value;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

struct CacheEntry {
    body: Value,
    expires_at: Instant,
}

/// TTL cache with atomic per-key get/set. Cloning shares the underlying map.
#[derive(Clone)]
pub struct SearchCache {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
}

impl SearchCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Fetch a cached response body, dropping it if the TTL has lapsed.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.body.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a response body under `key` for the configured TTL.
    pub async fn set(&self, key: String, body: Value) {
        let entry = CacheEntry {
            body,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.lock().await.insert(key, entry);
    }
}

/// Derive the cache key for a raw request body.
///
/// The request is normalized before hashing: locations are sorted by their
/// canonical JSON form (serde_json orders object keys, so equal filters
/// serialize identically), text is trimmed and lowercased, and the requested
/// radius is carried as-is. SHA-256 of the normalized form, hex-encoded,
/// prefixed with the cache namespace.
#[must_use]
pub fn fingerprint(raw: &Value) -> String {
    let mut location_keys: Vec<String> = raw
        .get("locations")
        .and_then(Value::as_array)
        .map(|locations| locations.iter().map(Value::to_string).collect())
        .unwrap_or_default();
    location_keys.sort();

    let text = raw
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_lowercase();
    let radius = raw.get("radius_miles").cloned().unwrap_or(Value::Null);

    let normalized = serde_json::json!({
        "locations": location_keys,
        "radius_miles": radius,
        "text": text,
    });

    format!(
        "business_search:{:x}",
        Sha256::digest(normalized.to_string().as_bytes())
    )
}
