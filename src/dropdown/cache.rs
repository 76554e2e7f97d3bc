//! Time-boxed reference-data cache
//!
//! Keyed by endpoint plus canonical params. Payloads are shared as
//! `Arc<Value>` and never mutated after insertion. Expired entries are evicted
//! on the lookup that finds them; only successful fetches are stored.

use crate::api::client::{ApiClient, RequestConfig};
use crate::api::error::ApiError;
use crate::api::retry::RetryPolicy;
use crate::api::transport::{Method, RequestBody};
use log::{debug, info};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// How a dropdown endpoint expects its params
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMethod {
    /// Params as query string
    Get,
    /// Params as JSON body
    Post,
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub payload: Arc<Value>,
    pub timestamp: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.duration_since(self.timestamp) < ttl
    }
}

pub struct DropdownCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
    retry: RetryPolicy,
}

/// Canonical key: `endpoint?k1=v1&k2=v2` with keys sorted
pub fn cache_key(endpoint: &str, params: &BTreeMap<String, String>) -> String {
    if params.is_empty() {
        return endpoint.to_string();
    }
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", endpoint, query)
}

impl Default for DropdownCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl DropdownCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_retry(ttl, RetryPolicy::default())
    }

    pub fn with_retry(ttl: Duration, retry: RetryPolicy) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
            retry,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh cached payload, evicting it if expired
    pub fn lookup(&self, key: &str) -> Option<Arc<Value>> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        match entries.get(key) {
            Some(entry) if entry.is_fresh(self.ttl, now) => Some(entry.payload.clone()),
            Some(_) => {
                debug!("Evicting expired dropdown entry {}", key);
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn store(&self, key: String, payload: Arc<Value>) {
        let entry = CacheEntry {
            key: key.clone(),
            payload,
            timestamp: Instant::now(),
        };
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, entry);
    }

    /// Cached payload for `endpoint` + `params`, fetching on miss
    pub async fn fetch(
        &self,
        client: &ApiClient,
        endpoint: &str,
        params: &BTreeMap<String, String>,
        method: FetchMethod,
    ) -> Result<Arc<Value>, ApiError> {
        let key = cache_key(endpoint, params);
        if let Some(payload) = self.lookup(&key) {
            debug!("Dropdown cache hit: {}", key);
            return Ok(payload);
        }
        debug!("Dropdown cache miss: {}", key);

        let payload = match method {
            FetchMethod::Get => {
                let query: Vec<(String, String)> = params.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                self.retry
                    .execute(|| client.get_json(endpoint, query.clone()))
                    .await?
            }
            FetchMethod::Post => {
                let body: Map<String, Value> = params
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect();
                client
                    .request(Method::Post, endpoint, RequestBody::Json(Value::Object(body)), RequestConfig::default())
                    .await?
                    .json_body()?
            }
        };

        let payload = Arc::new(payload);
        self.store(key, payload.clone());
        Ok(payload)
    }

    /// Drop every entry for `endpoint`, whatever the params
    pub fn invalidate(&self, endpoint: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let prefix = format!("{}?", endpoint);
        entries.retain(|key, _| key != endpoint && !key.starts_with(&prefix));
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if !entries.is_empty() {
            info!("Clearing {} dropdown cache entries", entries.len());
        }
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
