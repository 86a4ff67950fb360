//! Generic get-or-fetch cache, one instance per resource kind.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Duration;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, warn};

use crate::api::{ApiError, Fetcher};
use crate::clock::Clock;
use crate::resource::{Resource, ResourceKind};

use super::freshness::{default_max_age, Freshness, FreshnessContext, FreshnessPolicy};
use super::{CacheEntry, SlotStore};

/// Per-instance configuration. Nothing here is global, so independent
/// caches can live side by side in one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub slot_key: String,
    pub require_date_match: bool,
    pub max_age: Duration,
    /// Serialise concurrent misses for the same scope onto one fetch.
    pub single_flight: bool,
}

impl CacheSettings {
    pub fn for_kind(kind: ResourceKind) -> Self {
        Self {
            slot_key: kind.slot_key().to_string(),
            require_date_match: kind.requires_date_match(),
            max_age: default_max_age(),
            single_flight: false,
        }
    }

    /// Prefix the slot key, e.g. `test.nextPickups`.
    pub fn with_namespace(mut self, namespace: Option<&str>) -> Self {
        if let Some(ns) = namespace.filter(|ns| !ns.is_empty()) {
            self.slot_key = format!("{}.{}", ns, self.slot_key);
        }
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_single_flight(mut self, single_flight: bool) -> Self {
        self.single_flight = single_flight;
        self
    }

    pub fn policy(&self) -> FreshnessPolicy {
        FreshnessPolicy::new(self.require_date_match, self.max_age)
    }
}

pub struct ResourceCache<T> {
    settings: CacheSettings,
    store: Arc<dyn SlotStore>,
    clock: Arc<dyn Clock>,
    fetcher: Arc<dyn Fetcher<T>>,
    /// scope → gate, only used with `single_flight`
    in_flight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<T: Resource> ResourceCache<T> {
    pub fn new(
        settings: CacheSettings,
        store: Arc<dyn SlotStore>,
        clock: Arc<dyn Clock>,
        fetcher: Arc<dyn Fetcher<T>>,
    ) -> Self {
        Self {
            settings,
            store,
            clock,
            fetcher,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Serve the stored payload if it is fresh for `scope`, otherwise fetch,
    /// store and return a new one.
    ///
    /// Fetch errors are returned as-is and leave the slot untouched.
    pub async fn get(&self, scope: Option<&str>) -> Result<T, ApiError> {
        if let Some(payload) = self.load_fresh(scope) {
            return Ok(payload);
        }

        if !self.settings.single_flight {
            return self.fetch_and_store(scope, None).await;
        }

        let guard = self.gate(scope).lock_owned().await;
        // Whoever held the gate before us may have just filled the slot
        if let Some(payload) = self.load_fresh(scope) {
            return Ok(payload);
        }
        self.fetch_and_store(scope, Some(guard)).await
    }

    /// Fetch and overwrite the slot regardless of what is stored.
    pub async fn fetch_fresh(&self, scope: Option<&str>) -> Result<T, ApiError> {
        self.fetch_and_store(scope, None).await
    }

    /// The stored entry for `scope`, fresh or not. Never fetches.
    pub fn peek(&self, scope: Option<&str>) -> Option<CacheEntry<T>> {
        self.load()
            .filter(|entry| scope.is_none() || entry.payload.scope() == scope)
    }

    /// Read and decode the slot. Undecodable contents are dropped from the
    /// store and reported as absent.
    fn load(&self) -> Option<CacheEntry<T>> {
        let key = &self.settings.slot_key;
        let raw = self.store.read(key)?;
        match serde_json::from_str::<CacheEntry<T>>(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(slot = %key, error = %e, "Discarding unreadable cache slot");
                if let Err(e) = self.store.remove(key) {
                    debug!(slot = %key, error = %e, "Failed to remove unreadable cache slot");
                }
                None
            }
        }
    }

    fn load_fresh(&self, scope: Option<&str>) -> Option<T> {
        let key = &self.settings.slot_key;
        let Some(entry) = self.load() else {
            debug!(slot = %key, "Cache miss: empty slot");
            return None;
        };

        let today = self.clock.today();
        let ctx = FreshnessContext {
            scope,
            today: &today,
            now: self.clock.now(),
        };
        match self.settings.policy().evaluate(&entry, &ctx) {
            Freshness::Fresh => {
                debug!(slot = %key, scope = ?scope, "Cache hit");
                Some(entry.payload)
            }
            Freshness::Stale(reason) => {
                debug!(slot = %key, scope = ?scope, %reason, "Cache miss");
                None
            }
        }
    }

    /// Runs the fetch on its own task so it still completes, and still
    /// writes its result, if the caller stops waiting. A single-flight gate
    /// moves into the task and is released after the write.
    async fn fetch_and_store(&self, scope: Option<&str>, gate: Option<OwnedMutexGuard<()>>) -> Result<T, ApiError> {
        let fetcher = Arc::clone(&self.fetcher);
        let store = Arc::clone(&self.store);
        let clock = Arc::clone(&self.clock);
        let key = self.settings.slot_key.clone();
        let scope = scope.map(str::to_owned);

        let task = tokio::spawn(async move {
            let _gate = gate;
            let payload = fetcher.fetch(scope.as_deref()).await?;
            write_entry(store.as_ref(), &key, &CacheEntry::new(&payload, clock.now()));
            Ok::<T, ApiError>(payload)
        });

        match task.await {
            Ok(result) => result,
            Err(e) => Err(ApiError::Interrupted(e.to_string())),
        }
    }

    fn gate(&self, scope: Option<&str>) -> Arc<tokio::sync::Mutex<()>> {
        let mut gates = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        gates
            .entry(scope.unwrap_or_default().to_string())
            .or_default()
            .clone()
    }
}

/// Store failures are logged, not returned: the caller still gets its payload.
fn write_entry<T: serde::Serialize>(store: &dyn SlotStore, key: &str, entry: &CacheEntry<T>) {
    let json = match serde_json::to_string(entry) {
        Ok(json) => json,
        Err(e) => {
            warn!(slot = key, error = %e, "Failed to serialize cache entry");
            return;
        }
    };
    if let Err(e) = store.write(key, &json) {
        warn!(slot = key, error = %e, "Failed to write cache slot");
    }
}

// ============================================================================
// Tests
// ============================================================================
