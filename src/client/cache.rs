// SPDX-License-Identifier: MIT

//! Keyed query cache with staleness, retry, and invalidation.
//!
//! Single source of truth for server-shaped data on the client side. Each
//! slot is keyed by (entity kind, scope, canonical parameters) and holds the
//! last value, fetch timestamp, a stale flag, and the last error.
//!
//! Concurrency model: overlapping reads of the same key share one underlying
//! fetch (per-key async mutex with a double-check after acquisition), and a
//! generation counter guards against a slow fetch overwriting data written by
//! a mutation that completed while the fetch was in flight.
//!
//! The cache is an explicit object owned by whoever owns the client layer;
//! there is no module-level singleton.

use dashmap::DashMap;
use std::any::Any;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::error::{ApiError, Result};

/// Staleness horizon for list slots.
pub const LIST_STALE_AFTER: Duration = Duration::from_secs(5 * 60);
/// Staleness horizon for goal slots.
pub const GOAL_STALE_AFTER: Duration = Duration::from_secs(5 * 60);
/// Staleness horizon for statistics slots.
pub const STATS_STALE_AFTER: Duration = Duration::from_secs(2 * 60);
/// Staleness horizon for single-entity detail slots.
pub const DETAIL_STALE_AFTER: Duration = Duration::from_secs(10 * 60);

/// Retry policy: up to 3 retries with exponential backoff, except on
/// client (4xx) errors which are terminal until the parameters change.
const MAX_RETRIES: u32 = 3;
const RETRY_BASE: Duration = Duration::from_millis(1000);
const RETRY_CAP: Duration = Duration::from_millis(30_000);

/// Entity families the cache knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Activities,
    Goals,
}

/// Sub-kind of a query within an entity family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    List,
    Detail,
    Stats,
}

/// Cache slot address: entity kind + scope + canonical parameters.
///
/// Parameters are stored sorted by name, so two keys built from structurally
/// equal parameter sets compare equal regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    kind: EntityKind,
    scope: Scope,
    params: BTreeMap<String, String>,
}

impl QueryKey {
    pub fn new(kind: EntityKind, scope: Scope) -> Self {
        Self {
            kind,
            scope,
            params: BTreeMap::new(),
        }
    }

    /// Add a named parameter. Insertion order does not affect equality.
    pub fn with_param(mut self, name: &str, value: impl ToString) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    pub fn matches(&self, prefix: &KeyPrefix) -> bool {
        self.kind == prefix.kind && prefix.scope.map_or(true, |s| s == self.scope)
    }
}

/// Invalidation target: a whole entity kind, or one scope within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPrefix {
    kind: EntityKind,
    scope: Option<Scope>,
}

impl KeyPrefix {
    pub fn kind(kind: EntityKind) -> Self {
        Self { kind, scope: None }
    }

    pub fn scoped(kind: EntityKind, scope: Scope) -> Self {
        Self {
            kind,
            scope: Some(scope),
        }
    }
}

/// Snapshot of a slot for rendering: data, staleness, and the last error.
#[derive(Debug, Clone)]
pub struct CachedQuery<T> {
    pub data: Option<Arc<T>>,
    pub is_stale: bool,
    pub error: Option<ApiError>,
}

impl<T> CachedQuery<T> {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

struct Slot {
    value: Option<Arc<dyn Any + Send + Sync>>,
    fetched_at: Instant,
    stale: bool,
    error: Option<ApiError>,
    /// Bumped by every direct write, invalidation, or removal. A completing
    /// fetch whose captured generation no longer matches discards its write.
    generation: u64,
}

/// Process-wide keyed store for server-shaped data.
#[derive(Default)]
pub struct QueryCache {
    slots: DashMap<QueryKey, Slot>,
    /// Per-key mutex to de-duplicate concurrent fetches (one in-flight
    /// request per key at a time; waiters re-check the slot after the lock).
    locks: DashMap<QueryKey, Arc<Mutex<()>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read through the cache: return the slot value if present and fresh,
    /// otherwise run `fetcher` (with retry) and store the result.
    ///
    /// Concurrent calls with the same key share a single underlying fetch.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: &QueryKey,
        stale_after: Duration,
        fetcher: F,
    ) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        // Fast path: fresh slot, no lock.
        if let Some(value) = self.fresh_value::<T>(key, stale_after) {
            return Ok(value);
        }

        // One fetch per key: take the per-key lock, then re-check in case
        // another task completed the fetch while we waited.
        let lock = self
            .locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        if let Some(value) = self.fresh_value::<T>(key, stale_after) {
            return Ok(value);
        }

        let generation = self.generation(key);

        match self.run_with_retry(key, &fetcher).await {
            Ok(value) => {
                let value = Arc::new(value);
                self.store_fetched(key, value.clone(), generation);
                Ok(value)
            }
            Err(e) => {
                self.store_error(key, e.clone(), generation);
                Err(e)
            }
        }
    }

    /// Direct cache write without a network round-trip. Used to reflect a
    /// confirmed mutation before any invalidation-triggered refetch resolves.
    pub fn set_data<T: Send + Sync + 'static>(&self, key: &QueryKey, value: T) {
        let mut slot = self.slots.entry(key.clone()).or_insert_with(Slot::empty);
        slot.value = Some(Arc::new(value));
        slot.fetched_at = Instant::now();
        slot.stale = false;
        slot.error = None;
        slot.generation += 1;
    }

    /// In-place transform of a cached value. No-op (returns false) when the
    /// slot is missing or holds a different type.
    pub fn patch<T, F>(&self, key: &QueryKey, patch: F) -> bool
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce(&mut T),
    {
        let Some(mut slot) = self.slots.get_mut(key) else {
            return false;
        };
        let Some(current) = slot.value.as_ref().and_then(|v| v.clone().downcast::<T>().ok())
        else {
            return false;
        };

        let mut updated = (*current).clone();
        patch(&mut updated);
        slot.value = Some(Arc::new(updated));
        slot.generation += 1;
        true
    }

    /// Evict a slot entirely (delete semantics).
    pub fn remove(&self, key: &QueryKey) {
        self.slots.remove(key);
        self.locks.remove(key);
    }

    /// Mark every slot matching the prefix stale, forcing a refetch on the
    /// next read. Used after any create/update/delete so dependent list and
    /// stats views refresh.
    pub fn invalidate(&self, prefix: &KeyPrefix) {
        let mut count = 0;
        for mut entry in self.slots.iter_mut() {
            if entry.key().matches(prefix) {
                entry.stale = true;
                entry.generation += 1;
                count += 1;
            }
        }
        tracing::debug!(?prefix, count, "Cache invalidated");
    }

    /// Snapshot a slot for rendering without triggering a fetch.
    pub fn peek<T: Send + Sync + 'static>(&self, key: &QueryKey) -> CachedQuery<T> {
        match self.slots.get(key) {
            Some(slot) => CachedQuery {
                data: slot
                    .value
                    .as_ref()
                    .and_then(|v| v.clone().downcast::<T>().ok()),
                is_stale: slot.stale,
                error: slot.error.clone(),
            },
            None => CachedQuery {
                data: None,
                is_stale: false,
                error: None,
            },
        }
    }

    /// Keys of populated slots matching a prefix (for cross-slot patching).
    pub fn keys_matching(&self, prefix: &KeyPrefix) -> Vec<QueryKey> {
        self.slots
            .iter()
            .filter(|entry| entry.key().matches(prefix))
            .map(|entry| entry.key().clone())
            .collect()
    }

    // ─── Internals ───────────────────────────────────────────────

    fn fresh_value<T: Send + Sync + 'static>(
        &self,
        key: &QueryKey,
        stale_after: Duration,
    ) -> Option<Arc<T>> {
        let slot = self.slots.get(key)?;
        if slot.stale || slot.fetched_at.elapsed() >= stale_after {
            return None;
        }
        slot.value.as_ref()?.clone().downcast::<T>().ok()
    }

    fn generation(&self, key: &QueryKey) -> u64 {
        self.slots.get(key).map(|s| s.generation).unwrap_or(0)
    }

    fn store_fetched<T: Send + Sync + 'static>(
        &self,
        key: &QueryKey,
        value: Arc<T>,
        captured_generation: u64,
    ) {
        if self.generation(key) != captured_generation {
            // A mutation or invalidation landed while this fetch was in
            // flight; its data is newer than ours. Discard.
            tracing::debug!(?key, "Stale fetch result discarded");
            return;
        }

        let mut slot = self.slots.entry(key.clone()).or_insert_with(Slot::empty);
        slot.value = Some(value);
        slot.fetched_at = Instant::now();
        slot.stale = false;
        slot.error = None;
    }

    fn store_error(&self, key: &QueryKey, error: ApiError, captured_generation: u64) {
        if self.generation(key) != captured_generation {
            return;
        }
        let mut slot = self.slots.entry(key.clone()).or_insert_with(Slot::empty);
        slot.error = Some(error);
        slot.stale = true;
    }

    /// Run the fetcher, retrying transient failures with exponential backoff.
    /// Client (4xx) errors are never retried.
    async fn run_with_retry<T, F, Fut>(&self, key: &QueryKey, fetcher: &F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt: u32 = 0;
        loop {
            match fetcher().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_client_error() => return Err(e),
                Err(e) => {
                    if attempt >= MAX_RETRIES {
                        tracing::warn!(?key, error = %e, "Fetch failed after retries");
                        return Err(e);
                    }
                    let backoff = RETRY_BASE
                        .saturating_mul(2u32.saturating_pow(attempt))
                        .min(RETRY_CAP);
                    tracing::debug!(?key, attempt, backoff_ms = backoff.as_millis() as u64, "Retrying fetch");
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Slot {
    fn empty() -> Self {
        Self {
            value: None,
            fetched_at: Instant::now(),
            stale: false,
            error: None,
            generation: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn list_key(page: u32) -> QueryKey {
        QueryKey::new(EntityKind::Activities, Scope::List).with_param("page", page)
    }

    #[test]
    fn test_key_equality_is_order_independent() {
        let a = QueryKey::new(EntityKind::Activities, Scope::List)
            .with_param("page", 1)
            .with_param("search", "run");
        let b = QueryKey::new(EntityKind::Activities, Scope::List)
            .with_param("search", "run")
            .with_param("page", 1);
        assert_eq!(a, b);

        let c = QueryKey::new(EntityKind::Activities, Scope::List).with_param("page", 2);
        assert_ne!(a, c);
    }

    #[test]
    fn test_prefix_matching() {
        let key = list_key(1);
        assert!(key.matches(&KeyPrefix::kind(EntityKind::Activities)));
        assert!(key.matches(&KeyPrefix::scoped(EntityKind::Activities, Scope::List)));
        assert!(!key.matches(&KeyPrefix::scoped(EntityKind::Activities, Scope::Stats)));
        assert!(!key.matches(&KeyPrefix::kind(EntityKind::Goals)));
    }

    #[tokio::test]
    async fn test_fetch_caches_until_invalidated() {
        let cache = QueryCache::new();
        let calls = AtomicU32::new(0);
        let key = list_key(1);

        for _ in 0..3 {
            let value: Arc<String> = cache
                .fetch(&key, LIST_STALE_AFTER, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("payload".to_string())
                })
                .await
                .unwrap();
            assert_eq!(*value, "payload");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.invalidate(&KeyPrefix::kind(EntityKind::Activities));

        let _: Arc<String> = cache
            .fetch(&key, LIST_STALE_AFTER, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("payload".to_string())
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_set_data_serves_without_fetch() {
        let cache = QueryCache::new();
        let key = list_key(1);
        cache.set_data(&key, "direct".to_string());

        let value: Arc<String> = cache
            .fetch(&key, LIST_STALE_AFTER, || async {
                panic!("fetch should not run")
            })
            .await
            .unwrap();
        assert_eq!(*value, "direct");
    }

    #[tokio::test]
    async fn test_patch_transforms_in_place() {
        let cache = QueryCache::new();
        let key = list_key(1);
        cache.set_data(&key, vec![1u32, 2, 3]);

        assert!(cache.patch::<Vec<u32>, _>(&key, |v| v.insert(0, 0)));
        let snapshot = cache.peek::<Vec<u32>>(&key);
        assert_eq!(*snapshot.data.unwrap(), vec![0, 1, 2, 3]);

        // Missing slot: no-op.
        assert!(!cache.patch::<Vec<u32>, _>(&list_key(9), |_| {}));
    }

    #[tokio::test]
    async fn test_error_stored_for_peek() {
        let cache = QueryCache::new();
        let key = list_key(1);

        let result: Result<Arc<String>> = cache
            .fetch(&key, LIST_STALE_AFTER, || async {
                Err(ApiError::activity_not_found("a1"))
            })
            .await;
        assert!(result.is_err());

        let snapshot = cache.peek::<String>(&key);
        assert!(snapshot.is_error());
        assert!(snapshot.data.is_none());
    }

    #[tokio::test]
    async fn test_stale_fetch_result_discarded_after_mutation() {
        let cache = Arc::new(QueryCache::new());
        let key = list_key(1);
        let gate = Arc::new(tokio::sync::Notify::new());

        let fetch_cache = cache.clone();
        let fetch_key = key.clone();
        let fetch_gate = gate.clone();
        let fetch = tokio::spawn(async move {
            let _: Arc<String> = fetch_cache
                .fetch(&fetch_key, LIST_STALE_AFTER, || {
                    let gate = fetch_gate.clone();
                    async move {
                        gate.notified().await;
                        Ok("from fetch".to_string())
                    }
                })
                .await
                .unwrap();
        });

        // Let the fetch start, then write newer data while it is in flight.
        tokio::task::yield_now().await;
        cache.set_data(&key, "from mutation".to_string());
        gate.notify_waiters();
        fetch.await.unwrap();

        let snapshot = cache.peek::<String>(&key);
        assert_eq!(*snapshot.data.unwrap(), "from mutation");
    }
}
