//! # TTL Cache Store Module
//!
//! An in-memory expiring key-value store that sits in front of the expensive
//! recipe fetch path. Keys are arbitrary strings (usually the source URL).
//!
//! ## Features
//!
//! - One TTL per store, fixed at construction
//! - Lazy eviction: an expired entry is removed when it is next read
//! - Optional background sweep on the tokio runtime via [`spawn_sweeper`]
//! - Injectable [`Clock`] so expiry can be tested without sleeping
//!
//! ## Example
//!
//! ```rust
//! use recipe_engine::cache_store::CacheStore;
//!
//! let cache: CacheStore<String> = CacheStore::new(60_000)?;
//! cache.set("https://example.org/borscht", "<html>".to_string());
//! assert_eq!(cache.get("https://example.org/borscht").as_deref(), Some("<html>"));
//! assert!(cache.get("https://example.org/shchi").is_none());
//! # Ok::<(), recipe_engine::errors::EngineError>(())
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::errors::EngineError;

/// A cached value and the instant after which it is stale
///
/// `expires_at` is `None` when `now + ttl` does not fit in an `Instant`; such
/// an entry never expires.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub value: T,
    pub expires_at: Option<Instant>,
}

impl<T> CacheEntry<T> {
    /// An entry is expired strictly after its expiry instant
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }
}

/// Thread-safe TTL cache
///
/// # Thread Safety
///
/// A single `Mutex` guards the whole map. Every operation holds it only for
/// the map access itself, so a `set` replaces value and expiry in one step and
/// readers never see a half-written entry.
pub struct CacheStore<T> {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
    clock: Arc<dyn Clock>,
}

impl<T: Clone> CacheStore<T> {
    /// Create a store whose entries live for `ttl_ms` milliseconds
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidTtl`] when `ttl_ms` is zero.
    pub fn new(ttl_ms: u64) -> Result<Self, EngineError> {
        Self::with_clock(ttl_ms, Arc::new(SystemClock))
    }

    /// Create a store that reads time from `clock`
    pub fn with_clock(ttl_ms: u64, clock: Arc<dyn Clock>) -> Result<Self, EngineError> {
        if ttl_ms == 0 {
            return Err(EngineError::InvalidTtl("ttl must be greater than zero".to_string()));
        }

        debug!("Creating cache store with TTL of {} ms", ttl_ms);

        Ok(Self {
            ttl: Duration::from_millis(ttl_ms),
            entries: Mutex::new(HashMap::new()),
            clock,
        })
    }

    /// Time-to-live applied to every entry
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the value for `key` if present and fresh
    ///
    /// An expired entry is removed and reported as absent.
    pub fn get(&self, key: &str) -> Option<T> {
        let now = self.clock.now();
        let mut entries = self.lock();

        let Some(entry) = entries.get(key) else {
            trace!("Cache miss for key: {key}");
            return None;
        };

        if !entry.is_expired(now) {
            trace!("Cache hit for key: {key}");
            return Some(entry.value.clone());
        }

        entries.remove(key);
        debug!("Evicted expired cache entry for key: {key}");
        None
    }

    /// Insert or replace the value for `key`, resetting its expiry
    pub fn set(&self, key: &str, value: T) {
        let now = self.clock.now();
        let expires_at = now.checked_add(self.ttl);

        self.lock().insert(key.to_string(), CacheEntry { value, expires_at });
        trace!("Cached value for key: {key} for {:?}", self.ttl);
    }

    /// Remove `key`, returning whether an entry existed (expired or not)
    pub fn delete(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }

    /// Return the cached value or load, cache and return a fresh one
    ///
    /// The loader runs without holding the lock, so two concurrent misses on
    /// the same key may both load; the later `set` wins. A loader error is
    /// returned as-is and nothing is cached.
    pub fn get_or_try_insert_with<E, F>(&self, key: &str, load: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let value = load()?;
        self.set(key, value.clone());
        Ok(value)
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - entries.len();

        if removed > 0 {
            debug!("Purged {removed} expired cache entries");
        }
        removed
    }

    /// Number of stored entries, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Periodically purge expired entries on the tokio runtime
///
/// The task only holds a weak reference and stops once the last `Arc` to the
/// store is dropped, or when the returned handle is aborted. Must be called
/// from within a tokio runtime.
pub fn spawn_sweeper<T>(cache: &Arc<CacheStore<T>>, every: Duration) -> JoinHandle<()>
where
    T: Clone + Send + 'static,
{
    let cache = Arc::downgrade(cache);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let Some(cache) = cache.upgrade() else {
                debug!("Cache store dropped, stopping sweeper");
                break;
            };
            cache.purge_expired();
        }
    })
}
