//! Time-windowed in-memory cache with a background eviction sweep
//!
//! Provides a `TimedCache` that stores raw response bytes keyed by URL,
//! stamping every entry with its insertion time. A background task removes
//! entries once they are older than the configured TTL.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::debug;

/// A single cached value with its insertion timestamp
#[derive(Debug, Clone)]
struct CacheEntry {
    /// When the entry was inserted (or last overwritten)
    created_at: Instant,
    /// The cached bytes
    value: Vec<u8>,
}

/// Thread-safe key/value cache with fixed-interval expiry
///
/// Entries live until a periodic sweep finds them older than the TTL, so a
/// value may be observable for up to one sweep interval past its nominal
/// expiry (bounded staleness). Reads never refresh an entry's age; rewriting
/// a key does.
///
/// Cloning produces a handle to the same underlying cache. The sweep task
/// stops when `shutdown` is called or every handle has been dropped.
#[derive(Debug, Clone)]
pub struct TimedCache {
    /// Entries keyed by request URL
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
    /// Maximum entry age; also the sweep tick period
    ttl: Duration,
    /// Signals the sweep task to stop
    shutdown_tx: mpsc::Sender<()>,
}

impl TimedCache {
    /// Creates an empty cache and spawns its background sweep task
    ///
    /// The sweep runs once per `ttl` for the lifetime of the cache. `ttl`
    /// must be nonzero.
    pub fn new(ttl: Duration) -> Self {
        debug_assert!(!ttl.is_zero(), "cache TTL must be nonzero");

        let entries: Arc<Mutex<HashMap<String, CacheEntry>>> =
            Arc::new(Mutex::new(HashMap::new()));
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let sweep_entries = Arc::clone(&entries);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(ttl);
            // Skip the first tick (immediate)
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        sweep(&sweep_entries, ttl);
                    }
                    // Closed channel means every cache handle is gone
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self {
            entries,
            ttl,
            shutdown_tx,
        }
    }

    /// Inserts or overwrites the entry for `key`, stamping it with the
    /// current time
    ///
    /// Overwriting an existing key resets its age, so the entry expires
    /// relative to the latest write.
    pub fn add(&self, key: &str, value: Vec<u8>) {
        let mut entries = lock_entries(&self.entries);
        entries.insert(
            key.to_string(),
            CacheEntry {
                created_at: Instant::now(),
                value,
            },
        );
    }

    /// Returns the cached bytes for `key`, or `None` if the key was never
    /// added or has been swept
    ///
    /// A read does not extend the entry's lifetime.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        let entries = lock_entries(&self.entries);
        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Number of entries currently held (including any awaiting the next
    /// sweep)
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        lock_entries(&self.entries).len()
    }

    /// Whether the cache currently holds no entries
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stops the background sweep task
    ///
    /// Entries already in the cache remain readable afterwards; they just
    /// stop being evicted. Used by tests and the clean-exit path.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Removes every entry whose age has reached `ttl`
///
/// Holds the lock for the whole pass so callers never observe a partially
/// swept mapping.
fn sweep(entries: &Mutex<HashMap<String, CacheEntry>>, ttl: Duration) {
    let mut entries = lock_entries(entries);
    let before = entries.len();
    let now = Instant::now();
    entries.retain(|_, entry| now.duration_since(entry.created_at) < ttl);

    let evicted = before - entries.len();
    if evicted > 0 {
        debug!(evicted, remaining = entries.len(), "swept expired cache entries");
    }
}

/// Locks the entry map, recovering the guard if a previous holder panicked
fn lock_entries(
    entries: &Mutex<HashMap<String, CacheEntry>>,
) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
    entries
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
