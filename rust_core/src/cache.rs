//! Bounded in-memory cache with per-entry time-to-live.
//!
//! Shared by every gateway operation to bound upstream load. Entries are
//! idempotently recomputable, so there is no single-flight deduplication:
//! concurrent misses on the same key each fetch upstream independently.
//!
//! The lock is scoped to map operations only and is never held across an
//! upstream call, so unrelated fetches are not serialized.

use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    inserted: Instant,
}

struct Inner<V> {
    map: HashMap<String, Entry<V>>,
    /// Keys in insertion order, oldest first. Re-inserting a key moves it
    /// to the back.
    order: VecDeque<String>,
}

/// Expiring key/value store with a maximum entry count.
///
/// A read after the TTL has elapsed is a miss, identical to a key that was
/// never inserted. Once the capacity bound is exceeded the oldest-inserted
/// entries are evicted.
pub struct TtlCache<V> {
    inner: RwLock<Inner<V>>,
    ttl: Duration,
    max_entries: usize,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
            ttl,
            max_entries,
        }
    }

    /// Look up a key. Expired entries are reported as misses and removed
    /// lazily on the next write that touches them.
    pub fn get(&self, key: &str) -> Option<V> {
        let inner = self.inner.read();
        let entry = inner.map.get(key)?;
        if entry.inserted.elapsed() > self.ttl {
            return None;
        }
        Some(entry.value.clone())
    }

    /// Insert a value, replacing any existing entry under the same key and
    /// evicting the oldest entries once the capacity bound is exceeded.
    pub fn put(&self, key: &str, value: V) {
        let mut inner = self.inner.write();

        if inner.map.contains_key(key) {
            inner.order.retain(|k| k != key);
        }
        inner.order.push_back(key.to_string());
        inner.map.insert(
            key.to_string(),
            Entry {
                value,
                inserted: Instant::now(),
            },
        );

        while inner.map.len() > self.max_entries {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.map.remove(&oldest);
                }
                None => break,
            }
        }
    }

    /// Remove every entry atomically.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.map.clear();
        inner.order.clear();
    }

    /// Number of stored entries, expired ones included until they are
    /// overwritten or evicted.
    pub fn len(&self) -> usize {
        self.inner.read().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build a cache key from an operation prefix and its arguments.
///
/// Arguments are joined with `:` after the prefix. Argument values are not
/// escaped; operation prefixes are chosen so that joined strings cannot
/// collide across operations.
pub fn cache_key(prefix: &str, args: &[&str]) -> String {
    if args.is_empty() {
        prefix.to_string()
    } else {
        format!("{}:{}", prefix, args.join(":"))
    }
}
