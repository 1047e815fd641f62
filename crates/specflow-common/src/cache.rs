//! Caller-owned single-slot content cache
//!
//! Memoizes the result of an expensive pure function of a text document
//! (typically parsing) keyed by a SHA-256 hash of the content. The cache
//! holds at most one entry: a lookup with different content replaces it.

use sha2::{Digest, Sha256};
use tracing::trace;

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Hex-encoded SHA-256 of `content`
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

struct Slot<V> {
    hash: String,
    value: V,
}

/// Single-slot cache keyed by content hash
pub struct ContentCache<V> {
    slot: Option<Slot<V>>,
    stats: CacheStats,
}

impl<V> ContentCache<V> {
    pub fn new() -> Self {
        Self {
            slot: None,
            stats: CacheStats::default(),
        }
    }

    /// Return the cached value for `content`, computing it with `compute` on a miss.
    ///
    /// Errors from `compute` are returned as-is and leave the current slot untouched.
    pub fn get_or_try_insert_with<E, F>(&mut self, content: &str, compute: F) -> Result<&V, E>
    where
        F: FnOnce(&str) -> Result<V, E>,
    {
        let hash = content_hash(content);

        let slot = match self.slot.take() {
            Some(slot) if slot.hash == hash => {
                self.stats.hits += 1;
                trace!(hash = %hash, "content cache hit");
                slot
            }
            previous => {
                self.stats.misses += 1;
                trace!(hash = %hash, "content cache miss");
                let value = match compute(content) {
                    Ok(value) => value,
                    Err(e) => {
                        self.slot = previous;
                        return Err(e);
                    }
                };
                if previous.is_some() {
                    self.stats.evictions += 1;
                }
                Slot { hash, value }
            }
        };

        Ok(&self.slot.insert(slot).value)
    }

    /// Peek at the cached value if it belongs to `content`
    pub fn get(&self, content: &str) -> Option<&V> {
        let hash = content_hash(content);
        self.slot
            .as_ref()
            .filter(|slot| slot.hash == hash)
            .map(|slot| &slot.value)
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

impl<V> Default for ContentCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
