/*!
 * Caller-owned cache of the last proofreading result.
 *
 * Proofreading is slow and billed per call, while the script is re-rendered on
 * every formatting change. The cache keeps one response, keyed by a hash of the
 * input text; looking up a different input drops it.
 */

use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone)]
struct CacheEntry {
    key: String,
    response: String,
}

/// Single-slot proofreading result cache
#[derive(Debug, Clone, Default)]
pub struct ProofreadCache {
    slot: Arc<RwLock<Option<CacheEntry>>>,
    hits: Arc<RwLock<usize>>,
    misses: Arc<RwLock<usize>>,
}

impl ProofreadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// SHA-256 of the input with surrounding whitespace removed
    pub fn key_for(input: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(input.trim().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Cached response for `input`.
    ///
    /// A lookup for a different input than the cached one invalidates the slot.
    pub fn get(&self, input: &str) -> Option<String> {
        let key = Self::key_for(input);
        let mut slot = self.slot.write();

        match slot.as_ref() {
            Some(entry) if entry.key == key => {
                *self.hits.write() += 1;
                debug!("Proofreading cache hit for {}", &key[..12]);
                Some(entry.response.clone())
            }
            Some(_) => {
                *self.misses.write() += 1;
                debug!("Input changed, dropping cached proofreading result");
                *slot = None;
                None
            }
            None => {
                *self.misses.write() += 1;
                debug!("Proofreading cache miss for {}", &key[..12]);
                None
            }
        }
    }

    /// Store the response for `input`, replacing whatever was cached
    pub fn store(&self, input: &str, response: &str) {
        let key = Self::key_for(input);
        *self.slot.write() = Some(CacheEntry {
            key,
            response: response.to_string(),
        });
    }

    /// Drop the cached response
    pub fn invalidate(&self) {
        *self.slot.write() = None;
    }

    pub fn is_empty(&self) -> bool {
        self.slot.read().is_none()
    }

    /// Hits, misses and hit rate
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = *self.hits.read();
        let misses = *self.misses.read();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }
}
