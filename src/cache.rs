//! ResultCache - bounded in-memory cache of rendered output.
//!
//! Keyed by the source image's content id plus the normalised config, so a
//! repeated conversion returns the stored string without touching a pixel.
//! Eviction is first-in first-out: once `capacity` is exceeded the oldest
//! insertion goes.

use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

use crate::config::ConversionConfig;
use crate::error::{ConvertError, Result};

/// Entries kept when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Default)]
struct Entries {
    map: HashMap<String, String>,
    /// Insertion order, oldest first.
    order: VecDeque<String>,
}

/// Thread-safe bounded result cache.
///
/// Reads take the shared lock; an insert and its eviction happen under one
/// write lock, so concurrent writers can neither lose entries nor push the
/// cache past capacity.
pub struct ResultCache {
    capacity: usize,
    entries: RwLock<Entries>,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ResultCache {
    /// Create a cache holding at most `capacity` results. Zero disables it.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RwLock::new(Entries::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get a cached result by key, if present.
    pub fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.map.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.map.contains_key(key)
    }

    /// Store a result, evicting the oldest entries if over capacity.
    ///
    /// Re-inserting an existing key replaces its value but keeps its place in
    /// the eviction order.
    pub fn insert(&self, key: String, value: String) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = entries.map.get_mut(&key) {
            *existing = value;
            return;
        }
        entries.order.push_back(key.clone());
        entries.map.insert(key, value);
        while entries.order.len() > self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.map.remove(&oldest);
                log::debug!("evicted cache entry {}", oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.map.clear();
        entries.order.clear();
    }
}

/// Deterministic cache key for an image and a normalised config.
///
/// Returns a 32-character hex string (first 16 bytes of SHA256).
pub fn cache_key(image_id: &str, cfg: &ConversionConfig) -> Result<String> {
    let config_json = serde_json::to_string(cfg)
        .map_err(|e| ConvertError::Processing(format!("failed to serialise config: {}", e)))?;
    let mut hasher = Sha256::new();
    hasher.update(image_id.as_bytes());
    hasher.update(b"\n");
    hasher.update(config_json.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(&result[..16]))
}
