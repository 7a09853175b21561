//! The synchronous bounded plane cache.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::eviction::eviction_candidate;
use crate::cache::navigation::{NavigationHistory, PlanePoint};
use crate::foundation::error::{LumiplaneError, LumiplaneResult};
use crate::render::raster::PlaneImage;

/// Bounded cache of rendered XY planes keyed by (z, t).
///
/// Capacity is `cache_size_bytes / image_size_bytes` entries; when full, the
/// navigation-aware eviction policy picks the victim. Extraction is
/// navigation: every lookup records a move in the owned
/// [`NavigationHistory`]. Insertion only populates; a prefetched plane must
/// not bend the travel line the eviction consults.
///
/// This variant is single-threaded; wrap it in a lock, or use
/// [`ImageFutureCache`](crate::cache::future_cache::ImageFutureCache) for the
/// thread-safe, async-capable version.
#[derive(Debug)]
pub struct XyCache {
    entries: HashMap<PlanePoint, Arc<PlaneImage>>,
    history: NavigationHistory,
    image_size: usize,
    max_entries: usize,
}

impl XyCache {
    /// Build a cache holding `cache_size_bytes / image_size_bytes` planes.
    ///
    /// A zero image size is a configuration error. An image larger than the
    /// whole cache yields a capacity of zero: every [`XyCache::add`] is then
    /// ignored and every [`XyCache::extract`] misses.
    pub fn new(
        cache_size_bytes: usize,
        image_size_bytes: usize,
        history: NavigationHistory,
    ) -> LumiplaneResult<Self> {
        if image_size_bytes == 0 {
            return Err(LumiplaneError::configuration(
                "cache image size must be > 0 bytes",
            ));
        }
        Ok(Self {
            entries: HashMap::new(),
            history,
            image_size: image_size_bytes,
            max_entries: cache_size_bytes / image_size_bytes,
        })
    }

    /// Insert a rendered plane, evicting first when full.
    pub fn add(&mut self, key: PlanePoint, image: Arc<PlaneImage>) {
        if self.max_entries == 0 {
            return;
        }
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            let keys: Vec<PlanePoint> = self.entries.keys().copied().collect();
            if let Some(victim) =
                eviction_candidate(&keys, key, self.history.current_direction().as_ref())
            {
                self.entries.remove(&victim);
            }
        }
        self.entries.insert(key, image);
    }

    /// Look up a rendered plane, recording the move.
    pub fn extract(&mut self, key: PlanePoint) -> Option<Arc<PlaneImage>> {
        self.history.record_move(key);
        self.entries.get(&key).cloned()
    }

    /// Whether `key` is cached.
    pub fn contains(&self, key: PlanePoint) -> bool {
        self.entries.contains_key(&key)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Recompute the capacity for a new cache size and clear the cache (old
    /// entries were sized under the previous accounting).
    pub fn reset_capacity(&mut self, cache_size_bytes: usize) {
        self.max_entries = cache_size_bytes / self.image_size;
        self.entries.clear();
    }

    /// Maximum number of entries.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/plane_cache.rs"]
mod tests;
