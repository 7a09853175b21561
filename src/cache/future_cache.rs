//! The thread-safe plane cache with pending-render entries.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use crate::cache::eviction::eviction_candidate;
use crate::cache::navigation::{NavigationHistory, PlanePoint};
use crate::foundation::error::{LumiplaneError, LumiplaneResult};
use crate::render::raster::PlaneImage;

/// Resolution state of a pending render.
#[derive(Debug)]
enum FutureState {
    Pending,
    Ready(Arc<PlaneImage>),
    // the failure cause is taken by the first (by protocol: only) waiter
    Failed(Option<LumiplaneError>),
    Cancelled,
}

#[derive(Debug)]
struct FutureShared {
    state: Mutex<FutureState>,
    ready: Condvar,
    cancelled: AtomicBool,
}

/// Handle to an in-flight plane render.
///
/// The producer side calls [`ImageFuture::complete`] or [`ImageFuture::fail`]
/// exactly once; consumers block in [`ImageFuture::wait`]. Cancellation is
/// cooperative and best-effort: it flips a flag the producer may poll and
/// wakes any waiter with a cancellation error. A handle that already produced
/// a result when cancelled is discarded silently.
#[derive(Clone, Debug)]
pub struct ImageFuture {
    shared: Arc<FutureShared>,
}

impl Default for ImageFuture {
    fn default() -> Self {
        Self::pending()
    }
}

impl ImageFuture {
    /// A fresh, unresolved handle.
    pub fn pending() -> Self {
        Self {
            shared: Arc::new(FutureShared {
                state: Mutex::new(FutureState::Pending),
                ready: Condvar::new(),
                cancelled: AtomicBool::new(false),
            }),
        }
    }

    /// Resolve the handle with a rendered plane. Ignored after cancellation
    /// or a previous resolution.
    pub fn complete(&self, image: Arc<PlaneImage>) {
        let mut state = lock(&self.shared.state);
        if matches!(*state, FutureState::Pending) {
            *state = FutureState::Ready(image);
            self.shared.ready.notify_all();
        }
    }

    /// Resolve the handle with a failure. Ignored after cancellation or a
    /// previous resolution.
    pub fn fail(&self, err: LumiplaneError) {
        let mut state = lock(&self.shared.state);
        if matches!(*state, FutureState::Pending) {
            *state = FutureState::Failed(Some(err));
            self.shared.ready.notify_all();
        }
    }

    /// Best-effort cancellation: flag the producer and wake waiters. A handle
    /// that already resolved keeps its result.
    pub fn cancel(&self) {
        self.shared.cancelled.store(true, Ordering::Release);
        let mut state = lock(&self.shared.state);
        if matches!(*state, FutureState::Pending) {
            *state = FutureState::Cancelled;
            self.shared.ready.notify_all();
        }
    }

    /// Whether [`ImageFuture::cancel`] has been called. Producers poll this
    /// before starting expensive work.
    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::Acquire)
    }

    /// Block until the handle resolves.
    pub fn wait(&self) -> LumiplaneResult<Arc<PlaneImage>> {
        let mut state = lock(&self.shared.state);
        loop {
            match &mut *state {
                FutureState::Pending => {
                    state = self
                        .shared
                        .ready
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                FutureState::Ready(image) => return Ok(Arc::clone(image)),
                FutureState::Failed(cause) => {
                    return Err(cause.take().unwrap_or_else(|| {
                        LumiplaneError::rendering("plane render failure already reported")
                    }));
                }
                FutureState::Cancelled => {
                    return Err(LumiplaneError::cancelled(
                        "pending plane render was cancelled",
                    ));
                }
            }
        }
    }
}

fn lock<'a, T>(m: &'a Mutex<T>) -> MutexGuard<'a, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A cache slot: either a finished raster or a handle to an in-flight render.
#[derive(Debug)]
enum Entry {
    Resolved(Arc<PlaneImage>),
    Pending(ImageFuture),
}

#[derive(Debug)]
struct CacheState {
    entries: HashMap<PlanePoint, Entry>,
    history: NavigationHistory,
    image_size: usize,
    max_entries: usize,
}

impl CacheState {
    /// Insert under the lock, evicting first when full. Pending victims (and
    /// pending entries displaced by a same-key insert) are cancelled.
    /// Insertion does not record a move; extraction is what navigates.
    fn insert(&mut self, key: PlanePoint, entry: Entry) {
        if self.max_entries == 0 {
            // the insert is a no-op; a pending handle would never resolve
            if let Entry::Pending(fut) = &entry {
                fut.cancel();
            }
            return;
        }
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            let keys: Vec<PlanePoint> = self.entries.keys().copied().collect();
            if let Some(victim) =
                eviction_candidate(&keys, key, self.history.current_direction().as_ref())
                && let Some(Entry::Pending(fut)) = self.entries.remove(&victim)
            {
                fut.cancel();
            }
        }
        if let Some(Entry::Pending(displaced)) = self.entries.insert(key, entry) {
            displaced.cancel();
        }
    }

    fn clear(&mut self) {
        for (_, entry) in self.entries.drain() {
            if let Entry::Pending(fut) = entry {
                fut.cancel();
            }
        }
    }
}

/// Thread-safe, async-capable plane cache.
///
/// Same key space and eviction policy as
/// [`XyCache`](crate::cache::plane_cache::XyCache), but entries may be
/// pending handles for renders still in flight. All mutation happens in one
/// critical section per operation; [`ImageFutureCache::extract`] never holds
/// the lock while waiting on a handle.
#[derive(Debug)]
pub struct ImageFutureCache {
    state: Mutex<CacheState>,
}

impl ImageFutureCache {
    /// Build a cache holding `cache_size_bytes / image_size_bytes` planes.
    /// A zero image size is a configuration error.
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
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                history,
                image_size: image_size_bytes,
                max_entries: cache_size_bytes / image_size_bytes,
            }),
        })
    }

    /// Insert a finished raster.
    pub fn add(&self, key: PlanePoint, image: Arc<PlaneImage>) {
        lock(&self.state).insert(key, Entry::Resolved(image));
    }

    /// Insert a handle to an in-flight render.
    pub fn add_pending(&self, key: PlanePoint, future: ImageFuture) {
        lock(&self.state).insert(key, Entry::Pending(future));
    }

    /// Look up a plane, resolving a pending entry if necessary.
    ///
    /// A pending entry is removed before resolution is attempted and only
    /// re-added on success, so a concurrent extractor racing the same key
    /// misses instead of observing a half-resolved slot. On failure the cause
    /// propagates to the caller and the entry stays gone.
    pub fn extract(&self, key: PlanePoint) -> LumiplaneResult<Option<Arc<PlaneImage>>> {
        let future = {
            let mut state = lock(&self.state);
            state.history.record_move(key);
            match state.entries.get(&key) {
                None => return Ok(None),
                Some(Entry::Resolved(image)) => return Ok(Some(Arc::clone(image))),
                Some(Entry::Pending(_)) => match state.entries.remove(&key) {
                    Some(Entry::Pending(fut)) => fut,
                    _ => unreachable!("entry kind changed under the lock"),
                },
            }
        };

        let image = future.wait()?;
        lock(&self.state).insert(key, Entry::Resolved(Arc::clone(&image)));
        Ok(Some(image))
    }

    /// Whether `key` is cached (resolved or pending).
    pub fn contains(&self, key: PlanePoint) -> bool {
        lock(&self.state).entries.contains_key(&key)
    }

    /// Drop every entry, cancelling pending renders.
    pub fn clear(&self) {
        lock(&self.state).clear();
    }

    /// Recompute the capacity for a new cache size and clear the cache.
    pub fn reset_capacity(&self, cache_size_bytes: usize) {
        let mut state = lock(&self.state);
        state.max_entries = cache_size_bytes / state.image_size;
        state.clear();
    }

    /// Maximum number of entries.
    pub fn max_entries(&self) -> usize {
        lock(&self.state).max_entries
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        lock(&self.state).entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/future_cache.rs"]
mod tests;
