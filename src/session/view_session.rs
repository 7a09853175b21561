//! The cached, navigation-aware rendering session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::cache::future_cache::{ImageFuture, ImageFutureCache};
use crate::cache::navigation::{NavigationHistory, PlanePoint};
use crate::codomain::CodomainContext;
use crate::foundation::core::{PixelsDimensions, PlaneDef};
use crate::foundation::error::{LumiplaneError, LumiplaneResult};
use crate::quantum::QuantumFamily;
use crate::render::raster::PlaneImage;
use crate::render::renderer::Renderer;
use crate::settings::model::{RenderingDef, RenderingModel};

/// Options for a [`ViewSession`].
#[derive(Clone, Copy, Debug)]
pub struct ViewSessionOpts {
    /// Total bytes budgeted for cached planes.
    pub cache_size_bytes: usize,
    /// Worker thread count for asynchronous renders. `None` uses the rayon
    /// default.
    pub threads: Option<usize>,
}

impl Default for ViewSessionOpts {
    fn default() -> Self {
        Self {
            cache_size_bytes: 64 * 1024 * 1024,
            threads: None,
        }
    }
}

struct SessionInner {
    renderer: Mutex<Renderer>,
    cache: ImageFutureCache,
}

/// Cached, navigation-aware rendering session over one pixel set.
///
/// The session consults the plane cache before invoking the renderer and
/// inserts the result afterward; every access feeds the navigation history
/// the eviction policy reads. Settings changes go through the session so the
/// cache is invalidated exactly when rendered pixels become stale.
///
/// The renderer sits behind a mutex: settings changes serialize against
/// in-flight renders of this pixel set, while independent sessions render in
/// parallel with no shared state.
pub struct ViewSession {
    inner: Arc<SessionInner>,
    pool: rayon::ThreadPool,
}

impl ViewSession {
    /// Wrap a renderer in a cached session.
    ///
    /// The cache entry size is the pixel set's XY RGB raster size (the
    /// largest plane the session caches), so capacity accounting stays valid
    /// across model switches.
    pub fn new(renderer: Renderer, opts: ViewSessionOpts) -> LumiplaneResult<Self> {
        let dims = renderer.dims();
        let image_size = dims.size_x as usize * dims.size_y as usize * 3;
        let cache = ImageFutureCache::new(
            opts.cache_size_bytes,
            image_size,
            NavigationHistory::new(),
        )?;
        Ok(Self {
            inner: Arc::new(SessionInner {
                renderer: Mutex::new(renderer),
                cache,
            }),
            pool: build_thread_pool(opts.threads)?,
        })
    }

    /// Render a plane, going through the cache for XY slices.
    ///
    /// Non-XY slices always render directly: the cache key space is (z, t)
    /// and only XY planes live in it.
    #[tracing::instrument(skip(self))]
    pub fn render(&self, plane: PlaneDef) -> LumiplaneResult<Arc<PlaneImage>> {
        let PlaneDef::Xy { z, t } = plane else {
            return self.render_uncached(plane);
        };
        let key = PlanePoint::new(z, t);
        if let Some(image) = self.inner.cache.extract(key)? {
            return Ok(image);
        }
        let image = self.render_uncached(plane)?;
        self.inner.cache.add(key, Arc::clone(&image));
        Ok(image)
    }

    /// Queue asynchronous renders for XY planes the cache does not hold yet.
    ///
    /// Each queued plane gets a pending cache entry immediately; extraction
    /// blocks on it, eviction cancels it. Useful for warming the cache along
    /// the expected navigation path.
    #[tracing::instrument(skip(self))]
    pub fn prefetch(&self, keys: &[PlanePoint]) {
        for &key in keys {
            if self.inner.cache.contains(key) {
                continue;
            }
            let future = ImageFuture::pending();
            self.inner.cache.add_pending(key, future.clone());
            let inner = Arc::clone(&self.inner);
            self.pool.spawn(move || {
                if future.is_cancelled() {
                    return;
                }
                let result = lock(&inner.renderer).render(PlaneDef::Xy { z: key.z, t: key.t });
                match result {
                    Ok(image) => future.complete(Arc::new(image)),
                    Err(e) => future.fail(e),
                }
            });
        }
    }

    /// Raster size in bytes for `plane` under the current model.
    pub fn image_size(&self, plane: PlaneDef) -> LumiplaneResult<u64> {
        lock(&self.inner.renderer).image_size(plane)
    }

    /// Pixel set dimensions.
    pub fn dims(&self) -> PixelsDimensions {
        lock(&self.inner.renderer).dims()
    }

    /// Snapshot of the current settings, for persistence.
    pub fn rendering_def(&self) -> RenderingDef {
        lock(&self.inner.renderer).rendering_def().clone()
    }

    /// Drop every cached plane, cancelling pending renders.
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    /// Resize the cache; recomputes the capacity and clears it.
    pub fn reset_cache_capacity(&self, cache_size_bytes: usize) {
        self.inner.cache.reset_capacity(cache_size_bytes);
    }

    /// Whether an XY plane is cached (resolved or in flight).
    pub fn is_cached(&self, key: PlanePoint) -> bool {
        self.inner.cache.contains(key)
    }

    /// Swap the color-composition model.
    pub fn set_model(&self, model: RenderingModel) {
        lock(&self.inner.renderer).set_model(model);
        self.inner.cache.clear();
    }

    /// Change the output bit resolution.
    pub fn set_bit_resolution(&self, bit_resolution: i32) -> LumiplaneResult<()> {
        self.mutate(|r| r.set_bit_resolution(bit_resolution))
    }

    /// Narrow the codomain interval.
    pub fn set_codomain_interval(&self, start: i32, end: i32) -> LumiplaneResult<()> {
        self.mutate(|r| r.set_codomain_interval(start, end))
    }

    /// Set one channel's contrast window.
    pub fn set_channel_window(&self, channel: usize, start: f64, end: f64) -> LumiplaneResult<()> {
        self.mutate(|r| r.set_channel_window(channel, start, end))
    }

    /// Toggle a channel.
    pub fn set_active(&self, channel: usize, active: bool) -> LumiplaneResult<()> {
        self.mutate(|r| r.set_active(channel, active))
    }

    /// Set a channel's color.
    pub fn set_rgba(&self, channel: usize, rgba: [u8; 4]) -> LumiplaneResult<()> {
        self.mutate(|r| r.set_rgba(channel, rgba))
    }

    /// Set a channel's value map, coefficient and noise-reduction flag.
    pub fn set_quantization_map(
        &self,
        channel: usize,
        family: QuantumFamily,
        coefficient: f64,
        noise_reduction: bool,
    ) -> LumiplaneResult<()> {
        self.mutate(|r| r.set_quantization_map(channel, family, coefficient, noise_reduction))
    }

    /// Append a codomain context.
    pub fn add_codomain_context(&self, context: CodomainContext) -> LumiplaneResult<()> {
        self.mutate(|r| r.add_codomain_context(context))
    }

    /// Replace the codomain context of the same kind.
    pub fn update_codomain_context(&self, context: CodomainContext) -> LumiplaneResult<()> {
        self.mutate(|r| r.update_codomain_context(context))
    }

    /// Remove the codomain context of the same kind.
    pub fn remove_codomain_context(&self, context: &CodomainContext) -> bool {
        let removed = lock(&self.inner.renderer).remove_codomain_context(context);
        if removed {
            self.inner.cache.clear();
        }
        removed
    }

    /// Set the default optical section.
    pub fn set_default_z(&self, z: u32) -> LumiplaneResult<()> {
        // defaults do not affect rendered pixels; no cache invalidation
        lock(&self.inner.renderer).set_default_z(z)
    }

    /// Set the default timepoint.
    pub fn set_default_t(&self, t: u32) -> LumiplaneResult<()> {
        lock(&self.inner.renderer).set_default_t(t)
    }

    fn render_uncached(&self, plane: PlaneDef) -> LumiplaneResult<Arc<PlaneImage>> {
        Ok(Arc::new(lock(&self.inner.renderer).render(plane)?))
    }

    /// Apply a settings mutation, clearing the cache only on success.
    fn mutate(
        &self,
        f: impl FnOnce(&mut Renderer) -> LumiplaneResult<()>,
    ) -> LumiplaneResult<()> {
        f(&mut lock(&self.inner.renderer))?;
        self.inner.cache.clear();
        Ok(())
    }
}

fn lock<'a, T>(m: &'a Mutex<T>) -> MutexGuard<'a, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn build_thread_pool(threads: Option<usize>) -> LumiplaneResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(LumiplaneError::configuration(
            "session 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LumiplaneError::rendering(format!("failed to build rayon thread pool: {e}")))
}
