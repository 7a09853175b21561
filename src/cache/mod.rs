//! Plane caching: navigation history/geometry, the eviction policy, and the
//! two cache variants.

pub(crate) mod eviction;
pub mod future_cache;
pub mod navigation;
pub mod plane_cache;

pub use future_cache::{ImageFuture, ImageFutureCache};
pub use navigation::{Half, NavigationHistory, PlanePoint, TravelLine};
pub use plane_cache::XyCache;
