//! Turning raw planes into rasters: the raster type, the color-composition
//! strategies and the per-pixel-set renderer.

pub mod raster;
pub mod renderer;
pub(crate) mod strategy;

pub use raster::PlaneImage;
pub use renderer::Renderer;
