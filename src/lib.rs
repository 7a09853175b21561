//! Lumiplane turns raw, multi-dimensional microscopy pixel data into
//! displayable 2D rasters and caches rendered planes under a
//! navigation-aware eviction policy.
//!
//! The pipeline for one plane: per-channel quantization
//! ([`QuantumStrategy`]) maps raw samples into a codomain, the
//! [`CodomainChain`] applies configurable contrast transforms, and a
//! color-composition strategy assembles the output raster (single-band
//! grey-scale or additive RGB). A [`Renderer`] orchestrates this per pixel
//! set; a [`ViewSession`] wraps it with a bounded plane cache whose eviction
//! follows the user's direction of travel through (z, t) space.
//!
//! Raw pixel data and metadata arrive through the [`PlaneSource`] and
//! [`MetadataSource`] contracts; [`InMemoryVolume`] implements both for
//! in-memory data.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod cache;
pub mod codomain;
pub mod quantum;
pub mod render;
pub mod session;
pub mod settings;
pub mod source;

pub use cache::future_cache::{ImageFuture, ImageFutureCache};
pub use cache::navigation::{Half, NavigationHistory, PlanePoint, TravelLine};
pub use cache::plane_cache::XyCache;
pub use codomain::{CodomainChain, CodomainContext};
pub use foundation::core::{PixelsDimensions, PixelsType, PlaneDef};
pub use foundation::error::{LumiplaneError, LumiplaneResult};
pub use quantum::{QuantumFamily, QuantumManager, QuantumStrategy};
pub use render::raster::PlaneImage;
pub use render::renderer::Renderer;
pub use session::{ViewSession, ViewSessionOpts};
pub use settings::model::{
    ChannelBinding, DEFAULT_BIT_RESOLUTION, LEGAL_BIT_RESOLUTIONS, QuantumDef, RenderingDef,
    RenderingModel,
};
pub use settings::stats::{ChannelHistogram, ChannelStats, default_window};
pub use source::{InMemoryVolume, MetadataSource, PixelsMetadata, Plane2D, PlaneSource};
