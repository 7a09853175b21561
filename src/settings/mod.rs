//! Rendering settings: the persisted model and channel statistics.

pub mod model;
pub mod stats;

pub use model::{
    ChannelBinding, DEFAULT_BIT_RESOLUTION, LEGAL_BIT_RESOLUTIONS, QuantumDef, RenderingDef,
    RenderingModel,
};
pub use stats::{ChannelHistogram, ChannelStats, DEFAULT_HISTOGRAM_BINS, default_window};
