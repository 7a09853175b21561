//! Codomain transform chain applied between quantization and raster write.

pub mod chain;
pub mod context;

pub use chain::CodomainChain;
pub use context::CodomainContext;
