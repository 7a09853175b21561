//! Per-pixel-set rendering orchestration.

use std::sync::Arc;

use crate::codomain::{CodomainChain, CodomainContext};
use crate::foundation::core::{PixelsDimensions, PixelsType, PlaneDef};
use crate::foundation::error::{LumiplaneError, LumiplaneResult};
use crate::quantum::{QuantumFamily, QuantumManager};
use crate::render::raster::PlaneImage;
use crate::render::strategy::{RenderContext, RenderingStrategy};
use crate::settings::model::{
    ChannelBinding, QuantumDef, RenderingDef, RenderingModel, validate_coefficient,
};
use crate::source::{MetadataSource, PixelsMetadata, PlaneSource};

/// Per-plane rendering orchestrator for one pixel set.
///
/// A renderer exists only in the initialized state: [`Renderer::initialize`]
/// loads metadata, builds or validates the settings, and wires the quantum
/// manager, codomain chain and strategy together. Settings mutators keep all
/// of that consistent; callers serialize them against in-flight renders of
/// the same pixel set (see [`ViewSession`](crate::session::ViewSession)).
pub struct Renderer {
    source: Arc<dyn PlaneSource>,
    metadata: PixelsMetadata,
    def: RenderingDef,
    quantum: QuantumManager,
    chain: CodomainChain,
    strategy: RenderingStrategy,
}

impl Renderer {
    /// Load metadata and build a renderer.
    ///
    /// `saved` is the persisted settings snapshot for this pixel set; `None`
    /// constructs defaults (grey-scale model, first channel active, linear
    /// family, windows from the channel statistics).
    pub fn initialize(
        source: Arc<dyn PlaneSource>,
        metadata_source: &dyn MetadataSource,
        saved: Option<RenderingDef>,
    ) -> LumiplaneResult<Self> {
        let metadata = metadata_source.metadata()?;
        metadata.validate()?;

        let def = match saved {
            Some(def) => def,
            None => default_def(&metadata),
        };
        def.validate(metadata.dims)?;

        let mut quantum = QuantumManager::new();
        quantum.set_strategy(&def.quantum, metadata.pixels_type, &def.channels)?;

        let mut chain = CodomainChain::new(def.quantum.cd_start, def.quantum.cd_end);
        for context in &def.codomain {
            chain.add_context(*context)?;
        }

        let strategy = RenderingStrategy::for_model(def.model);
        Ok(Self {
            source,
            metadata,
            def,
            quantum,
            chain,
            strategy,
        })
    }

    /// Render one plane into a raster.
    #[tracing::instrument(skip(self), fields(model = ?self.def.model))]
    pub fn render(&self, plane: PlaneDef) -> LumiplaneResult<PlaneImage> {
        plane.validate(self.metadata.dims)?;
        let ctx = RenderContext {
            def: &self.def,
            quantum: &self.quantum,
            chain: &self.chain,
            source: self.source.as_ref(),
            dims: self.metadata.dims,
            plane,
        };
        self.strategy.render(&ctx)
    }

    /// Size in bytes of the raster [`Renderer::render`] would produce.
    pub fn image_size(&self, plane: PlaneDef) -> LumiplaneResult<u64> {
        plane.validate(self.metadata.dims)?;
        Ok(self.strategy.image_size(plane, self.metadata.dims))
    }

    /// Swap the color-composition model.
    pub fn set_model(&mut self, model: RenderingModel) {
        self.def.model = model;
        self.strategy = RenderingStrategy::for_model(model);
    }

    /// Rebuild every channel quantum strategy from the current settings.
    pub fn update_quantum_manager(&mut self) -> LumiplaneResult<()> {
        self.quantum
            .set_strategy(&self.def.quantum, self.metadata.pixels_type, &self.def.channels)
    }

    /// Change the output bit resolution; the codomain resets to the full
    /// `[0, bit_resolution]` interval and propagates down the chain.
    pub fn set_bit_resolution(&mut self, bit_resolution: i32) -> LumiplaneResult<()> {
        let next = QuantumDef {
            bit_resolution,
            cd_start: 0,
            cd_end: bit_resolution,
            ..self.def.quantum
        };
        next.validate()?;
        self.def.quantum = next;
        self.chain.set_codomain(0, bit_resolution);
        self.sync_codomain_defs();
        self.update_quantum_manager()
    }

    /// Narrow the codomain interval within the current bit resolution.
    pub fn set_codomain_interval(&mut self, start: i32, end: i32) -> LumiplaneResult<()> {
        let next = QuantumDef {
            cd_start: start,
            cd_end: end,
            ..self.def.quantum
        };
        next.validate()?;
        self.def.quantum = next;
        self.chain.set_codomain(start, end);
        self.sync_codomain_defs();
        self.update_quantum_manager()
    }

    /// Set one channel's contrast window.
    pub fn set_channel_window(
        &mut self,
        channel: usize,
        start: f64,
        end: f64,
    ) -> LumiplaneResult<()> {
        self.quantum.set_window(channel, start, end)?;
        let binding = self.binding_mut(channel)?;
        binding.input_start = start;
        binding.input_end = end;
        Ok(())
    }

    /// One channel's contrast window.
    pub fn channel_window(&self, channel: usize) -> LumiplaneResult<(f64, f64)> {
        let binding = self.binding(channel)?;
        Ok((binding.input_start, binding.input_end))
    }

    /// Toggle a channel's contribution to the output.
    pub fn set_active(&mut self, channel: usize, active: bool) -> LumiplaneResult<()> {
        self.binding_mut(channel)?.active = active;
        Ok(())
    }

    /// Set a channel's color.
    pub fn set_rgba(&mut self, channel: usize, rgba: [u8; 4]) -> LumiplaneResult<()> {
        self.binding_mut(channel)?.rgba = rgba;
        Ok(())
    }

    /// Set a channel's value map, curve coefficient and noise-reduction flag.
    pub fn set_quantization_map(
        &mut self,
        channel: usize,
        family: QuantumFamily,
        coefficient: f64,
        noise_reduction: bool,
    ) -> LumiplaneResult<()> {
        validate_coefficient(coefficient)?;
        {
            let binding = self.binding_mut(channel)?;
            binding.family = family;
            binding.coefficient = coefficient;
            binding.noise_reduction = noise_reduction;
        }
        self.update_quantum_manager()
    }

    /// Set the default optical section.
    pub fn set_default_z(&mut self, z: u32) -> LumiplaneResult<()> {
        if z >= self.metadata.dims.size_z {
            return Err(LumiplaneError::configuration(format!(
                "default z {z} out of range (size {})",
                self.metadata.dims.size_z
            )));
        }
        self.def.default_z = z;
        Ok(())
    }

    /// Set the default timepoint.
    pub fn set_default_t(&mut self, t: u32) -> LumiplaneResult<()> {
        if t >= self.metadata.dims.size_t {
            return Err(LumiplaneError::configuration(format!(
                "default t {t} out of range (size {})",
                self.metadata.dims.size_t
            )));
        }
        self.def.default_t = t;
        Ok(())
    }

    /// Append a codomain context to the chain.
    pub fn add_codomain_context(&mut self, context: CodomainContext) -> LumiplaneResult<()> {
        self.chain.add_context(context)?;
        self.sync_codomain_defs();
        Ok(())
    }

    /// Replace the codomain context of the same kind.
    pub fn update_codomain_context(&mut self, context: CodomainContext) -> LumiplaneResult<()> {
        self.chain.update_context(context)?;
        self.sync_codomain_defs();
        Ok(())
    }

    /// Remove the codomain context of the same kind; reports whether one was
    /// present.
    pub fn remove_codomain_context(&mut self, context: &CodomainContext) -> bool {
        let removed = self.chain.remove_context(context);
        if removed {
            self.sync_codomain_defs();
        }
        removed
    }

    /// Current settings snapshot.
    pub fn rendering_def(&self) -> &RenderingDef {
        &self.def
    }

    /// Pixel set dimensions.
    pub fn dims(&self) -> PixelsDimensions {
        self.metadata.dims
    }

    /// Raw sample type of the pixel set.
    pub fn pixels_type(&self) -> PixelsType {
        self.metadata.pixels_type
    }

    /// Active color-composition model.
    pub fn model(&self) -> RenderingModel {
        self.def.model
    }

    fn binding(&self, channel: usize) -> LumiplaneResult<&ChannelBinding> {
        let n = self.def.channels.len();
        self.def.channels.get(channel).ok_or_else(|| {
            LumiplaneError::configuration(format!("channel {channel} out of range ({n} bound)"))
        })
    }

    fn binding_mut(&mut self, channel: usize) -> LumiplaneResult<&mut ChannelBinding> {
        let n = self.def.channels.len();
        self.def.channels.get_mut(channel).ok_or_else(|| {
            LumiplaneError::configuration(format!("channel {channel} out of range ({n} bound)"))
        })
    }

    fn sync_codomain_defs(&mut self) {
        self.def.codomain = self.chain.contexts().to_vec();
    }
}

/// Default settings for a pixel set seen for the first time.
fn default_def(metadata: &PixelsMetadata) -> RenderingDef {
    let channels = metadata
        .channels
        .iter()
        .enumerate()
        .map(|(i, stats)| {
            let (input_start, input_end) = stats.default_window();
            ChannelBinding {
                active: i == 0,
                input_start,
                input_end,
                rgba: [255, 255, 255, 255],
                family: QuantumFamily::Linear,
                coefficient: 1.0,
                noise_reduction: true,
                stats: stats.clone(),
            }
        })
        .collect();

    RenderingDef {
        quantum: QuantumDef::default(),
        channels,
        default_z: metadata.dims.size_z / 2,
        default_t: 0,
        model: RenderingModel::GreyScale,
        codomain: Vec::new(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
