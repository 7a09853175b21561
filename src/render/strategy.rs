use crate::codomain::CodomainChain;
use crate::foundation::core::{PixelsDimensions, PlaneDef};
use crate::foundation::error::LumiplaneResult;
use crate::quantum::QuantumManager;
use crate::render::raster::PlaneImage;
use crate::settings::model::{RenderingDef, RenderingModel};
use crate::source::PlaneSource;

/// Everything a strategy needs to turn raw planes into a raster.
pub(crate) struct RenderContext<'a> {
    pub(crate) def: &'a RenderingDef,
    pub(crate) quantum: &'a QuantumManager,
    pub(crate) chain: &'a CodomainChain,
    pub(crate) source: &'a dyn PlaneSource,
    pub(crate) dims: PixelsDimensions,
    pub(crate) plane: PlaneDef,
}

/// Color-composition strategy: how quantized channel values are assembled
/// into the output raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RenderingStrategy {
    /// Single band fed by the first active channel.
    GreyScale,
    /// Additive three-band composition of every active channel.
    Rgb,
}

impl RenderingStrategy {
    pub(crate) fn for_model(model: RenderingModel) -> Self {
        match model {
            RenderingModel::GreyScale => Self::GreyScale,
            RenderingModel::Rgb => Self::Rgb,
        }
    }

    /// Output raster dimensions for `plane`.
    ///
    /// XY slices are (size_x, size_y) under both strategies. For XZ and YZ
    /// slices the grey-scale raster is transposed relative to the RGB one:
    /// RGB keeps the plane's natural orientation (spatial axis, sections),
    /// grey-scale puts the section axis first.
    pub(crate) fn plane_size(self, plane: PlaneDef, dims: PixelsDimensions) -> (u32, u32) {
        match (plane, self) {
            (PlaneDef::Xy { .. }, _) => (dims.size_x, dims.size_y),
            (PlaneDef::Xz { .. }, Self::Rgb) => (dims.size_x, dims.size_z),
            (PlaneDef::Xz { .. }, Self::GreyScale) => (dims.size_z, dims.size_x),
            (PlaneDef::Yz { .. }, Self::Rgb) => (dims.size_y, dims.size_z),
            (PlaneDef::Yz { .. }, Self::GreyScale) => (dims.size_z, dims.size_y),
        }
    }

    /// Size in bytes of the raster [`RenderingStrategy::render`] produces.
    pub(crate) fn image_size(self, plane: PlaneDef, dims: PixelsDimensions) -> u64 {
        let (w, h) = self.plane_size(plane, dims);
        let bands = match self {
            Self::GreyScale => 1,
            Self::Rgb => 3,
        };
        u64::from(w) * u64::from(h) * bands
    }

    /// Render one plane.
    pub(crate) fn render(self, ctx: &RenderContext<'_>) -> LumiplaneResult<PlaneImage> {
        match self {
            Self::GreyScale => render_grey(ctx),
            Self::Rgb => render_rgb(ctx),
        }
    }
}

/// Dimensions of the fetched plane in its natural orientation.
fn fetch_size(plane: PlaneDef, dims: PixelsDimensions) -> (u32, u32) {
    match plane {
        PlaneDef::Xy { .. } => (dims.size_x, dims.size_y),
        PlaneDef::Xz { .. } => (dims.size_x, dims.size_z),
        PlaneDef::Yz { .. } => (dims.size_y, dims.size_z),
    }
}

fn render_grey(ctx: &RenderContext<'_>) -> LumiplaneResult<PlaneImage> {
    let (w, h) = RenderingStrategy::GreyScale.plane_size(ctx.plane, ctx.dims);
    let mut img = PlaneImage::new_grey(w, h);

    // Only the first active channel renders; none active leaves the raster
    // at its initial value.
    let Some((channel, _)) = ctx
        .def
        .channels
        .iter()
        .enumerate()
        .find(|(_, b)| b.active)
    else {
        return Ok(img);
    };

    let (fw, fh) = fetch_size(ctx.plane, ctx.dims);
    let plane = ctx.source.fetch_plane(ctx.plane, channel, fw, fh)?;
    plane.expect_size(fw, fh)?;
    let strategy = ctx.quantum.strategy_for(channel)?;

    let out = img.grey_mut();
    match ctx.plane {
        PlaneDef::Xy { .. } => {
            for (dst, &s) in out.iter_mut().zip(&plane.samples) {
                *dst = ctx.chain.transform(i32::from(strategy.quantize(s))) as u8;
            }
        }
        // transposed write: section axis becomes the output row-major width
        PlaneDef::Xz { .. } | PlaneDef::Yz { .. } => {
            let (fw, fh) = (fw as usize, fh as usize);
            for row in 0..fh {
                for col in 0..fw {
                    let v = ctx
                        .chain
                        .transform(i32::from(strategy.quantize(plane.samples[row * fw + col])));
                    out[col * fh + row] = v as u8;
                }
            }
        }
    }
    Ok(img)
}

fn render_rgb(ctx: &RenderContext<'_>) -> LumiplaneResult<PlaneImage> {
    let (w, h) = RenderingStrategy::Rgb.plane_size(ctx.plane, ctx.dims);
    let mut img = PlaneImage::new_rgb(w, h);
    let (r, g, b) = img.rgb_mut();

    for (channel, binding) in ctx.def.channels.iter().enumerate() {
        if !binding.active {
            continue;
        }
        let plane = ctx.source.fetch_plane(ctx.plane, channel, w, h)?;
        plane.expect_size(w, h)?;
        let strategy = ctx.quantum.strategy_for(channel)?;

        let [cr, cg, cb, ca] = binding.rgba;
        let (cr, cg, cb, ca) = (
            u32::from(cr),
            u32::from(cg),
            u32::from(cb),
            u32::from(ca),
        );
        for (i, &s) in plane.samples.iter().enumerate() {
            let v = ctx.chain.transform(i32::from(strategy.quantize(s))) as u32;
            // additive accumulation with per-band integer truncation; overflow
            // wraps rather than clamps
            r[i] = r[i].wrapping_add(((cr * v * ca) / (255 * 255)) as u8);
            g[i] = g[i].wrapping_add(((cg * v * ca) / (255 * 255)) as u8);
            b[i] = b[i].wrapping_add(((cb * v * ca) / (255 * 255)) as u8);
        }
    }
    Ok(img)
}

#[cfg(test)]
#[path = "../../tests/unit/render/strategy.rs"]
mod tests;
