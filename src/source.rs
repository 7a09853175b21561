//! Collaborator contracts: raw plane access and metadata, plus an in-memory
//! reference implementation backing the tests and simple callers.

use std::sync::Arc;

use crate::foundation::core::{PixelsDimensions, PixelsType, PlaneDef};
use crate::foundation::error::{LumiplaneError, LumiplaneResult};
use crate::settings::stats::{ChannelHistogram, ChannelStats, DEFAULT_HISTOGRAM_BINS};

/// Raw samples of one plane for one channel.
///
/// Row-major; the row axis is the *second* plane axis: Y for XY slices, Z for
/// XZ and YZ slices.
#[derive(Clone, Debug, PartialEq)]
pub struct Plane2D {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// `width * height` samples, row-major.
    pub samples: Vec<f64>,
}

impl Plane2D {
    /// Build a plane, checking the sample count against the dimensions.
    pub fn new(width: u32, height: u32, samples: Vec<f64>) -> LumiplaneResult<Self> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(LumiplaneError::data_access(format!(
                "plane holds {} samples, expected {expected} ({width}x{height})",
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Check the plane against the dimensions a caller requested.
    pub fn expect_size(&self, width: u32, height: u32) -> LumiplaneResult<()> {
        if self.width != width || self.height != height {
            return Err(LumiplaneError::data_access(format!(
                "source returned a {}x{} plane, requested {width}x{height}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Raw pixel access. Implementations may fail with a data-access error;
/// failures propagate unchanged through rendering.
pub trait PlaneSource: Send + Sync {
    /// Fetch the raw samples of `plane` for `channel`. `width`/`height` are
    /// the dimensions the caller expects back, in the plane's natural
    /// orientation (columns = first plane axis).
    fn fetch_plane(
        &self,
        plane: PlaneDef,
        channel: usize,
        width: u32,
        height: u32,
    ) -> LumiplaneResult<Plane2D>;
}

/// Dimensions, pixel type and per-channel statistics of one pixel set.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PixelsMetadata {
    /// Axis extents.
    pub dims: PixelsDimensions,
    /// Raw sample numeric type.
    pub pixels_type: PixelsType,
    /// Statistics for each channel, in channel order.
    pub channels: Vec<ChannelStats>,
}

impl PixelsMetadata {
    /// Validate the dimensions and the channel list length.
    pub fn validate(&self) -> LumiplaneResult<()> {
        self.dims.validate()?;
        if self.channels.len() != self.dims.size_c as usize {
            return Err(LumiplaneError::configuration(format!(
                "metadata lists {} channel stats but size_c is {}",
                self.channels.len(),
                self.dims.size_c
            )));
        }
        Ok(())
    }
}

/// Metadata access, loaded once at renderer initialization.
pub trait MetadataSource {
    /// Describe the pixel set.
    fn metadata(&self) -> LumiplaneResult<PixelsMetadata>;
}

/// A pixel volume held entirely in memory.
///
/// Samples are stored as `f64` in `(t, c, z, y, x)` order, slowest axis
/// first. Per-channel statistics (global range and histogram) are computed at
/// construction. Implements both collaborator traits, so one value can
/// bootstrap a renderer on its own.
#[derive(Clone, Debug)]
pub struct InMemoryVolume {
    dims: PixelsDimensions,
    pixels_type: PixelsType,
    samples: Arc<Vec<f64>>,
    channels: Vec<ChannelStats>,
}

impl InMemoryVolume {
    /// Build a volume, computing per-channel statistics from the data.
    pub fn new(
        dims: PixelsDimensions,
        pixels_type: PixelsType,
        samples: Vec<f64>,
    ) -> LumiplaneResult<Self> {
        dims.validate()?;
        let expected = dims.size_x as usize
            * dims.size_y as usize
            * dims.size_z as usize
            * dims.size_c as usize
            * dims.size_t as usize;
        if samples.len() != expected {
            return Err(LumiplaneError::configuration(format!(
                "volume holds {} samples, dimensions require {expected}",
                samples.len()
            )));
        }

        let mut channels = Vec::with_capacity(dims.size_c as usize);
        for c in 0..dims.size_c as usize {
            channels.push(channel_stats(&samples, dims, pixels_type, c)?);
        }
        Ok(Self {
            dims,
            pixels_type,
            samples: Arc::new(samples),
            channels,
        })
    }

    /// Axis extents.
    pub fn dims(&self) -> PixelsDimensions {
        self.dims
    }

    fn offset(&self, x: u32, y: u32, z: u32, c: usize, t: u32) -> usize {
        let d = self.dims;
        ((((t as usize * d.size_c as usize + c) * d.size_z as usize + z as usize)
            * d.size_y as usize
            + y as usize)
            * d.size_x as usize)
            + x as usize
    }
}

fn channel_stats(
    samples: &[f64],
    dims: PixelsDimensions,
    pixels_type: PixelsType,
    c: usize,
) -> LumiplaneResult<ChannelStats> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut channel_samples = Vec::new();
    let plane_len = dims.size_x as usize * dims.size_y as usize;
    for t in 0..dims.size_t as usize {
        for z in 0..dims.size_z as usize {
            let base = (((t * dims.size_c as usize + c) * dims.size_z as usize + z)
                * dims.size_y as usize)
                * dims.size_x as usize;
            let plane = &samples[base..base + plane_len];
            for &s in plane {
                min = min.min(s);
                max = max.max(s);
            }
            channel_samples.extend_from_slice(plane);
        }
    }
    let histogram = if min < max {
        Some(ChannelHistogram::from_samples(
            &channel_samples,
            min,
            max,
            DEFAULT_HISTOGRAM_BINS,
        )?)
    } else {
        // flat channel: no meaningful histogram, widen the degenerate range
        // without leaving the pixel type's representable interval
        let (_, type_hi) = pixels_type.range();
        if min + 1.0 <= type_hi {
            max = min + 1.0;
        } else {
            min = max - 1.0;
        }
        None
    };
    Ok(ChannelStats {
        global_min: min,
        global_max: max,
        histogram,
    })
}

impl PlaneSource for InMemoryVolume {
    fn fetch_plane(
        &self,
        plane: PlaneDef,
        channel: usize,
        width: u32,
        height: u32,
    ) -> LumiplaneResult<Plane2D> {
        if channel >= self.dims.size_c as usize {
            return Err(LumiplaneError::data_access(format!(
                "channel {channel} out of range (size_c {})",
                self.dims.size_c
            )));
        }
        plane.validate(self.dims)?;

        let d = self.dims;
        let fetched = match plane {
            PlaneDef::Xy { z, t } => {
                let mut out = Vec::with_capacity(d.size_x as usize * d.size_y as usize);
                for y in 0..d.size_y {
                    let row = self.offset(0, y, z, channel, t);
                    out.extend_from_slice(&self.samples[row..row + d.size_x as usize]);
                }
                Plane2D::new(d.size_x, d.size_y, out)?
            }
            PlaneDef::Xz { y, t } => {
                let mut out = Vec::with_capacity(d.size_x as usize * d.size_z as usize);
                for z in 0..d.size_z {
                    let row = self.offset(0, y, z, channel, t);
                    out.extend_from_slice(&self.samples[row..row + d.size_x as usize]);
                }
                Plane2D::new(d.size_x, d.size_z, out)?
            }
            PlaneDef::Yz { x, t } => {
                let mut out = Vec::with_capacity(d.size_y as usize * d.size_z as usize);
                for z in 0..d.size_z {
                    for y in 0..d.size_y {
                        out.push(self.samples[self.offset(x, y, z, channel, t)]);
                    }
                }
                Plane2D::new(d.size_y, d.size_z, out)?
            }
        };
        fetched.expect_size(width, height)?;
        Ok(fetched)
    }
}

impl MetadataSource for InMemoryVolume {
    fn metadata(&self) -> LumiplaneResult<PixelsMetadata> {
        Ok(PixelsMetadata {
            dims: self.dims,
            pixels_type: self.pixels_type,
            channels: self.channels.clone(),
        })
    }
}
