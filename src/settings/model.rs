//! Persisted rendering settings model.
//!
//! A [`RenderingDef`] is the serializable snapshot bound to exactly one
//! renderer/pixel set. The persistence layer round-trips it as JSON through
//! [`RenderingDef::to_json`] / [`RenderingDef::from_json`]; everything else in
//! the crate treats it as plain in-memory state.

use crate::codomain::CodomainContext;
use crate::foundation::core::PixelsDimensions;
use crate::foundation::error::{LumiplaneError, LumiplaneResult};
use crate::quantum::QuantumFamily;
use crate::settings::stats::ChannelStats;

/// The eight legal output bit resolutions (`2^n - 1` for `n = 1..=8`).
pub const LEGAL_BIT_RESOLUTIONS: [i32; 8] = [1, 3, 7, 15, 31, 63, 127, 255];

/// Default output bit resolution (full 8-bit depth).
pub const DEFAULT_BIT_RESOLUTION: i32 = 255;

/// Color-composition model used to assemble the output raster.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RenderingModel {
    /// Single-band output fed by the first active channel.
    GreyScale,
    /// Additive three-band composition of every active channel.
    Rgb,
}

/// Global quantization settings shared by every channel strategy.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QuantumDef {
    /// Default value-map family for newly bound channels.
    pub family: QuantumFamily,
    /// Default curve coefficient for newly bound channels.
    pub coefficient: f64,
    /// Lower codomain bound.
    pub cd_start: i32,
    /// Upper codomain bound.
    pub cd_end: i32,
    /// Output bit resolution, one of [`LEGAL_BIT_RESOLUTIONS`].
    pub bit_resolution: i32,
}

impl Default for QuantumDef {
    fn default() -> Self {
        Self {
            family: QuantumFamily::Linear,
            coefficient: 1.0,
            cd_start: 0,
            cd_end: DEFAULT_BIT_RESOLUTION,
            bit_resolution: DEFAULT_BIT_RESOLUTION,
        }
    }
}

impl QuantumDef {
    /// Validate the settings. Fails on an illegal bit resolution, codomain
    /// bounds outside `[0, bit_resolution]`, or a non-positive coefficient.
    pub fn validate(&self) -> LumiplaneResult<()> {
        if !LEGAL_BIT_RESOLUTIONS.contains(&self.bit_resolution) {
            return Err(LumiplaneError::configuration(format!(
                "unsupported bit resolution {}",
                self.bit_resolution
            )));
        }
        if self.cd_start < 0 || self.cd_end > self.bit_resolution || self.cd_start >= self.cd_end {
            return Err(LumiplaneError::configuration(format!(
                "codomain [{}, {}] must satisfy 0 <= start < end <= {}",
                self.cd_start, self.cd_end, self.bit_resolution
            )));
        }
        validate_coefficient(self.coefficient)
    }
}

pub(crate) fn validate_coefficient(k: f64) -> LumiplaneResult<()> {
    if !k.is_finite() || k <= 0.0 {
        return Err(LumiplaneError::configuration(format!(
            "curve coefficient {k} must be finite and > 0"
        )));
    }
    Ok(())
}

/// Per-channel rendering state.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChannelBinding {
    /// Whether the channel contributes to the output raster.
    pub active: bool,
    /// Lower bound of the intensity window mapped into the codomain.
    pub input_start: f64,
    /// Upper bound of the intensity window mapped into the codomain.
    pub input_end: f64,
    /// Channel color, straight-alpha RGBA.
    pub rgba: [u8; 4],
    /// Value-map family for this channel.
    pub family: QuantumFamily,
    /// Curve coefficient for this channel.
    pub coefficient: f64,
    /// Policy flag consulted by statistics computation; the value map itself
    /// is unaffected.
    pub noise_reduction: bool,
    /// Precomputed channel statistics.
    pub stats: ChannelStats,
}

impl ChannelBinding {
    /// Validate the binding's window and coefficient.
    pub fn validate(&self) -> LumiplaneResult<()> {
        if !(self.input_start < self.input_end) {
            return Err(LumiplaneError::configuration(format!(
                "channel window [{}, {}] must satisfy start < end",
                self.input_start, self.input_end
            )));
        }
        validate_coefficient(self.coefficient)
    }
}

/// Complete rendering settings for one pixel set.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderingDef {
    /// Global quantization settings.
    pub quantum: QuantumDef,
    /// One binding per channel, in channel order.
    pub channels: Vec<ChannelBinding>,
    /// Default optical section.
    pub default_z: u32,
    /// Default timepoint.
    pub default_t: u32,
    /// Active color-composition model.
    pub model: RenderingModel,
    /// Ordered codomain transform chain.
    pub codomain: Vec<CodomainContext>,
}

impl RenderingDef {
    /// Validate the settings against the pixel set they are bound to.
    pub fn validate(&self, dims: PixelsDimensions) -> LumiplaneResult<()> {
        self.quantum.validate()?;
        if self.channels.len() != dims.size_c as usize {
            return Err(LumiplaneError::configuration(format!(
                "settings bind {} channels but the pixel set has {}",
                self.channels.len(),
                dims.size_c
            )));
        }
        for binding in &self.channels {
            binding.validate()?;
        }
        if self.default_z >= dims.size_z {
            return Err(LumiplaneError::configuration(format!(
                "default z {} out of range (size {})",
                self.default_z, dims.size_z
            )));
        }
        if self.default_t >= dims.size_t {
            return Err(LumiplaneError::configuration(format!(
                "default t {} out of range (size {})",
                self.default_t, dims.size_t
            )));
        }
        Ok(())
    }

    /// Serialize the settings snapshot for the persistence layer.
    pub fn to_json(&self) -> LumiplaneResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LumiplaneError::configuration(format!("settings serialization: {e}")))
    }

    /// Parse a persisted settings snapshot.
    ///
    /// Structural parsing only; call [`RenderingDef::validate`] against the
    /// target pixel set before use.
    pub fn from_json(json: &str) -> LumiplaneResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| LumiplaneError::configuration(format!("settings parse: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/model.rs"]
mod tests;
