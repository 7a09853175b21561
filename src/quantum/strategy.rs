//! Per-channel quantization strategy.

use crate::foundation::core::PixelsType;
use crate::foundation::error::{LumiplaneError, LumiplaneResult};
use crate::quantum::map::QuantumFamily;
use crate::settings::model::{QuantumDef, validate_coefficient};

/// Per-channel quantizer: clamped input window, family map, linear rescale
/// into the codomain.
///
/// All validation happens at construction and reconfiguration time; the
/// per-pixel [`QuantumStrategy::quantize`] path never branches on validity.
#[derive(Clone, Debug)]
pub struct QuantumStrategy {
    family: QuantumFamily,
    coefficient: f64,
    pixels_type: PixelsType,
    cd_start: i32,
    cd_end: i32,
    window_start: f64,
    window_end: f64,

    // Precomputed by rebuild(): quantize() is clamp + map + multiply-add.
    ys_min: f64,
    scale: f64,
}

impl QuantumStrategy {
    /// Build a strategy from validated global settings.
    ///
    /// The initial window spans the pixel type's full representable range;
    /// callers narrow it with [`QuantumStrategy::set_window`].
    pub fn new(def: &QuantumDef, pixels_type: PixelsType) -> LumiplaneResult<Self> {
        def.validate()?;
        let (lo, hi) = pixels_type.range();
        let mut s = Self {
            family: def.family,
            coefficient: def.coefficient,
            pixels_type,
            cd_start: def.cd_start,
            cd_end: def.cd_end,
            window_start: lo,
            window_end: hi,
            ys_min: 0.0,
            scale: 0.0,
        };
        s.rebuild();
        Ok(s)
    }

    /// Replace the value map and curve coefficient.
    pub fn set_map(&mut self, family: QuantumFamily, coefficient: f64) -> LumiplaneResult<()> {
        validate_coefficient(coefficient)?;
        self.family = family;
        self.coefficient = coefficient;
        self.rebuild();
        Ok(())
    }

    /// Set the input window. The bounds must be ordered and representable by
    /// the underlying pixel type; they read back exactly via
    /// [`QuantumStrategy::window`].
    pub fn set_window(&mut self, start: f64, end: f64) -> LumiplaneResult<()> {
        if !(start < end) {
            return Err(LumiplaneError::configuration(format!(
                "window [{start}, {end}] must satisfy start < end"
            )));
        }
        let (lo, hi) = self.pixels_type.range();
        if start < lo || end > hi {
            return Err(LumiplaneError::configuration(format!(
                "window [{start}, {end}] outside the {:?} range [{lo}, {hi}]",
                self.pixels_type
            )));
        }
        self.window_start = start;
        self.window_end = end;
        self.rebuild();
        Ok(())
    }

    /// Current input window.
    pub fn window(&self) -> (f64, f64) {
        (self.window_start, self.window_end)
    }

    /// Active value-map family.
    pub fn family(&self) -> QuantumFamily {
        self.family
    }

    /// Quantize one raw sample into `[cd_start, cd_end]`.
    ///
    /// The sample is clamped to the window, mapped by the family, then
    /// linearly rescaled and rounded to the nearest codomain value. A
    /// degenerate transformed range quantizes everything to `cd_start`.
    #[inline]
    pub fn quantize(&self, raw: f64) -> u8 {
        let x = raw.clamp(self.window_start, self.window_end);
        let y = self.family.transform(x, self.coefficient);
        let mut v = self.cd_start as f64 + self.scale * (y - self.ys_min);
        if !v.is_finite() {
            // degenerate transformed range (0 * inf)
            v = self.cd_start as f64;
        }
        v.round().clamp(self.cd_start as f64, self.cd_end as f64) as u8
    }

    fn rebuild(&mut self) {
        let ys = self
            .family
            .transform(self.window_start, self.coefficient);
        let ye = self.family.transform(self.window_end, self.coefficient);
        let span = ye - ys;
        self.ys_min = ys;
        self.scale = if span == 0.0 || !span.is_finite() {
            0.0
        } else {
            f64::from(self.cd_end - self.cd_start) / span
        };
    }
}
