use crate::foundation::error::{LumiplaneError, LumiplaneResult};

/// Definition of one 2D slice through the 5D pixel volume (X, Y, Z, C, T).
///
/// The slice kind fixes which two axes span the plane; the remaining spatial
/// and temporal coordinates locate it. Channels are not part of a plane
/// definition; rendering iterates channels itself.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PlaneDef {
    /// An XY slice at optical section `z` and timepoint `t`.
    Xy {
        /// Optical section index.
        z: u32,
        /// Timepoint index.
        t: u32,
    },
    /// An XZ slice at row `y` and timepoint `t`.
    Xz {
        /// Fixed Y coordinate.
        y: u32,
        /// Timepoint index.
        t: u32,
    },
    /// A YZ slice at column `x` and timepoint `t`.
    Yz {
        /// Fixed X coordinate.
        x: u32,
        /// Timepoint index.
        t: u32,
    },
}

impl PlaneDef {
    /// Timepoint the slice belongs to.
    pub fn t(self) -> u32 {
        match self {
            Self::Xy { t, .. } | Self::Xz { t, .. } | Self::Yz { t, .. } => t,
        }
    }

    /// Validate the slice coordinates against `dims`.
    pub fn validate(self, dims: PixelsDimensions) -> LumiplaneResult<()> {
        let (coord, limit, axis) = match self {
            Self::Xy { z, .. } => (z, dims.size_z, "z"),
            Self::Xz { y, .. } => (y, dims.size_y, "y"),
            Self::Yz { x, .. } => (x, dims.size_x, "x"),
        };
        if coord >= limit {
            return Err(LumiplaneError::configuration(format!(
                "plane {axis} index {coord} out of range (size {limit})"
            )));
        }
        if self.t() >= dims.size_t {
            return Err(LumiplaneError::configuration(format!(
                "plane t index {} out of range (size {})",
                self.t(),
                dims.size_t
            )));
        }
        Ok(())
    }
}

/// Extents of a pixel volume along its five axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelsDimensions {
    /// Width of an XY plane.
    pub size_x: u32,
    /// Height of an XY plane.
    pub size_y: u32,
    /// Number of optical sections.
    pub size_z: u32,
    /// Number of channels.
    pub size_c: u32,
    /// Number of timepoints.
    pub size_t: u32,
}

impl PixelsDimensions {
    /// Validate that every axis is non-empty.
    pub fn validate(self) -> LumiplaneResult<()> {
        let axes = [
            (self.size_x, "size_x"),
            (self.size_y, "size_y"),
            (self.size_z, "size_z"),
            (self.size_c, "size_c"),
            (self.size_t, "size_t"),
        ];
        for (v, name) in axes {
            if v == 0 {
                return Err(LumiplaneError::configuration(format!(
                    "pixels dimension {name} must be > 0"
                )));
            }
        }
        Ok(())
    }
}

/// Numeric type of the raw samples held by a pixel volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelsType {
    /// Signed 8-bit integers.
    Int8,
    /// Unsigned 8-bit integers.
    Uint8,
    /// Signed 16-bit integers.
    Int16,
    /// Unsigned 16-bit integers.
    Uint16,
    /// Signed 32-bit integers.
    Int32,
    /// Unsigned 32-bit integers.
    Uint32,
    /// 32-bit IEEE floats.
    Float,
    /// 64-bit IEEE floats.
    Double,
}

impl PixelsType {
    /// Parse a metadata type name. Unknown names are a configuration error.
    pub fn parse(name: &str) -> LumiplaneResult<Self> {
        match name {
            "int8" => Ok(Self::Int8),
            "uint8" => Ok(Self::Uint8),
            "int16" => Ok(Self::Int16),
            "uint16" => Ok(Self::Uint16),
            "int32" => Ok(Self::Int32),
            "uint32" => Ok(Self::Uint32),
            "float" => Ok(Self::Float),
            "double" => Ok(Self::Double),
            other => Err(LumiplaneError::configuration(format!(
                "unsupported pixels type '{other}'"
            ))),
        }
    }

    /// Smallest and largest sample value representable by this type.
    pub fn range(self) -> (f64, f64) {
        match self {
            Self::Int8 => (f64::from(i8::MIN), f64::from(i8::MAX)),
            Self::Uint8 => (0.0, f64::from(u8::MAX)),
            Self::Int16 => (f64::from(i16::MIN), f64::from(i16::MAX)),
            Self::Uint16 => (0.0, f64::from(u16::MAX)),
            Self::Int32 => (f64::from(i32::MIN), f64::from(i32::MAX)),
            Self::Uint32 => (0.0, f64::from(u32::MAX)),
            Self::Float => (f64::from(f32::MIN), f64::from(f32::MAX)),
            Self::Double => (f64::MIN, f64::MAX),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
