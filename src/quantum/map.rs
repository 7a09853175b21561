//! Value-map families applied inside the quantization window.

/// Guard for logarithms of non-positive window bounds.
const MIN_LOG_ARG: f64 = 1e-10;

/// Value-mapping family applied to a raw sample inside the quantization
/// window, before rescaling into the codomain.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum QuantumFamily {
    /// Identity map.
    Linear,
    /// Natural logarithm.
    Logarithmic,
    /// `exp(k * x)`.
    Exponential,
    /// `x ^ k`.
    Polynomial,
}

impl QuantumFamily {
    /// Parse a settings family name. Unknown names are a configuration error.
    pub fn parse(name: &str) -> crate::LumiplaneResult<Self> {
        match name {
            "linear" => Ok(Self::Linear),
            "logarithmic" => Ok(Self::Logarithmic),
            "exponential" => Ok(Self::Exponential),
            "polynomial" => Ok(Self::Polynomial),
            other => Err(crate::LumiplaneError::configuration(format!(
                "unsupported quantization family '{other}'"
            ))),
        }
    }

    /// Apply the family map with curve coefficient `k`.
    ///
    /// The coefficient is ignored by the linear and logarithmic families.
    pub(crate) fn transform(self, x: f64, k: f64) -> f64 {
        match self {
            Self::Linear => x,
            Self::Logarithmic => x.max(MIN_LOG_ARG).ln(),
            Self::Exponential => (k * x).exp(),
            Self::Polynomial => x.powf(k),
        }
    }
}
