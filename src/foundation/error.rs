/// Crate-wide result alias.
pub type LumiplaneResult<T> = Result<T, LumiplaneError>;

/// Crate-wide error type.
///
/// Configuration problems fail fast at construction or reconfiguration time;
/// the per-pixel paths never produce errors.
#[derive(thiserror::Error, Debug)]
pub enum LumiplaneError {
    /// Invalid settings, unsupported values, out-of-range indices.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Raw pixel or metadata access failure, propagated unchanged.
    #[error("data access error: {0}")]
    DataAccess(String),

    /// Failure while turning raw samples into a raster.
    #[error("rendering error: {0}")]
    Rendering(String),

    /// A pending render was cancelled before it produced a result.
    #[error("render cancelled: {0}")]
    Cancelled(String),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LumiplaneError {
    /// Build a [`LumiplaneError::Configuration`].
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`LumiplaneError::DataAccess`].
    pub fn data_access(msg: impl Into<String>) -> Self {
        Self::DataAccess(msg.into())
    }

    /// Build a [`LumiplaneError::Rendering`].
    pub fn rendering(msg: impl Into<String>) -> Self {
        Self::Rendering(msg.into())
    }

    /// Build a [`LumiplaneError::Cancelled`].
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }
}
