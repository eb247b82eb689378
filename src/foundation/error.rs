/// Convenience result type used across the crate.
pub type AugResult<T> = Result<T, AugError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// Errors are raised where they are detected and propagate unmodified to the
/// caller of [`crate::run`] / [`crate::replay`]; the engine never retries.
#[derive(thiserror::Error, Debug)]
pub enum AugError {
    /// Bad tree shape or parameters, raised while building a pipeline.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Bad sampling parameters, raised at sample time.
    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),

    /// A leaf transform rejected its input.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Replay requested more draws or nodes than were recorded.
    #[error("trace exhausted: {0}")]
    TraceExhausted(String),

    /// Replay found a recorded value or node that does not fit the pipeline.
    #[error("trace mismatch: {0}")]
    TraceMismatch(String),

    /// Errors when serializing or deserializing configs and traces.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from leaf implementations or dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AugError {
    /// Build an [`AugError::InvalidConfiguration`] value.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Build an [`AugError::InvalidDistribution`] value.
    pub fn invalid_distribution(msg: impl Into<String>) -> Self {
        Self::InvalidDistribution(msg.into())
    }

    /// Build an [`AugError::ShapeMismatch`] value.
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    /// Build an [`AugError::TraceExhausted`] value.
    pub fn trace_exhausted(msg: impl Into<String>) -> Self {
        Self::TraceExhausted(msg.into())
    }

    /// Build an [`AugError::TraceMismatch`] value.
    pub fn trace_mismatch(msg: impl Into<String>) -> Self {
        Self::TraceMismatch(msg.into())
    }

    /// Build an [`AugError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
