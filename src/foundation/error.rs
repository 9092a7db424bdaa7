/// Convenience result type used across loopwave.
pub type LoopwaveResult<T> = Result<T, LoopwaveError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Per-frame time-function failures are not represented here: they are recovered by the
/// parameter resolver and only surface in logs and tick reports.
#[derive(thiserror::Error, Debug)]
pub enum LoopwaveError {
    /// Invalid patch: unknown operator, arity mismatch, unregistered buffer, malformed slot.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Fatal failure while running ticks or writing frames out.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing patch files.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LoopwaveError {
    /// Build a [`LoopwaveError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`LoopwaveError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`LoopwaveError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this is a configuration error (reported before the first tick).
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
