/// Convenience result type used across scrollstage.
pub type StageResult<T> = Result<T, StageError>;

/// Top-level error taxonomy used by stage APIs.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    /// Invalid page, selector, boundary or tween configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while building or sampling timelines.
    #[error("animation error: {0}")]
    Animation(String),

    /// Lifecycle violations, e.g. adding members to a disposed scope.
    #[error("scope error: {0}")]
    Scope(String),

    /// Errors when serializing or deserializing page documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StageError {
    /// Build a [`StageError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StageError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`StageError::Scope`] value.
    pub fn scope(msg: impl Into<String>) -> Self {
        Self::Scope(msg.into())
    }

    /// Build a [`StageError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
