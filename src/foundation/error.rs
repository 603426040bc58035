/// Convenience result type used across tickdown.
pub type TickdownResult<T> = Result<T, TickdownError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum TickdownError {
    /// Invalid configuration or structurally impossible data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A form field that could not be interpreted under strict parsing.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The render target or the recording path is not available.
    #[error("capture unavailable: {0}")]
    CaptureUnavailable(String),

    /// Failures while encoding or finalizing an artifact.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Theme-suggestion service failures (credential, network, malformed payload).
    #[error("service error: {0}")]
    Service(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TickdownError {
    /// Build a [`TickdownError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TickdownError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`TickdownError::CaptureUnavailable`] value.
    pub fn capture_unavailable(msg: impl Into<String>) -> Self {
        Self::CaptureUnavailable(msg.into())
    }

    /// Build a [`TickdownError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`TickdownError::Service`] value.
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    /// Build a [`TickdownError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
