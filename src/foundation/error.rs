/// Convenience result type used across Scrollframe public APIs.
pub type ScrollframeResult<T> = Result<T, ScrollframeError>;

/// Top-level error type for Scrollframe operations.
#[derive(thiserror::Error, Debug)]
pub enum ScrollframeError {
    /// Input or configuration is invalid.
    #[error("validation error: {0}")]
    Validation(String),

    /// A frame resource could not be fetched.
    #[error("load error: {0}")]
    Load(String),

    /// Fetched bytes could not be decoded into an image.
    #[error("decode error: {0}")]
    Decode(String),

    /// The raster backend could not draw a frame.
    #[error("render error: {0}")]
    Render(String),

    /// The owning view was torn down before the operation finished.
    #[error("operation cancelled")]
    Cancelled,

    /// Catch-all wrapper for lower-level errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollframeError {
    /// Build a [`ScrollframeError::Validation`] from any string-like message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScrollframeError::Load`] from any string-like message.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Build a [`ScrollframeError::Decode`] from any string-like message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ScrollframeError::Render`] from any string-like message.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
