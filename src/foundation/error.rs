/// Crate-wide result type.
pub type VideoBookResult<T> = Result<T, VideoBookError>;

/// Top-level error type for the videobook engine.
#[derive(thiserror::Error, Debug)]
pub enum VideoBookError {
    /// Input properties or options failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// A caption file could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// A caption file could not be fetched.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// The caption column could not be laid out.
    #[error("layout error: {0}")]
    Layout(String),

    /// A frame was requested while the render gate is still held.
    #[error("render gate error: {0}")]
    Gate(String),

    /// Player handle misuse.
    #[error("player error: {0}")]
    Player(String),

    /// Any other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VideoBookError {
    /// Build a [`VideoBookError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VideoBookError::Parse`].
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`VideoBookError::Fetch`].
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build a [`VideoBookError::Layout`].
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`VideoBookError::Gate`].
    pub fn gate(msg: impl Into<String>) -> Self {
        Self::Gate(msg.into())
    }

    /// Build a [`VideoBookError::Player`].
    pub fn player(msg: impl Into<String>) -> Self {
        Self::Player(msg.into())
    }
}
