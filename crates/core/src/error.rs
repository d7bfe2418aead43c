/// Result alias that carries the custom [`WallsmithError`] type.
pub type Result<T> = std::result::Result<T, WallsmithError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum WallsmithError {
    /// A keyframe had no numeric time element, or carried a string among its
    /// leading values. Downstream timing cannot be recovered from it.
    #[error("malformed keyframe: {0}")]
    MalformedKeyframe(String),
    /// Bounding boxes were requested for an empty set of boxes.
    #[error("cannot compute bounds of an empty box set")]
    EmptyBounds,
    /// Strict text layout met a character the model has no pieces for.
    #[error("no model pieces for character `{0}`")]
    MissingGlyph(char),
    /// Caller supplied parameters outside of the accepted range.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Free-form message for errors without a dedicated variant.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around JSON (de)serialization errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl WallsmithError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    /// Rejects a caller-supplied value.
    pub fn invalid<T: Into<String>>(msg: T) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<&str> for WallsmithError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for WallsmithError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
