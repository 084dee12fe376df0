//! Error types for clipforge.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for clipforge operations.
#[derive(Error, Debug)]
pub enum ClipforgeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot open video {path}: {reason}")]
    SourceOpen { path: PathBuf, reason: String },

    #[error("Decoder error: {0}")]
    Decoder(String),

    #[error("Encoder error: {0}")]
    Encoder(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid value {token:?} for argument '{name}': expected {expected}")]
    ArgumentConversion {
        name: String,
        token: String,
        expected: &'static str,
    },

    #[error("Command '{command}' requires argument '{name}'")]
    MissingArgument { command: String, name: String },

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

impl ClipforgeError {
    /// Shorthand for an operation precondition failure.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Whether this error came from opening a media source.
    pub fn is_source_open(&self) -> bool {
        matches!(self, Self::SourceOpen { .. })
    }
}

impl From<image::ImageError> for ClipforgeError {
    fn from(err: image::ImageError) -> Self {
        Self::Image(err.to_string())
    }
}

/// Result type alias for clipforge operations.
pub type Result<T> = std::result::Result<T, ClipforgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_conversion_message() {
        let err = ClipforgeError::ArgumentConversion {
            name: "kernel".into(),
            token: "abc".into(),
            expected: "an integer",
        };
        assert_eq!(
            err.to_string(),
            "Invalid value \"abc\" for argument 'kernel': expected an integer"
        );
    }

    #[test]
    fn test_source_open_flag() {
        let err = ClipforgeError::SourceOpen {
            path: PathBuf::from("missing.mp4"),
            reason: "not found".into(),
        };
        assert!(err.is_source_open());
        assert!(!ClipforgeError::invalid("x").is_source_open());
    }
}
