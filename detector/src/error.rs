//! Error types for the piece detection library

use thiserror::Error;

/// Result type alias for the detection library
pub type Result<T> = std::result::Result<T, DetectionError>;

/// Errors that can occur while loading frames or configuring the pipeline
///
/// A frame with no matching pieces is not an error: it yields an empty
/// detection set.
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Image decoding failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Frame has no pixels: {width}x{height}")]
    EmptyFrame { width: u32, height: u32 },

    #[error("Mask is {actual:?}, frame is {expected:?}")]
    MaskSize {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid detection: {0}")]
    InvalidDetection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DetectionError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_detection<S: Into<String>>(msg: S) -> Self {
        Self::InvalidDetection(msg.into())
    }
}
