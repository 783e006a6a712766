//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, raster allocation, snapshot encode/decode, image loading,
//! project file parsing, IO, and generic errors.
//!
//! Draw calls made before the engine is initialized are not errors: they return
//! early without touching any layer.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid raster dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("failed to decode layer '{layer}': {message}")]
    Decode { layer: String, message: String },

    #[error("failed to encode raster: {0}")]
    Encode(String),

    #[error("failed to load image '{source_id}': {message}")]
    ImageLoad { source_id: String, message: String },

    #[error("unsupported project version {0}")]
    UnsupportedVersion(u32),

    #[cfg(feature = "serde")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
