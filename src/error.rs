//! Error types for configuration import and export.

use resvg::usvg;
use thiserror::Error;

/// Errors raised while importing a configuration from JSON.
///
/// An import that fails never modifies the configuration it was applied to.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The input was not valid JSON.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The input was JSON `null`, which carries no settings at all.
    #[error("configuration JSON must be an object")]
    NotAnObject,
}

/// Errors raised while producing or delivering an export artifact.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The embedded vector image was not a `data:image/svg+xml;base64,` URI.
    #[error("not an SVG data URI")]
    DataUri,

    /// The data URI payload was not valid base64.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The vector markup could not be parsed.
    #[error("failed to decode vector image: {0}")]
    Decode(#[from] usvg::Error),

    /// No bitmap surface could be allocated for the requested dimensions.
    #[error("no drawing surface available for a {width}x{height} bitmap")]
    SurfaceUnavailable { width: u32, height: u32 },

    /// The bitmap could not be encoded as PNG.
    #[error("failed to encode raster image: {0}")]
    Encode(#[from] image::ImageError),

    /// The file name was empty, `.`/`..`, or contained a path separator.
    #[error("export file name must not leave the output directory: {0:?}")]
    InvalidFilename(String),

    /// Writing the artifact failed.
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}
