//! SVG export.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::{ExportArtifact, ExportFormat};
use crate::surface::Surface;

pub const SVG_MIME_TYPE: &str = "image/svg+xml;charset=utf-8";

const DATA_URI_PREFIX: &str = "data:image/svg+xml;base64,";

/// Serializes the surface markup verbatim.
///
/// No coordinate transform is applied; the file keeps the surface viewport.
pub fn export_vector(surface: &Surface, filename: &str) -> ExportArtifact {
    ExportArtifact::new(ExportFormat::Svg, filename, surface.markup().as_bytes().to_vec())
}

/// Embeds SVG markup in a base64 `data:` URI.
pub fn svg_data_uri(markup: &str) -> String {
    format!("{DATA_URI_PREFIX}{}", STANDARD.encode(markup.as_bytes()))
}

/// Extracts the base64 payload of an SVG data URI.
pub(crate) fn data_uri_payload(uri: &str) -> Option<&str> {
    uri.strip_prefix(DATA_URI_PREFIX)
}
