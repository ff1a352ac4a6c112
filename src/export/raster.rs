//! PNG export by rasterizing the surface markup with resvg.
//!
//! Rasterizing is an explicit two-stage pipeline. The markup is first
//! embedded as a data URI and loaded into a [`VectorImage`]; only a fully
//! decoded image can be drawn into a bitmap and encoded.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use tracing::{debug, warn};

use super::vector::{data_uri_payload, svg_data_uri};
use super::{ExportArtifact, ExportFormat};
use crate::error::ExportError;
use crate::surface::Surface;

pub const PNG_MIME_TYPE: &str = "image/png";

/// Side length of exported bitmaps.
pub const DEFAULT_RASTER_SIZE: u32 = 2048;

// ============================================================================
// VectorImage
// ============================================================================

/// A decoded SVG document, ready to be drawn.
#[derive(Debug)]
pub struct VectorImage {
    tree: Tree,
}

impl VectorImage {
    /// Loads an image from a `data:image/svg+xml;base64,` URI.
    pub fn load(data_uri: &str) -> Result<Self, ExportError> {
        let payload = data_uri_payload(data_uri).ok_or(ExportError::DataUri)?;
        let bytes = STANDARD.decode(payload)?;
        let tree = Tree::from_data(&bytes, &Options::default())?;
        Ok(Self { tree })
    }

    /// Parses SVG markup directly.
    pub fn from_markup(markup: &str) -> Result<Self, ExportError> {
        let tree = Tree::from_str(markup, &Options::default())?;
        Ok(Self { tree })
    }

    /// Intrinsic size of the document (its viewBox dimensions).
    pub fn size(&self) -> (f32, f32) {
        let size = self.tree.size();
        (size.width(), size.height())
    }

    /// Draws the image into a transparent `width x height` bitmap.
    ///
    /// The image is scaled to fill the bitmap exactly.
    pub fn rasterize(&self, width: u32, height: u32) -> Result<RgbaImage, ExportError> {
        let Some(mut pixmap) = Pixmap::new(width, height) else {
            warn!(width, height, "bitmap surface unavailable");
            return Err(ExportError::SurfaceUnavailable { width, height });
        };
        pixmap.fill(Color::TRANSPARENT);

        let (svg_width, svg_height) = self.size();
        let transform = Transform::from_scale(width as f32 / svg_width, height as f32 / svg_height);
        resvg::render(&self.tree, transform, &mut pixmap.as_mut());

        Ok(pixmap_to_rgba_image(&pixmap))
    }
}

// ============================================================================
// Export
// ============================================================================

/// Rasterizes the surface into a square PNG of side `size`.
pub fn export_raster(
    surface: &Surface,
    filename: &str,
    size: u32,
) -> Result<ExportArtifact, ExportError> {
    let image = VectorImage::load(&svg_data_uri(surface.markup()))?;
    debug!(size, "vector image decoded");

    let bitmap = image.rasterize(size, size)?;
    let bytes = encode_png(&bitmap)?;
    Ok(ExportArtifact::new(ExportFormat::Png, filename, bytes))
}

/// Encodes an RGBA bitmap as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());

    for (src, dst) in pixmap.pixels().iter().zip(img.pixels_mut()) {
        // tiny_skia stores premultiplied alpha
        let (r, g, b, a) = unpremultiply(src.red(), src.green(), src.blue(), src.alpha());
        *dst = Rgba([r, g, b, a]);
    }

    img
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}
