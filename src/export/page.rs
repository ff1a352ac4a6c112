//! Encapsulated PostScript export.
//!
//! Unlike the SVG and PNG exporters this one works from the dot list and
//! config directly. It frames a fixed 500x500 page, maps generator units to
//! page units and flips the Y axis, since PostScript grows upwards.

use chrono::{DateTime, SecondsFormat, Utc};

use super::{ExportArtifact, ExportFormat};
use crate::config::GeneratorConfig;
use crate::dot::Dot;

pub const EPS_MIME_TYPE: &str = "application/postscript";

/// Side length of the page in PostScript points.
pub const PAGE_SIZE: f64 = 500.0;

/// Smallest half-extent the page is scaled to.
pub const MIN_EXTENT: f64 = 1.1;

pub const CREATOR: &str = "Eightsix Science Logo Generator";

// ============================================================================
// PageFraming
// ============================================================================

/// Mapping from generator units onto the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFraming {
    /// Half-size of the viewport, same formula as the SVG viewBox.
    pub total_radius: f64,
    /// `total_radius`, floored at [`MIN_EXTENT`].
    pub max_extent: f64,
    /// Page units per generator unit.
    pub scale: f64,
}

impl PageFraming {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let total_radius = config.viewport().total_radius;
        let max_extent = total_radius.max(MIN_EXTENT);

        Self {
            total_radius,
            max_extent,
            scale: (PAGE_SIZE / 2.0) / max_extent,
        }
    }
}

// ============================================================================
// PageHeader
// ============================================================================

/// DSC comment values written at the top of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct PageHeader {
    pub title: String,
    pub creator: String,
    pub created: DateTime<Utc>,
}

impl PageHeader {
    /// Header titled `title`, created now.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            creator: CREATOR.to_string(),
            created: Utc::now(),
        }
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Writes the complete EPS document.
///
/// Gray levels use PostScript's convention (0 is black) with 3 decimals;
/// coordinates and radii are written with 4 decimals.
pub fn render_page(dots: &[Dot], config: &GeneratorConfig, header: &PageHeader) -> String {
    let framing = PageFraming::from_config(config);
    let center = PAGE_SIZE / 2.0;
    let scale = framing.scale;

    let mut doc = format!(
        "%!PS-Adobe-3.0 EPSF-3.0\n\
         %%BoundingBox: 0 0 {PAGE_SIZE} {PAGE_SIZE}\n\
         %%Title: {}\n\
         %%Creator: {}\n\
         %%CreationDate: {}\n\
         %%EndComments\n\
         \n\
         /c {{ 0 360 arc fill }} bind def\n\
         \n\
         {center} {center} translate\n\
         {scale} {scale} scale\n\
         1 -1 scale % flip Y\n\
         \n",
        dsc_text(&header.title),
        dsc_text(&header.creator),
        header.created.to_rfc3339_opts(SecondsFormat::Millis, true),
    );

    for dot in dots {
        doc.push_str(&format!("{:.3} setgray\n", 1.0 - dot.value));
        doc.push_str(&format!("{:.4} {:.4} {:.4} c\n", dot.x, dot.y, dot.r));
    }

    doc.push_str("\n%%EOF");
    doc
}

/// Drops control characters so a value stays on its own comment line.
fn dsc_text(value: &str) -> String {
    value.chars().filter(|c| !c.is_control()).collect()
}

/// Builds an EPS artifact titled after `filename`.
pub fn export_page(dots: &[Dot], config: &GeneratorConfig, filename: &str) -> ExportArtifact {
    let header = PageHeader::new(filename);
    let doc = render_page(dots, config, &header);
    ExportArtifact::new(ExportFormat::Eps, filename, doc.into_bytes())
}
