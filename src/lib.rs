//! eightsix-renderer: deterministic dot-pattern logos from text
//!
//! This crate turns a text string and a handful of numeric parameters into
//! a reproducible pattern of 86 gray dots on concentric rings, and exports
//! that pattern as SVG, PNG or EPS.
//!
//! # Example
//!
//! ```
//! use eightsix_renderer::{generate, darkness_to_hex, DOT_COUNT};
//!
//! let dots = generate("Hello", 0.045, 0.85, 12345);
//! assert_eq!(dots.len(), DOT_COUNT);
//! assert_eq!(dots[0].r, 0.045);
//! assert_eq!(darkness_to_hex(1.0), "#000000");
//! ```
//!
//! # Exporting
//!
//! [`LogoRenderer`] keeps a configuration and its dot snapshot together and
//! exports every format from the same snapshot:
//!
//! ```
//! use eightsix_renderer::{Configurable, GeneratorConfig, LogoRenderer, MemorySink};
//!
//! let mut renderer = LogoRenderer::new(GeneratorConfig::new("86"));
//! renderer.set_raster_size(64);
//!
//! // Paste a configuration
//! renderer.apply_json(r#"{ "seed": 7, "padding": 0 }"#).unwrap();
//!
//! let mut sink = MemorySink::new();
//! renderer.export_all("logo", &mut sink).unwrap();
//! assert_eq!(sink.artifacts.len(), 3);
//! ```

mod config;
mod dot;
mod error;
mod renderer;
mod surface;

pub mod export;
pub mod pattern;

pub use config::{
    ConfigChanges, ConfigPatch, DOT_SIZE_RANGE, GeneratorConfig, MAX_TEXT_UNITS, PADDING_RANGE,
    RANDOM_SEED_LIMIT, SPREAD_RANGE,
};
pub use dot::{Dot, Viewport};
pub use error::{ConfigError, ExportError};
pub use export::{
    DEFAULT_RASTER_SIZE, ExportArtifact, ExportFormat, ExportSink, FileSink, MemorySink,
    PageFraming, PageHeader, VectorImage, default_filename, export_page, export_raster,
    export_vector, svg_data_uri,
};
pub use pattern::{
    DEFAULT_DARKNESS, DOT_COUNT, RING_COUNTS, coerce_seed, darkness_for_unit, darkness_to_hex,
    generate,
};
pub use renderer::{Configurable, LogoRenderer};
pub use surface::Surface;
