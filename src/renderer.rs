//! Caller-side owner of a configuration and its current dot snapshot.

use tracing::{debug, warn};

use crate::config::{ConfigChanges, GeneratorConfig};
use crate::dot::Dot;
use crate::error::{ConfigError, ExportError};
use crate::export::{
    DEFAULT_RASTER_SIZE, ExportArtifact, ExportFormat, ExportSink, export_page, export_raster,
    export_vector,
};
use crate::surface::Surface;

// ============================================================================
// Configurable Trait
// ============================================================================

/// Types whose settings round-trip through JSON text.
pub trait Configurable {
    /// Merges a JSON document into the current settings.
    fn apply_json(&mut self, json: &str) -> Result<ConfigChanges, ConfigError>;

    /// Exports the current settings as pretty-printed JSON.
    fn export_json(&self) -> Result<String, serde_json::Error>;
}

// ============================================================================
// LogoRenderer
// ============================================================================

/// Holds a [`GeneratorConfig`] together with the dots and surface derived
/// from it.
///
/// The snapshot is regenerated only when a field that affects geometry
/// changes (text, dot size, spread or seed). Padding only reframes the
/// surface. Every export reads the same snapshot, so the SVG, PNG and EPS
/// files of one export action show the same pattern.
///
/// # Example
///
/// ```
/// use eightsix_renderer::{ExportFormat, GeneratorConfig, LogoRenderer, MemorySink};
///
/// let mut renderer = LogoRenderer::new(GeneratorConfig::new("86 billion"));
/// let mut sink = MemorySink::new();
///
/// renderer.export(ExportFormat::Eps, "logo", &mut sink).unwrap();
/// assert!(sink.get("logo.eps").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct LogoRenderer {
    config: GeneratorConfig,
    dots: Vec<Dot>,
    surface: Surface,
    generation: u64,
    raster_size: u32,
    import_error: bool,
}

impl LogoRenderer {
    pub fn new(config: GeneratorConfig) -> Self {
        let dots = config.generate();
        let surface = Surface::render(&dots, config.viewport());

        Self {
            config,
            dots,
            surface,
            generation: 0,
            raster_size: DEFAULT_RASTER_SIZE,
            import_error: false,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// The current dot snapshot.
    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    /// The current drawing surface.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Number of times the dots have been regenerated.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Side length of PNG exports.
    pub fn raster_size(&self) -> u32 {
        self.raster_size
    }

    pub fn set_raster_size(&mut self, size: u32) {
        self.raster_size = size;
    }

    /// True if the last JSON import was rejected.
    pub fn has_import_error(&self) -> bool {
        self.import_error
    }

    /// Replaces the configuration, regenerating only what changed.
    pub fn set_config(&mut self, config: GeneratorConfig) -> ConfigChanges {
        let changes = ConfigChanges {
            geometry: self.config.geometry_differs_from(&config),
            framing: self.config.padding != config.padding,
        };
        self.config = config;
        self.refresh(changes);
        changes
    }

    /// Applies an in-place edit to the configuration.
    pub fn update(&mut self, edit: impl FnOnce(&mut GeneratorConfig)) -> ConfigChanges {
        let mut config = self.config.clone();
        edit(&mut config);
        self.set_config(config)
    }

    fn refresh(&mut self, changes: ConfigChanges) {
        if changes.geometry {
            self.dots = self.config.generate();
            self.generation = self.generation.wrapping_add(1);
            debug!(
                generation = self.generation,
                seed = self.config.seed,
                text_len = self.config.text.len(),
                "dots regenerated"
            );
        }
        if changes.any() {
            self.surface = Surface::render(&self.dots, self.config.viewport());
        }
    }

    // ---- Export ----

    /// Builds one artifact from the current snapshot.
    pub fn build(&self, format: ExportFormat, filename: &str) -> Result<ExportArtifact, ExportError> {
        match format {
            ExportFormat::Svg => Ok(export_vector(&self.surface, filename)),
            ExportFormat::Png => export_raster(&self.surface, filename, self.raster_size),
            ExportFormat::Eps => Ok(export_page(&self.dots, &self.config, filename)),
        }
    }

    /// Builds one artifact and delivers it to `sink`.
    pub fn export(
        &self,
        format: ExportFormat,
        filename: &str,
        sink: &mut dyn ExportSink,
    ) -> Result<(), ExportError> {
        let artifact = self.build(format, filename)?;
        sink.deliver(artifact)
    }

    /// Exports all three formats from the same snapshot.
    ///
    /// Artifacts are all built before any is delivered, so a failure leaves
    /// the sink untouched.
    pub fn export_all(&self, filename: &str, sink: &mut dyn ExportSink) -> Result<(), ExportError> {
        let artifacts = ExportFormat::ALL
            .iter()
            .map(|&format| self.build(format, filename))
            .collect::<Result<Vec<_>, _>>()?;

        for artifact in artifacts {
            sink.deliver(artifact)?;
        }
        Ok(())
    }
}

impl Default for LogoRenderer {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl Configurable for LogoRenderer {
    /// Imports settings, recording the outcome in [`has_import_error`](LogoRenderer::has_import_error).
    fn apply_json(&mut self, json: &str) -> Result<ConfigChanges, ConfigError> {
        let mut config = self.config.clone();
        match config.apply_json(json) {
            Ok(_) => {
                self.import_error = false;
                Ok(self.set_config(config))
            }
            Err(err) => {
                warn!(error = %err, "config import rejected");
                self.import_error = true;
                Err(err)
            }
        }
    }

    fn export_json(&self) -> Result<String, serde_json::Error> {
        self.config.to_json_pretty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MemorySink;

    #[test]
    fn padding_does_not_regenerate() {
        let mut renderer = LogoRenderer::new(GeneratorConfig::new("frame"));
        let before = renderer.dots().to_vec();

        let changes = renderer.update(|c| c.padding = 60.0);

        assert!(!changes.geometry);
        assert!(changes.framing);
        assert_eq!(renderer.generation(), 0);
        assert_eq!(renderer.dots(), before.as_slice());
        assert!(renderer.surface().markup().contains(r#"viewBox="-1.495 -1.495 2.99 2.99""#));
    }

    #[test]
    fn geometry_change_regenerates() {
        let mut renderer = LogoRenderer::new(GeneratorConfig::new("frame"));
        let before = renderer.dots().to_vec();

        let changes = renderer.update(|c| c.seed = 1);

        assert!(changes.geometry);
        assert_eq!(renderer.generation(), 1);
        assert_ne!(renderer.dots(), before.as_slice());
    }

    #[test]
    fn identical_config_is_a_no_op() {
        let mut renderer = LogoRenderer::default();
        let changes = renderer.set_config(GeneratorConfig::default());
        assert!(!changes.any());
        assert_eq!(renderer.generation(), 0);
    }

    #[test]
    fn json_import_sets_error_flag() {
        let mut renderer = LogoRenderer::new(GeneratorConfig::new("keep"));

        assert!(renderer.apply_json("{ broken").is_err());
        assert!(renderer.has_import_error());
        assert_eq!(renderer.config().text, "keep");
        assert_eq!(renderer.generation(), 0);

        let changes = renderer.apply_json(r#"{ "text": "new" }"#).unwrap();
        assert!(changes.geometry);
        assert!(!renderer.has_import_error());
        assert_eq!(renderer.config().text, "new");
    }

    #[test]
    fn json_export_roundtrip() {
        let renderer = LogoRenderer::new(GeneratorConfig::new("round").with_seed(9));
        let json = renderer.export_json().unwrap();

        let mut other = LogoRenderer::default();
        other.apply_json(&json).unwrap();
        assert_eq!(other.config(), renderer.config());
        assert_eq!(other.dots(), renderer.dots());
    }

    #[test]
    fn export_all_uses_one_snapshot() {
        let mut renderer = LogoRenderer::new(GeneratorConfig::new("snapshot"));
        renderer.set_raster_size(64);
        let mut sink = MemorySink::new();

        renderer.export_all("logo", &mut sink).unwrap();

        let names: Vec<&str> = sink.artifacts.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, ["logo.svg", "logo.png", "logo.eps"]);

        let svg = String::from_utf8(sink.get("logo.svg").unwrap().bytes.clone()).unwrap();
        let eps = String::from_utf8(sink.get("logo.eps").unwrap().bytes.clone()).unwrap();
        for dot in renderer.dots() {
            assert!(svg.contains(&format!(r#"fill="{}""#, dot.color)));
            assert!(eps.contains(&format!("{:.4} {:.4} {:.4} c\n", dot.x, dot.y, dot.r)));
        }
    }

    #[test]
    fn failed_raster_delivers_nothing() {
        let mut renderer = LogoRenderer::default();
        renderer.set_raster_size(0);
        let mut sink = MemorySink::new();

        let err = renderer.export_all("logo", &mut sink).unwrap_err();
        assert!(matches!(err, ExportError::SurfaceUnavailable { .. }));
        assert!(sink.artifacts.is_empty());
    }
}
