//! Exporters for SVG, PNG and EPS output.
//!
//! Every exporter builds one complete byte buffer, an [`ExportArtifact`],
//! and hands it to an [`ExportSink`]. Nothing is written until the whole
//! artifact exists, so a failed export never leaves a partial file.
//!
//! ```text
//! Dot[] ──► Surface (SVG markup) ──┬──► vector  ──► .svg
//!   │                              └──► raster  ──► .png  (load, then draw)
//!   └────────────────────────────────► page    ──► .eps
//! ```

pub mod page;
pub mod raster;
pub mod vector;

pub use page::{PageFraming, PageHeader, export_page, render_page};
pub use raster::{DEFAULT_RASTER_SIZE, VectorImage, encode_png, export_raster};
pub use vector::{export_vector, svg_data_uri};

use std::fs;
use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use tracing::info;

use crate::error::ExportError;

/// Prefix of generated file names.
const FILENAME_PREFIX: &str = "eightsix-logo";

/// Returns a timestamped base name such as `eightsix-logo-1760000000000`.
pub fn default_filename() -> String {
    format!("{FILENAME_PREFIX}-{}", Utc::now().timestamp_millis())
}

// ============================================================================
// ExportFormat
// ============================================================================

/// The three output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ExportFormat {
    /// Scalable vector markup.
    Svg,
    /// Raster image with a transparent background.
    Png,
    /// Encapsulated PostScript page description.
    Eps,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [Self::Svg, Self::Png, Self::Eps];

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Eps => "eps",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Svg => vector::SVG_MIME_TYPE,
            Self::Png => raster::PNG_MIME_TYPE,
            Self::Eps => page::EPS_MIME_TYPE,
        }
    }
}

// ============================================================================
// ExportArtifact
// ============================================================================

/// A finished export: file name, MIME type and the complete payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// File name including the extension.
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Creates an artifact named `<base>.<extension>`.
    pub fn new(format: ExportFormat, base_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            filename: format!("{base_name}.{}", format.extension()),
            mime_type: format.mime_type(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// ============================================================================
// Sinks
// ============================================================================

/// Destination for finished artifacts (the "download" step).
pub trait ExportSink {
    /// Takes ownership of a complete artifact and emits it.
    fn deliver(&mut self, artifact: ExportArtifact) -> Result<(), ExportError>;
}

/// Writes artifacts into a directory.
///
/// Each file is written under a temporary name and renamed into place, so
/// readers never observe a partially written export.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths of every file delivered so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

/// Accepts only a bare file name that stays inside the sink directory.
fn validate_filename(filename: &str) -> Result<(), ExportError> {
    let mut components = Path::new(filename).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );

    if single && !filename.contains(['/', '\\']) {
        Ok(())
    } else {
        Err(ExportError::InvalidFilename(filename.to_string()))
    }
}

impl ExportSink for FileSink {
    fn deliver(&mut self, artifact: ExportArtifact) -> Result<(), ExportError> {
        validate_filename(&artifact.filename)?;
        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(&artifact.filename);
        let partial = self.dir.join(format!(".{}.part", artifact.filename));

        let written =
            fs::write(&partial, &artifact.bytes).and_then(|()| fs::rename(&partial, &path));
        if let Err(err) = written {
            let _ = fs::remove_file(&partial);
            return Err(err.into());
        }

        info!(
            path = %path.display(),
            mime = artifact.mime_type,
            bytes = artifact.len(),
            "export written"
        );
        self.written.push(path);
        Ok(())
    }
}

/// Keeps artifacts in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub artifacts: Vec<ExportArtifact>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds a delivered artifact by file name.
    pub fn get(&self, filename: &str) -> Option<&ExportArtifact> {
        self.artifacts.iter().find(|a| a.filename == filename)
    }
}

impl ExportSink for MemorySink {
    fn deliver(&mut self, artifact: ExportArtifact) -> Result<(), ExportError> {
        self.artifacts.push(artifact);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "eightsix-renderer-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn artifact_names_and_types() {
        let artifact = ExportArtifact::new(ExportFormat::Eps, "logo", b"%!PS".to_vec());
        assert_eq!(artifact.filename, "logo.eps");
        assert_eq!(artifact.mime_type, "application/postscript");
        assert_eq!(artifact.len(), 4);

        assert_eq!(ExportFormat::Svg.mime_type(), "image/svg+xml;charset=utf-8");
        assert_eq!(ExportFormat::Png.mime_type(), "image/png");
    }

    #[test]
    fn default_filename_is_timestamped() {
        let name = default_filename();
        let millis = name.strip_prefix("eightsix-logo-").unwrap();
        assert!(millis.parse::<i64>().unwrap() > 0);
    }

    #[test]
    fn file_sink_writes_complete_files() {
        let dir = scratch_dir("file-sink");
        let mut sink = FileSink::new(&dir);

        sink.deliver(ExportArtifact::new(ExportFormat::Svg, "a", b"<svg/>".to_vec()))
            .unwrap();

        let path = dir.join("a.svg");
        assert_eq!(sink.dir(), dir.as_path());
        assert_eq!(sink.written(), &[path.clone()]);
        assert_eq!(fs::read(&path).unwrap(), b"<svg/>");
        assert!(!dir.join(".a.svg.part").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn file_sink_rejects_names_outside_its_dir() {
        let dir = scratch_dir("file-sink-names");
        let mut sink = FileSink::new(dir.join("out"));

        for base in ["../escape", "nested/a", "nested\\a", "/abs/a"] {
            let err = sink
                .deliver(ExportArtifact::new(ExportFormat::Svg, base, b"<svg/>".to_vec()))
                .unwrap_err();
            assert!(matches!(err, ExportError::InvalidFilename(_)), "{base}");
        }
        for filename in ["", ".", ".."] {
            let artifact = ExportArtifact {
                filename: filename.to_string(),
                mime_type: ExportFormat::Svg.mime_type(),
                bytes: Vec::new(),
            };
            assert!(matches!(
                sink.deliver(artifact),
                Err(ExportError::InvalidFilename(_))
            ));
        }

        assert!(sink.written().is_empty());
        assert!(!dir.join("escape.svg").exists());
        assert!(!dir.exists());
    }

    #[test]
    fn file_sink_cleans_up_after_failed_write() {
        let dir = scratch_dir("file-sink-cleanup");
        fs::create_dir_all(dir.join("taken.svg")).unwrap();
        let mut sink = FileSink::new(&dir);

        // The target is a directory, so the rename into place fails.
        let artifact = ExportArtifact::new(ExportFormat::Svg, "taken", b"<svg/>".to_vec());
        assert!(matches!(sink.deliver(artifact), Err(ExportError::Io(_))));

        assert!(sink.written().is_empty());
        assert!(!dir.join(".taken.svg.part").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn memory_sink_collects() {
        let mut sink = MemorySink::new();
        sink.deliver(ExportArtifact::new(ExportFormat::Png, "b", vec![1, 2, 3]))
            .unwrap();

        assert_eq!(sink.artifacts.len(), 1);
        assert_eq!(sink.get("b.png").unwrap().bytes, vec![1, 2, 3]);
        assert!(sink.get("b.svg").is_none());
    }
}
