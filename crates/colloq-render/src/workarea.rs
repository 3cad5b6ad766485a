//! Working storage
//!
//! One output directory with fixed file names. Every regeneration overwrites
//! the previous files; there is no locking, so a directory must not be
//! shared between concurrent sessions.

use std::fs;
use std::path::{Path, PathBuf};

use crate::renderer::RenderFormat;

/// Generated markdown source
pub const SOURCE_FILE: &str = "preview.md";
/// Rendered HTML preview
pub const PREVIEW_FILE: &str = "preview.html";
/// Rendered PDF poster
pub const DOCUMENT_FILE: &str = "poster.pdf";

/// Fixed-path output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkArea {
    dir: PathBuf,
}

impl WorkArea {
    /// Use `dir` as the output directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the output directory if missing
    pub fn prepare(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)
    }

    /// Path of the markdown source
    pub fn source_path(&self) -> PathBuf {
        self.dir.join(SOURCE_FILE)
    }

    /// Path of the HTML preview
    pub fn preview_path(&self) -> PathBuf {
        self.dir.join(PREVIEW_FILE)
    }

    /// Path of the PDF poster
    pub fn document_path(&self) -> PathBuf {
        self.dir.join(DOCUMENT_FILE)
    }

    /// Artifact path for a format
    pub fn artifact_path(&self, format: RenderFormat) -> PathBuf {
        match format {
            RenderFormat::Html => self.preview_path(),
            RenderFormat::Pdf => self.document_path(),
        }
    }

    /// Overwrite the markdown source, creating the directory if needed
    pub fn write_source(&self, document: &str) -> std::io::Result<PathBuf> {
        self.prepare()?;
        let path = self.source_path();
        fs::write(&path, document)?;
        tracing::debug!(path = %path.display(), bytes = document.len(), "wrote poster source");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_layout() {
        let area = WorkArea::new("output");
        assert_eq!(area.source_path(), PathBuf::from("output/preview.md"));
        assert_eq!(area.preview_path(), PathBuf::from("output/preview.html"));
        assert_eq!(area.document_path(), PathBuf::from("output/poster.pdf"));
        assert_eq!(area.artifact_path(RenderFormat::Pdf), area.document_path());
    }

    #[test]
    fn test_write_source_overwrites() {
        let temp = tempfile::tempdir().unwrap();
        let area = WorkArea::new(temp.path().join("nested/out"));

        let path = area.write_source("first version").unwrap();
        area.write_source("second").unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "second");
    }
}
