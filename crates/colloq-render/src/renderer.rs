//! Document renderer trait
//!
//! Callers depend on [`DocumentRenderer`] rather than on the Marp
//! subprocess, so an in-process backend can be dropped in later.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::RenderResult;

/// Output produced by a renderer run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderFormat {
    /// Browser-displayable preview
    Html,
    /// Paginated, printable document
    Pdf,
}

impl RenderFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Pdf => "pdf",
        }
    }

    /// MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Html => "text/html",
            Self::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Trait for poster renderers
///
/// A renderer reads a source document from disk and writes one artifact,
/// overwriting whatever was at `output` before.
pub trait DocumentRenderer {
    /// Human-readable name of this renderer
    fn name(&self) -> &'static str;

    /// Render `source` into `output` in the given format
    ///
    /// # Returns
    /// The path of the written artifact
    fn render(&self, source: &Path, output: &Path, format: RenderFormat) -> RenderResult<PathBuf>;

    /// Render the HTML preview
    fn render_preview(&self, source: &Path, output: &Path) -> RenderResult<PathBuf> {
        self.render(source, output, RenderFormat::Html)
    }

    /// Render the downloadable PDF
    fn render_document(&self, source: &Path, output: &Path) -> RenderResult<PathBuf> {
        self.render(source, output, RenderFormat::Pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recording {
        calls: RefCell<Vec<RenderFormat>>,
    }

    impl DocumentRenderer for Recording {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn render(
            &self,
            _source: &Path,
            output: &Path,
            format: RenderFormat,
        ) -> RenderResult<PathBuf> {
            self.calls.borrow_mut().push(format);
            Ok(output.to_path_buf())
        }
    }

    #[test]
    fn test_convenience_methods_pick_format() {
        let renderer = Recording {
            calls: RefCell::new(Vec::new()),
        };
        let out = renderer
            .render_preview(Path::new("in.md"), Path::new("out.html"))
            .unwrap();
        renderer
            .render_document(Path::new("in.md"), Path::new("out.pdf"))
            .unwrap();

        assert_eq!(out, PathBuf::from("out.html"));
        assert_eq!(
            *renderer.calls.borrow(),
            vec![RenderFormat::Html, RenderFormat::Pdf]
        );
    }

    #[test]
    fn test_format_properties() {
        assert_eq!(RenderFormat::Html.extension(), "html");
        assert_eq!(RenderFormat::Pdf.mime_type(), "application/pdf");
        assert_eq!(RenderFormat::Pdf.to_string(), "pdf");
    }
}
