//! Poster regeneration pipeline
//!
//! [`PosterContext`] is built once per process from [`Settings`] and owns
//! everything a regeneration needs: the theme registry, the template, the
//! renderer locator (whose result is cached), and the working directory.
//! Each call to [`PosterContext::recompute`] runs the whole pipeline for the
//! current request.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use colloq_core::{PosterRequest, PosterTemplate, ThemeRegistry};
use colloq_render::{
    DocumentRenderer, MarpRenderer, RenderError, RendererLocator, WorkArea,
};

use crate::config::Settings;

/// Suggested file name for the downloadable PDF
pub const DOWNLOAD_FILE_NAME: &str = "colloquium_poster.pdf";

/// Result of one renderer step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArtifactOutcome {
    /// Artifact written
    Ready { path: PathBuf },
    /// Renderer failed; the session can retry with other input
    Failed { stderr: String },
    /// PDF withheld because no photo was uploaded
    MissingPhoto,
    /// Step not requested
    Skipped,
}

impl ArtifactOutcome {
    /// Path of a written artifact
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Ready { path } => Some(path),
            _ => None,
        }
    }

    /// True for `Failed`
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    fn from_render(result: colloq_render::RenderResult<PathBuf>) -> Result<Self> {
        match result {
            Ok(path) => Ok(Self::Ready { path }),
            Err(RenderError::Failed { stderr }) => Ok(Self::Failed { stderr }),
            Err(other) => Err(other.into()),
        }
    }
}

/// What one regeneration produced
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    /// Theme used
    pub theme: String,
    /// Working markdown source
    pub source: PathBuf,
    /// HTML preview step
    pub preview: ArtifactOutcome,
    /// PDF step
    pub document: ArtifactOutcome,
    /// Generated document text
    #[serde(skip)]
    pub document_text: String,
}

impl PipelineOutcome {
    /// True if any renderer step failed
    pub fn has_failures(&self) -> bool {
        self.preview.is_failed() || self.document.is_failed()
    }
}

/// Which renderer steps to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Render the HTML preview
    pub preview: bool,
    /// Render the PDF (only when a photo is present)
    pub document: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            preview: true,
            document: true,
        }
    }
}

/// Process-wide pipeline state
#[derive(Debug)]
pub struct PosterContext {
    registry: ThemeRegistry,
    template: PosterTemplate,
    locator: RendererLocator,
    timeout: Duration,
    work: WorkArea,
}

impl PosterContext {
    /// Build the context from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            registry: settings.theme_registry(),
            template: PosterTemplate::with_config(settings.template_config()),
            locator: RendererLocator::new(settings.renderer.clone()),
            timeout: Duration::from_secs(settings.renderer.timeout_secs),
            work: WorkArea::new(&settings.output.dir),
        }
    }

    /// Theme registry in use
    pub fn registry(&self) -> &ThemeRegistry {
        &self.registry
    }

    /// Working directory layout
    pub fn work_area(&self) -> &WorkArea {
        &self.work
    }

    /// Renderer locator (for status reporting)
    pub fn locator(&self) -> &RendererLocator {
        &self.locator
    }

    /// Locate the renderer; failure is fatal for the session
    pub fn renderer(&mut self) -> Result<MarpRenderer, RenderError> {
        let handle = self.locator.locate()?.clone();
        Ok(MarpRenderer::new(handle).with_timeout(self.timeout))
    }

    /// Validate the request and produce the document text
    pub fn render_text(&self, request: &PosterRequest) -> colloq_core::Result<String> {
        request.validate(&self.registry)?;
        let theme = self.registry.resolve(&request.theme)?;
        Ok(self.template.render(request, theme))
    }

    /// Run the full pipeline for `request`
    ///
    /// Validation errors and a missing renderer are returned as errors.
    /// Renderer failures are reported in the outcome instead, so the caller
    /// can keep the session alive.
    pub fn recompute(
        &mut self,
        request: &PosterRequest,
        options: RunOptions,
    ) -> Result<PipelineOutcome> {
        let document_text = self
            .render_text(request)
            .context("Failed to build poster document")?;

        let source = self.work.write_source(&document_text).with_context(|| {
            format!(
                "Failed to write poster source: {}",
                self.work.source_path().display()
            )
        })?;

        let renderer = self.renderer()?;

        let preview = if options.preview {
            ArtifactOutcome::from_render(
                renderer.render_preview(&source, &self.work.preview_path()),
            )?
        } else {
            ArtifactOutcome::Skipped
        };

        let document = if !options.document {
            ArtifactOutcome::Skipped
        } else if !request.has_photo() {
            tracing::info!("no photo uploaded, PDF withheld");
            ArtifactOutcome::MissingPhoto
        } else {
            ArtifactOutcome::from_render(
                renderer.render_document(&source, &self.work.document_path()),
            )?
        };

        Ok(PipelineOutcome {
            theme: request.theme.clone(),
            source,
            preview,
            document,
            document_text,
        })
    }
}

/// True when `err` means the renderer can never become available
pub fn is_fatal(err: &anyhow::Error) -> bool {
    err.downcast_ref::<RenderError>()
        .is_some_and(RenderError::is_fatal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloq_render::RendererConfig;

    fn settings_in(dir: &std::path::Path, command: Vec<String>) -> Settings {
        Settings {
            output: crate::config::OutputSettings {
                dir: dir.to_path_buf(),
            },
            renderer: RendererConfig {
                command,
                install_prefix: dir.join("prefix").display().to_string(),
                auto_install: false,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_render_text_rejects_unknown_theme() {
        let temp = tempfile::tempdir().unwrap();
        let context = PosterContext::from_settings(&settings_in(temp.path(), Vec::new()));
        let request = PosterRequest::default().with_theme("Neon");

        assert!(matches!(
            context.render_text(&request),
            Err(colloq_core::PosterError::UnknownTheme(_))
        ));
    }

    #[test]
    fn test_missing_renderer_is_fatal() {
        let temp = tempfile::tempdir().unwrap();
        let mut context = PosterContext::from_settings(&settings_in(temp.path(), Vec::new()));

        let err = context
            .recompute(&PosterRequest::default(), RunOptions::default())
            .unwrap_err();

        assert!(is_fatal(&err));
        // the source is still written before the renderer is needed
        assert!(context.work_area().source_path().is_file());
    }

    #[test]
    fn test_invalid_request_is_not_fatal() {
        let temp = tempfile::tempdir().unwrap();
        let mut context = PosterContext::from_settings(&settings_in(temp.path(), Vec::new()));
        let request = PosterRequest {
            abstract_height: 9000,
            ..Default::default()
        };

        let err = context.recompute(&request, RunOptions::default()).unwrap_err();
        assert!(!is_fatal(&err));
    }

    #[test]
    fn test_artifact_outcome_json() {
        let ready = ArtifactOutcome::Ready {
            path: PathBuf::from("output/preview.html"),
        };
        assert_eq!(
            serde_json::to_string(&ready).unwrap(),
            r#"{"status":"ready","path":"output/preview.html"}"#
        );
        assert_eq!(
            serde_json::to_string(&ArtifactOutcome::MissingPhoto).unwrap(),
            r#"{"status":"missing_photo"}"#
        );
    }
}
