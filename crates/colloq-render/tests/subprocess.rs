//! Integration tests for the subprocess renderer
//!
//! A small `sh` script stands in for Marp. It receives the same argument
//! list (`<source> -o <output> --html [--pdf] --allow-local-files`), so
//! inside the script `$0` is the source and `$2` the output path.

#![cfg(unix)]

use std::fs;
use std::time::Duration;

use colloq_render::{
    DocumentRenderer, MarpRenderer, RenderError, RendererConfig, RendererHandle, RendererLocator,
    WorkArea,
};

/// Copies the source to the output, failing on unreadable input
const COPYING_RENDERER: &str = r#"
if [ ! -r "$0" ]; then
  echo "[  ERROR ] Not found processable Markdown file: $0" >&2
  exit 1
fi
cp "$0" "$2"
"#;

fn sh(script: &str) -> RendererHandle {
    RendererHandle::new("sh", ["-c", script])
}

#[test]
fn test_preview_written_at_declared_path() {
    let temp = tempfile::tempdir().unwrap();
    let work = WorkArea::new(temp.path());
    work.write_source("---\nmarp: true\n---\n<div>poster</div>\n")
        .unwrap();

    let renderer = MarpRenderer::new(sh(COPYING_RENDERER));
    let out = renderer
        .render_preview(&work.source_path(), &work.preview_path())
        .unwrap();

    assert_eq!(out, work.preview_path());
    assert!(fs::metadata(&out).unwrap().len() > 0);
}

#[test]
fn test_unreadable_source_surfaces_stderr() {
    let temp = tempfile::tempdir().unwrap();
    let work = WorkArea::new(temp.path());

    let renderer = MarpRenderer::new(sh(COPYING_RENDERER));
    let err = renderer
        .render_document(&work.source_path(), &work.document_path())
        .unwrap_err();

    match err {
        RenderError::Failed { stderr } => {
            assert!(stderr.contains("Not found processable Markdown file"));
        }
        other => panic!("expected Failed, got {other:?}"),
    }
    assert!(!work.document_path().exists());
}

#[test]
fn test_silent_failure_reports_exit_status() {
    let temp = tempfile::tempdir().unwrap();
    let work = WorkArea::new(temp.path());
    work.write_source("x").unwrap();

    let renderer = MarpRenderer::new(sh("exit 3"));
    let err = renderer
        .render_preview(&work.source_path(), &work.preview_path())
        .unwrap_err();

    assert!(err.stderr().unwrap().contains("exited with"));
}

#[test]
fn test_success_without_output_is_failure() {
    let temp = tempfile::tempdir().unwrap();
    let work = WorkArea::new(temp.path());
    work.write_source("x").unwrap();

    let renderer = MarpRenderer::new(sh("exit 0"));
    let err = renderer
        .render_preview(&work.source_path(), &work.preview_path())
        .unwrap_err();

    assert!(err.stderr().unwrap().contains("wrote no output"));
}

#[test]
fn test_timeout_kills_renderer() {
    let temp = tempfile::tempdir().unwrap();
    let work = WorkArea::new(temp.path());
    work.write_source("x").unwrap();

    let renderer =
        MarpRenderer::new(sh("exec sleep 10")).with_timeout(Duration::from_millis(200));
    let started = std::time::Instant::now();
    let err = renderer
        .render_preview(&work.source_path(), &work.preview_path())
        .unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(!err.is_fatal());
    assert!(err.stderr().unwrap().contains("timed out"));
}

#[test]
fn test_timeout_not_held_by_grandchild() {
    let temp = tempfile::tempdir().unwrap();
    let work = WorkArea::new(temp.path());
    work.write_source("x").unwrap();

    // the shell forks `sleep`, which keeps stderr open after the shell is killed
    let renderer =
        MarpRenderer::new(sh("sleep 6; true")).with_timeout(Duration::from_millis(200));
    let started = std::time::Instant::now();
    let err = renderer
        .render_preview(&work.source_path(), &work.preview_path())
        .unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(err.stderr().unwrap().contains("timed out"));
}

#[test]
fn test_stale_artifact_not_reported_as_ready() {
    let temp = tempfile::tempdir().unwrap();
    let work = WorkArea::new(temp.path());
    work.write_source("x").unwrap();
    fs::write(work.preview_path(), "preview from the previous run").unwrap();

    let renderer = MarpRenderer::new(sh("exit 0"));
    let err = renderer
        .render_preview(&work.source_path(), &work.preview_path())
        .unwrap_err();

    assert!(err.stderr().unwrap().contains("wrote no output"));
    assert!(!work.preview_path().exists());
}

#[test]
fn test_artifact_overwritten_each_run() {
    let temp = tempfile::tempdir().unwrap();
    let work = WorkArea::new(temp.path());
    let renderer = MarpRenderer::new(sh(COPYING_RENDERER));

    work.write_source("first").unwrap();
    renderer
        .render_preview(&work.source_path(), &work.preview_path())
        .unwrap();
    work.write_source("second").unwrap();
    renderer
        .render_preview(&work.source_path(), &work.preview_path())
        .unwrap();

    assert_eq!(fs::read_to_string(work.preview_path()).unwrap(), "second");
}

#[test]
fn test_locator_command_feeds_renderer() {
    let temp = tempfile::tempdir().unwrap();
    let work = WorkArea::new(temp.path());
    work.write_source("from locator").unwrap();

    let mut locator = RendererLocator::new(RendererConfig {
        command: vec![
            "sh".to_string(),
            "-c".to_string(),
            COPYING_RENDERER.to_string(),
        ],
        ..Default::default()
    });
    let renderer = MarpRenderer::new(locator.locate().unwrap().clone());
    renderer
        .render_document(&work.source_path(), &work.document_path())
        .unwrap();

    assert_eq!(
        fs::read_to_string(work.document_path()).unwrap(),
        "from locator"
    );
}
