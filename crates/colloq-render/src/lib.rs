//! # colloq-render
//!
//! Turns generated poster documents into an HTML preview and a PDF by
//! running the [Marp CLI](https://github.com/marp-team/marp-cli) as a
//! subprocess.
//!
//! ## Pipeline
//!
//! 1. **Locator** - finds the installed Marp script, installing a pinned
//!    version with npm on first use
//! 2. **Renderer** - runs Marp against the working source file with a
//!    bounded timeout
//!
//! ## Example
//!
//! ```no_run
//! use colloq_render::{
//!     DocumentRenderer, MarpRenderer, RendererConfig, RendererLocator, WorkArea,
//! };
//!
//! let mut locator = RendererLocator::new(RendererConfig::default());
//! let renderer = MarpRenderer::new(locator.locate()?.clone());
//!
//! let work = WorkArea::new("output");
//! work.write_source("---\nmarp: true\n---\n# Hello")?;
//! let preview = renderer.render_preview(&work.source_path(), &work.preview_path())?;
//! # Ok::<(), colloq_render::RenderError>(())
//! ```

pub mod error;
pub mod locator;
pub mod marp;
pub mod renderer;
pub mod workarea;

pub use error::{RenderError, RenderResult};
pub use locator::{LocatorState, RendererConfig, RendererHandle, RendererLocator};
pub use marp::MarpRenderer;
pub use renderer::{DocumentRenderer, RenderFormat};
pub use workarea::WorkArea;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
