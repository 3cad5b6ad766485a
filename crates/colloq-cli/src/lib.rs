//! colloq CLI - Command-line interface library
//!
//! This library provides the CLI functionality for colloq, including:
//! - Generate: Render the poster preview and PDF
//! - Watch: Regenerate on every change to the request file
//! - Themes: List color themes
//! - Doctor: Locate or install the Marp renderer
//!
//! # Library Usage
//!
//! ```ignore
//! use colloq_cli::{PosterContext, RunOptions, Settings};
//!
//! let settings = Settings::load(None)?;
//! let mut context = PosterContext::from_settings(&settings);
//! let outcome = context.recompute(&request, RunOptions::default())?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Write a sample request, then render it
//! colloq init
//! colloq generate --request poster.toml --photo speaker.jpg --download
//!
//! # Keep regenerating while editing
//! colloq watch --request poster.toml
//! ```

pub mod app;
pub mod config;
pub mod pipeline;

// Re-export main entry point and types
pub use app::{
    doctor_command, generate_command, init_command, load_request, themes_command, watch_command,
};
pub use app::{run_cli, OutputFormat, RequestArgs};
pub use config::Settings;
pub use pipeline::{ArtifactOutcome, PipelineOutcome, PosterContext, RunOptions};
