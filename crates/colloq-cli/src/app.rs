//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use colloq_core::{PhotoAsset, PosterRequest};
use colloq_render::LocatorState;

use crate::config::Settings;
use crate::pipeline::{
    is_fatal, ArtifactOutcome, PipelineOutcome, PosterContext, RunOptions, DOWNLOAD_FILE_NAME,
};

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripts
    Json,
}

#[derive(Parser)]
#[command(name = "colloq")]
#[command(author, version, about = "Seminar posters from a few fields", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Field overrides applied on top of the request file
#[derive(Debug, Clone, Default, Args)]
pub struct RequestArgs {
    /// Poster request file (TOML)
    #[arg(short, long)]
    pub request: Option<PathBuf>,

    /// Speaker photo (JPEG or PNG)
    #[arg(short, long)]
    pub photo: Option<PathBuf>,

    /// Color theme name
    #[arg(long)]
    pub theme: Option<String>,

    /// Presentation title
    #[arg(long)]
    pub title: Option<String>,

    /// Speaker name
    #[arg(long)]
    pub speaker: Option<String>,

    /// Date and time
    #[arg(long)]
    pub date: Option<String>,

    /// Location
    #[arg(long)]
    pub location: Option<String>,

    /// Colloquium name
    #[arg(long)]
    pub colloquium: Option<String>,

    /// Speaker affiliation (use \n for line breaks)
    #[arg(long)]
    pub affiliation: Option<String>,

    /// Abstract text
    #[arg(long = "abstract")]
    pub abstract_text: Option<String>,

    /// Title font scale (1.0 to 4.0)
    #[arg(long)]
    pub title_scale: Option<f64>,

    /// Abstract font scale (0.5 to 1.0)
    #[arg(long)]
    pub abstract_scale: Option<f64>,

    /// Abstract box height in pixels (100 to 500)
    #[arg(long)]
    pub abstract_height: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the poster preview and PDF once
    Generate {
        #[command(flatten)]
        request: RequestArgs,

        /// Output directory (overrides the config file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Copy the finished PDF to this path
        #[arg(long, num_args = 0..=1, default_missing_value = DOWNLOAD_FILE_NAME)]
        download: Option<PathBuf>,

        /// Skip the PDF step
        #[arg(long)]
        no_pdf: bool,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Regenerate whenever the request file or photo changes
    Watch {
        #[command(flatten)]
        request: RequestArgs,

        /// Polling interval in milliseconds
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List available color themes
    Themes {
        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Locate (and install if needed) the Marp renderer
    Doctor {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a sample poster request file
    Init {
        /// Output file path
        #[arg(short, long, default_value = "poster.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            request,
            output,
            download,
            no_pdf,
            format,
            config,
        } => {
            let mut settings = Settings::load(config.as_deref())?;
            if let Some(dir) = output {
                settings.output.dir = dir;
            }
            generate_command(&settings, &request, download.as_deref(), no_pdf, format)?;
        }
        Commands::Watch {
            request,
            interval_ms,
            config,
        } => {
            let settings = Settings::load(config.as_deref())?;
            watch_command(&settings, &request, Duration::from_millis(interval_ms))?;
        }
        Commands::Themes { format, config } => {
            let settings = Settings::load(config.as_deref())?;
            themes_command(&settings, format)?;
        }
        Commands::Doctor { config } => {
            let settings = Settings::load(config.as_deref())?;
            doctor_command(&settings)?;
        }
        Commands::Init { output, force } => {
            init_command(&output, force)?;
        }
    }

    Ok(())
}

/// Request file layout: poster fields plus an optional photo path
#[derive(Deserialize)]
struct RequestFile {
    #[serde(flatten)]
    request: PosterRequest,
    photo: Option<PathBuf>,
}

/// Build a request from an optional file and command-line overrides
///
/// A relative `photo` path inside the request file is resolved against the
/// file's directory.
pub fn load_request(args: &RequestArgs) -> Result<PosterRequest> {
    let (mut request, file_photo) = match &args.request {
        Some(path) => read_request_file(path)?,
        None => (PosterRequest::default(), None),
    };

    if let Some(theme) = &args.theme {
        request.theme = theme.clone();
    }
    if let Some(title) = &args.title {
        request.title = title.clone();
    }
    if let Some(speaker) = &args.speaker {
        request.speaker_name = speaker.clone();
    }
    if let Some(date) = &args.date {
        request.date_time = date.clone();
    }
    if let Some(location) = &args.location {
        request.location = location.clone();
    }
    if let Some(colloquium) = &args.colloquium {
        request.colloquium_name = colloquium.clone();
    }
    if let Some(affiliation) = &args.affiliation {
        request.affiliation = affiliation.replace("\\n", "\n");
    }
    if let Some(abstract_text) = &args.abstract_text {
        request.abstract_text = abstract_text.clone();
    }
    if let Some(scale) = args.title_scale {
        request.title_font_scale = scale;
    }
    if let Some(scale) = args.abstract_scale {
        request.abstract_font_scale = scale;
    }
    if let Some(height) = args.abstract_height {
        request.abstract_height = height;
    }

    if let Some(photo_path) = args.photo.as_ref().or(file_photo.as_ref()) {
        let photo = PhotoAsset::from_path(photo_path)
            .with_context(|| format!("Failed to load photo: {}", photo_path.display()))?;
        request.photo = Some(photo);
    }

    Ok(request)
}

fn read_request_file(path: &Path) -> Result<(PosterRequest, Option<PathBuf>)> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file: {}", path.display()))?;
    let file: RequestFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse request file: {}", path.display()))?;
    let base = path.parent().unwrap_or(Path::new("."));
    Ok((file.request, file.photo.map(|p| base.join(p))))
}

/// Execute the generate command
pub fn generate_command(
    settings: &Settings,
    args: &RequestArgs,
    download: Option<&Path>,
    no_pdf: bool,
    format: OutputFormat,
) -> Result<()> {
    let request = load_request(args)?;
    let mut context = PosterContext::from_settings(settings);

    let options = RunOptions {
        preview: true,
        document: !no_pdf,
    };
    let outcome = context.recompute(&request, options)?;

    if let (Some(target), Some(pdf)) = (download, outcome.document.path()) {
        fs::copy(pdf, target)
            .with_context(|| format!("Failed to copy PDF to {}", target.display()))?;
        tracing::info!(target = %target.display(), "PDF copied");
    }

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&outcome)
                .context("Failed to serialize outcome to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!("colloq v{}", colloq_core::VERSION);
            print_outcome(&outcome);
            if let (Some(target), Some(_)) = (download, outcome.document.path()) {
                println!("  Download: {}", target.display());
            }
        }
    }

    // Exit with error code if a render step failed
    if outcome.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}

fn print_outcome(outcome: &PipelineOutcome) {
    println!("  Theme: {}", outcome.theme);
    println!("  Source: {}", outcome.source.display());
    print_artifact("Preview", &outcome.preview);
    print_artifact("PDF", &outcome.document);
}

fn print_artifact(label: &str, artifact: &ArtifactOutcome) {
    match artifact {
        ArtifactOutcome::Ready { path } => println!("  {}: {}", label, path.display()),
        ArtifactOutcome::Failed { stderr } => {
            println!("  {}: failed", label);
            for line in stderr.lines() {
                println!("    {}", line);
            }
        }
        ArtifactOutcome::MissingPhoto => {
            println!(
                "  {}: withheld - upload a photo to generate and download the PDF",
                label
            );
        }
        ArtifactOutcome::Skipped => println!("  {}: skipped", label),
    }
}

/// Files whose changes trigger a regeneration
///
/// The photo is the `--photo` argument, or else the one named in the request
/// file. An unreadable request file contributes no photo.
fn watched_paths(args: &RequestArgs) -> Vec<PathBuf> {
    let photo = args.photo.clone().or_else(|| {
        args.request
            .as_deref()
            .and_then(|path| read_request_file(path).ok())
            .and_then(|(_, photo)| photo)
    });
    args.request.iter().cloned().chain(photo).collect()
}

/// Modification times of the watched inputs
fn fingerprint(args: &RequestArgs) -> Vec<(PathBuf, Option<SystemTime>)> {
    watched_paths(args)
        .into_iter()
        .map(|p| {
            let modified = fs::metadata(&p).and_then(|m| m.modified()).ok();
            (p, modified)
        })
        .collect()
}

/// Execute the watch command
///
/// Runs until interrupted. Input and render errors are reported and the
/// loop keeps going; only a missing renderer ends it.
pub fn watch_command(settings: &Settings, args: &RequestArgs, interval: Duration) -> Result<()> {
    if args.request.is_none() {
        anyhow::bail!("watch needs a request file (--request <FILE>)");
    }

    let mut context = PosterContext::from_settings(settings);
    let mut last_seen = None;

    println!("colloq v{}", colloq_core::VERSION);
    println!("Watching for changes (Ctrl+C to stop)");

    loop {
        let current = fingerprint(args);
        if last_seen.as_ref() != Some(&current) {
            last_seen = Some(current);

            let result = load_request(args)
                .and_then(|request| context.recompute(&request, RunOptions::default()));
            match result {
                Ok(outcome) => {
                    println!();
                    println!("Regenerated");
                    print_outcome(&outcome);
                }
                Err(err) if is_fatal(&err) => return Err(err),
                Err(err) => {
                    println!();
                    println!("Error: {:#}", err);
                }
            }
        }
        std::thread::sleep(interval);
    }
}

/// Execute the themes command
pub fn themes_command(settings: &Settings, format: OutputFormat) -> Result<()> {
    let registry = settings.theme_registry();

    match format {
        OutputFormat::Json => {
            let themes: Vec<_> = registry
                .iter()
                .map(|(name, theme)| serde_json::json!({ "name": name, "colors": theme }))
                .collect();
            let json =
                serde_json::to_string_pretty(&themes).context("Failed to serialize themes")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            for (name, theme) in registry.iter() {
                println!("{}", name);
                println!("  main text: {}", theme.main_text);
                println!("  info border: {}", theme.info_border);
            }
        }
    }

    Ok(())
}

/// Execute the doctor command
pub fn doctor_command(settings: &Settings) -> Result<()> {
    println!("colloq v{}", colloq_core::VERSION);
    let mut context = PosterContext::from_settings(settings);

    if settings.renderer.command.is_empty() {
        println!(
            "  Looking for Marp CLI: {}",
            settings.renderer.script_path().display()
        );
    }

    let located = context.renderer();
    match context.locator().state() {
        LocatorState::Found(handle) => {
            println!("  Renderer: {}", handle);
            println!("  Output directory: {}", context.work_area().dir().display());
        }
        LocatorState::Unavailable(reason) => {
            println!("  Renderer unavailable: {}", reason);
        }
        other => println!("  Renderer state: {:?}", other),
    }

    located.map(|_| ()).map_err(Into::into)
}

/// Execute the init command
pub fn init_command(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    let body = toml::to_string(&PosterRequest::default())
        .context("Failed to serialize sample request")?;
    let content = format!(
        "# colloq poster request\n\
         # Run: colloq generate --request {}\n\
         # photo = \"speaker.jpg\"\n\n{}",
        output.display(),
        body
    );

    fs::write(output, content)
        .with_context(|| format!("Failed to write request file: {}", output.display()))?;
    println!("  Created: {}", output.display());

    Ok(())
}
