//! Configuration file
//!
//! Settings are loaded from `colloq.toml` in the working directory (or the
//! path given with `--config`):
//!
//! ```toml
//! [output]
//! dir = "output"
//!
//! [renderer]
//! install_prefix = "~/.local"
//! version = "1.7.1"
//! auto_install = true
//! timeout_secs = 120
//!
//! [template]
//! escape_html = true
//!
//! [sizing]
//! base = 1.5
//! min = 0.8
//! threshold = 12
//! step = 0.1
//!
//! [themes."Night Sky"]
//! header_bg = "linear-gradient(135deg, #0b1d3a 0%, #1f3b73 100%)"
//! info_bg = "#f5f5f5"
//! info_border = "#1f3b73"
//! info_shadow = "rgba(31, 59, 115, 0.3)"
//! main_text = "#0b1d3a"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use colloq_core::template::DEFAULT_FONT_IMPORT;
use colloq_core::{ShrinkRule, TemplateConfig, Theme, ThemeRegistry};
use colloq_render::RendererConfig;

/// File names searched when no `--config` is given
pub const CONFIG_CANDIDATES: [&str; 2] = ["colloq.toml", ".colloq.toml"];

/// Top-level settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Working storage
    pub output: OutputSettings,
    /// Renderer discovery and invocation
    pub renderer: RendererConfig,
    /// Template options
    pub template: TemplateSettings,
    /// Speaker name shrink rule
    pub sizing: ShrinkRule,
    /// Extra themes, added after the built-in ones
    pub themes: BTreeMap<String, Theme>,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load from an explicit path, or from the first candidate file found,
    /// or fall back to defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Self::load_file(path)
            }
            None => {
                for candidate in CONFIG_CANDIDATES {
                    let path = Path::new(candidate);
                    if path.exists() {
                        return Self::load_file(path);
                    }
                }
                Ok(Self::default())
            }
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let settings = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Built-in themes plus configured ones
    pub fn theme_registry(&self) -> ThemeRegistry {
        self.themes
            .iter()
            .fold(ThemeRegistry::builtin(), |registry, (name, theme)| {
                registry.with_theme(name.clone(), theme.clone())
            })
    }

    /// Template options assembled from `[template]` and `[sizing]`
    pub fn template_config(&self) -> TemplateConfig {
        TemplateConfig {
            escape_html: self.template.escape_html,
            font_import: self.template.font_import.clone(),
            speaker_name: self.sizing,
        }
    }
}

/// Working storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory holding `preview.md`, `preview.html`, and `poster.pdf`
    pub dir: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
        }
    }
}

/// Template configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TemplateSettings {
    /// Escape HTML special characters in user text
    pub escape_html: bool,
    /// Web font stylesheet URL
    pub font_import: String,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            escape_html: true,
            font_import: DEFAULT_FONT_IMPORT.to_string(),
        }
    }
}
