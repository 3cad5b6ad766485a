//! Colour themes
//!
//! A theme is a fixed set of CSS colour tokens applied to the poster layout.
//! The registry is built once and only read afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{PosterError, Result};

/// Name of the theme used when a request does not pick one
pub const DEFAULT_THEME: &str = "Blue/Yellow (Default)";

/// Colour tokens for one poster theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Header band background (usually a gradient)
    pub header_bg: String,
    /// Event info box background
    pub info_bg: String,
    /// Event info box border colour
    pub info_border: String,
    /// Event info box shadow colour
    pub info_shadow: String,
    /// Accent colour for speaker name and abstract headings
    pub main_text: String,
}

impl Theme {
    fn new(
        header_bg: &str,
        info_bg: &str,
        info_border: &str,
        info_shadow: &str,
        main_text: &str,
    ) -> Self {
        Self {
            header_bg: header_bg.to_string(),
            info_bg: info_bg.to_string(),
            info_border: info_border.to_string(),
            info_shadow: info_shadow.to_string(),
            main_text: main_text.to_string(),
        }
    }
}

/// Ordered name -> theme lookup table
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: Vec<(String, Theme)>,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ThemeRegistry {
    /// Registry holding the built-in themes
    pub fn builtin() -> Self {
        let themes = vec![
            (
                DEFAULT_THEME.to_string(),
                Theme::new(
                    "linear-gradient(135deg, #003f7f 0%,rgb(0, 120, 212) 100%)",
                    "linear-gradient(135deg, #ffd700 0%,hsl(51, 98.50%, 73.90%) 100%)",
                    "#f0c814",
                    "rgba(255, 215, 0, 0.3)",
                    "#003f7f",
                ),
            ),
            (
                "Green/Orange".to_string(),
                Theme::new(
                    "linear-gradient(135deg, #005a32 0%, #1e8449 100%)",
                    "linear-gradient(135deg, #f39c12 0%, #e67e22 100%)",
                    "#d35400",
                    "rgba(243, 156, 18, 0.3)",
                    "#005a32",
                ),
            ),
            (
                "Purple/Mint".to_string(),
                Theme::new(
                    "linear-gradient(135deg, #4a148c 0%, #8e44ad 100%)",
                    "linear-gradient(135deg, #a7ffeb 0%, #64ffda 100%)",
                    "#1de9b6",
                    "rgba(100, 255, 218, 0.3)",
                    "#4a148c",
                ),
            ),
            (
                "Monochrome".to_string(),
                Theme::new(
                    "linear-gradient(135deg, #2c3e50 0%, #34495e 100%)",
                    "linear-gradient(135deg, #ecf0f1 0%, #bdc3c7 100%)",
                    "#95a5a6",
                    "rgba(189, 195, 199, 0.3)",
                    "#2c3e50",
                ),
            ),
        ];

        Self { themes }
    }

    /// Add or replace a theme (builder style)
    ///
    /// A theme with an existing name replaces it in place, keeping order.
    pub fn with_theme(mut self, name: impl Into<String>, theme: Theme) -> Self {
        let name = name.into();
        match self.themes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = theme,
            None => self.themes.push((name, theme)),
        }
        self
    }

    /// Look up a theme by name
    pub fn resolve(&self, name: &str) -> Result<&Theme> {
        self.themes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
            .ok_or_else(|| PosterError::UnknownTheme(name.to_string()))
    }

    /// Check whether a theme name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.themes.iter().any(|(n, _)| n == name)
    }

    /// Registered theme names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.themes.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Iterate over `(name, theme)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Theme)> {
        self.themes.iter().map(|(n, t)| (n.as_str(), t))
    }

    /// Number of registered themes
    pub fn len(&self) -> usize {
        self.themes.len()
    }

    /// True if no themes are registered
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}
