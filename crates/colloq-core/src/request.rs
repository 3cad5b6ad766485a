//! Poster request model
//!
//! A [`PosterRequest`] holds every user-chosen value for one generation.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{PosterError, Result};
use crate::image::{DataUri, PhotoAsset};
use crate::theme::{ThemeRegistry, DEFAULT_THEME};

/// Allowed title font scale (em)
pub const TITLE_SCALE_RANGE: RangeInclusive<f64> = 1.0..=4.0;

/// Allowed abstract font scale (em)
pub const ABSTRACT_SCALE_RANGE: RangeInclusive<f64> = 0.5..=1.0;

/// Allowed abstract box height (px)
pub const ABSTRACT_HEIGHT_RANGE: RangeInclusive<u32> = 100..=500;

/// All field values and style choices for a single poster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosterRequest {
    /// Event series name shown in the header corner
    pub colloquium_name: String,
    /// Talk title
    pub title: String,
    /// Speaker display name
    pub speaker_name: String,
    /// Affiliation, one line per institution/department
    pub affiliation: String,
    /// Free-form date and time
    pub date_time: String,
    /// Venue
    pub location: String,
    /// Talk abstract
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Registered theme name
    pub theme: String,
    /// Title font size (em)
    pub title_font_scale: f64,
    /// Abstract paragraph font size (em)
    pub abstract_font_scale: f64,
    /// Abstract box height (px)
    pub abstract_height: u32,
    /// Uploaded photo; `None` renders the placeholder
    #[serde(skip)]
    pub photo: Option<PhotoAsset>,
}

impl Default for PosterRequest {
    fn default() -> Self {
        Self {
            colloquium_name: "Physics Dept. Colloquium".to_string(),
            title: "The Precise Physics of Polymer Gels".to_string(),
            speaker_name: "Dr. Takamasa Sakai".to_string(),
            affiliation: "The University of Tokyo\nGraduate School of Engineering".to_string(),
            date_time: "June 20, 2025, 17:00-18:30".to_string(),
            location: "Koshiba Hall".to_string(),
            abstract_text:
                "A hydrogel is a polymer network swollen with a large amount of water..."
                    .to_string(),
            theme: DEFAULT_THEME.to_string(),
            title_font_scale: 2.8,
            abstract_font_scale: 0.65,
            abstract_height: 250,
            photo: None,
        }
    }
}

impl PosterRequest {
    /// Attach a photo (builder style)
    pub fn with_photo(mut self, photo: PhotoAsset) -> Self {
        self.photo = Some(photo);
        self
    }

    /// Select a theme (builder style)
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    /// True when an uploaded photo is attached
    pub fn has_photo(&self) -> bool {
        self.photo.as_ref().is_some_and(PhotoAsset::is_upload)
    }

    /// Data URI for the photo slot, falling back to the placeholder
    pub fn photo_uri(&self) -> DataUri {
        self.photo
            .as_ref()
            .unwrap_or(&PhotoAsset::Placeholder)
            .to_data_uri()
    }

    /// Check numeric ranges and that the theme is registered
    pub fn validate(&self, registry: &ThemeRegistry) -> Result<()> {
        check_range("title_font_scale", self.title_font_scale, &TITLE_SCALE_RANGE)?;
        check_range(
            "abstract_font_scale",
            self.abstract_font_scale,
            &ABSTRACT_SCALE_RANGE,
        )?;
        check_range(
            "abstract_height",
            f64::from(self.abstract_height),
            &(f64::from(*ABSTRACT_HEIGHT_RANGE.start())..=f64::from(*ABSTRACT_HEIGHT_RANGE.end())),
        )?;

        if !registry.contains(&self.theme) {
            return Err(PosterError::UnknownTheme(self.theme.clone()));
        }
        Ok(())
    }
}

fn check_range(field: &'static str, value: f64, range: &RangeInclusive<f64>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(PosterError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}
