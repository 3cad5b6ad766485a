//! Speaker photo handling
//!
//! Photos are embedded into the poster as base64 `data:` URIs so the
//! external renderer never needs access to the upload location.

use std::fmt;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{PosterError, Result};

/// SVG shown in place of a missing speaker photo
pub const PLACEHOLDER_SVG: &str = r##"<svg width="250" height="250" viewBox="0 0 250 250" xmlns="http://www.w3.org/2000/svg"><rect width="100%" height="100%" fill="#e9ecef"/><text x="50%" y="50%" dominant-baseline="middle" text-anchor="middle" font-family="sans-serif" font-size="20" fill="#6c757d">No Photo</text></svg>"##;

/// Image kinds the encoder knows a MIME type for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    /// JPEG photo
    Jpeg,
    /// PNG image
    Png,
    /// SVG vector graphic
    Svg,
}

impl ImageKind {
    /// MIME type for this kind
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }

    /// Detect kind from a file extension (case-insensitive, leading dot ok)
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        match ext.trim_start_matches('.') {
            "jpg" | "jpeg" | "jpe" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    /// Detect kind from a file path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Whether the kind is accepted as an uploaded speaker photo
    pub fn is_photo(&self) -> bool {
        matches!(self, Self::Jpeg | Self::Png)
    }
}

/// Guess a MIME type from a file name
pub fn guess_mime(file_name: &str) -> Option<&'static str> {
    ImageKind::from_path(Path::new(file_name)).map(|k| k.mime_type())
}

/// A self-contained `data:<mime>;base64,<payload>` URI
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataUri(String);

impl DataUri {
    /// The full URI string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// MIME type declared in the URI
    pub fn mime_type(&self) -> &str {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .unwrap_or_default()
    }

    /// Consume into the inner string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encode raw bytes as a base64 data URI
pub fn encode(bytes: &[u8], mime_type: &str) -> DataUri {
    DataUri(format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes)))
}

/// Encode the "No Photo" placeholder graphic
pub fn encode_placeholder() -> DataUri {
    encode(PLACEHOLDER_SVG.as_bytes(), ImageKind::Svg.mime_type())
}

/// The speaker photo attached to a request
#[derive(Clone, PartialEq, Eq)]
pub enum PhotoAsset {
    /// Uploaded image bytes with their MIME type
    Upload { bytes: Vec<u8>, mime_type: String },
    /// Generated "No Photo" graphic
    Placeholder,
}

impl fmt::Debug for PhotoAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload { bytes, mime_type } => f
                .debug_struct("Upload")
                .field("mime_type", mime_type)
                .field("len", &bytes.len())
                .finish(),
            Self::Placeholder => f.write_str("Placeholder"),
        }
    }
}

impl PhotoAsset {
    /// Create an upload from bytes, guessing the MIME type from `file_name`
    /// when `mime_type` is not given
    pub fn upload(bytes: Vec<u8>, mime_type: Option<&str>, file_name: &str) -> Result<Self> {
        let mime_type = match mime_type {
            Some(m) => m.to_string(),
            None => guess_mime(file_name)
                .ok_or_else(|| PosterError::UnsupportedImage(file_name.to_string()))?
                .to_string(),
        };
        Ok(Self::Upload { bytes, mime_type })
    }

    /// Read a JPEG or PNG photo from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let kind = ImageKind::from_path(path)
            .filter(ImageKind::is_photo)
            .ok_or_else(|| PosterError::UnsupportedImage(path.display().to_string()))?;
        let bytes = std::fs::read(path)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "loaded speaker photo");
        Ok(Self::Upload {
            bytes,
            mime_type: kind.mime_type().to_string(),
        })
    }

    /// True for an uploaded photo
    pub fn is_upload(&self) -> bool {
        matches!(self, Self::Upload { .. })
    }

    /// Encode into an embeddable data URI
    pub fn to_data_uri(&self) -> DataUri {
        match self {
            Self::Upload { bytes, mime_type } => encode(bytes, mime_type),
            Self::Placeholder => encode_placeholder(),
        }
    }
}
