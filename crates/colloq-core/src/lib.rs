//! colloq-core - seminar posters from plain field values
//!
//! Core library for colloq: themes, photo encoding, font sizing, and the
//! poster document template.
//!
//! # Example
//!
//! ```
//! use colloq_core::{PosterRequest, PosterTemplate, ThemeRegistry};
//!
//! let registry = ThemeRegistry::builtin();
//! let request = PosterRequest {
//!     title: "Test Talk".to_string(),
//!     speaker_name: "Dr. A".to_string(),
//!     ..Default::default()
//! }
//! .with_theme("Monochrome");
//!
//! request.validate(&registry)?;
//! let theme = registry.resolve(&request.theme)?;
//! let document = PosterTemplate::new().render(&request, theme);
//! assert!(document.contains("Test Talk"));
//! # Ok::<(), colloq_core::PosterError>(())
//! ```

pub mod error;
pub mod image;
pub mod request;
pub mod sizing;
pub mod template;
pub mod theme;

// Re-export main types and functions
pub use error::{PosterError, Result};
pub use image::{encode, encode_placeholder, guess_mime, DataUri, ImageKind, PhotoAsset};
pub use request::PosterRequest;
pub use sizing::{dynamic_size, ShrinkRule};
pub use template::{PosterTemplate, TemplateConfig};
pub use theme::{Theme, ThemeRegistry, DEFAULT_THEME};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "1.0.0");
    }
}
