//! Integration tests for poster document rendering
//!
//! Exercises the request -> theme -> template path the CLI runs on every
//! regeneration.

use colloq_core::{encode_placeholder, PhotoAsset, PosterRequest, PosterTemplate, ThemeRegistry};

fn render(request: &PosterRequest) -> String {
    let registry = ThemeRegistry::builtin();
    request.validate(&registry).unwrap();
    let theme = registry.resolve(&request.theme).unwrap();
    PosterTemplate::new().render(request, theme)
}

#[test]
fn test_monochrome_without_photo() {
    let request = PosterRequest {
        title: "Test Talk".to_string(),
        speaker_name: "Dr. A".to_string(),
        abstract_text: "Line one.\nLine two.".to_string(),
        ..Default::default()
    }
    .with_theme("Monochrome");

    let doc = render(&request);

    assert!(doc.contains(encode_placeholder().as_str()));
    assert!(doc.contains("<p>Line one. Line two.</p>"));
    assert!(doc.contains("#2c3e50"));
    assert!(!request.has_photo());
}

#[test]
fn test_literal_fields_present() {
    let request = PosterRequest {
        title: "Entropy in Soft Matter".to_string(),
        speaker_name: "Prof. Kim".to_string(),
        location: "Room 101, Science Bldg.".to_string(),
        ..Default::default()
    };

    let doc = render(&request);

    assert!(doc.contains("Entropy in Soft Matter"));
    assert!(doc.contains("Prof. Kim"));
    assert!(doc.contains("Room 101, Science Bldg."));
}

#[test]
fn test_default_affiliation_has_one_break() {
    let doc = render(&PosterRequest::default());
    assert!(doc.contains("The University of Tokyo<br>Graduate School of Engineering"));
}

#[test]
fn test_uploaded_photo_embedded() {
    let request = PosterRequest::default().with_photo(PhotoAsset::Upload {
        bytes: b"fake-jpeg".to_vec(),
        mime_type: "image/jpeg".to_string(),
    });

    let doc = render(&request);

    assert!(doc.contains(r#"<img src="data:image/jpeg;base64,ZmFrZS1qcGVn""#));
    assert!(!doc.contains(encode_placeholder().as_str()));
}

#[test]
fn test_rendering_is_idempotent() {
    let request = PosterRequest {
        abstract_text: "First.\nSecond.\n\nThird.".to_string(),
        ..Default::default()
    }
    .with_theme("Purple/Mint");

    assert_eq!(render(&request), render(&request));
}

#[test]
fn test_every_theme_renders() {
    let registry = ThemeRegistry::builtin();
    for name in registry.names() {
        let request = PosterRequest::default().with_theme(name);
        let theme = registry.resolve(name).unwrap();
        let doc = PosterTemplate::new().render(&request, theme);
        assert!(doc.contains(&theme.header_bg), "{name}");
    }
}

#[test]
fn test_request_from_toml() {
    let request: PosterRequest = toml::from_str(
        r#"
title = "Gel Mechanics"
abstract = "one\ntwo"
theme = "Green/Orange"
abstract_height = 300
"#,
    )
    .unwrap();

    assert_eq!(request.title, "Gel Mechanics");
    assert_eq!(request.abstract_text, "one\ntwo");
    assert_eq!(request.abstract_height, 300);
    // unspecified fields keep their defaults
    assert_eq!(request.location, "Koshiba Hall");
    assert!(request.photo.is_none());

    let doc = render(&request);
    assert!(doc.contains("<p>one two</p>"));
}
