//! Poster document template
//!
//! Renders a [`PosterRequest`] into a single Marp markdown document with an
//! embedded `<style>` block and HTML body. The output references no local
//! files: the photo is inlined as a data URI and the only external resource
//! is the web font stylesheet.
//!
//! # Document layout
//!
//! ```text
//! ---                      front matter: 16:9 page, no pagination
//! <style> ... </style>     theme colours, font scales, abstract height
//! header                   colloquium name + title
//! left panel               photo, speaker name, affiliation
//! right panel              date/location box, abstract
//! ```

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::request::PosterRequest;
use crate::sizing::{format_em, ShrinkRule};
use crate::theme::Theme;

/// Web font stylesheet imported by the poster
pub const DEFAULT_FONT_IMPORT: &str =
    "https://fonts.googleapis.com/css2?family=Noto+Sans+JP:wght@400;500;700&display=swap";

/// Template options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Escape `& < > " '` in user text
    pub escape_html: bool,
    /// URL of the web font stylesheet
    pub font_import: String,
    /// Speaker name shrink rule
    pub speaker_name: ShrinkRule,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            escape_html: true,
            font_import: DEFAULT_FONT_IMPORT.to_string(),
            speaker_name: ShrinkRule::default(),
        }
    }
}

/// Renders poster documents
#[derive(Debug, Clone, Default)]
pub struct PosterTemplate {
    config: TemplateConfig,
}

impl PosterTemplate {
    /// Create a template with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a template with explicit options
    pub fn with_config(config: TemplateConfig) -> Self {
        Self { config }
    }

    /// Active options
    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// Render the complete document
    pub fn render(&self, request: &PosterRequest, theme: &Theme) -> String {
        let mut output = String::new();
        output.push_str(&front_matter());
        output.push_str(&self.style_block(request, theme));
        output.push_str(&self.content_block(request));
        output
    }

    /// Prepare user text for insertion into markup
    fn text(&self, value: &str) -> String {
        if self.config.escape_html {
            escape_html(value)
        } else {
            value.to_string()
        }
    }

    fn style_block(&self, request: &PosterRequest, theme: &Theme) -> String {
        let speaker_size = self.config.speaker_name.size_for(&request.speaker_name);
        let mut css = String::new();

        let _ = writeln!(css, "<style>");
        let _ = writeln!(css, "  @import url('{}');", self.config.font_import);
        css.push_str(
            "  section {
    display: flex; flex-direction: column; padding: 0;
    font-family: 'Noto Sans JP', sans-serif;
    background: linear-gradient(135deg, #f1f3f6 0%, #e8eef4 100%);
    overflow: hidden;
  }
",
        );
        let _ = write!(
            css,
            "  .header-container {{
    background: {header_bg};
    padding: 50px 60px 30px 60px; margin-bottom: 0px;
    transform: skewY(-3deg); position: relative; z-index: 1; margin-top: -30px;
  }}
  .colloquium-name {{
    position: absolute; top: 35px; left: 970px; font-size: 1em;
    font-weight: 500; color: rgba(255, 255, 255, 0.8); transform: skewY(3deg);
  }}
  .title {{
    font-size: {title}em; font-weight: 900; color: #ffffff; text-align: center;
    line-height: 1.3; text-shadow: 0 2px 5px rgba(0, 0, 0, 0.25);
    transform: skewY(3deg); margin-bottom: 0; white-space: nowrap;
  }}
  .main-content {{
    display: flex; flex-direction: row; flex: 1; gap: 50px; padding: 0 40px;
  }}
  .left-panel {{
    flex: 0 0 280px; display: flex; flex-direction: column; align-items: center;
  }}
  .right-panel {{
    flex: 1; display: flex; flex-direction: column; gap: 20px;
  }}
  .speaker-photo {{
    width: 250px; height: 250px; border-radius: 50%; object-fit: cover;
    object-position: center;
    box-shadow: 0 10px 30px rgba(0, 63, 127, 0.25);
    border: 5px solid #ffffff; margin-bottom: 25px; position: relative; z-index: 2;
  }}
  .speaker-info {{
    text-align: center; background-color: white; padding: 20px;
    border-radius: 12px; box-shadow: 0 4px 12px rgba(0, 0, 0, 0.1); width: 100%;
  }}
  .speaker-name {{
    font-size: {speaker}em; font-weight: 700; color: {main_text}; margin-bottom: 8px;
    white-space: nowrap;
  }}
  .affiliation {{
    font-size: 1.0em; color: #666; line-height: 1.4; font-weight: 400;
  }}
  .info-section {{
    background: {info_bg}; border: 2px solid {info_border};
    box-shadow: 0 6px 18px {info_shadow};
    border-radius: 12px; padding: 18px 25px;
  }}
  .event-info {{
    display: grid; grid-template-columns: auto 1fr; gap: 6px 16px;
    font-size: 0.9em; color: {main_text};
  }}
  .info-label {{
    font-weight: 700;
  }}
  .abstract {{
    background-color: white; padding: 25px; border-radius: 12px;
    box-shadow: 0 4px 12px rgba(1, 36, 72, 0.15);
    border-left: 4px solid {main_text};
    height: {height}px;
    overflow-y: auto;
  }}
  .abstract-title {{
    font-size: 0.8em; color: {main_text}; margin-bottom: 18px;
    font-weight: 700; border-bottom: 2px solid {main_text}; padding-bottom: 8px;
  }}
  .abstract p {{
    font-size: {abstract_scale}em; line-height: 1.6; color: #333; text-align: justify;
    margin-bottom: 12px; font-weight: 400;
  }}
",
            header_bg = theme.header_bg,
            title = format_em(request.title_font_scale),
            speaker = format_em(speaker_size),
            main_text = theme.main_text,
            info_bg = theme.info_bg,
            info_border = theme.info_border,
            info_shadow = theme.info_shadow,
            height = request.abstract_height,
            abstract_scale = format_em(request.abstract_font_scale),
        );
        css.push_str("</style>\n\n");
        css
    }

    fn content_block(&self, request: &PosterRequest) -> String {
        let affiliation = affiliation_html(&self.text(&request.affiliation));
        let abstract_paragraph = abstract_html(&self.text(&request.abstract_text));

        format!(
            r#"<div class="header-container">
  <div class="colloquium-name">{colloquium}</div>
  <div class="title">{title}</div>
</div>
<div class="main-content">
  <div class="left-panel">
    <img src="{photo}" alt="Speaker Photo" class="speaker-photo">
    <div class="speaker-info">
      <div class="speaker-name">{speaker}</div>
      <div class="affiliation">{affiliation}</div>
    </div>
  </div>
  <div class="right-panel">
    <div class="info-section">
      <div class="event-info">
        <div class="info-label">Date:</div> <div class="info-value">{date_time}</div>
        <div class="info-label">Location:</div> <div class="info-value">{location}</div>
      </div>
    </div>
    <div class="abstract">
      <div class="abstract-title">Abstract</div>
      {abstract_paragraph}
    </div>
  </div>
</div>
"#,
            colloquium = self.text(&request.colloquium_name),
            title = self.text(&request.title),
            photo = request.photo_uri(),
            speaker = self.text(&request.speaker_name),
            affiliation = affiliation,
            date_time = self.text(&request.date_time),
            location = self.text(&request.location),
            abstract_paragraph = abstract_paragraph,
        )
    }
}

/// Marp front matter: fixed 16:9 page, pagination off
fn front_matter() -> String {
    "---\nmarp: true\ntheme: default\npaginate: false\nsize: 16:9\n---\n\n".to_string()
}

/// Replace every newline with an explicit `<br>`
pub fn affiliation_html(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "<br>")
}

/// Collapse a multi-line abstract into a single `<p>` paragraph
///
/// Surrounding whitespace is trimmed and each line break becomes one space.
/// `\r\n` counts as a single break; a lone `\r`, vertical tab, form feed and
/// the Unicode line/paragraph separators are breaks too.
pub fn abstract_html(text: &str) -> String {
    let text = text.trim().replace("\r\n", "\n");
    let joined: Vec<&str> = text.split(is_line_break).collect();
    format!("<p>{}</p>", joined.join(" "))
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}'
            | '\u{2028}' | '\u{2029}'
    )
}

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeRegistry;

    fn monochrome() -> Theme {
        ThemeRegistry::builtin()
            .resolve("Monochrome")
            .unwrap()
            .clone()
    }

    #[test]
    fn test_front_matter_first() {
        let doc = PosterTemplate::new().render(&PosterRequest::default(), &monochrome());
        assert!(doc.starts_with("---\nmarp: true\n"));
        assert!(doc.contains("paginate: false"));
        assert!(doc.contains("size: 16:9"));
    }

    #[test]
    fn test_theme_colours_applied() {
        let theme = monochrome();
        let doc = PosterTemplate::new().render(&PosterRequest::default(), &theme);
        assert!(doc.contains(&format!("background: {};", theme.header_bg)));
        assert!(doc.contains(&format!("background: {};", theme.info_bg)));
        assert!(doc.contains(&format!("border: 2px solid {};", theme.info_border)));
        assert!(doc.contains(&format!("box-shadow: 0 6px 18px {};", theme.info_shadow)));
        assert!(doc.contains(&format!("border-left: 4px solid {};", theme.main_text)));
    }

    #[test]
    fn test_scales_and_height_applied() {
        let request = PosterRequest {
            title_font_scale: 3.2,
            abstract_font_scale: 0.75,
            abstract_height: 320,
            ..Default::default()
        };
        let doc = PosterTemplate::new().render(&request, &monochrome());
        assert!(doc.contains("font-size: 3.2em; font-weight: 900;"));
        assert!(doc.contains("font-size: 0.75em; line-height: 1.6;"));
        assert!(doc.contains("height: 320px;"));
    }

    #[test]
    fn test_speaker_name_shrinks() {
        let short = PosterRequest {
            speaker_name: "Dr. Jane Doe".to_string(),
            ..Default::default()
        };
        let long = PosterRequest {
            speaker_name: "Dr. Jonathan Alexander".to_string(),
            ..Default::default()
        };
        let template = PosterTemplate::new();
        assert!(template
            .render(&short, &monochrome())
            .contains("font-size: 1.5em; font-weight: 700;"));
        assert!(template
            .render(&long, &monochrome())
            .contains("font-size: 0.8em; font-weight: 700;"));
    }

    #[test]
    fn test_affiliation_breaks_match_newlines() {
        let affiliation = "Dept. of Physics\nFaculty of Science\nSome University";
        let html = affiliation_html(affiliation);
        assert_eq!(html.matches("<br>").count(), 2);
        assert_eq!(html, "Dept. of Physics<br>Faculty of Science<br>Some University");
    }

    #[test]
    fn test_affiliation_crlf() {
        assert_eq!(affiliation_html("A\r\nB"), "A<br>B");
    }

    #[test]
    fn test_abstract_joined() {
        assert_eq!(
            abstract_html("  Line one.\nLine two.\n"),
            "<p>Line one. Line two.</p>"
        );
        assert_eq!(abstract_html("One\r\nTwo"), "<p>One Two</p>");
    }

    #[test]
    fn test_abstract_other_line_breaks() {
        assert_eq!(
            abstract_html("Line one.\rLine two."),
            "<p>Line one. Line two.</p>"
        );
        assert_eq!(abstract_html("A\u{2028}B\u{0c}C"), "<p>A B C</p>");
        assert_eq!(abstract_html("A\r\n\r\nB"), "<p>A  B</p>");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Gels" & 'Water'</b>"#),
            "&lt;b&gt;&quot;Gels&quot; &amp; &#39;Water&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_escaping_enabled_by_default() {
        let request = PosterRequest {
            title: "Gels <and> Water".to_string(),
            ..Default::default()
        };
        let doc = PosterTemplate::new().render(&request, &monochrome());
        assert!(doc.contains("Gels &lt;and&gt; Water"));
        assert!(!doc.contains("Gels <and> Water"));
    }

    #[test]
    fn test_escaping_can_be_disabled() {
        let request = PosterRequest {
            title: "H<sub>2</sub>O".to_string(),
            affiliation: "A & B\nC".to_string(),
            ..Default::default()
        };
        let template = PosterTemplate::with_config(TemplateConfig {
            escape_html: false,
            ..Default::default()
        });
        let doc = template.render(&request, &monochrome());
        assert!(doc.contains("H<sub>2</sub>O"));
        assert!(doc.contains("A & B<br>C"));
    }

    #[test]
    fn test_newline_rules_survive_escaping() {
        let request = PosterRequest {
            affiliation: "R&D Lab\nTokyo".to_string(),
            abstract_text: "x < y\nalways".to_string(),
            ..Default::default()
        };
        let doc = PosterTemplate::new().render(&request, &monochrome());
        assert!(doc.contains("R&amp;D Lab<br>Tokyo"));
        assert!(doc.contains("<p>x &lt; y always</p>"));
    }

    #[test]
    fn test_custom_font_import() {
        let template = PosterTemplate::with_config(TemplateConfig {
            font_import: "https://example.org/fonts.css".to_string(),
            ..Default::default()
        });
        let doc = template.render(&PosterRequest::default(), &monochrome());
        assert!(doc.contains("@import url('https://example.org/fonts.css');"));
    }
}
