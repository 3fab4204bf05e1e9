//! Gallery template loading and rendering.
//!
//! A template is plain HTML with `{{name}}` placeholders. It is parsed once
//! at startup; a template that names an unknown placeholder, leaves one open,
//! or has nowhere to put the gallery is rejected then rather than per request.
//!
//! | Placeholder        | Filled with                                      |
//! |--------------------|--------------------------------------------------|
//! | `{{title}}`        | page title, escaped                              |
//! | `{{album_header}}` | album description and count (empty otherwise)    |
//! | `{{gallery}}`      | one `<a><img></a>` per asset                     |
//! | `{{preview_urls}}` | JSON array of preview URLs, safe inside `<script>` |
//! | `{{asset_count}}`  | number of displayed assets                       |

use std::fmt::Write;
use std::path::Path;

use crate::error::RenderError;

use super::page::GalleryPage;

/// The template shipped with the gateway.
pub const BUILTIN_TEMPLATE: &str = include_str!("../../templates/gallery.html");

// =============================================================================
// PageRenderer Trait
// =============================================================================

/// Turns a gallery page into HTML.
///
/// Constructed once at startup and shared read-only between handlers.
pub trait PageRenderer: Send + Sync {
    fn render(&self, page: &GalleryPage) -> Result<String, RenderError>;
}

// =============================================================================
// Template
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Title,
    AlbumHeader,
    Gallery,
    PreviewUrls,
    AssetCount,
}

impl Slot {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Slot::Title),
            "album_header" => Some(Slot::AlbumHeader),
            "gallery" => Some(Slot::Gallery),
            "preview_urls" => Some(Slot::PreviewUrls),
            "asset_count" => Some(Slot::AssetCount),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Slot(Slot),
}

/// A parsed, immutable gallery template.
#[derive(Debug, Clone)]
pub struct GalleryTemplate {
    segments: Vec<Segment>,
    text_len: usize,
}

impl GalleryTemplate {
    /// Parse template source.
    pub fn parse(source: &str) -> Result<Self, RenderError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }

            let after = &rest[start + 2..];
            let end = after
                .find("}}")
                .ok_or(RenderError::Unterminated(offset + start))?;

            let name = after[..end].trim();
            let slot = Slot::from_name(name)
                .ok_or_else(|| RenderError::UnknownPlaceholder(name.to_string()))?;
            segments.push(Segment::Slot(slot));

            let consumed = start + 2 + end + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        if !segments.contains(&Segment::Slot(Slot::Gallery)) {
            return Err(RenderError::MissingPlaceholder("gallery"));
        }

        let text_len = segments
            .iter()
            .map(|s| match s {
                Segment::Text(t) => t.len(),
                Segment::Slot(_) => 0,
            })
            .sum();

        Ok(Self { segments, text_len })
    }

    /// Read and parse a template file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| RenderError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&source)
    }

    /// The template bundled into the binary.
    pub fn builtin() -> Result<Self, RenderError> {
        Self::parse(BUILTIN_TEMPLATE)
    }

    fn fill(&self, slot: Slot, page: &GalleryPage, out: &mut String) -> std::fmt::Result {
        match slot {
            Slot::Title => out.push_str(&html_escape(&page.title)),
            Slot::AssetCount => write!(out, "{}", page.preview_urls.len())?,
            Slot::AlbumHeader => {
                if !page.is_album {
                    return Ok(());
                }
                if let Some(ref description) = page.album_description {
                    write!(
                        out,
                        r#"<p class="album-description">{}</p>"#,
                        html_escape(description)
                    )?;
                }
                if let Some(count) = page.album_asset_count {
                    let noun = if count == 1 { "item" } else { "items" };
                    write!(out, r#"<p class="album-count">{} {}</p>"#, count, noun)?;
                }
            }
            Slot::Gallery => {
                for (index, (preview, thumbnail)) in page.items().enumerate() {
                    write!(
                        out,
                        r#"<a class="gallery-item" href="{}" data-index="{}"><img src="{}" loading="lazy" alt=""></a>"#,
                        html_escape(preview),
                        index,
                        html_escape(thumbnail)
                    )?;
                    out.push('\n');
                }
            }
            Slot::PreviewUrls => {
                let json = serde_json::to_string(&page.preview_urls).map_err(|_| std::fmt::Error)?;
                out.push_str(&script_escape(&json));
            }
        }
        Ok(())
    }
}

impl PageRenderer for GalleryTemplate {
    fn render(&self, page: &GalleryPage) -> Result<String, RenderError> {
        let mut out = String::with_capacity(self.text_len + page.preview_urls.len() * 160);

        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Slot(slot) => self
                    .fill(*slot, page, &mut out)
                    .map_err(|e| RenderError::Render(e.to_string()))?,
            }
        }

        Ok(out)
    }
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Make JSON safe to embed in a `<script>` element.
fn script_escape(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}
