//! Placeholder substitution for the HTML templates.
//!
//! Templates are plain text with two placeholder grammars:
//!
//! - **Scalar**: `%(name)` is replaced by a value. Values are inserted as-is;
//!   callers escape anything that is not already HTML. Each pass scans the
//!   template once, so inserted values are never scanned again and a value
//!   that itself reads `%(other)` stays literal. Unknown names are left in
//!   place.
//! - **Cycle**: a line containing `%(cycle:name)` is a row template. The
//!   marker is removed and the line is rendered once per row, the rendered
//!   lines joined with `\n` in place of the original line. Only the first
//!   marker line per name is expanded.
//!
//! Conditional content is faked with comment markers. For a flag `Video`:
//!
//! | Marker | flag true | flag false |
//! |---|---|---|
//! | `%(commentIfVideoHtmlStart)` | `<!--` | (empty) |
//! | `%(commentIfVideoHtmlEnd)` | `-->` | (empty) |
//! | `%(commentIfVideoJavaScript)` | `//` | (empty) |
//! | `%(commentIfNotVideoJavaScript)` | (empty) | `//` |
//!
//! There is no nesting and no expression language.

use crate::config::{RenderingConfig, TemplatesConfig};
use std::fs;
use std::path::Path;
use tracing::warn;

pub const ALBUMS_TEMPLATE: &str = "albums.html";
pub const ALBUM_PHOTOS_TEMPLATE: &str = "album_photos.html";
pub const PHOTO_TEMPLATE: &str = "photo.html";

const BUNDLED_ALBUMS: &str = include_str!("../templates/albums.html");
const BUNDLED_ALBUM_PHOTOS: &str = include_str!("../templates/album_photos.html");
const BUNDLED_PHOTO: &str = include_str!("../templates/photo.html");

/// `%(cycle:name)`
pub fn cycle_marker(name: &str) -> String {
    format!("%(cycle:{name})")
}

/// Scalar values for one substitution pass.
///
/// When a name is set twice the first value wins.
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    values: Vec<(String, String)>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &str, value: impl Into<String>) -> Self {
        self.values.push((name.to_string(), value.into()));
        self
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Replace every known `%(name)` in `text`, left to right.
    pub fn apply(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find("%(") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let found = after
                .find(')')
                .and_then(|end| self.get(&after[..end]).map(|value| (end, value)));
            match found {
                Some((end, value)) => {
                    out.push_str(value);
                    rest = &after[end + 1..];
                }
                None => {
                    out.push_str("%(");
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Read a template file; an unreadable file yields an empty template.
pub fn load_template(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "template not readable, rendering empty");
            String::new()
        }
    }
}

/// Substitute the page header placeholders shared by all templates.
pub fn apply_global_header(text: &str, rendering: &RenderingConfig) -> String {
    Substitutions::new()
        .set("title", &rendering.title)
        .set("bgcolor", &rendering.bgcolor)
        .set("linkcolor", &rendering.linkcolor)
        .set("vlinkcolor", &rendering.vlinkcolor)
        .apply(text)
}

/// Replace the `%(cycle:variable)` line with one rendered line per row.
///
/// Text without the marker is returned unchanged. Zero rows leave an empty
/// line where the marker line was.
pub fn expand_cycle(text: &str, variable: &str, rows: &[Substitutions]) -> String {
    expand_cycle_in_page(text, variable, &Substitutions::new(), rows)
}

/// [`expand_cycle`], with `page` substituted into the text around the row
/// line.
///
/// The marker is located before any value is inserted, so a page value
/// cannot introduce or hide a cycle marker.
pub fn expand_cycle_in_page(
    text: &str,
    variable: &str,
    page: &Substitutions,
    rows: &[Substitutions],
) -> String {
    let marker = cycle_marker(variable);
    let Some(pos) = text.find(&marker) else {
        return page.apply(text);
    };
    let start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
    let end = text[pos..].find('\n').map_or(text.len(), |i| pos + i);

    let row_template = text[start..end].replace(&marker, "");
    let block = rows
        .iter()
        .map(|row| row.apply(&row_template))
        .collect::<Vec<_>>()
        .join("\n");

    let mut out = String::with_capacity(text.len() + block.len());
    out.push_str(&page.apply(&text[..start]));
    out.push_str(&block);
    out.push_str(&page.apply(&text[end..]));
    out
}

/// Resolve the comment markers for `flag` (see the module docs).
pub fn render_conditional_toggle(text: &str, flag: &str, is_true: bool) -> String {
    let (html_start, html_end, js) = if is_true {
        ("<!--", "-->", "//")
    } else {
        ("", "", "")
    };
    let js_not = if is_true { "" } else { "//" };
    Substitutions::new()
        .set(&format!("commentIf{flag}HtmlStart"), html_start)
        .set(&format!("commentIf{flag}HtmlEnd"), html_end)
        .set(&format!("commentIf{flag}JavaScript"), js)
        .set(&format!("commentIfNot{flag}JavaScript"), js_not)
        .apply(text)
}

/// The three page templates.
#[derive(Debug, Clone)]
pub struct Templates {
    pub albums: String,
    pub album_photos: String,
    pub photo: String,
}

impl Templates {
    /// Templates compiled into the binary.
    pub fn bundled() -> Self {
        Self {
            albums: BUNDLED_ALBUMS.to_string(),
            album_photos: BUNDLED_ALBUM_PHOTOS.to_string(),
            photo: BUNDLED_PHOTO.to_string(),
        }
    }

    /// Templates read from `dir`. Missing files become empty templates.
    pub fn load(dir: &Path) -> Self {
        Self {
            albums: load_template(&dir.join(ALBUMS_TEMPLATE)),
            album_photos: load_template(&dir.join(ALBUM_PHOTOS_TEMPLATE)),
            photo: load_template(&dir.join(PHOTO_TEMPLATE)),
        }
    }

    pub fn from_config(config: &TemplatesConfig) -> Self {
        match &config.dir {
            Some(dir) => Self::load(Path::new(dir)),
            None => Self::bundled(),
        }
    }

    /// Apply the global header to every template.
    pub fn with_header(self, rendering: &RenderingConfig) -> Self {
        Self {
            albums: apply_global_header(&self.albums, rendering),
            album_photos: apply_global_header(&self.album_photos, rendering),
            photo: apply_global_header(&self.photo, rendering),
        }
    }
}
