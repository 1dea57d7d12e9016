//! Centralized filename handling for albums and photos.
//!
//! Every album and photo is identified by its name on disk. Two derived forms
//! are used everywhere else:
//!
//! - **Lowercase extension**: drives the ignore filter and video
//!   classification. It is the text after the last `.`, so `.meta` has the
//!   extension `meta` and a name without a dot is its own extension.
//! - **Encoded segment**: the name made safe for a URL path segment.
//!   `My Trip.jpg` → `My%20Trip.jpg`.

use std::collections::HashSet;
use std::fmt;

/// A displayable file within an album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    /// Filename on disk.
    pub name: String,
    /// `name` percent-encoded for generated links.
    pub encoded: String,
}

impl Photo {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let encoded = encode_segment(&name);
        Self { name, encoded }
    }

    pub fn extension(&self) -> String {
        extension_lowercase(&self.name)
    }

    /// Whether the extension is in `video` (lowercase entries).
    pub fn is_video(&self, video: &HashSet<String>) -> bool {
        video.contains(&self.extension())
    }
}

impl AsRef<str> for Photo {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Extension of `name`, lowercased.
///
/// - `"IMG_01.JPG"` → `"jpg"`
/// - `".meta"` → `"meta"`
/// - `"archive.tar.GZ"` → `"gz"`
/// - `"README"` → `"readme"`
pub fn extension_lowercase(name: &str) -> String {
    match name.rfind('.') {
        Some(pos) => name[pos + 1..].to_lowercase(),
        None => name.to_lowercase(),
    }
}

/// Percent-encode a name for use as one URL path segment.
///
/// Form-urlencoding with the space written as `%20` rather than `+`, so the
/// result is valid in a path. `/` is encoded, so a segment never splits.
pub fn encode_segment(name: &str) -> String {
    url::form_urlencoded::byte_serialize(name.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Whether `name` can be joined onto a directory without escaping it.
///
/// Rejects the empty name, `.`, `..`, and anything containing a separator.
pub fn is_safe_segment(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
