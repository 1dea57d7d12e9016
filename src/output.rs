//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every entity leads with a positional index and its name; details follow
//! as indented context lines. The same helpers render albums for the
//! `albums` listing and the `check` inventory, so an album looks the same in
//! both.
//!
//! ## Albums
//!
//! ```text
//! Albums visible to family
//! 001 birthdays
//! 002 vacation
//! ```
//!
//! ## Check
//!
//! ```text
//! Albums in photos/
//! 001 birthdays (2 photos, 1 video)
//!     001 cake.jpg
//!     002 candles.jpg
//!     003 song.mp4 (video)
//! 002 empty (no media)
//!
//! Checked 2 albums, 3 files
//! ```
//!
//! # Architecture
//!
//! Each listing has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::naming::Photo;
use std::collections::HashSet;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 photo`, `2 photos`
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Album header with a media breakdown.
///
/// ```text
/// 001 vacation (3 photos, 1 video)
/// 002 empty (no media)
/// ```
fn album_header(index: usize, name: &str, photos: usize, videos: usize) -> String {
    let detail = match (photos, videos) {
        (0, 0) => "no media".to_string(),
        (p, 0) => plural(p, "photo"),
        (0, v) => plural(v, "video"),
        (p, v) => format!("{}, {}", plural(p, "photo"), plural(v, "video")),
    };
    format!("{} {} ({})", format_index(index), name, detail)
}

// ============================================================================
// Albums listing
// ============================================================================

/// Format the album names a user may see. `user` is `None` for the admin view.
pub fn format_albums_output(albums: &[String], user: Option<&str>) -> Vec<String> {
    let mut lines = vec![match user {
        Some(user) => format!("Albums visible to {user}"),
        None => "Albums".to_string(),
    }];
    if albums.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, album) in albums.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), album));
    }
    lines
}

pub fn print_albums_output(albums: &[String], user: Option<&str>) {
    for line in format_albums_output(albums, user) {
        println!("{}", line);
    }
}

// ============================================================================
// Check inventory
// ============================================================================

/// Format the full catalog inventory: every album and its media in list order.
///
/// `video` holds the lowercase video extensions.
pub fn format_check_output(
    root: &Path,
    albums: &[(String, Vec<Photo>)],
    video: &HashSet<String>,
) -> Vec<String> {
    let mut lines = vec![format!("Albums in {}/", root.display())];
    let mut files = 0;

    for (i, (album, photos)) in albums.iter().enumerate() {
        let videos = photos.iter().filter(|p| p.is_video(video)).count();
        lines.push(album_header(i + 1, album, photos.len() - videos, videos));
        for (j, photo) in photos.iter().enumerate() {
            let marker = if photo.is_video(video) { " (video)" } else { "" };
            lines.push(format!(
                "{}{} {}{}",
                indent(1),
                format_index(j + 1),
                photo.name,
                marker
            ));
        }
        files += photos.len();
    }

    lines.push(String::new());
    lines.push(format!(
        "Checked {}, {}",
        plural(albums.len(), "album"),
        plural(files, "file")
    ));
    lines
}

pub fn print_check_output(root: &Path, albums: &[(String, Vec<Photo>)], video: &HashSet<String>) {
    for line in format_check_output(root, albums, video) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::photos;

    fn video_set() -> HashSet<String> {
        ["mp4".to_string()].into_iter().collect()
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn format_index_pads_to_three() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn album_header_breakdown() {
        assert_eq!(album_header(1, "a", 0, 0), "001 a (no media)");
        assert_eq!(album_header(2, "b", 1, 0), "002 b (1 photo)");
        assert_eq!(album_header(3, "c", 0, 2), "003 c (2 videos)");
        assert_eq!(album_header(4, "d", 3, 1), "004 d (3 photos, 1 video)");
    }

    // =========================================================================
    // Listings
    // =========================================================================

    #[test]
    fn albums_output_for_user() {
        let albums = vec!["birthdays".to_string(), "vacation".to_string()];
        assert_eq!(
            format_albums_output(&albums, Some("family")),
            vec!["Albums visible to family", "001 birthdays", "002 vacation"]
        );
    }

    #[test]
    fn albums_output_empty() {
        assert_eq!(format_albums_output(&[], None), vec!["Albums", "    (none)"]);
    }

    #[test]
    fn check_output_lists_media() {
        let albums = vec![
            (
                "birthdays".to_string(),
                photos(&["cake.jpg", "song.MP4"]),
            ),
            ("empty".to_string(), Vec::new()),
        ];
        let lines = format_check_output(Path::new("photos"), &albums, &video_set());
        assert_eq!(
            lines,
            vec![
                "Albums in photos/",
                "001 birthdays (1 photo, 1 video)",
                "    001 cake.jpg",
                "    002 song.MP4 (video)",
                "002 empty (no media)",
                "",
                "Checked 2 albums, 2 files",
            ]
        );
    }
}
