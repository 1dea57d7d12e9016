//! Page composition.
//!
//! Three pages, each a template from [`crate::template`] filled with values
//! from the catalog:
//!
//! | Page | Template | Cycle | Scalars |
//! |---|---|---|---|
//! | Album index | `albums.html` | `albums` | (header only) |
//! | Photo list | `album_photos.html` | `photos` | `album`, `allAlbumsUrl` |
//! | Photo viewer | `photo.html` | (none) | see [`Renderer::render_photo`] |
//!
//! ## URL layout
//!
//! ```text
//! /                                   album index
//! /album/<album>                      first photo of an album
//! /album/<album>?list=true            photo list
//! /photo/<album>/<photo>              photo viewer
//! /photo/<album>/<photo>?fullScreen=true
//! /<gallery-base>/<album>/<photo>     media bytes
//! ```
//!
//! Every name in a URL is percent-encoded with
//! [`encode_segment`](crate::naming::encode_segment). Display labels are
//! HTML-escaped; URLs are inserted as-is.

use crate::config::GalleryConfig;
use crate::media::{ImageInspector, MediaInfo, MediaInspector};
use crate::naming::{Photo, encode_segment};
use crate::navigation::{self, NavigationError};
use crate::template::{
    Substitutions, Templates, expand_cycle, expand_cycle_in_page, render_conditional_toggle,
};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Media height in viewport percent when the navigation bar is shown.
pub const MEDIA_HEIGHT: u32 = 90;
/// Media height in viewport percent in full-screen mode.
pub const MEDIA_HEIGHT_FULL_SCREEN: u32 = 100;

pub const ALL_ALBUMS_URL: &str = "/";

/// `/album/<album>`
pub fn album_url(album: &str) -> String {
    format!("/album/{}", encode_segment(album))
}

/// `/album/<album>?list=true`
pub fn album_list_url(album: &str) -> String {
    format!("{}?list=true", album_url(album))
}

/// `/photo/<album>/<photo>`, with `?fullScreen=true` when requested.
pub fn photo_url(album: &str, photo: &Photo, full_screen: bool) -> String {
    let base = format!("/photo/{}/{}", encode_segment(album), photo.encoded);
    if full_screen {
        format!("{base}?fullScreen=true")
    } else {
        base
    }
}

/// `/<gallery-base>/<album>/<photo>`
pub fn media_url(gallery_base: &str, album: &str, photo: &Photo) -> String {
    format!(
        "/{}/{}/{}",
        encode_segment(gallery_base),
        encode_segment(album),
        photo.encoded
    )
}

/// HTML-escape a display label.
pub fn escape(text: &str) -> String {
    maud::html! { (text) }.into_string()
}

/// A request for the photo viewer.
#[derive(Debug, Clone, Copy)]
pub struct PhotoPage<'a> {
    pub album: &'a str,
    /// Requested photo; absent or unknown shows the first photo.
    pub photo: Option<&'a str>,
    /// The album's sorted photo list.
    pub photos: &'a [Photo],
    pub full_screen: bool,
}

pub struct Renderer {
    templates: Templates,
    root: PathBuf,
    gallery_base: String,
    video: HashSet<String>,
    inspector: Arc<dyn MediaInspector>,
}

impl Renderer {
    /// `templates` are taken raw; the header from `config.rendering` is
    /// applied here.
    pub fn new(
        templates: Templates,
        config: &GalleryConfig,
        inspector: Arc<dyn MediaInspector>,
    ) -> Self {
        Self {
            templates: templates.with_header(&config.rendering),
            root: config.albums_root(),
            gallery_base: config.gallery_base(),
            video: config.extensions.video_set(),
            inspector,
        }
    }

    /// Templates per `config.templates`, metadata from [`ImageInspector`].
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(
            Templates::from_config(&config.templates),
            config,
            Arc::new(ImageInspector),
        )
    }

    pub fn gallery_base(&self) -> &str {
        &self.gallery_base
    }

    /// The album index: one row per visible album.
    pub fn render_albums(&self, albums: &[String]) -> String {
        let rows: Vec<Substitutions> = albums
            .iter()
            .map(|album| {
                Substitutions::new()
                    .set("album", escape(album))
                    .set("albumUrl", album_url(album))
            })
            .collect();
        expand_cycle(&self.templates.albums, "albums", &rows)
    }

    /// The photo list of one album.
    pub fn render_album_photos(&self, album: &str, photos: &[Photo]) -> String {
        let page = Substitutions::new()
            .set("album", escape(album))
            .set("allAlbumsUrl", ALL_ALBUMS_URL);
        let rows: Vec<Substitutions> = photos
            .iter()
            .map(|photo| {
                page.clone()
                    .set("photo", escape(&photo.name))
                    .set("photoUrl", photo_url(album, photo, false))
                    .set("mediaRealUrl", media_url(&self.gallery_base, album, photo))
            })
            .collect();
        expand_cycle_in_page(&self.templates.album_photos, "photos", &page, &rows)
    }

    /// The viewer page for one photo.
    ///
    /// | Placeholder | Value |
    /// |---|---|
    /// | `mediaRealUrl` | media bytes URL |
    /// | `mediaStyle` | CSS rotation attribute, or empty |
    /// | `mediaHeight` | [`MEDIA_HEIGHT`] or [`MEDIA_HEIGHT_FULL_SCREEN`] |
    /// | `mediaDimensions` | `WIDTHxHEIGHT`, or empty |
    /// | `previousMediaUrl`, `nextMediaUrl` | neighbours, keeping full-screen |
    /// | `mediaUrlFullScreen`, `mediaUrlNoFullScreen` | this photo in each mode |
    /// | `albumPhotos` | the album's photo list |
    /// | `allAlbumsUrl` | the album index |
    /// | `album`, `photo` | escaped labels |
    ///
    /// Toggles: `FullScreen` (hides the navigation bar), `Video` (hides the
    /// image element), `Photo` (hides the video element). Fails only when the
    /// album is empty.
    pub fn render_photo(&self, page: &PhotoPage<'_>) -> Result<String, NavigationError> {
        let current = page
            .photo
            .and_then(|name| page.photos.iter().find(|p| p.name == name))
            .map_or_else(|| navigation::next(page.photos, None), Ok)?;
        let previous = navigation::previous(page.photos, Some(current.name.as_str()))?;
        let next = navigation::next(page.photos, Some(current.name.as_str()))?;

        let is_video = current.is_video(&self.video);
        let media = if is_video {
            MediaInfo::default()
        } else {
            self.inspector
                .inspect(&self.root.join(page.album).join(&current.name))
        };
        debug!(
            album = page.album,
            photo = %current,
            is_video,
            full_screen = page.full_screen,
            "rendering photo"
        );

        let height = if page.full_screen {
            MEDIA_HEIGHT_FULL_SCREEN
        } else {
            MEDIA_HEIGHT
        };

        let mut text = self.templates.photo.clone();
        text = render_conditional_toggle(&text, "FullScreen", page.full_screen);
        text = render_conditional_toggle(&text, "Video", is_video);
        text = render_conditional_toggle(&text, "Photo", !is_video);

        Ok(Substitutions::new()
            .set("mediaRealUrl", media_url(&self.gallery_base, page.album, current))
            .set("mediaStyle", media.orientation.css_style())
            .set("mediaHeight", height.to_string())
            .set("mediaDimensions", media.dimensions_label())
            .set(
                "previousMediaUrl",
                photo_url(page.album, previous, page.full_screen),
            )
            .set("nextMediaUrl", photo_url(page.album, next, page.full_screen))
            .set("mediaUrlFullScreen", photo_url(page.album, current, true))
            .set("mediaUrlNoFullScreen", photo_url(page.album, current, false))
            .set("albumPhotos", album_list_url(page.album))
            .set("allAlbumsUrl", ALL_ALBUMS_URL)
            .set("album", escape(page.album))
            .set("photo", escape(&current.name))
            .apply(&text))
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("root", &self.root)
            .field("gallery_base", &self.gallery_base)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{Dimensions, Orientation};
    use crate::test_helpers::photos;
    use std::path::Path;

    /// Returns a fixed orientation for every path.
    struct FixedInspector(Orientation);

    impl MediaInspector for FixedInspector {
        fn inspect(&self, _path: &Path) -> MediaInfo {
            MediaInfo {
                orientation: self.0,
                dimensions: Some(Dimensions {
                    width: 640,
                    height: 480,
                }),
            }
        }
    }

    const PHOTO_TEMPLATE: &str = "\
%(commentIfFullScreenHtmlStart)nav%(commentIfFullScreenHtmlEnd)
%(commentIfVideoHtmlStart)<img src=\"%(mediaRealUrl)\" %(mediaStyle)>%(commentIfVideoHtmlEnd)
%(commentIfPhotoHtmlStart)<video src=\"%(mediaRealUrl)\">%(commentIfPhotoHtmlEnd)
h=%(mediaHeight) d=%(mediaDimensions)
prev=%(previousMediaUrl) next=%(nextMediaUrl)
fs=%(mediaUrlFullScreen) nofs=%(mediaUrlNoFullScreen)
list=%(albumPhotos) all=%(allAlbumsUrl)
%(commentIfNotFullScreenJavaScript)click();
%(title): %(album) / %(photo)";

    fn templates() -> Templates {
        Templates {
            albums: "<h1>%(title)</h1>\n<a href=\"%(albumUrl)\">%(album)</a>%(cycle:albums)\nend"
                .to_string(),
            album_photos: "%(album) %(allAlbumsUrl)\n%(photo)|%(photoUrl)|%(mediaRealUrl)%(cycle:photos)"
                .to_string(),
            photo: PHOTO_TEMPLATE.to_string(),
        }
    }

    fn renderer(orientation: Orientation) -> Renderer {
        let config = GalleryConfig {
            albums_path: "/srv/pics".to_string(),
            ..GalleryConfig::default()
        };
        Renderer::new(templates(), &config, Arc::new(FixedInspector(orientation)))
    }

    fn page<'a>(photo: Option<&'a str>, list: &'a [Photo], full_screen: bool) -> PhotoPage<'a> {
        PhotoPage {
            album: "My Trip",
            photo,
            photos: list,
            full_screen,
        }
    }

    // =========================================================================
    // URLs
    // =========================================================================

    #[test]
    fn urls_encode_every_segment() {
        let photo = Photo::new("a b.jpg");
        assert_eq!(album_url("My Trip"), "/album/My%20Trip");
        assert_eq!(album_list_url("x"), "/album/x?list=true");
        assert_eq!(photo_url("My Trip", &photo, false), "/photo/My%20Trip/a%20b.jpg");
        assert_eq!(
            photo_url("t", &photo, true),
            "/photo/t/a%20b.jpg?fullScreen=true"
        );
        assert_eq!(media_url("pics", "t", &photo), "/pics/t/a%20b.jpg");
    }

    #[test]
    fn escape_html_labels() {
        assert_eq!(escape("Tom & <Jerry>"), "Tom &amp; &lt;Jerry&gt;");
    }

    // =========================================================================
    // Album and list pages
    // =========================================================================

    #[test]
    fn albums_page_one_row_per_album() {
        let html = renderer(Orientation::Normal)
            .render_albums(&["A&B".to_string(), "My Trip".to_string()]);
        assert_eq!(
            html,
            "<h1>Albums</h1>\n\
             <a href=\"/album/A%26B\">A&amp;B</a>\n\
             <a href=\"/album/My%20Trip\">My Trip</a>\nend"
        );
    }

    #[test]
    fn albums_page_without_albums_keeps_header() {
        let html = renderer(Orientation::Normal).render_albums(&[]);
        assert_eq!(html, "<h1>Albums</h1>\n\nend");
    }

    #[test]
    fn album_photos_page_lists_photos() {
        let list = photos(&["1.jpg", "2 b.mp4"]);
        let html = renderer(Orientation::Normal).render_album_photos("My Trip", &list);
        assert_eq!(
            html,
            "My Trip /\n\
             1.jpg|/photo/My%20Trip/1.jpg|/pics/My%20Trip/1.jpg\n\
             2 b.mp4|/photo/My%20Trip/2%20b.mp4|/pics/My%20Trip/2%20b.mp4"
        );
    }

    #[test]
    fn placeholder_text_in_album_name_stays_literal() {
        let r = renderer(Orientation::Normal);
        assert_eq!(
            r.render_albums(&["%(albumUrl)".to_string()]),
            "<h1>Albums</h1>\n\
             <a href=\"/album/%25%28albumUrl%29\">%(albumUrl)</a>\nend"
        );

        let list = photos(&["1.jpg"]);
        assert_eq!(
            r.render_album_photos("%(cycle:photos)", &list),
            "%(cycle:photos) /\n\
             1.jpg|/photo/%25%28cycle%3Aphotos%29/1.jpg|/pics/%25%28cycle%3Aphotos%29/1.jpg"
        );
    }

    // =========================================================================
    // Photo page
    // =========================================================================

    #[test]
    fn photo_page_fills_every_placeholder() {
        let list = photos(&["1.jpg", "2.jpg", "3.jpg"]);
        let html = renderer(Orientation::Normal)
            .render_photo(&page(Some("2.jpg"), &list, false))
            .unwrap();

        assert!(!html.contains("%("), "unresolved placeholder in:\n{html}");
        assert!(html.starts_with("nav\n<img src=\"/pics/My%20Trip/2.jpg\" >\n"));
        assert!(html.contains("<!--<video"));
        assert!(html.contains("h=90 d=640x480"));
        assert!(html.contains("prev=/photo/My%20Trip/1.jpg next=/photo/My%20Trip/3.jpg"));
        assert!(html.contains(
            "fs=/photo/My%20Trip/2.jpg?fullScreen=true nofs=/photo/My%20Trip/2.jpg"
        ));
        assert!(html.contains("list=/album/My%20Trip?list=true all=/"));
        assert!(html.contains("\n//click();"));
        assert!(html.ends_with("Albums: My Trip / 2.jpg"));
    }

    #[test]
    fn album_named_like_a_placeholder_is_not_expanded() {
        let list = photos(&["1.jpg"]);
        let html = renderer(Orientation::Normal)
            .render_photo(&PhotoPage {
                album: "%(photo)",
                photo: None,
                photos: &list,
                full_screen: false,
            })
            .unwrap();
        assert!(html.contains("src=\"/pics/%25%28photo%29/1.jpg\""));
        assert!(html.ends_with("Albums: %(photo) / 1.jpg"));
    }

    #[test]
    fn full_screen_hides_nav_and_keeps_mode_in_links() {
        let list = photos(&["1.jpg", "2.jpg"]);
        let html = renderer(Orientation::Normal)
            .render_photo(&page(Some("2.jpg"), &list, true))
            .unwrap();

        assert!(html.starts_with("<!--nav-->"));
        assert!(html.contains("h=100"));
        assert!(html.contains(
            "prev=/photo/My%20Trip/1.jpg?fullScreen=true next=/photo/My%20Trip/1.jpg?fullScreen=true"
        ));
        assert!(html.contains("\nclick();"));
    }

    #[test]
    fn video_comments_out_image_and_skips_inspection() {
        let list = photos(&["clip.MP4"]);
        let html = renderer(Orientation::Rotate90)
            .render_photo(&page(Some("clip.MP4"), &list, false))
            .unwrap();

        assert!(html.contains("<!--<img src=\"/pics/My%20Trip/clip.MP4\" >-->"));
        assert!(html.contains("\n<video src=\"/pics/My%20Trip/clip.MP4\">\n"));
        assert!(html.contains("d=\n"));
    }

    #[test]
    fn rotated_photo_gets_css_transform() {
        let list = photos(&["1.jpg"]);
        let html = renderer(Orientation::Rotate90)
            .render_photo(&page(None, &list, false))
            .unwrap();
        assert!(html.contains("style=\"transform: rotate(90deg) scale(.67);\""));
    }

    #[test]
    fn unknown_or_absent_photo_shows_first() {
        let list = photos(&["1.jpg", "2.jpg"]);
        let r = renderer(Orientation::Normal);
        for requested in [None, Some("missing.jpg")] {
            let html = r.render_photo(&page(requested, &list, false)).unwrap();
            assert!(html.ends_with("/ 1.jpg"));
            assert!(html.contains("prev=/photo/My%20Trip/2.jpg next=/photo/My%20Trip/2.jpg"));
        }
    }

    #[test]
    fn empty_album_is_not_found() {
        let result = renderer(Orientation::Normal).render_photo(&page(None, &[], false));
        assert_eq!(result, Err(NavigationError::NotFound));
    }

    #[test]
    fn bundled_photo_template_renders_clean() {
        let config = GalleryConfig::default();
        let r = Renderer::new(
            Templates::bundled(),
            &config,
            Arc::new(FixedInspector(Orientation::Normal)),
        );
        let list = photos(&["a.jpg", "b.jpg"]);
        let html = r
            .render_photo(&PhotoPage {
                album: "x",
                photo: Some("a.jpg"),
                photos: &list,
                full_screen: false,
            })
            .unwrap();
        assert!(!html.contains("%("));
        assert!(html.contains("/albums/x/a.jpg"));
    }
}
