//! Media metadata: EXIF orientation and pixel dimensions.
//!
//! The photo page rotates sideways-shot photos with a CSS transform instead
//! of re-encoding them. Orientation comes from the EXIF tag as decoded by the
//! `image` crate:
//!
//! | EXIF value | `image` orientation | [`Orientation`] | CSS |
//! |---|---|---|---|
//! | 6 | `Rotate90` | `Rotate90` | `rotate(90deg) scale(.67)` |
//! | 8 | `Rotate270` | `RotateMinus90` | `rotate(-90deg) scale(.67)` |
//! | 3 | `Rotate180` | `Rotate180` | `rotate(180deg)` |
//! | anything else | mirrored or none | `Normal` | none |
//!
//! Quarter turns are scaled down so the rotated image still fits the box the
//! unrotated one was laid out in.
//!
//! Reading metadata never fails from the caller's point of view: any error
//! yields [`MediaInfo::default`] (no rotation, unknown dimensions).

use image::{ImageDecoder, ImageReader};
use std::path::Path;
use tracing::debug;

/// Scale applied to quarter-turn rotations.
const QUARTER_TURN_SCALE: &str = ".67";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Normal,
    Rotate90,
    Rotate180,
    RotateMinus90,
}

impl Orientation {
    /// The `style` attribute for the media element, or an empty string.
    pub fn css_style(self) -> String {
        match self {
            Self::Normal => String::new(),
            Self::Rotate90 => {
                format!("style=\"transform: rotate(90deg) scale({QUARTER_TURN_SCALE});\"")
            }
            Self::RotateMinus90 => {
                format!("style=\"transform: rotate(-90deg) scale({QUARTER_TURN_SCALE});\"")
            }
            Self::Rotate180 => "style=\"transform: rotate(180deg);\"".to_string(),
        }
    }
}

/// Mirrored variants are not rotated.
impl From<image::metadata::Orientation> for Orientation {
    fn from(value: image::metadata::Orientation) -> Self {
        use image::metadata::Orientation as Exif;
        match value {
            Exif::Rotate90 => Self::Rotate90,
            Exif::Rotate180 => Self::Rotate180,
            Exif::Rotate270 => Self::RotateMinus90,
            _ => Self::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaInfo {
    pub orientation: Orientation,
    pub dimensions: Option<Dimensions>,
}

impl MediaInfo {
    /// `WIDTHxHEIGHT`, or empty when unknown.
    pub fn dimensions_label(&self) -> String {
        self.dimensions
            .map(|d| format!("{}x{}", d.width, d.height))
            .unwrap_or_default()
    }
}

/// Source of [`MediaInfo`] for files on disk.
pub trait MediaInspector: Send + Sync {
    /// Metadata for `path`; defaults on any failure.
    fn inspect(&self, path: &Path) -> MediaInfo;
}

/// Reads orientation and dimensions with the `image` crate's decoders.
///
/// Only the header is parsed; no pixels are decoded.
#[derive(Debug, Default)]
pub struct ImageInspector;

impl MediaInspector for ImageInspector {
    fn inspect(&self, path: &Path) -> MediaInfo {
        match read_media_info(path) {
            Ok(info) => info,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no media metadata");
                MediaInfo::default()
            }
        }
    }
}

fn read_media_info(path: &Path) -> image::ImageResult<MediaInfo> {
    let mut decoder = ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()?;
    let (width, height) = decoder.dimensions();
    let orientation = decoder.orientation()?;
    Ok(MediaInfo {
        orientation: orientation.into(),
        dimensions: Some(Dimensions { width, height }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn css_for_each_orientation() {
        assert_eq!(Orientation::Normal.css_style(), "");
        assert_eq!(
            Orientation::Rotate90.css_style(),
            "style=\"transform: rotate(90deg) scale(.67);\""
        );
        assert_eq!(
            Orientation::RotateMinus90.css_style(),
            "style=\"transform: rotate(-90deg) scale(.67);\""
        );
        assert_eq!(
            Orientation::Rotate180.css_style(),
            "style=\"transform: rotate(180deg);\""
        );
    }

    #[test]
    fn image_crate_orientation_converts() {
        use image::metadata::Orientation as Exif;
        assert_eq!(Orientation::from(Exif::Rotate90), Orientation::Rotate90);
        assert_eq!(Orientation::from(Exif::Rotate270), Orientation::RotateMinus90);
        assert_eq!(Orientation::from(Exif::Rotate180), Orientation::Rotate180);
        assert_eq!(Orientation::from(Exif::NoTransforms), Orientation::Normal);
        assert_eq!(Orientation::from(Exif::FlipHorizontal), Orientation::Normal);
        assert_eq!(Orientation::from(Exif::Rotate90FlipH), Orientation::Normal);
    }

    #[test]
    fn exif_tag_values_reach_css() {
        for (exif, css) in [
            (6, "rotate(90deg) scale(.67)"),
            (8, "rotate(-90deg) scale(.67)"),
            (3, "rotate(180deg)"),
        ] {
            let decoded = image::metadata::Orientation::from_exif(exif).unwrap();
            let style = Orientation::from(decoded).css_style();
            assert_eq!(style, format!("style=\"transform: {css};\""));
        }
        let mirrored = image::metadata::Orientation::from_exif(2).unwrap();
        assert_eq!(Orientation::from(mirrored).css_style(), "");
    }

    #[test]
    fn inspect_reads_dimensions_of_real_jpeg() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        image::RgbImage::new(40, 20).save(&path).unwrap();

        let info = ImageInspector.inspect(&path);
        assert_eq!(info.orientation, Orientation::Normal);
        assert_eq!(
            info.dimensions,
            Some(Dimensions {
                width: 40,
                height: 20
            })
        );
        assert_eq!(info.dimensions_label(), "40x20");
    }

    #[test]
    fn inspect_nonexistent_file_is_default() {
        let info = ImageInspector.inspect(Path::new("/nonexistent/image.jpg"));
        assert_eq!(info, MediaInfo::default());
        assert_eq!(info.dimensions_label(), "");
    }

    #[test]
    fn inspect_garbage_is_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.jpg");
        std::fs::write(&path, "not an image").unwrap();

        assert_eq!(ImageInspector.inspect(&path), MediaInfo::default());
    }
}
