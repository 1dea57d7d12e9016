//! Album discovery and the per-album photo list cache.
//!
//! The albums root is a flat directory: every immediate subdirectory is an
//! album, and every regular file inside an album is a photo (or video) unless
//! its extension is on the ignore list.
//!
//! ```text
//! albums/                 # albums_path
//! ├── 2019 Vacation/
//! │   ├── IMG_0001.jpg
//! │   ├── IMG_0002.JPG
//! │   ├── clip.mp4
//! │   └── .meta           # ignored when "meta" is on the ignore list
//! └── work/
//!     └── whiteboard.png
//! ```
//!
//! ## Ordering
//!
//! Albums and photos are both sorted ascending by name (byte order). The
//! order is fixed: navigation wraps around it, so changing it changes which
//! photo follows which.
//!
//! ## Cache
//!
//! Photo lists are scanned lazily, once per album, and kept until
//! [`Catalog::reset`]. The cache is a concurrent map shared by all requests.
//! Two requests racing to fill the same album both scan and the second write
//! wins; both computed the same list, so either result is correct.
//!
//! ## Failure handling
//!
//! Nothing here returns an error. An unreadable root means no albums, and a
//! missing or unreadable album means no photos.

use crate::config::{self, GalleryConfig};
use crate::naming::{self, Photo};
use dashmap::DashMap;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Sorted, immutable photo list for one album.
pub type PhotoList = Arc<[Photo]>;

pub struct Catalog {
    root: PathBuf,
    ignore: HashSet<String>,
    photos: DashMap<String, PhotoList>,
}

impl Catalog {
    /// `ignore` holds lowercase extensions without the dot.
    pub fn new(root: impl Into<PathBuf>, ignore: HashSet<String>) -> Self {
        Self {
            root: root.into(),
            ignore,
            photos: DashMap::new(),
        }
    }

    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(config.albums_root(), config.extensions.ignore_set())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of the immediate subdirectories of the root, sorted ascending.
    pub fn list_all_albums(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(root = %self.root.display(), error = %e, "cannot read albums root");
                return Vec::new();
            }
        };

        let mut albums: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        albums.sort();
        albums
    }

    /// Sorted photo list for `album`, scanning the directory on first use.
    ///
    /// Missing or empty albums are cached as empty lists. Names that would
    /// escape the root (`..`, separators) get an empty list and are never
    /// cached.
    pub fn list_photos(&self, album: &str) -> PhotoList {
        if !naming::is_safe_segment(album) {
            debug!(album, "rejected unsafe album name");
            return PhotoList::from(Vec::new());
        }

        if let Some(cached) = self.photos.get(album) {
            return Arc::clone(cached.value());
        }

        let photos: PhotoList = self.scan_album(album).into();
        self.photos.insert(album.to_string(), Arc::clone(&photos));
        photos
    }

    /// Drop every cached photo list. The next lookup of any album re-scans.
    pub fn reset(&self) {
        let dropped = self.photos.len();
        self.photos.clear();
        info!(dropped, "catalog cache reset");
    }

    /// Number of albums currently cached.
    pub fn cached_albums(&self) -> usize {
        self.photos.len()
    }

    /// Filesystem path of a photo, or `None` if either name is unsafe.
    pub fn photo_path(&self, album: &str, photo: &str) -> Option<PathBuf> {
        (naming::is_safe_segment(album) && naming::is_safe_segment(photo))
            .then(|| self.root.join(album).join(photo))
    }

    /// Fill the cache for `albums` in parallel.
    ///
    /// Worker count follows `catalog.max_threads` (see
    /// [`config::effective_threads`]).
    pub fn preload(&self, albums: &[String], settings: &config::CatalogConfig) {
        let threads = config::effective_threads(settings);
        let fill = || {
            albums.par_iter().for_each(|album| {
                self.list_photos(album);
            })
        };
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(fill),
            Err(e) => {
                warn!(error = %e, "preload pool unavailable, using global pool");
                fill();
            }
        }
        info!(albums = albums.len(), threads, "catalog preloaded");
    }

    fn scan_album(&self, album: &str) -> Vec<Photo> {
        let dir = self.root.join(album);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(album, error = %e, "album not readable");
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| !self.ignore.contains(&naming::extension_lowercase(name)))
            .collect();
        names.sort();

        debug!(album, photos = names.len(), "scanned album");
        names.into_iter().map(Photo::new).collect()
    }
}
