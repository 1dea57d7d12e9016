//! Shared test utilities for the albumview test suite.
//!
//! Builds throwaway album trees on disk and offers small extractors so
//! assertions compare plain names.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = album_tree(&[("a", &["1.jpg", "2.jpg", ".meta"]), ("b", &[])]);
//! let catalog = catalog_for(&tmp, &["meta"]);
//! assert_eq!(photo_names(&catalog.list_photos("a")), vec!["1.jpg", "2.jpg"]);
//! ```

use std::collections::HashSet;
use tempfile::TempDir;

use crate::catalog::Catalog;
use crate::naming::Photo;

// =========================================================================
// Fixture setup
// =========================================================================

/// Create an albums root with one directory per album and placeholder files.
///
/// File contents are not valid images; tests that need real pixels write
/// their own.
pub fn album_tree(albums: &[(&str, &[&str])]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (album, files) in albums {
        let dir = tmp.path().join(album);
        std::fs::create_dir_all(&dir).unwrap();
        for file in *files {
            std::fs::write(dir.join(file), "fake media").unwrap();
        }
    }
    tmp
}

/// A catalog rooted at `tmp` ignoring the given (lowercase) extensions.
pub fn catalog_for(tmp: &TempDir, ignore: &[&str]) -> Catalog {
    let ignore: HashSet<String> = ignore.iter().map(|e| e.to_string()).collect();
    Catalog::new(tmp.path(), ignore)
}

/// Photo list built from plain names, already sorted by the caller.
pub fn photos(names: &[&str]) -> Vec<Photo> {
    names.iter().copied().map(Photo::new).collect()
}

// =========================================================================
// Extractors
// =========================================================================

/// On-disk names in list order.
pub fn photo_names(photos: &[Photo]) -> Vec<&str> {
    photos.iter().map(|p| p.name.as_str()).collect()
}
