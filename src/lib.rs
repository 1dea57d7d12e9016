//! # Albumview
//!
//! Serves a directory of photo and video albums as browsable HTML. Your
//! filesystem is the data source: every subdirectory of the albums root is an
//! album, every file in it is a photo or video, and nothing is copied,
//! resized, or indexed ahead of time.
//!
//! # Architecture: One Request, Four Steps
//!
//! Each page request walks the same path:
//!
//! ```text
//! 1. Access      identity      →  visible albums     (role filter)
//! 2. Catalog     album name    →  sorted photo list  (cached directory scan)
//! 3. Navigation  current photo →  previous / next    (cyclic, stateless)
//! 4. Render      values        →  HTML               (placeholder templates)
//! ```
//!
//! Only the catalog holds state. The other three steps are pure functions of
//! their inputs, so they are tested without a server or a filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Album listing and the per-album photo-list cache |
//! | [`access`] | Roles, album patterns, and password checks |
//! | [`navigation`] | Cyclic next/previous over a photo list |
//! | [`template`] | `%(name)` scalars, `%(cycle:name)` rows, and comment toggles |
//! | [`render`] | Composes the three pages from templates, catalog, and media metadata |
//! | [`media`] | EXIF orientation and dimensions for the viewer |
//! | [`naming`] | Extension and URL-segment helpers shared by every module |
//! | [`config`] | `albumview.toml` loading, validation, and stock defaults |
//! | [`server`] | axum routes, Basic authentication, and media bytes |
//! | [`output`] | CLI listings for `albums` and `check` |
//!
//! # Design Decisions
//!
//! ## The Filesystem Is the Database
//!
//! Album and photo order is plain ascending name order. Renaming a file is the
//! only way to reorder it, and adding a file is the only way to publish it.
//! The catalog cache is the one concession to speed: a directory is scanned
//! on first use and its listing kept until an admin hits `/reset`.
//!
//! ## Text Templates With Comment Toggles
//!
//! Pages come from plain HTML files with `%(name)` placeholders rather than a
//! template language. Conditionals are faked by substituting comment markers
//! (`<!--`, `-->`, `//`) around the content to hide. Anyone who can edit HTML
//! can restyle the viewer without touching Rust, and the bundled templates
//! are compiled in so the binary runs without them.
//!
//! ## Rotation in the Browser
//!
//! Sideways photos are rotated with a CSS transform built from the EXIF
//! orientation tag. Files are served exactly as stored; only their headers
//! are read.

pub mod access;
pub mod catalog;
pub mod config;
pub mod media;
pub mod naming;
pub mod navigation;
pub mod output;
pub mod render;
pub mod server;
pub mod template;

#[cfg(test)]
pub(crate) mod test_helpers;
