//! Gallery configuration module.
//!
//! Handles loading, validating, and merging the `albumview.toml` file. The
//! stock defaults are the base layer; the user file only needs the keys it
//! wants to override.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! albums_path = "albums"      # Root directory; each subdirectory is an album
//!
//! [rendering]
//! title = "Albums"
//! bgcolor = "#000000"
//! linkcolor = "#cccccc"
//! vlinkcolor = "#999999"
//!
//! [extensions]
//! ignore = ["db", "ini", "meta", "thm", "txt", "xmp"]
//! video = ["3gp", "avi", "m4v", "mkv", "mov", "mp4", "webm"]
//!
//! [templates]
//! # dir = "templates"        # Omit to use the bundled templates
//!
//! [server]
//! bind = "127.0.0.1:8080"
//!
//! [catalog]
//! preload = false             # Scan every album at startup
//! # max_threads = 4           # Preload workers (omit for auto = CPU cores)
//!
//! [access]
//! # admin_password_sha256 = "<hex digest>"
//!
//! # [[access.guests]]
//! # name = "family"
//! # password_sha256 = "<hex digest>"
//! # albums = ["vacation", "birthdays"]   # or ["*"] for every album
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Name of the admin account. Guests may not reuse it.
pub const ADMIN_USER: &str = "admin";

/// URL prefixes used by pages; the gallery base may not take one of them.
const RESERVED_PREFIXES: &[&str] = &["album", "photo", "reset", "static"];

/// Characters the router reads as parameter or wildcard syntax.
const ROUTE_SYNTAX_CHARS: [char; 4] = ['*', ':', '{', '}'];

/// Gallery configuration loaded from `albumview.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Directory whose immediate subdirectories are the albums.
    pub albums_path: String,
    /// Values substituted into every template header.
    pub rendering: RenderingConfig,
    /// Extension lists driving the ignore filter and video classification.
    pub extensions: ExtensionsConfig,
    pub templates: TemplatesConfig,
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    /// Admin password and guest accounts.
    pub access: AccessConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            albums_path: "albums".to_string(),
            rendering: RenderingConfig::default(),
            extensions: ExtensionsConfig::default(),
            templates: TemplatesConfig::default(),
            server: ServerConfig::default(),
            catalog: CatalogConfig::default(),
            access: AccessConfig::default(),
        }
    }
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.albums_path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "albums_path must not be empty".into(),
            ));
        }
        for ext in self
            .extensions
            .ignore
            .iter()
            .chain(self.extensions.video.iter())
        {
            if ext.is_empty() || ext.contains('.') {
                return Err(ConfigError::Validation(format!(
                    "extension '{ext}' must be non-empty and given without a dot"
                )));
            }
        }
        let base = self.gallery_base();
        if RESERVED_PREFIXES.contains(&base.as_str()) {
            return Err(ConfigError::Validation(format!(
                "albums_path ends in '{base}', which clashes with a page route"
            )));
        }
        if base.contains(ROUTE_SYNTAX_CHARS) {
            return Err(ConfigError::Validation(format!(
                "albums_path ends in '{base}'; the last component may not contain '*', ':', '{{' or '}}'"
            )));
        }
        if self.catalog.max_threads == Some(0) {
            return Err(ConfigError::Validation(
                "catalog.max_threads must be at least 1".into(),
            ));
        }
        if let Some(digest) = &self.access.admin_password_sha256 {
            validate_digest("access.admin_password_sha256", digest)?;
        }
        let mut seen = HashSet::new();
        for guest in &self.access.guests {
            if guest.name.is_empty() || guest.name == ADMIN_USER {
                return Err(ConfigError::Validation(format!(
                    "guest name '{}' is empty or reserved",
                    guest.name
                )));
            }
            if !seen.insert(guest.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "guest '{}' is defined twice",
                    guest.name
                )));
            }
            validate_digest(
                &format!("access.guests.{}.password_sha256", guest.name),
                &guest.password_sha256,
            )?;
        }
        Ok(())
    }

    /// Albums root as a path.
    pub fn albums_root(&self) -> PathBuf {
        PathBuf::from(&self.albums_path)
    }

    /// Last component of the albums root, used as the URL prefix for media bytes.
    ///
    /// `/srv/photos/` → `photos`.
    pub fn gallery_base(&self) -> String {
        let trimmed = self.albums_path.trim_end_matches(['/', '\\']);
        trimmed
            .rsplit(['/', '\\'])
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("albums")
            .to_string()
    }
}

fn validate_digest(key: &str, digest: &str) -> Result<(), ConfigError> {
    if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::Validation(format!(
            "{key} must be a 64-character hex SHA-256 digest"
        )));
    }
    Ok(())
}

/// Header values shared by every page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderingConfig {
    pub title: String,
    pub bgcolor: String,
    pub linkcolor: String,
    pub vlinkcolor: String,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            title: "Albums".to_string(),
            bgcolor: "#000000".to_string(),
            linkcolor: "#cccccc".to_string(),
            vlinkcolor: "#999999".to_string(),
        }
    }
}

/// File extension lists. Matching is case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtensionsConfig {
    /// Files with these extensions never appear in an album.
    pub ignore: Vec<String>,
    /// Files with these extensions render with the video player.
    pub video: Vec<String>,
}

impl Default for ExtensionsConfig {
    fn default() -> Self {
        Self {
            ignore: ["db", "ini", "meta", "thm", "txt", "xmp"]
                .map(String::from)
                .to_vec(),
            video: ["3gp", "avi", "m4v", "mkv", "mov", "mp4", "webm"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl ExtensionsConfig {
    pub fn ignore_set(&self) -> HashSet<String> {
        lowercase_set(&self.ignore)
    }

    pub fn video_set(&self) -> HashSet<String> {
        lowercase_set(&self.video)
    }
}

fn lowercase_set(values: &[String]) -> HashSet<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}

/// Template location. `None` uses the templates compiled into the binary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplatesConfig {
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the HTTP server listens on.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Catalog warm-up settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Scan every album into the cache before serving.
    pub preload: bool,
    /// Maximum number of parallel preload workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective preload thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &CatalogConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_threads.map(|n| n.min(cores)).unwrap_or(cores)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessConfig {
    /// SHA-256 hex digest of the admin password. No admin login without it.
    pub admin_password_sha256: Option<String>,
    pub guests: Vec<GuestUser>,
}

/// A guest account and the album patterns it may see.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuestUser {
    pub name: String,
    pub password_sha256: String,
    /// Exact album names, or `*` for every album.
    #[serde(default)]
    pub albums: Vec<String>,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GalleryConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<GalleryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file.
///
/// A missing file yields the stock defaults. User values are merged on top
/// of the defaults, unknown keys are rejected, and the result is validated.
pub fn load_config(path: &Path) -> Result<GalleryConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `albumview.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# albumview configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Directory whose immediate subdirectories are the albums.
# Its last path component is also the URL prefix media files are served under.
albums_path = "albums"

# ---------------------------------------------------------------------------
# Page header, substituted into %(title), %(bgcolor), %(linkcolor), %(vlinkcolor)
# ---------------------------------------------------------------------------
[rendering]
title = "Albums"
bgcolor = "#000000"
linkcolor = "#cccccc"
vlinkcolor = "#999999"

# ---------------------------------------------------------------------------
# File extensions (case-insensitive, without the dot)
# ---------------------------------------------------------------------------
[extensions]
# Never listed as photos.
ignore = ["db", "ini", "meta", "thm", "txt", "xmp"]
# Shown with the video player instead of <img>.
video = ["3gp", "avi", "m4v", "mkv", "mov", "mp4", "webm"]

# ---------------------------------------------------------------------------
# Templates
# ---------------------------------------------------------------------------
[templates]
# Directory holding albums.html, album_photos.html and photo.html.
# Omit to use the templates bundled with the binary.
# dir = "templates"

# ---------------------------------------------------------------------------
# HTTP server
# ---------------------------------------------------------------------------
[server]
bind = "127.0.0.1:8080"

# ---------------------------------------------------------------------------
# Photo list cache
# ---------------------------------------------------------------------------
[catalog]
# Scan every album before accepting requests.
preload = false
# Parallel preload workers. Omit to auto-detect (= number of CPU cores).
# max_threads = 4

# ---------------------------------------------------------------------------
# Access. Digests come from `albumview hash-password`.
# ---------------------------------------------------------------------------
[access]
# admin_password_sha256 = "..."

# [[access.guests]]
# name = "family"
# password_sha256 = "..."
# albums = ["vacation", "birthdays"]   # or ["*"] for every album
"##
}
