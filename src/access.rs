//! Role-based album visibility.
//!
//! Every request carries an [`Identity`]: a user name plus a list of
//! authority strings. Authorities prefixed with `ROLE_` name the role; the
//! first authority without the prefix is a comma-separated list of album
//! patterns.
//!
//! | Identity authorities | Role | Patterns |
//! |---|---|---|
//! | `ROLE_ADMIN` | Admin | (unused) |
//! | `ROLE_GUEST`, `vacation,work` | Guest | `vacation`, `work` |
//! | `vacation` | Guest (default) | `vacation` |
//! | `ROLE_EDITOR` | Other | (unused) |
//!
//! Admins see every album, guests see albums matching at least one pattern,
//! and any other role sees nothing. A pattern is either `*` or an album name;
//! names compare case-insensitively.
//!
//! [`Authenticator`] turns the configured accounts into identities. Passwords
//! are stored as SHA-256 hex digests.

use crate::config::{ADMIN_USER, AccessConfig};
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap};

const ROLE_PREFIX: &str = "ROLE_";
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
pub const ROLE_GUEST: &str = "ROLE_GUEST";

/// Pattern matching every album.
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Admin,
    Guest,
    /// A role this filter does not know; sees no albums.
    Other(String),
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub authorities: Vec<String>,
}

/// Role and album patterns resolved from an [`Identity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccess {
    pub role: Role,
    pub patterns: BTreeSet<String>,
}

impl UserAccess {
    pub fn admin() -> Self {
        Self {
            role: Role::Admin,
            patterns: BTreeSet::new(),
        }
    }

    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            role: resolve_role(identity),
            patterns: resolve_allowed_patterns(identity),
        }
    }

    /// Filter `all_albums` down to what this caller may see.
    pub fn visible_albums(&self, all_albums: &[String]) -> Vec<String> {
        visible_albums(&self.role, &self.patterns, all_albums)
    }

    /// Whether a single album is visible to this caller.
    pub fn can_view(&self, album: &str) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Guest => matches_any(album, &self.patterns),
            Role::Other(_) => false,
        }
    }
}

/// Role from the first `ROLE_` authority; `Guest` when there is none.
pub fn resolve_role(identity: &Identity) -> Role {
    match identity
        .authorities
        .iter()
        .find(|a| a.starts_with(ROLE_PREFIX))
        .map(String::as_str)
    {
        Some(ROLE_ADMIN) => Role::Admin,
        Some(ROLE_GUEST) | None => Role::Guest,
        Some(other) => Role::Other(other.to_string()),
    }
}

/// Album patterns from the first non-role authority, split on commas.
///
/// Blank entries are dropped and surrounding whitespace trimmed.
pub fn resolve_allowed_patterns(identity: &Identity) -> BTreeSet<String> {
    identity
        .authorities
        .iter()
        .find(|a| !a.starts_with(ROLE_PREFIX))
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// The albums a caller with `role` and `patterns` may see, in `all_albums` order.
pub fn visible_albums(
    role: &Role,
    patterns: &BTreeSet<String>,
    all_albums: &[String],
) -> Vec<String> {
    match role {
        Role::Admin => all_albums.to_vec(),
        Role::Guest => all_albums
            .iter()
            .filter(|album| matches_any(album, patterns))
            .cloned()
            .collect(),
        Role::Other(_) => Vec::new(),
    }
}

fn matches_any(album: &str, patterns: &BTreeSet<String>) -> bool {
    patterns
        .iter()
        .any(|p| p == WILDCARD || p.to_lowercase() == album.to_lowercase())
}

/// SHA-256 hex digest of a password, as stored in the config.
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

struct Account {
    password_sha256: String,
    identity: Identity,
}

/// Checks credentials against the configured accounts.
pub struct Authenticator {
    accounts: HashMap<String, Account>,
}

impl Authenticator {
    /// Build from config. The admin account only exists when a digest is set.
    pub fn from_config(access: &AccessConfig) -> Self {
        let mut accounts = HashMap::new();
        if let Some(digest) = &access.admin_password_sha256 {
            accounts.insert(
                ADMIN_USER.to_string(),
                Account {
                    password_sha256: digest.to_lowercase(),
                    identity: Identity {
                        name: ADMIN_USER.to_string(),
                        authorities: vec![ROLE_ADMIN.to_string()],
                    },
                },
            );
        }
        for guest in &access.guests {
            accounts.insert(
                guest.name.clone(),
                Account {
                    password_sha256: guest.password_sha256.to_lowercase(),
                    identity: Identity {
                        name: guest.name.clone(),
                        authorities: vec![ROLE_GUEST.to_string(), guest.albums.join(",")],
                    },
                },
            );
        }
        Self { accounts }
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// The identity for `user` if `password` matches.
    pub fn authenticate(&self, user: &str, password: &str) -> Option<Identity> {
        let account = self.accounts.get(user)?;
        (hash_password(password) == account.password_sha256).then(|| account.identity.clone())
    }

    /// The identity for a known user name, without a password check.
    pub fn identity(&self, user: &str) -> Option<Identity> {
        self.accounts.get(user).map(|a| a.identity.clone())
    }
}
