//! Identifier validation and the sharded on-disk layout.
//!
//! A paste with id `3fa85f64...` lives at `<root>/3f/a8/3fa85f64...`. The
//! two shard levels bound the number of entries in any one directory; the
//! leaf keeps the full id so distinct ids can never share a path.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CipherbinError, Result};

/// Number of nested shard directories.
pub const SHARD_DEPTH: usize = 2;

/// Characters of the id consumed by each shard level.
pub const SHARD_WIDTH: usize = 2;

/// Shortest accepted id (must cover every shard level).
pub const MIN_ID_LEN: usize = SHARD_DEPTH * SHARD_WIDTH;

/// Longest accepted id.
pub const MAX_ID_LEN: usize = 128;

/// A validated paste identifier.
///
/// Only ASCII alphanumerics, `-` and `_` are allowed, which rules out
/// separators, dots, and anything a shell or filesystem would interpret.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PasteId(String);

impl PasteId {
    /// Validate an identifier supplied by a client or operator.
    pub fn parse(value: &str) -> Result<Self> {
        if value.is_empty() {
            return Err(CipherbinError::InvalidIdentifier(
                "identifier is empty".to_string(),
            ));
        }
        if value.len() < MIN_ID_LEN {
            return Err(CipherbinError::InvalidIdentifier(format!(
                "identifier must be at least {} characters",
                MIN_ID_LEN
            )));
        }
        if value.len() > MAX_ID_LEN {
            return Err(CipherbinError::InvalidIdentifier(format!(
                "identifier must be at most {} characters",
                MAX_ID_LEN
            )));
        }
        if let Some(bad) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(CipherbinError::InvalidIdentifier(format!(
                "identifier contains unsupported character {:?}",
                bad
            )));
        }
        Ok(Self(value.to_string()))
    }

    /// Generate a fresh, unguessable identifier (UUIDv4, 32 hex chars).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn shards(&self) -> impl Iterator<Item = &str> {
        (0..SHARD_DEPTH).map(move |level| &self.0[level * SHARD_WIDTH..(level + 1) * SHARD_WIDTH])
    }
}

impl fmt::Display for PasteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PasteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PasteId {
    type Error = CipherbinError;

    fn try_from(value: String) -> Result<Self> {
        PasteId::parse(&value)
    }
}

impl From<PasteId> for String {
    fn from(id: PasteId) -> Self {
        id.0
    }
}

/// Maps identifiers to locations under a storage root.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of a paste. Pure: no I/O.
    pub fn path_for(&self, id: &PasteId) -> PathBuf {
        let mut path = self.root.clone();
        for shard in id.shards() {
            path.push(shard);
        }
        path.push(id.as_str());
        path
    }

    /// True if `path` is exactly where `id` would be stored.
    ///
    /// Used by the walker to ignore files that happen to carry a valid id as
    /// their name but sit in the wrong shard.
    pub fn is_canonical(&self, id: &PasteId, path: &Path) -> bool {
        self.path_for(id) == path
    }
}

/// Validate `id` and return its location under `root`.
pub fn path_for(root: &Path, id: &str) -> Result<PathBuf> {
    let id = PasteId::parse(id)?;
    Ok(Layout::new(root).path_for(&id))
}

/// A paste reference given by an operator: a bare id or a share URL.
///
/// Share URLs look like `https://host/paste/<id>#<key>`. The fragment is the
/// client-side decryption key and is dropped here, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteReference {
    raw_id: String,
}

impl PasteReference {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let without_key = match input.find('#') {
            Some(end) => &input[..end],
            None => input,
        };
        let raw_id = match without_key.find("/paste/") {
            Some(start) => &without_key[start + "/paste/".len()..],
            None => without_key,
        };
        Self {
            raw_id: raw_id.to_string(),
        }
    }

    /// The storage identifier as written, before validation.
    pub fn raw_id(&self) -> &str {
        &self.raw_id
    }

    pub fn id(&self) -> Result<PasteId> {
        PasteId::parse(&self.raw_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_path_for_shards_by_prefix() {
        let path = path_for(Path::new("/data/pastes"), "abc123").unwrap();
        assert_eq!(path, PathBuf::from("/data/pastes/ab/c1/abc123"));
    }

    #[test]
    fn test_rejects_unsafe_ids() {
        for bad in ["", "abc", "../../etc/passwd", "ab/cd", "abc.def", "ab cd", "abc\0d", "ééééé"] {
            let err = PasteId::parse(bad).unwrap_err();
            assert!(
                matches!(err, CipherbinError::InvalidIdentifier(_)),
                "{:?} should be rejected",
                bad
            );
        }
        assert!(PasteId::parse(&"a".repeat(MAX_ID_LEN + 1)).is_err());
    }

    #[test]
    fn test_accepts_url_safe_ids() {
        assert!(PasteId::parse("abcd").is_ok());
        assert!(PasteId::parse("A-b_C-d_0123").is_ok());
        assert!(PasteId::parse(&"z".repeat(MAX_ID_LEN)).is_ok());
    }

    #[test]
    fn test_generated_ids_are_valid_and_distinct() {
        let a = PasteId::generate();
        let b = PasteId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
        assert!(PasteId::parse(a.as_str()).is_ok());
    }

    #[test]
    fn test_distinct_ids_never_collide() {
        let layout = Layout::new("/root");
        let ids = ["abcd", "abcde", "abcdf", "abdc", "bacd", "ab_cd", "ab-cd"];
        let paths: HashSet<PathBuf> = ids
            .iter()
            .map(|id| layout.path_for(&PasteId::parse(id).unwrap()))
            .collect();
        assert_eq!(paths.len(), ids.len());
    }

    #[test]
    fn test_canonical_location() {
        let layout = Layout::new("/root");
        let id = PasteId::parse("abcdef").unwrap();
        assert!(layout.is_canonical(&id, Path::new("/root/ab/cd/abcdef")));
        assert!(!layout.is_canonical(&id, Path::new("/root/zz/cd/abcdef")));
    }

    #[test]
    fn test_reference_from_url_drops_key() {
        let reference = PasteReference::parse("https://bin.example.org/paste/abc123#s3cr3tkey");
        assert_eq!(reference.raw_id(), "abc123");
        assert_eq!(reference.id().unwrap().as_str(), "abc123");
    }

    #[test]
    fn test_reference_drops_key_without_paste_segment() {
        let reference = PasteReference::parse("https://bin.example.org/p/abc123#s3cr3tkey");
        assert_eq!(reference.raw_id(), "https://bin.example.org/p/abc123");
        assert!(reference.id().is_err());

        assert_eq!(PasteReference::parse("abc123#s3cr3tkey").raw_id(), "abc123");
    }

    #[test]
    fn test_reference_from_bare_id() {
        let reference = PasteReference::parse("  abc123 ");
        assert_eq!(reference.raw_id(), "abc123");
    }

    #[test]
    fn test_serde_rejects_invalid_id() {
        let ok: PasteId = serde_json::from_str("\"abcd1234\"").unwrap();
        assert_eq!(ok.as_str(), "abcd1234");
        assert!(serde_json::from_str::<PasteId>("\"../x\"").is_err());
    }
}
