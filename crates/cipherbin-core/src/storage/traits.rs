//! Storage trait definition.
//!
//! `PasteStorage` is the seam between the lifecycle engine (and the
//! external route layer) and the concrete on-disk store.

use std::path::PathBuf;

use super::path::PasteId;
use super::types::Paste;
use crate::error::Result;

/// Storage interface for pastes.
///
/// All implementations must ensure:
/// - A paste is published atomically (readers never see a partial write)
/// - Deletion is idempotent
/// - Enumeration tolerates entries disappearing concurrently
pub trait PasteStorage {
    /// Iterator returned by [`PasteStorage::iter_all`].
    type Iter: Iterator<Item = Result<Paste>>;

    /// Load a paste by its raw identifier.
    ///
    /// # Errors
    ///
    /// Returns `CipherbinError::NotFound` if the paste does not exist or the
    /// identifier is malformed. The two cases are deliberately
    /// indistinguishable to callers.
    fn load(&self, id: &str) -> Result<Paste>;

    /// Persist a paste, replacing any previous version atomically.
    ///
    /// Returns the location it was written to.
    fn persist(&self, paste: &Paste) -> Result<PathBuf>;

    /// Remove a paste.
    ///
    /// Succeeds silently if the paste is already gone. Returns `true` when
    /// this call removed it.
    fn delete(&self, id: &PasteId) -> Result<bool>;

    /// Check whether a paste is currently stored.
    ///
    /// A malformed identifier is reported as absent.
    ///
    /// # Errors
    ///
    /// Returns `CipherbinError::Io` when the location cannot be inspected
    /// (permissions, I/O errors), so an unreachable paste is never mistaken
    /// for a missing one.
    fn exists(&self, id: &str) -> Result<bool>;

    /// Enumerate every stored paste.
    ///
    /// The sequence is lazy, finite and can be restarted by calling this
    /// again. Order is unspecified.
    fn iter_all(&self) -> Self::Iter;

    /// Location a paste occupies (or would occupy).
    fn location(&self, id: &PasteId) -> PathBuf;
}
