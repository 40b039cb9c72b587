//! Filesystem-backed paste store.
//!
//! Each paste is a single file at its sharded location (see
//! [`crate::storage::path`]). Writes go to a hidden temporary sibling and
//! are renamed into place, so readers and the lifecycle engine never see a
//! half-written paste.

mod format;
mod walk;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CipherbinError, Result};
use crate::fs::{remove_file_if_exists, write_atomic};
use crate::settings::Settings;
use crate::storage::path::{Layout, PasteId};
use crate::storage::traits::PasteStorage;
use crate::storage::types::Paste;

pub use format::FORMAT_VERSION;
pub use walk::PasteIter;

/// Attempts made by `persist` when the shard directory disappears under it.
const PERSIST_ATTEMPTS: usize = 3;

/// Paste store rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    layout: Layout,
}

impl FileStore {
    /// Store rooted at the deployment's paste directory.
    pub fn new(settings: &Settings) -> Self {
        Self::at(settings.pastes_dir())
    }

    /// Store rooted at an explicit directory.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            layout: Layout::new(root),
        }
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Load a paste for display.
    ///
    /// Expired pastes are deleted on the spot and reported as missing. A
    /// burn-after-reading paste is marked consumed on disk before it is
    /// returned, so the next `serve` (and the next sweep) treats it as
    /// expired.
    pub fn serve(&self, id: &str) -> Result<Paste> {
        let mut paste = self.load(id)?;
        if paste.has_expired() {
            self.delete(&paste.id)?;
            return Err(CipherbinError::NotFound(paste.id.to_string()));
        }
        if paste.expiration.is_burn_after_reading() {
            paste.consumed = true;
            self.persist(&paste)?;
            debug!(id = %paste.id, "burn-after-reading paste consumed");
        }
        Ok(paste)
    }

    pub(crate) fn read_paste(&self, id: &PasteId) -> Result<Paste> {
        let path = self.layout.path_for(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(CipherbinError::NotFound(id.to_string()))
            }
            Err(err) => return Err(err.into()),
        };
        format::decode(id.clone(), &bytes)
    }
}

impl PasteStorage for FileStore {
    type Iter = PasteIter;

    fn load(&self, id: &str) -> Result<Paste> {
        let id = PasteId::parse(id).map_err(|err| {
            debug!(error = %err, "rejected malformed paste id");
            CipherbinError::NotFound(id.to_string())
        })?;
        self.read_paste(&id)
    }

    fn persist(&self, paste: &Paste) -> Result<PathBuf> {
        let path = self.layout.path_for(&paste.id);
        let shard_dir = path
            .parent()
            .ok_or_else(|| CipherbinError::InvalidIdentifier(paste.id.to_string()))?;
        let data = format::encode(paste)?;

        let mut attempt = 1;
        loop {
            fs::create_dir_all(shard_dir)?;
            match write_atomic(&path, &data) {
                Ok(()) => {
                    debug!(id = %paste.id, bytes = data.len(), "paste persisted");
                    return Ok(path);
                }
                // A concurrent reaper removed the (then empty) shard directory.
                Err(err) if err.kind() == io::ErrorKind::NotFound && attempt < PERSIST_ATTEMPTS => {
                    debug!(id = %paste.id, attempt, "shard directory vanished, retrying");
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn delete(&self, id: &PasteId) -> Result<bool> {
        let removed = remove_file_if_exists(&self.layout.path_for(id))?;
        if removed {
            debug!(id = %id, "paste deleted");
        } else {
            debug!(id = %id, "paste already absent");
        }
        Ok(removed)
    }

    fn exists(&self, id: &str) -> Result<bool> {
        let Ok(id) = PasteId::parse(id) else {
            return Ok(false);
        };
        match fs::symlink_metadata(self.layout.path_for(&id)) {
            Ok(meta) => Ok(meta.is_file()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn iter_all(&self) -> PasteIter {
        PasteIter::new(self.clone())
    }

    fn location(&self, id: &PasteId) -> PathBuf {
        self.layout.path_for(id)
    }
}
