//! Lazy depth-first walk over the paste tree.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use super::FileStore;
use crate::error::{CipherbinError, Result};
use crate::storage::path::PasteId;
use crate::storage::types::Paste;

/// Iterator over every paste under a store root.
///
/// Each paste is loaded independently when reached. Entries removed by
/// another process while the walk is in progress are skipped.
pub struct PasteIter {
    store: FileStore,
    stack: Vec<fs::ReadDir>,
    root_pending: bool,
}

impl PasteIter {
    pub(super) fn new(store: FileStore) -> Self {
        Self {
            store,
            stack: Vec::new(),
            root_pending: true,
        }
    }

    fn open_root(&mut self) -> Option<Result<Paste>> {
        self.root_pending = false;
        let root = self.store.root().to_path_buf();
        match fs::read_dir(&root) {
            Ok(entries) => {
                self.stack.push(entries);
                None
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => Some(Err(io_error_at(err, &root))),
        }
    }
}

impl Iterator for PasteIter {
    type Item = Result<Paste>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.root_pending {
            if let Some(err) = self.open_root() {
                return Some(err);
            }
        }

        loop {
            let entries = self.stack.last_mut()?;
            let entry = match entries.next() {
                None => {
                    self.stack.pop();
                    continue;
                }
                Some(Err(err)) if err.kind() == io::ErrorKind::NotFound => continue,
                Some(Err(err)) => return Some(Err(err.into())),
                Some(Ok(entry)) => entry,
            };

            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => return Some(Err(io_error_at(err, &path))),
            };

            if file_type.is_dir() {
                match fs::read_dir(&path) {
                    Ok(children) => self.stack.push(children),
                    Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                    Err(err) => return Some(Err(io_error_at(err, &path))),
                }
                continue;
            }

            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                debug!(path = %path.display(), "skipping non-utf8 file name");
                continue;
            };
            // In-flight writes from `persist`.
            if name.starts_with('.') {
                continue;
            }
            let Ok(id) = PasteId::parse(name) else {
                debug!(path = %path.display(), "skipping stray file");
                continue;
            };
            if !self.store.layout().is_canonical(&id, &path) {
                debug!(path = %path.display(), "skipping paste outside its shard");
                continue;
            }

            match self.store.read_paste(&id) {
                Ok(paste) => return Some(Ok(paste)),
                Err(err) if err.is_vanished() => {
                    debug!(id = %id, "paste vanished during walk");
                    continue;
                }
                Err(err) => return Some(Err(err.at(&path))),
            }
        }
    }
}

fn io_error_at(err: io::Error, path: &Path) -> CipherbinError {
    CipherbinError::from(err).at(path)
}
