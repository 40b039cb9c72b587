//! Expiry sweep and empty-directory reaping.
//!
//! A cleanup pass runs two strictly sequential steps:
//!
//! 1. **Sweep**: walk every stored paste and delete the expired ones.
//! 2. **Reap**: walk the paste tree bottom-up and remove directories that
//!    have no entries left.
//!
//! Both steps accumulate per-item failures instead of aborting, and both
//! treat a target that vanished between check and act as already handled,
//! so a pass can be interrupted and re-run at any point.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::CipherbinError;
use crate::storage::{FileStore, PasteId, PasteStorage};

/// A single item that could not be processed during a bulk pass.
#[derive(Debug)]
pub struct Failure {
    /// Location involved, when known
    pub path: Option<PathBuf>,
    pub error: CipherbinError,
}

impl Failure {
    fn at(path: &Path, error: impl Into<CipherbinError>) -> Self {
        Self {
            path: Some(path.to_path_buf()),
            error: error.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "\"{}\": {}", path.display(), self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

/// A paste found expired by the sweep.
#[derive(Debug, Clone)]
pub struct ExpiredPaste {
    pub id: PasteId,
    pub path: PathBuf,
}

/// Outcome of the expiry sweep.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Pastes deleted (or that would be deleted in dry-run mode)
    pub expired: Vec<ExpiredPaste>,
    pub failures: Vec<Failure>,
}

impl SweepReport {
    pub fn count(&self) -> usize {
        self.expired.len()
    }
}

/// Outcome of empty-directory reaping.
#[derive(Debug, Default)]
pub struct ReapReport {
    /// Directories removed (or that would be removed in dry-run mode)
    pub removed: Vec<PathBuf>,
    pub failures: Vec<Failure>,
}

impl ReapReport {
    pub fn count(&self) -> usize {
        self.removed.len()
    }
}

/// Options for a full cleanup pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanupOptions {
    /// Only count; never mutate the tree
    pub dry_run: bool,
    /// Reference time for expiry (defaults to the current time)
    pub now: Option<DateTime<Utc>>,
}

/// Outcome of a full cleanup pass.
#[derive(Debug)]
pub struct CleanupReport {
    pub dry_run: bool,
    pub sweep: SweepReport,
    pub reap: ReapReport,
}

impl CleanupReport {
    pub fn pastes(&self) -> usize {
        self.sweep.count()
    }

    pub fn directories(&self) -> usize {
        self.reap.count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &Failure> {
        self.sweep.failures.iter().chain(self.reap.failures.iter())
    }

    pub fn failure_count(&self) -> usize {
        self.sweep.failures.len() + self.reap.failures.len()
    }
}

/// Delete every paste that has expired as of `now`.
///
/// Expiry is evaluated on data read during this walk, never on cached
/// state. In dry-run mode the expired pastes are only recorded.
pub fn sweep_expired<S: PasteStorage>(store: &S, now: DateTime<Utc>, dry_run: bool) -> SweepReport {
    let mut report = SweepReport::default();

    for item in store.iter_all() {
        let paste = match item {
            Ok(paste) => paste,
            Err(err) => {
                warn!(error = %err, "failed to read paste during sweep");
                report.failures.push(match err {
                    CipherbinError::Unreadable { path, source } => Failure {
                        path: Some(path),
                        error: *source,
                    },
                    error => Failure { path: None, error },
                });
                continue;
            }
        };
        if !paste.is_expired_at(now) {
            continue;
        }

        let path = store.location(&paste.id);
        if !dry_run {
            match store.delete(&paste.id) {
                Ok(true) => {}
                Ok(false) => {
                    debug!(id = %paste.id, "expired paste already removed elsewhere");
                    continue;
                }
                Err(err) => {
                    warn!(id = %paste.id, error = %err, "failed to delete expired paste");
                    report.failures.push(Failure::at(&path, err));
                    continue;
                }
            }
        }
        debug!(id = %paste.id, dry_run, "paste expired");
        report.expired.push(ExpiredPaste { id: paste.id, path });
    }

    info!(
        pastes = report.count(),
        failures = report.failures.len(),
        dry_run,
        "expiry sweep finished"
    );
    report
}

/// Remove every empty directory below `root` (the root itself is kept).
///
/// The walk is post-order so a shard directory emptied by removing its last
/// child directory is itself removed in the same pass. In dry-run mode,
/// files listed in `pending` are counted as already deleted and directories
/// that would be removed count as gone, which makes the dry-run figure match
/// a real run.
pub fn reap_empty_dirs(root: &Path, dry_run: bool, pending: &HashSet<PathBuf>) -> ReapReport {
    let mut reaper = Reaper {
        dry_run,
        pending,
        report: ReapReport::default(),
    };
    reaper.visit(root, true);

    info!(
        directories = reaper.report.count(),
        failures = reaper.report.failures.len(),
        dry_run,
        "empty directory reaping finished"
    );
    reaper.report
}

/// Sweep expired pastes, then reap empty directories.
pub fn clean_expired(store: &FileStore, options: CleanupOptions) -> CleanupReport {
    let now = options.now.unwrap_or_else(Utc::now);
    let sweep = sweep_expired(store, now, options.dry_run);

    let pending: HashSet<PathBuf> = if options.dry_run {
        sweep.expired.iter().map(|p| p.path.clone()).collect()
    } else {
        HashSet::new()
    };
    let reap = reap_empty_dirs(store.root(), options.dry_run, &pending);

    CleanupReport {
        dry_run: options.dry_run,
        sweep,
        reap,
    }
}

struct Reaper<'a> {
    dry_run: bool,
    pending: &'a HashSet<PathBuf>,
    report: ReapReport,
}

impl Reaper<'_> {
    /// Returns `true` when `dir` is gone after the visit (removed, vanished,
    /// or would be removed in dry-run mode).
    fn visit(&mut self, dir: &Path, is_root: bool) -> bool {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return true,
            Err(err) => {
                self.fail(dir, err);
                return false;
            }
        };

        let mut remaining = 0usize;
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => {
                    self.fail(dir, err);
                    remaining += 1;
                    continue;
                }
            };
            let path = entry.path();
            let is_dir = match entry.file_type() {
                Ok(file_type) => file_type.is_dir(),
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => {
                    self.fail(&path, err);
                    remaining += 1;
                    continue;
                }
            };

            if is_dir {
                if !self.visit(&path, false) {
                    remaining += 1;
                }
            } else if !(self.dry_run && self.pending.contains(&path)) {
                remaining += 1;
            }
        }

        if remaining > 0 || is_root {
            return false;
        }

        if self.dry_run {
            debug!(path = %dir.display(), "directory would be removed");
            self.report.removed.push(dir.to_path_buf());
            return true;
        }

        match fs::remove_dir(dir) {
            Ok(()) => {
                debug!(path = %dir.display(), "empty directory removed");
                self.report.removed.push(dir.to_path_buf());
                true
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => true,
            Err(err) => {
                if has_entries(dir) {
                    // A paste was written here after the emptiness check.
                    debug!(path = %dir.display(), "directory repopulated, keeping it");
                } else {
                    self.fail(dir, err);
                }
                false
            }
        }
    }

    fn fail(&mut self, path: &Path, err: io::Error) {
        warn!(path = %path.display(), error = %err, "failed to process directory");
        self.report.failures.push(Failure::at(path, err));
    }
}

fn has_entries(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Expiration, Paste};
    use chrono::Duration;
    use tempfile::tempdir;

    fn store_with(dir: &Path, pastes: &[(&str, Expiration)]) -> FileStore {
        let store = FileStore::at(dir);
        for (id, expiration) in pastes {
            let paste = Paste::new(PasteId::parse(id).unwrap(), *expiration, b"\xDE\xAD".to_vec());
            store.persist(&paste).unwrap();
        }
        store
    }

    fn past() -> Expiration {
        Expiration::At {
            at: Utc::now() - Duration::days(1),
        }
    }

    #[test]
    fn test_sweep_twice_deletes_nothing_the_second_time() {
        let dir = tempdir().unwrap();
        let store = store_with(
            dir.path(),
            &[("aaaa0001", past()), ("bbbb0001", Expiration::Never)],
        );

        let first = sweep_expired(&store, Utc::now(), false);
        assert_eq!(first.count(), 1);
        let second = sweep_expired(&store, Utc::now(), false);
        assert_eq!(second.count(), 0);
        assert!(second.failures.is_empty());
    }

    /// Store whose deletes always lose the race to another cleanup job.
    struct OvertakenStore(FileStore);

    impl PasteStorage for OvertakenStore {
        type Iter = crate::storage::PasteIter;

        fn load(&self, id: &str) -> crate::error::Result<Paste> {
            self.0.load(id)
        }

        fn persist(&self, paste: &Paste) -> crate::error::Result<PathBuf> {
            self.0.persist(paste)
        }

        fn delete(&self, id: &PasteId) -> crate::error::Result<bool> {
            self.0.delete(id)?;
            self.0.delete(id)
        }

        fn exists(&self, id: &str) -> crate::error::Result<bool> {
            self.0.exists(id)
        }

        fn iter_all(&self) -> Self::Iter {
            self.0.iter_all()
        }

        fn location(&self, id: &PasteId) -> PathBuf {
            self.0.location(id)
        }
    }

    #[test]
    fn test_sweep_counts_only_its_own_deletions() {
        let dir = tempdir().unwrap();
        let store = OvertakenStore(store_with(dir.path(), &[("dddd0001", past())]));

        let report = sweep_expired(&store, Utc::now(), false);

        assert_eq!(report.count(), 0);
        assert!(report.failures.is_empty());
        assert!(!store.exists("dddd0001").unwrap());
    }

    #[test]
    fn test_reap_keeps_root_and_occupied_dirs() {
        let dir = tempdir().unwrap();
        let store = store_with(dir.path(), &[("cccc0001", Expiration::Never)]);
        fs::create_dir_all(dir.path().join("zz").join("yy")).unwrap();

        let report = reap_empty_dirs(store.root(), false, &HashSet::new());

        assert_eq!(report.count(), 2);
        assert!(dir.path().exists());
        assert!(dir.path().join("cc").join("cc").is_dir());
        assert!(!dir.path().join("zz").exists());
    }

    #[test]
    fn test_dry_run_counts_match_real_run() {
        let dir = tempdir().unwrap();
        let store = store_with(
            dir.path(),
            &[
                ("dddd0001", past()),
                ("dddd0002", past()),
                ("eeee0001", past()),
                ("ffff0001", Expiration::Never),
            ],
        );
        let options = CleanupOptions {
            dry_run: true,
            now: None,
        };

        let dry = clean_expired(&store, options);
        assert_eq!(dry.pastes(), 3);
        // dd/dd, dd, ee/ee, ee
        assert_eq!(dry.directories(), 4);
        assert_eq!(store.iter_all().count(), 4);

        let real = clean_expired(&store, CleanupOptions::default());
        assert_eq!(real.pastes(), dry.pastes());
        assert_eq!(real.directories(), dry.directories());
        assert_eq!(real.failure_count(), 0);
    }

    #[test]
    fn test_reap_missing_root_is_noop() {
        let dir = tempdir().unwrap();
        let report = reap_empty_dirs(&dir.path().join("absent"), false, &HashSet::new());
        assert_eq!(report.count(), 0);
        assert!(report.failures.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_does_not_block_others() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked = dir.path().join("lo");
        fs::create_dir_all(locked.join("ck")).unwrap();
        fs::create_dir_all(dir.path().join("em").join("pt")).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits are not enforced for root.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }
        let report = reap_empty_dirs(dir.path(), false, &HashSet::new());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(!dir.path().join("em").exists());
        assert_eq!(report.failures.len(), 1);
        assert!(locked.join("ck").exists());
    }
}
