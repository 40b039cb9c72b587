use std::fs;
use std::path::Path;

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

use cipherbin_core::lifecycle::{clean_expired, sweep_expired, CleanupOptions};
use cipherbin_core::storage::{Expiration, FileStore, Paste, PasteId, PasteStorage};
use cipherbin_core::{CipherbinError, Settings};

struct Deployment {
    _dir: TempDir,
    settings: Settings,
    store: FileStore,
}

impl Deployment {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir should be available");
        let settings = Settings::new(dir.path().join("data"), dir.path().join("config"));
        let store = FileStore::new(&settings);
        Self {
            _dir: dir,
            settings,
            store,
        }
    }

    fn add(&self, id: &str, expiration: Expiration) -> Paste {
        let paste = Paste::new(
            PasteId::parse(id).expect("valid id"),
            expiration,
            format!("ciphertext of {}", id).into_bytes(),
        );
        self.store.persist(&paste).expect("persist should succeed");
        paste
    }
}

fn expired() -> Expiration {
    Expiration::At {
        at: Utc::now() - Duration::minutes(5),
    }
}

fn live() -> Expiration {
    Expiration::At {
        at: Utc::now() + Duration::days(1),
    }
}

fn count_dirs(root: &Path) -> usize {
    let mut count = 0;
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).expect("read_dir") {
            let path = entry.expect("entry").path();
            if path.is_dir() {
                count += 1;
                stack.push(path);
            }
        }
    }
    count
}

#[test]
fn test_store_load_delete_scenario() {
    let deployment = Deployment::new();
    let at = Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap();
    let paste = Paste::new(
        PasteId::parse("abc123").unwrap(),
        Expiration::At { at },
        vec![0xDE, 0xAD],
    );

    deployment.store.persist(&paste).expect("persist should succeed");
    let loaded = deployment.store.load("abc123").expect("load should succeed");
    assert_eq!(loaded.payload, vec![0xDE, 0xAD]);
    assert_eq!(loaded.expiration, Expiration::At { at });
    assert_eq!(loaded.created_at, paste.created_at);

    deployment.store.delete(&paste.id).expect("delete should succeed");
    let err = deployment.store.load("abc123").unwrap_err();
    assert!(matches!(err, CipherbinError::NotFound(_)));
}

#[test]
fn test_paste_lives_under_data_dir() {
    let deployment = Deployment::new();
    deployment.add("abc123", Expiration::Never);

    let expected = deployment
        .settings
        .data_dir()
        .join("pastes")
        .join("ab")
        .join("c1")
        .join("abc123");
    assert!(expected.is_file());
}

#[test]
fn test_persist_replaces_existing_paste() {
    let deployment = Deployment::new();
    let mut paste = deployment.add("replace1", Expiration::Never);
    paste.payload = b"second version".to_vec();

    deployment.store.persist(&paste).expect("persist should succeed");

    let loaded = deployment.store.load("replace1").unwrap();
    assert_eq!(loaded.payload, b"second version");
    assert_eq!(deployment.store.iter_all().count(), 1);
}

#[test]
fn test_dry_run_reports_and_keeps_everything() {
    let deployment = Deployment::new();
    for id in ["exp00001", "exp00002", "exp00003"] {
        deployment.add(id, expired());
    }
    for id in ["live0001", "live0002"] {
        deployment.add(id, live());
    }

    let report = clean_expired(
        &deployment.store,
        CleanupOptions {
            dry_run: true,
            now: None,
        },
    );

    assert_eq!(report.pastes(), 3);
    assert_eq!(report.failure_count(), 0);
    assert_eq!(deployment.store.iter_all().count(), 5);
}

#[test]
fn test_cleanup_removes_only_dead_directories() {
    let deployment = Deployment::new();
    // Shards "ex/p0" and "ex" hold only expired pastes.
    deployment.add("exp00001", expired());
    deployment.add("exp00002", expired());
    // "mi/xd" holds one expired and one live paste.
    deployment.add("mixd0001", expired());
    deployment.add("mixd0002", Expiration::Never);

    let report = clean_expired(&deployment.store, CleanupOptions::default());

    let root = deployment.store.root();
    assert_eq!(report.pastes(), 3);
    assert_eq!(report.directories(), 2);
    assert!(!root.join("ex").exists());
    assert!(root.join("mi").join("xd").is_dir());
    assert!(deployment.store.exists("mixd0002").unwrap());
    assert_eq!(count_dirs(root), 2);
}

#[test]
fn test_second_cleanup_is_a_noop() {
    let deployment = Deployment::new();
    deployment.add("gone0001", expired());
    deployment.add("keep0001", live());

    let first = clean_expired(&deployment.store, CleanupOptions::default());
    let second = clean_expired(&deployment.store, CleanupOptions::default());

    assert_eq!(first.pastes(), 1);
    assert_eq!(second.pastes(), 0);
    assert_eq!(second.directories(), 0);
}

#[test]
fn test_consumed_burn_paste_is_swept() {
    let deployment = Deployment::new();
    deployment.add("burn0001", Expiration::BurnAfterReading);
    deployment.add("burn0002", Expiration::BurnAfterReading);

    deployment.store.serve("burn0001").expect("first read succeeds");

    let report = sweep_expired(&deployment.store, Utc::now(), false);
    assert_eq!(report.count(), 1);
    assert_eq!(report.expired[0].id.as_str(), "burn0001");
    assert!(deployment.store.exists("burn0002").unwrap());
}

#[test]
fn test_sweep_continues_past_corrupt_paste() {
    let deployment = Deployment::new();
    deployment.add("okay0001", expired());
    let corrupt = deployment
        .store
        .location(&PasteId::parse("oops0001").unwrap());
    fs::create_dir_all(corrupt.parent().unwrap()).unwrap();
    fs::write(&corrupt, b"not a paste").unwrap();

    let report = clean_expired(&deployment.store, CleanupOptions::default());

    assert_eq!(report.pastes(), 1);
    assert_eq!(report.failure_count(), 1);
    let failure = report.failures().next().unwrap();
    assert_eq!(failure.path.as_deref(), Some(corrupt.as_path()));
    assert!(matches!(failure.error, CipherbinError::Corrupt(_)));
    assert!(corrupt.exists());
}

#[test]
fn test_expiry_uses_reference_time() {
    let deployment = Deployment::new();
    let at = Utc.with_ymd_and_hms(2040, 6, 1, 0, 0, 0).unwrap();
    deployment.add("future01", Expiration::At { at });

    let before = clean_expired(
        &deployment.store,
        CleanupOptions {
            dry_run: true,
            now: Some(at - Duration::seconds(1)),
        },
    );
    let after = clean_expired(
        &deployment.store,
        CleanupOptions {
            dry_run: true,
            now: Some(at + Duration::seconds(1)),
        },
    );

    assert_eq!(before.pastes(), 0);
    assert_eq!(after.pastes(), 1);
}
