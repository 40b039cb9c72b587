//! Deployment settings shared by every core component.
//!
//! A `Settings` value is resolved once at startup (by the CLI or the
//! serving process) and then passed by reference; nothing in the core reads
//! ambient configuration.

use std::path::{Path, PathBuf};

/// Name of the directory under the data dir that holds the paste tree.
pub const PASTES_DIR_NAME: &str = "pastes";

/// File under the config dir holding the admin password hash.
pub const ADMIN_PASSWORD_FILE_NAME: &str = "admin_password.hashed";

/// File under the config dir holding the deployment secret key.
pub const SECRET_KEY_FILE_NAME: &str = "secret_key";

/// Argon2id cost parameters.
///
/// Defaults: 64 MiB of memory, 3 iterations, single lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 3,
            parallelism: 1,
        }
    }
}

/// Immutable configuration for one deployment.
#[derive(Debug, Clone)]
pub struct Settings {
    data_dir: PathBuf,
    config_dir: PathBuf,
    kdf: KdfParams,
}

impl Settings {
    pub fn new(data_dir: impl Into<PathBuf>, config_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            config_dir: config_dir.into(),
            kdf: KdfParams::default(),
        }
    }

    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn kdf(&self) -> KdfParams {
        self.kdf
    }

    /// Root of the sharded paste tree.
    pub fn pastes_dir(&self) -> PathBuf {
        self.data_dir.join(PASTES_DIR_NAME)
    }

    pub fn admin_password_file(&self) -> PathBuf {
        self.config_dir.join(ADMIN_PASSWORD_FILE_NAME)
    }

    pub fn secret_key_file(&self) -> PathBuf {
        self.config_dir.join(SECRET_KEY_FILE_NAME)
    }
}
