//! Error types for cipherbin core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages and exit codes.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for cipherbin operations.
pub type Result<T> = std::result::Result<T, CipherbinError>;

/// Core error type for cipherbin operations.
#[derive(Debug, Error)]
pub enum CipherbinError {
    /// Identifier is empty, too long, or unsafe as a path component
    #[error("Invalid paste identifier: {0}")]
    InvalidIdentifier(String),

    /// Paste does not exist (or was already deleted)
    #[error("Paste not found: {0}")]
    NotFound(String),

    /// Filesystem failure
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Admin password verification attempted before one was set
    #[error("No admin password configured")]
    NoSecretConfigured,

    /// A stored paste or password hash could not be decoded
    #[error("Corrupt data: {0}")]
    Corrupt(String),

    /// Password hashing failure
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An entry met during a tree walk could not be read
    #[error("{}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        source: Box<CipherbinError>,
    },
}

impl CipherbinError {
    /// True when the error means the target is simply gone.
    ///
    /// Bulk passes treat this as "already done" rather than a failure.
    pub fn is_vanished(&self) -> bool {
        match self {
            CipherbinError::NotFound(_) => true,
            CipherbinError::Io { source } => source.kind() == std::io::ErrorKind::NotFound,
            CipherbinError::Unreadable { source, .. } => source.is_vanished(),
            _ => false,
        }
    }

    /// Attach the location of the entry that failed.
    pub fn at(self, path: &Path) -> Self {
        CipherbinError::Unreadable {
            path: path.to_path_buf(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for CipherbinError {
    fn from(err: serde_json::Error) -> Self {
        CipherbinError::Corrupt(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for CipherbinError {
    fn from(err: argon2::password_hash::Error) -> Self {
        CipherbinError::Crypto(err.to_string())
    }
}
