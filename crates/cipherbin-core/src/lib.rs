//! # cipherbin core
//!
//! Storage and lifecycle engine for cipherbin, a self-hosted paste service
//! whose pastes are encrypted in the browser. The server only ever stores
//! opaque ciphertext plus a little metadata.
//!
//! ## Architecture
//!
//! - **settings**: Immutable deployment configuration
//! - **storage**: Identifier/path scheme, paste entity, filesystem store
//! - **lifecycle**: Expiry sweep and empty-directory reaping
//! - **secret**: Admin password hashing and the deployment secret key
//!
//! Nothing here performs network I/O; the route layer and the admin CLI
//! are consumers of this crate.

pub mod error;
pub mod fs;
pub mod lifecycle;
pub mod secret;
pub mod settings;
pub mod storage;

pub use error::{CipherbinError, Result};
pub use lifecycle::{clean_expired, CleanupOptions, CleanupReport};
pub use secret::SecretStore;
pub use settings::{KdfParams, Settings};
pub use storage::{FileStore, PasteStorage};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
