//! Paste storage for cipherbin.
//!
//! This module defines the `PasteStorage` trait, the identifier/path scheme
//! and the filesystem-backed store.
//!
//! ## Layout
//!
//! ```text
//! <data_dir>/pastes/<id[0..2]>/<id[2..4]>/<id>
//! ```
//!
//! The fan-out is fixed for the lifetime of a deployment; ids are never
//! re-indexed.
//!
//! ## Security
//!
//! Payloads are ciphertext produced by the client. The store never
//! inspects them and never sees decryption keys.

pub mod file_store;
pub mod path;
pub mod traits;
pub mod types;

// Re-export public types
pub use file_store::{FileStore, PasteIter};
pub use path::{path_for, Layout, PasteId, PasteReference};
pub use traits::PasteStorage;
pub use types::{Expiration, Paste};
