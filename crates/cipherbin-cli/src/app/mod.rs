//! Application-level utilities for the cipherbin CLI.
//!
//! - Resolution of the config and data directories
//! - A lazily-built deployment context shared by command handlers

mod context;
mod resolver;

pub use context::AppContext;
