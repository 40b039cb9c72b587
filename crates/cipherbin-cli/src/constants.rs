//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, also clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Unexpected failure.
    pub const FAILURE: i32 = 1;

    /// Paste or admin password not found.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Unreadable or invalid configuration.
    pub const CONFIG_ERROR: i32 = 5;

    /// Filesystem work failed part-way (cleanup, deletion).
    pub const IO_FAILURE: i32 = 6;
}

/// Environment variable consulted by `set-admin-password`.
pub const ADMIN_PASSWORD_ENV: &str = "CIPHERBIN_ADMIN_PASSWORD";

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "cipherbin=warn,cipherbin_core=warn";
