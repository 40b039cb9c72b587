//! CLI error types for structured error handling.
//!
//! Typed errors map to specific exit codes; anything else that bubbles up
//! through `anyhow` is classified in `exit_code_for`.

use std::fmt;

use cipherbin_core::CipherbinError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Invalid user input
    InvalidInput(String),

    /// Config file unreadable or malformed
    Config(String),

    /// Some filesystem operations failed; details were already reported
    IoFailure { failed: usize },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidInput(message) => write!(f, "{}", message),
            CliError::Config(message) => write!(f, "{}", message),
            CliError::IoFailure { failed } => {
                write!(f, "{} operation(s) failed", failed)
            }
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        CliError::Config(message.into())
    }

    pub fn io_failure(failed: usize) -> Self {
        CliError::IoFailure { failed }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::Config(_) => exit_codes::CONFIG_ERROR,
            CliError::IoFailure { .. } => exit_codes::IO_FAILURE,
        }
    }
}

/// Pick the process exit code for an error that reached `main`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    match err.downcast_ref::<CipherbinError>() {
        Some(CipherbinError::NotFound(_)) | Some(CipherbinError::NoSecretConfigured) => {
            exit_codes::NOT_FOUND
        }
        Some(CipherbinError::InvalidIdentifier(_)) | Some(CipherbinError::InvalidInput(_)) => {
            exit_codes::INVALID_INPUT
        }
        Some(CipherbinError::Io { .. }) => exit_codes::IO_FAILURE,
        _ => exit_codes::FAILURE,
    }
}
