//! Application context for the cipherbin CLI.
//!
//! Combines CLI arguments with lazily-resolved deployment settings.

use once_cell::unsync::OnceCell;

use cipherbin_core::{FileStore, SecretStore, Settings};

use crate::cli::Cli;
use crate::ui::UiContext;

use super::resolver::resolve_settings;

/// Application context that bundles CLI args with deployment settings.
///
/// Settings are resolved on first use so that `completions` and the bare
/// quickstart never touch the config file.
pub struct AppContext<'a> {
    cli: &'a Cli,
    settings: OnceCell<Settings>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            settings: OnceCell::new(),
        }
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Get the deployment settings, resolving them lazily if needed.
    pub fn settings(&self) -> anyhow::Result<&Settings> {
        self.settings.get_or_try_init(|| resolve_settings(self.cli))
    }

    pub fn store(&self) -> anyhow::Result<FileStore> {
        Ok(FileStore::new(self.settings()?))
    }

    pub fn secrets(&self) -> anyhow::Result<SecretStore> {
        Ok(SecretStore::new(self.settings()?))
    }

    /// UI context for informational output on stdout.
    pub fn ui(&self) -> UiContext {
        UiContext::from_env(false)
    }

    /// UI context for diagnostics on stderr.
    pub fn ui_stderr(&self) -> UiContext {
        UiContext::from_env(true)
    }
}
