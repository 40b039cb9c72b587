//! UI context for environment detection.

use std::io::IsTerminal;

use super::mode::OutputMode;

/// Terminal and environment context for UI decisions.
#[derive(Debug, Clone)]
pub struct UiContext {
    /// Whether color output is enabled
    pub color: bool,
    /// Whether unicode symbols are enabled
    pub unicode: bool,
    /// Resolved output mode
    pub mode: OutputMode,
}

impl UiContext {
    /// Build a context for the stream the output goes to.
    pub fn from_env(to_stderr: bool) -> Self {
        let is_tty = if to_stderr {
            std::io::stderr().is_terminal()
        } else {
            std::io::stdout().is_terminal()
        };
        let term_is_dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
        let no_color_env = std::env::var_os("NO_COLOR").is_some();

        Self::resolve(is_tty, term_is_dumb, no_color_env)
    }

    fn resolve(is_tty: bool, term_is_dumb: bool, no_color_env: bool) -> Self {
        let mode = OutputMode::resolve(is_tty, term_is_dumb);
        Self {
            color: mode.is_pretty() && !no_color_env,
            unicode: mode.is_pretty(),
            mode,
        }
    }

    /// Check if interactive prompts are allowed.
    pub fn is_interactive() -> bool {
        std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
    }
}
