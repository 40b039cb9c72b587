//! cipherbin - administration CLI for a self-hosted encrypted pastebin
//!
//! Drives the core library: paste deletion, expiry cleanup, and the admin
//! password / secret key. Meant for operators and cron jobs.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod ui;

use cipherbin_core::VERSION;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{admin, maintenance, misc, pastes};
use crate::constants::DEFAULT_LOG_FILTER;
use crate::errors::{exit_code_for, CliError};
use crate::ui::print_error;

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        // Failure details were already printed line by line.
        let already_reported = matches!(
            e.downcast_ref::<CliError>(),
            Some(CliError::IoFailure { .. })
        );
        if !already_reported {
            let error_msg = format!("{:#}", e);
            let (message, hint) = split_hint(&error_msg);
            let hint = hint.or_else(|| contextual_hint(message));
            print_error(&ctx.ui_stderr(), message, hint.as_deref());
        }
        std::process::exit(exit_code_for(&e));
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Separate an explicit "Hint:" line from the error message.
fn split_hint(error: &str) -> (&str, Option<String>) {
    match error.find("\nHint:") {
        Some(idx) => (&error[..idx], Some(error[idx + 1..].to_string())),
        None => (error, None),
    }
}

/// Provide hints for common error patterns.
fn contextual_hint(error: &str) -> Option<String> {
    let error_lower = error.to_lowercase();

    if error_lower.contains("no admin password") {
        return Some("Hint: Run `cipherbin set-admin-password`.".to_string());
    }
    if error_lower.contains("config") && error_lower.contains("parse") {
        return Some(
            "Hint: config.toml accepts [storage] data_dir and [security] kdf_* keys.".to_string(),
        );
    }
    if error_lower.contains("permission denied") {
        return Some(
            "Hint: Run as the user that owns the data and config directories.".to_string(),
        );
    }

    None
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::DeletePaste(args)) => {
            pastes::handle_delete_paste(ctx, args)?;
        }
        Some(Commands::Infos) => {
            admin::handle_infos(ctx)?;
        }
        Some(Commands::SetAdminPassword(args)) => {
            admin::handle_set_admin_password(ctx, args)?;
        }
        Some(Commands::CleanExpiredPastes(args)) => {
            maintenance::handle_clean_expired(ctx, args)?;
        }
        Some(Commands::Completions(args)) => {
            misc::handle_completions(args)?;
        }
        None => {
            println!("cipherbin v{}", VERSION);
            println!("\nQuickstart:");
            println!("  cipherbin set-admin-password");
            println!("  cipherbin infos");
            println!("  cipherbin clean-expired-pastes --dry-run");
            println!("  cipherbin delete-paste <id-or-url>");
            println!("\nRun `cipherbin --help` for full usage.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_hint() {
        let (message, hint) = split_hint("Not found\nHint: try again");
        assert_eq!(message, "Not found");
        assert_eq!(hint.as_deref(), Some("Hint: try again"));
    }

    #[test]
    fn test_split_hint_without_hint() {
        let (message, hint) = split_hint("plain failure");
        assert_eq!(message, "plain failure");
        assert!(hint.is_none());
    }

    #[test]
    fn test_contextual_hint_for_missing_password() {
        let hint = contextual_hint("no admin password has been configured");
        assert!(hint.unwrap().contains("set-admin-password"));
    }
}
