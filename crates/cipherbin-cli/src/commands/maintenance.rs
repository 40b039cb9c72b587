use cipherbin_core::lifecycle::Failure;
use cipherbin_core::{clean_expired, CleanupOptions};

use crate::app::AppContext;
use crate::cli::CleanExpiredArgs;
use crate::errors::CliError;

/// Delete expired pastes, then the directories they leave empty.
///
/// The summary lines are stable output for cron logs.
pub fn handle_clean_expired(ctx: &AppContext, args: &CleanExpiredArgs) -> anyhow::Result<()> {
    let store = ctx.store()?;
    let quiet = ctx.quiet();
    let say = |line: String| {
        if !quiet {
            println!("{}", line);
        }
    };

    let report = clean_expired(
        &store,
        CleanupOptions {
            dry_run: args.dry_run,
            now: None,
        },
    );

    say("Deleting expired pastes...".to_string());
    if args.verbose {
        for paste in &report.sweep.expired {
            say(format!("{} has expired", paste.path.display()));
        }
    }
    say(count_line(report.pastes(), "pastes", args.dry_run));

    say("Deleting empty paste directories...".to_string());
    if args.verbose {
        for dir in &report.reap.removed {
            say(format!("{} is empty", dir.display()));
        }
    }
    say(count_line(report.directories(), "directories", args.dry_run));

    for failure in report.failures() {
        eprintln!("{}", failure_line(failure));
    }

    say("Done".to_string());

    let failed = report.failure_count();
    if failed > 0 {
        return Err(CliError::io_failure(failed).into());
    }
    Ok(())
}

fn count_line(count: usize, noun: &str, dry_run: bool) -> String {
    if dry_run {
        format!("{} {} would have been deleted", count, noun)
    } else {
        format!("{} {} deleted", count, noun)
    }
}

fn failure_line(failure: &Failure) -> String {
    match &failure.path {
        Some(path) => format!(
            "Error while processing \"{}\": {}",
            path.display(),
            failure.error
        ),
        None => format!("Error while processing: {}", failure.error),
    }
}
