use cipherbin_core::storage::PasteReference;
use cipherbin_core::PasteStorage;

use crate::app::AppContext;
use crate::cli::DeletePasteArgs;
use crate::errors::CliError;

/// Remove each referenced paste, continuing past individual failures.
pub fn handle_delete_paste(ctx: &AppContext, args: &DeletePasteArgs) -> anyhow::Result<()> {
    let store = ctx.store()?;
    let mut failed = 0;

    for reference in args.pastes.iter().map(|p| PasteReference::parse(p)) {
        let Ok(id) = reference.id() else {
            if !ctx.quiet() {
                println!("Paste {} doesn't exist", reference.raw_id());
            }
            continue;
        };

        let outcome = store.exists(id.as_str()).and_then(|present| {
            if present {
                store.delete(&id).map(|_| true)
            } else {
                Ok(false)
            }
        });

        match outcome {
            Ok(true) => {
                if !ctx.quiet() {
                    println!("Paste {} is removed", id);
                }
            }
            Ok(false) => {
                if !ctx.quiet() {
                    println!("Paste {} doesn't exist", id);
                }
            }
            Err(err) => {
                failed += 1;
                eprintln!(
                    "Error while processing \"{}\": {}",
                    store.location(&id).display(),
                    err
                );
            }
        }
    }

    if failed > 0 {
        return Err(CliError::io_failure(failed).into());
    }
    Ok(())
}
