use cipherbin_core::VERSION;

use crate::app::AppContext;
use crate::cli::SetAdminPasswordArgs;
use crate::helpers::prompt_admin_password;
use crate::ui::{badge, kv, Badge, UiContext};

/// Print the admin route and the deployment locations.
///
/// Creates the secret key on first use, since the admin URL derives from it.
pub fn handle_infos(ctx: &AppContext) -> anyhow::Result<()> {
    let settings = ctx.settings()?;
    let secrets = ctx.secrets()?;
    let admin_url = secrets.admin_url()?;
    let ui = ctx.ui();

    println!("{}", kv(&ui, "Version", VERSION));
    println!("{}", kv(&ui, "Admin URL", &admin_url));
    println!(
        "{}",
        kv(&ui, "Data dir", &settings.data_dir().display().to_string())
    );
    println!(
        "{}",
        kv(&ui, "Config dir", &settings.config_dir().display().to_string())
    );

    if !secrets.is_configured() && !ctx.quiet() {
        println!(
            "{}",
            badge(
                &ui,
                Badge::Warn,
                "No admin password yet. Run `cipherbin set-admin-password`."
            )
        );
    }
    Ok(())
}

pub fn handle_set_admin_password(
    ctx: &AppContext,
    args: &SetAdminPasswordArgs,
) -> anyhow::Result<()> {
    let secrets = ctx.secrets()?;
    let password = prompt_admin_password(args.password.as_deref(), UiContext::is_interactive())?;

    secrets.set_password(&password)?;

    if !ctx.quiet() {
        println!("{}", badge(&ctx.ui(), Badge::Ok, "Admin password updated"));
    }
    Ok(())
}
