use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use cipherbin_core::VERSION;

/// cipherbin - administration for a self-hosted encrypted pastebin
#[derive(Parser)]
#[command(name = "cipherbin")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding config.toml, the admin password hash and the secret key
    #[arg(long, global = true, env = "CIPHERBIN_CONFIG_DIR", value_name = "DIR")]
    pub config_dir: Option<String>,

    /// Directory holding the paste tree
    #[arg(long, global = true, env = "CIPHERBIN_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Arguments for the `delete-paste` command
#[derive(Args)]
pub struct DeletePasteArgs {
    /// Pastes to remove, given by ID or full URL
    #[arg(value_name = "PASTE", required = true)]
    pub pastes: Vec<String>,
}

/// Arguments for the `set-admin-password` command
#[derive(Args)]
pub struct SetAdminPasswordArgs {
    /// New password (prompted for when omitted)
    #[arg(value_name = "PASSWORD")]
    pub password: Option<String>,
}

/// Arguments for the `clean-expired-pastes` command
#[derive(Args)]
pub struct CleanExpiredArgs {
    /// Only report what would be deleted
    #[arg(long)]
    pub dry_run: bool,

    /// Print every expired paste and empty directory
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Remove pastes, given by ID or URL
    DeletePaste(DeletePasteArgs),

    /// Show the admin route and storage locations
    Infos,

    /// Set the admin password (stored as an Argon2id hash)
    SetAdminPassword(SetAdminPasswordArgs),

    /// Delete expired pastes and empty paste directories
    CleanExpiredPastes(CleanExpiredArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
