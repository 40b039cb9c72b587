//! Input helper functions for the CLI.

mod input;

pub use input::prompt_admin_password;
