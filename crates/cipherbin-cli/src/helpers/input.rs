use dialoguer::Password;
use zeroize::Zeroizing;

use crate::constants::ADMIN_PASSWORD_ENV;
use crate::errors::CliError;

/// Obtain the new admin password.
///
/// Order: explicit argument, then `CIPHERBIN_ADMIN_PASSWORD`, then an
/// interactive prompt with confirmation.
pub fn prompt_admin_password(
    argument: Option<&str>,
    interactive: bool,
) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = argument {
        return Ok(Zeroizing::new(value.to_string()));
    }
    if let Ok(value) = std::env::var(ADMIN_PASSWORD_ENV) {
        if !value.is_empty() {
            return Ok(Zeroizing::new(value));
        }
    }
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No password provided and no TTY available. Pass it as an argument or set {}.",
            ADMIN_PASSWORD_ENV
        ))
        .into());
    }
    Password::new()
        .with_prompt("New admin password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_wins() {
        let password = prompt_admin_password(Some("hunter22"), false).unwrap();
        assert_eq!(password.as_str(), "hunter22");
    }
}
