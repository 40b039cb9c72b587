//! Path resolution for the config and data directories.
//!
//! Precedence for each directory: command-line flag (or its environment
//! variable), then `config.toml`, then the XDG default.

use std::path::{Path, PathBuf};

use cipherbin_core::Settings;

use crate::cli::Cli;
use crate::config::{read_config_if_present, xdg_config_dir, xdg_data_dir, CONFIG_FILE_NAME};
use crate::errors::CliError;

/// Resolve the config directory from CLI args or the XDG default.
pub fn resolve_config_dir(cli: &Cli) -> anyhow::Result<PathBuf> {
    match non_empty(cli.config_dir.as_deref()) {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => xdg_config_dir().map_err(|e| CliError::config(e.to_string()).into()),
    }
}

/// Resolve the full deployment settings.
pub fn resolve_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let config_dir = resolve_config_dir(cli)?;
    let config = read_config_if_present(&config_dir.join(CONFIG_FILE_NAME))
        .map_err(|e| CliError::config(e.to_string()))?;

    let data_dir = match non_empty(cli.data_dir.as_deref()) {
        Some(dir) => PathBuf::from(dir),
        None => match non_empty(config.storage.data_dir.as_deref()) {
            Some(dir) => relative_to(&config_dir, dir),
            None => xdg_data_dir().map_err(|e| CliError::config(e.to_string()))?,
        },
    };

    tracing::debug!(
        data_dir = %data_dir.display(),
        config_dir = %config_dir.display(),
        "resolved deployment directories"
    );

    Ok(Settings::new(data_dir, config_dir).with_kdf(config.security.kdf_params()))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Relative paths in config.toml are anchored at the config directory.
fn relative_to(base: &Path, value: &str) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["cipherbin"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_flags_win() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("conf");
        let data = dir.path().join("data");
        let cli = parse(&[
            "--config-dir",
            config.to_str().unwrap(),
            "--data-dir",
            data.to_str().unwrap(),
            "infos",
        ]);

        let settings = resolve_settings(&cli).unwrap();
        assert_eq!(settings.config_dir(), config.as_path());
        assert_eq!(settings.data_dir(), data.as_path());
    }

    #[test]
    fn test_config_file_supplies_data_dir_and_kdf() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[storage]\ndata_dir = \"pastedata\"\n\n[security]\nkdf_memory_kib = 1024\nkdf_iterations = 1\n",
        )
        .unwrap();
        let cli = parse(&["--config-dir", dir.path().to_str().unwrap(), "infos"]);

        let settings = resolve_settings(&cli).unwrap();
        assert_eq!(settings.data_dir(), dir.path().join("pastedata").as_path());
        assert_eq!(settings.kdf().memory_kib, 1024);
        assert_eq!(settings.kdf().iterations, 1);
    }

    #[test]
    fn test_malformed_config_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "not = [valid").unwrap();
        let cli = parse(&["--config-dir", dir.path().to_str().unwrap(), "infos"]);

        let err = resolve_settings(&cli).unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
    }

    #[test]
    fn test_relative_to_keeps_absolute() {
        let base = Path::new("/etc/cipherbin");
        assert_eq!(relative_to(base, "/srv/data"), PathBuf::from("/srv/data"));
        assert_eq!(relative_to(base, "data"), PathBuf::from("/etc/cipherbin/data"));
    }
}
