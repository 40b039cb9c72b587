use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use cipherbin_core::KdfParams;

/// File name of the optional config file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CipherbinConfig {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub security: SecuritySection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StorageSection {
    pub data_dir: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SecuritySection {
    pub kdf_memory_kib: Option<u32>,
    pub kdf_iterations: Option<u32>,
    pub kdf_parallelism: Option<u32>,
}

impl SecuritySection {
    /// KDF parameters with unset keys falling back to the defaults.
    pub fn kdf_params(&self) -> KdfParams {
        let defaults = KdfParams::default();
        KdfParams {
            memory_kib: self.kdf_memory_kib.unwrap_or(defaults.memory_kib),
            iterations: self.kdf_iterations.unwrap_or(defaults.iterations),
            parallelism: self.kdf_parallelism.unwrap_or(defaults.parallelism),
        }
    }
}

pub fn read_config(path: &Path) -> anyhow::Result<CipherbinConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

/// Read the config file if present; a missing file means all defaults.
pub fn read_config_if_present(path: &Path) -> anyhow::Result<CipherbinConfig> {
    if path.exists() {
        read_config(path)
    } else {
        Ok(CipherbinConfig::default())
    }
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("cipherbin"));
        }
    }
    Ok(home_dir()?.join(".config").join("cipherbin"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("cipherbin"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("cipherbin"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
