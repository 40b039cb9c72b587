//! Administrative secrets.
//!
//! The admin password is stored only as an Argon2id PHC string, which
//! embeds the salt and cost parameters. Argon2id is memory-hard, so a
//! leaked hash file stays expensive to brute-force.
//!
//! The deployment secret key is random and never leaves the config
//! directory; the admin URL is derived from it so the moderation route
//! cannot be guessed.

use std::fs;
use std::io;
use std::path::PathBuf;

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::error::{CipherbinError, Result};
use crate::fs::{temp_path_for, write_atomic_private, write_new_private};
use crate::settings::{KdfParams, Settings};

/// Salt length in bytes.
const SALT_LENGTH: usize = 16;

/// Secret key length in bytes.
const SECRET_KEY_LENGTH: usize = 32;

/// Password hash and secret key storage in the config directory.
#[derive(Debug, Clone)]
pub struct SecretStore {
    config_dir: PathBuf,
    password_file: PathBuf,
    secret_key_file: PathBuf,
    kdf: KdfParams,
}

impl SecretStore {
    pub fn new(settings: &Settings) -> Self {
        Self {
            config_dir: settings.config_dir().to_path_buf(),
            password_file: settings.admin_password_file(),
            secret_key_file: settings.secret_key_file(),
            kdf: settings.kdf(),
        }
    }

    /// Hash `plaintext` and store it, replacing any previous password.
    ///
    /// # Errors
    ///
    /// - `CipherbinError::InvalidInput` for an empty or blank password
    /// - `CipherbinError::Io` if the config directory is not writable
    pub fn set_password(&self, plaintext: &str) -> Result<()> {
        if plaintext.trim().is_empty() {
            return Err(CipherbinError::InvalidInput(
                "Admin password cannot be empty".to_string(),
            ));
        }

        let hash = hash_password(plaintext, self.kdf)?;
        fs::create_dir_all(&self.config_dir)?;
        write_atomic_private(&self.password_file, hash.as_bytes())?;

        info!(path = %self.password_file.display(), "admin password updated");
        Ok(())
    }

    /// Check `plaintext` against the stored hash.
    ///
    /// # Errors
    ///
    /// - `CipherbinError::NoSecretConfigured` if no password was ever set
    /// - `CipherbinError::Corrupt` if the stored hash cannot be parsed
    pub fn verify(&self, plaintext: &str) -> Result<bool> {
        let stored = match fs::read_to_string(&self.password_file) {
            Ok(stored) => stored,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(CipherbinError::NoSecretConfigured)
            }
            Err(err) => return Err(err.into()),
        };
        let parsed = PasswordHash::new(stored.trim())
            .map_err(|e| CipherbinError::Corrupt(format!("admin password hash: {}", e)))?;

        // Cost parameters come from the stored hash, not from settings.
        match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => {
                debug!("admin password mismatch");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.password_file.is_file()
    }

    /// Read the deployment secret key, creating it on first use.
    ///
    /// Creation is atomic: concurrent first calls agree on one key.
    pub fn secret_key(&self) -> Result<Zeroizing<Vec<u8>>> {
        if let Some(key) = self.read_secret_key()? {
            return Ok(key);
        }

        let mut key = Zeroizing::new(vec![0u8; SECRET_KEY_LENGTH]);
        fill_random(&mut key)?;
        let encoded = Zeroizing::new(hex::encode(&*key));

        fs::create_dir_all(&self.config_dir)?;
        let temp = temp_path_for(&self.secret_key_file)?;
        if let Err(err) = write_new_private(&temp, encoded.as_bytes()) {
            let _ = fs::remove_file(&temp);
            return Err(err.into());
        }
        // hard_link refuses to replace an existing file.
        let linked = fs::hard_link(&temp, &self.secret_key_file);
        let _ = fs::remove_file(&temp);
        match linked {
            Ok(()) => {
                info!(path = %self.secret_key_file.display(), "secret key created");
                Ok(key)
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => self
                .read_secret_key()?
                .ok_or_else(|| CipherbinError::Corrupt("secret key disappeared".to_string())),
            Err(err) => Err(err.into()),
        }
    }

    /// Route of the admin page: `/admin/<blake3 of the secret key>`.
    pub fn admin_url(&self) -> Result<String> {
        let key = self.secret_key()?;
        Ok(format!("/admin/{}", blake3::hash(&key).to_hex()))
    }

    fn read_secret_key(&self) -> Result<Option<Zeroizing<Vec<u8>>>> {
        let encoded = match fs::read_to_string(&self.secret_key_file) {
            Ok(encoded) => Zeroizing::new(encoded),
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let key = hex::decode(encoded.trim())
            .map_err(|e| CipherbinError::Corrupt(format!("secret key: {}", e)))?;
        if key.len() != SECRET_KEY_LENGTH {
            return Err(CipherbinError::Corrupt(format!(
                "secret key must be {} bytes (got {})",
                SECRET_KEY_LENGTH,
                key.len()
            )));
        }
        Ok(Some(Zeroizing::new(key)))
    }
}

fn argon2(kdf: KdfParams) -> Result<Argon2<'static>> {
    let params = Params::new(kdf.memory_kib, kdf.iterations, kdf.parallelism, None)
        .map_err(|e| CipherbinError::Crypto(format!("Failed to create Argon2 params: {}", e)))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn hash_password(plaintext: &str, kdf: KdfParams) -> Result<String> {
    let mut salt_bytes = [0u8; SALT_LENGTH];
    fill_random(&mut salt_bytes)?;
    let salt = SaltString::encode_b64(&salt_bytes)?;
    let hash = argon2(kdf)?.hash_password(plaintext.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

fn fill_random(buf: &mut [u8]) -> Result<()> {
    getrandom::getrandom(buf)
        .map_err(|e| CipherbinError::Crypto(format!("Failed to gather randomness: {}", e)))
}
