//! Core data types for the storage layer.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::path::PasteId;
use crate::error::{CipherbinError, Result};

/// When a paste stops being served.
///
/// Chosen at creation time and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expiration {
    /// Kept until deleted explicitly
    Never,
    /// Expires at a fixed instant
    At { at: DateTime<Utc> },
    /// Expires after being served once
    BurnAfterReading,
}

impl Expiration {
    /// Build an expiration from a named preset, relative to `now`.
    ///
    /// Accepted names: `burn_after_reading`, `1_day`, `1_week`, `1_month`
    /// (30 days), `never`.
    pub fn from_preset(name: &str, now: DateTime<Utc>) -> Result<Self> {
        let expiration = match name {
            "burn_after_reading" => Expiration::BurnAfterReading,
            "never" => Expiration::Never,
            "1_day" => Expiration::At {
                at: now + Duration::days(1),
            },
            "1_week" => Expiration::At {
                at: now + Duration::weeks(1),
            },
            "1_month" => Expiration::At {
                at: now + Duration::days(30),
            },
            other => {
                return Err(CipherbinError::InvalidInput(format!(
                    "Unknown expiration preset \"{}\"",
                    other
                )))
            }
        };
        Ok(expiration)
    }

    pub fn is_burn_after_reading(&self) -> bool {
        matches!(self, Expiration::BurnAfterReading)
    }
}

/// One stored paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paste {
    /// Storage identifier (also the public reference)
    pub id: PasteId,

    /// Expiration policy
    pub expiration: Expiration,

    /// When this paste was created
    pub created_at: DateTime<Utc>,

    /// Whether a burn-after-reading paste has already been served
    pub consumed: bool,

    /// Opaque ciphertext
    pub payload: Vec<u8>,
}

impl Paste {
    pub fn new(id: PasteId, expiration: Expiration, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            expiration,
            created_at: Utc::now(),
            consumed: false,
            payload: payload.into(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Expiry as of `now`.
    ///
    /// Monotonic: a timestamp in the past stays in the past, and the
    /// consumed flag is never cleared.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiration {
            Expiration::Never => false,
            Expiration::At { at } => at <= now,
            Expiration::BurnAfterReading => self.consumed,
        }
    }

    /// Expiry as of the current wall clock.
    pub fn has_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Metadata header written in front of the payload on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PasteHeader {
    pub version: u32,
    pub expiration: Expiration,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub consumed: bool,
}
