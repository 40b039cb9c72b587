//! On-disk encoding of a single paste.
//!
//! Layout: one line of JSON metadata terminated by `\n`, followed by the raw
//! payload bytes. Keeping both in one file means a single rename publishes
//! a paste and a single unlink removes it.

use crate::error::{CipherbinError, Result};
use crate::storage::path::PasteId;
use crate::storage::types::{Paste, PasteHeader};

/// Current header version.
pub const FORMAT_VERSION: u32 = 1;

pub fn encode(paste: &Paste) -> Result<Vec<u8>> {
    let header = PasteHeader {
        version: FORMAT_VERSION,
        expiration: paste.expiration,
        created_at: paste.created_at,
        consumed: paste.consumed,
    };
    let mut out = serde_json::to_vec(&header)?;
    out.push(b'\n');
    out.extend_from_slice(&paste.payload);
    Ok(out)
}

pub fn decode(id: PasteId, bytes: &[u8]) -> Result<Paste> {
    let split = bytes
        .iter()
        .position(|b| *b == b'\n')
        .ok_or_else(|| CipherbinError::Corrupt(format!("paste {} has no metadata header", id)))?;
    let header: PasteHeader = serde_json::from_slice(&bytes[..split])
        .map_err(|e| CipherbinError::Corrupt(format!("paste {}: {}", id, e)))?;
    if header.version != FORMAT_VERSION {
        return Err(CipherbinError::Corrupt(format!(
            "paste {} has unsupported format version {}",
            id, header.version
        )));
    }

    Ok(Paste {
        id,
        expiration: header.expiration,
        created_at: header.created_at,
        consumed: header.consumed,
        payload: bytes[split + 1..].to_vec(),
    })
}
