//! Data models for storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Maximum length of an MRU title, in characters
pub const MAX_TITLE_LEN: usize = 40;

/// Maximum length of an MRU external reference, in characters
pub const MAX_ID_REF_LEN: usize = 256;

/// A recently viewed item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MruRecord {
    /// Store-assigned identifier, 0 until inserted
    pub id: i64,

    /// Display label
    pub title: String,

    /// When the item (event, meeting) starts
    pub start_time: DateTime<Utc>,

    /// Last time the item was opened, drives recency ordering
    pub last_looked_at: DateTime<Utc>,

    /// Opaque reference used to resolve the item back to its source
    pub id_ref: String,
}

impl MruRecord {
    /// Create a record that was just looked at
    pub fn new(title: String, id_ref: String, start_time: DateTime<Utc>) -> Self {
        Self {
            id: 0, // Will be set by database
            title,
            start_time,
            last_looked_at: Utc::now(),
            id_ref,
        }
    }

    /// Check the length constraints enforced by the storage boundary
    pub fn validate(&self) -> crate::Result<()> {
        let title_len = self.title.chars().count();
        if title_len > MAX_TITLE_LEN {
            return Err(Error::InvalidRecord(format!(
                "title is {} characters, at most {} allowed",
                title_len, MAX_TITLE_LEN
            )));
        }

        let id_ref_len = self.id_ref.chars().count();
        if id_ref_len > MAX_ID_REF_LEN {
            return Err(Error::InvalidRecord(format!(
                "id_ref is {} characters, at most {} allowed",
                id_ref_len, MAX_ID_REF_LEN
            )));
        }

        Ok(())
    }
}
