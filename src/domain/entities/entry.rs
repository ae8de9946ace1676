//! Entry entity representing one shortened URL.

use serde::{Deserialize, Serialize};

/// A short code together with its target URL and visit counter.
///
/// `code` and `original_url` never change after creation; `visits` only
/// grows, by one per resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub code: String,
    pub original_url: String,
    pub visits: u64,
}

impl Entry {
    /// Creates a fresh entry with no recorded visits.
    pub fn new(code: impl Into<String>, original_url: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            original_url: original_url.into(),
            visits: 0,
        }
    }

    pub(crate) fn from_record(code: String, record: EntryRecord) -> Self {
        Self {
            code,
            original_url: record.original_url,
            visits: record.visits,
        }
    }

    pub(crate) fn to_record(&self) -> EntryRecord {
        EntryRecord {
            visits: self.visits,
            original_url: self.original_url.clone(),
        }
    }
}

/// On-disk shape of an entry: the value side of the `code -> record` map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub visits: u64,
    pub original_url: String,
}
