//! DTOs for visit statistics.

use serde::Serialize;

use crate::domain::entities::Entry;

/// All entries, most visited first.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total: usize,
    pub items: Vec<LinkStatsItem>,
}

/// Statistics for a single short code.
#[derive(Debug, Serialize)]
pub struct LinkStatsItem {
    pub code: String,
    pub short_url: String,
    pub long_url: String,
    pub visits: u64,
}

impl LinkStatsItem {
    pub fn from_entry(entry: Entry, short_url: String) -> Self {
        Self {
            code: entry.code,
            short_url,
            long_url: entry.original_url,
            visits: entry.visits,
        }
    }
}
