//! Link shortening, resolution, and statistics service.

use std::sync::Arc;

use crate::domain::entities::Entry;
use crate::domain::repositories::EntryRepository;
use crate::error::AppError;
use crate::utils::url_validator::validate_url;
use serde_json::json;
use tracing::{debug, info};

/// Result of a shorten request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenOutcome {
    pub code: String,
    /// True when an existing entry for the same URL was returned.
    pub reused: bool,
}

/// Service API over the entry store.
///
/// The only component that talks to the repository. HTTP handlers and the
/// admin CLI go through it.
pub struct LinkService<R: EntryRepository> {
    repository: Arc<R>,
}

impl<R: EntryRepository> LinkService<R> {
    /// Creates a new link service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns the code for `url`, creating an entry if none exists.
    ///
    /// Deduplication compares the submitted string exactly; no normalization
    /// is applied, so `https://example.com` and `https://example.com/` get
    /// separate codes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] if `url` lacks a scheme or host.
    /// Returns [`AppError::StorageIo`] if the new entry could not be persisted.
    pub async fn shorten_or_reuse(&self, url: &str) -> Result<ShortenOutcome, AppError> {
        validate_url(url).map_err(|e| {
            debug!("Rejected URL {:?}: {}", url, e);
            AppError::invalid_url(
                "Please enter a valid URL (e.g., https://example.com)",
                json!({ "reason": e.to_string() }),
            )
        })?;

        if let Some(existing) = self.repository.find_by_url(url).await? {
            metrics::counter!("shortstat_links_reused_total").increment(1);
            return Ok(ShortenOutcome {
                code: existing.code,
                reused: true,
            });
        }

        let entry = self.repository.create(url).await?;
        info!(code = %entry.code, "Created short link");
        metrics::counter!("shortstat_links_created_total").increment(1);

        Ok(ShortenOutcome {
            code: entry.code,
            reused: false,
        })
    }

    /// Records a visit for `code` and returns its target URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code does not exist.
    /// Returns [`AppError::StorageIo`] if the visit could not be persisted.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        let entry = self.repository.increment_visits(code).await?;
        metrics::counter!("shortstat_redirects_total").increment(1);
        Ok(entry.original_url)
    }

    /// Looks up an entry without counting a visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code does not exist.
    pub async fn get(&self, code: &str) -> Result<Entry, AppError> {
        self.repository
            .get(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short URL not found", json!({ "code": code })))
    }

    /// All entries, most visited first.
    pub async fn stats(&self) -> Result<Vec<Entry>, AppError> {
        self.repository.all_sorted_by_visits().await
    }

    /// Number of stored entries.
    pub async fn count(&self) -> Result<usize, AppError> {
        self.repository.count().await
    }

    /// Checks the store and returns its entry count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageIo`] if the store is not writable.
    pub async fn health(&self) -> Result<usize, AppError> {
        self.repository.check_writable().await?;
        self.repository.count().await
    }

    /// Constructs the full short URL from the public base URL and a code.
    pub fn short_url(&self, base_url: &str, code: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), code)
    }
}
