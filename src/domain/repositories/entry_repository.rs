//! Repository trait for short code storage.

use crate::domain::entities::Entry;
use crate::error::AppError;
use async_trait::async_trait;

/// The durable keyed collection of entries.
///
/// Each method is atomic with respect to every other method on the same
/// repository, including the persist step of mutating operations. Sequences
/// of calls (find, then create) are not.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::JsonFileEntryRepository`] - JSON file store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Finds the entry whose original URL equals `url` exactly.
    async fn find_by_url(&self, url: &str) -> Result<Option<Entry>, AppError>;

    /// Creates an entry for `url` under a freshly generated unique code.
    ///
    /// The caller is responsible for URL deduplication; this method only
    /// guarantees that no existing code is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageIo`] if the store could not be persisted.
    /// Returns [`AppError::Internal`] if no free code could be generated.
    async fn create(&self, url: &str) -> Result<Entry, AppError>;

    /// Finds an entry by its short code.
    async fn get(&self, code: &str) -> Result<Option<Entry>, AppError>;

    /// Adds one visit to the entry and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code does not exist.
    /// Returns [`AppError::StorageIo`] if the store could not be persisted.
    async fn increment_visits(&self, code: &str) -> Result<Entry, AppError>;

    /// Returns all entries, most visited first; ties keep insertion order.
    async fn all_sorted_by_visits(&self) -> Result<Vec<Entry>, AppError>;

    /// Number of stored entries.
    async fn count(&self) -> Result<usize, AppError>;

    /// Checks that the next write has a chance of succeeding.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageIo`] if the backing storage is not writable.
    async fn check_writable(&self) -> Result<(), AppError>;
}
