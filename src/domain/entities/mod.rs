//! Core domain entities.
//!
//! - [`Entry`] - A short code mapped to its original URL and visit count
//! - [`EntryRecord`] - The persisted value stored under each code

pub mod entry;

pub use entry::{Entry, EntryRecord};
