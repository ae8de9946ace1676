//! Store implementations.
//!
//! - [`JsonFileEntryRepository`] - Write-through JSON file store

pub mod json_entry_repository;

pub use json_entry_repository::{CodeGenerator, JsonFileEntryRepository};
