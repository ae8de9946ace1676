//! # shortstat
//!
//! A small URL shortener with per-code visit counters, built with Axum and
//! backed by a single JSON file.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - The [`Entry`](domain::entities::Entry) entity and store trait
//! - **Application Layer** ([`application`]) - [`LinkService`](application::services::LinkService), the only caller of the store
//! - **Infrastructure Layer** ([`infrastructure`]) - Write-through JSON file store
//! - **API Layer** ([`api`]) - JSON endpoints, DTOs, and middleware
//! - **Web Layer** ([`web`]) - HTML pages and the signed session cookie
//!
//! ## Features
//!
//! - Random 6-character URL-safe codes, regenerated on collision
//! - Exact-match deduplication of submitted URLs
//! - Visit counting, persisted before every redirect
//! - Crash-safe writes (temp file + rename)
//!
//! ## Quick Start
//!
//! ```bash
//! export BASE_URL="http://localhost:3000"
//! export STORE_PATH="url_stats.json"
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;
pub mod web;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkService, ShortenOutcome};
    pub use crate::domain::entities::Entry;
    pub use crate::domain::repositories::EntryRepository;
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::JsonFileEntryRepository;
    pub use crate::state::AppState;
}
