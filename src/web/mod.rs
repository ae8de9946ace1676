//! Web layer for browser-based UI.
//!
//! Server-rendered HTML pages (Askama templates) for submitting URLs and
//! viewing statistics, plus the short code redirect itself.
//!
//! # Modules
//!
//! - [`handlers`] - Page handlers
//! - [`routes`] - Route configuration
//! - [`session`] - Signed cookie holding flash messages and the last short URL

pub mod handlers;
pub mod routes;
pub mod session;
