//! Domain layer containing business entities and the store contract.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. The store contract is implemented in
//! [`crate::infrastructure::persistence`] and consumed only by
//! [`crate::application::services::LinkService`].

pub mod entities;
pub mod repositories;
