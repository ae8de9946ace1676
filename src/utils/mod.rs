//! Utility functions for code generation and URL checks.
//!
//! - [`code_generator`] - Random short code generation
//! - [`url_validator`] - Absolute URL validation

pub mod code_generator;
pub mod url_validator;
