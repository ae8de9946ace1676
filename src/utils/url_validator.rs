//! Submitted URL validation.
//!
//! A URL is accepted when it parses as an absolute URL carrying both a scheme
//! and a non-empty host. The string itself is never rewritten: deduplication
//! compares the exact text the user submitted. Inputs the parser would
//! silently clean up (control characters, surrounding whitespace) are
//! rejected, since the stored text is what ends up in the `Location` header.

use url::Url;

/// Longest URL accepted, in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

/// Errors that can occur while validating a submitted URL.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL must not contain control characters or surrounding whitespace")]
    UnsafeCharacters,

    #[error("URL must be at most 2048 bytes")]
    TooLong,
}

/// Checks that `input` is an absolute URL with a scheme and a host.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_url("https://example.com").is_ok());
/// assert!(validate_url("example.com").is_err());
/// assert!(validate_url("mailto:someone@example.com").is_err());
/// assert!(validate_url("https://example.com/a\nb").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<(), UrlValidationError> {
    if input.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    if input.trim() != input || input.chars().any(char::is_control) {
        return Err(UrlValidationError::UnsafeCharacters);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}
