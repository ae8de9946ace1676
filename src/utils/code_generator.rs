//! Short code generation.
//!
//! Codes are drawn from the OS random number generator and encoded as
//! URL-safe base64 without padding, then cut to [`CODE_LENGTH`] characters.

use crate::error::AppError;
use base64::Engine as _;
use serde_json::json;

/// Number of characters in a generated short code.
pub const CODE_LENGTH: usize = 6;

/// Random bytes drawn per code. Six bytes encode to eight characters.
const CODE_LENGTH_BYTES: usize = 6;

/// Codes that collide with fixed routes and must never be handed out.
pub const RESERVED_CODES: &[&str] = &["stats", "clear", "health", "api", "static"];

/// Generates a random short code.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code()?;
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
/// ```
pub fn generate_code() -> Result<String, AppError> {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate random bytes",
            json!({ "reason": e.to_string() }),
        )
    })?;

    let mut code = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer);
    code.truncate(CODE_LENGTH);
    Ok(code)
}

/// Returns true if `code` is shadowed by a fixed route.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_correct_length() {
        let code = generate_code().unwrap();
        assert_eq!(code.len(), CODE_LENGTH);
    }

    #[test]
    fn test_generate_code_url_safe_characters() {
        for _ in 0..100 {
            let code = generate_code().unwrap();
            assert!(
                code.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
                "unexpected character in {code}"
            );
        }
    }

    #[test]
    fn test_generate_code_no_padding() {
        let code = generate_code().unwrap();
        assert!(!code.contains('='));
    }

    #[test]
    fn test_generate_code_produces_varied_codes() {
        let codes: HashSet<String> = (0..1000).map(|_| generate_code().unwrap()).collect();

        // 36 bits of entropy; a handful of collisions in 1000 draws would already be suspicious
        assert!(codes.len() >= 995);
    }

    #[test]
    fn test_reserved_codes() {
        assert!(is_reserved("stats"));
        assert!(is_reserved("clear"));
        assert!(is_reserved("health"));
        assert!(!is_reserved("abc123"));
    }
}
