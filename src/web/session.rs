//! Signed cookie session for the web pages.
//!
//! Holds per-browser UI state only: the last short URL created and a one-shot
//! flash message. Nothing here is domain state; the store never sees it.
//!
//! The session is a single cookie in a [`SignedCookieJar`], its value the
//! base64url-encoded JSON of [`Session`]. A cookie whose signature does not
//! verify, or whose payload does not parse, is treated as an empty session.

use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::{Cookie, Key, SameSite};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha512};

use crate::error::AppError;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "shortstat_session";

const ENGINE: base64::engine::GeneralPurpose = base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Derives the cookie signing key from a configured secret.
///
/// The secret is stretched to the 64 bytes [`Key`] needs with SHA-512.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the derived material is rejected.
pub fn key_from_secret(secret: &[u8]) -> Result<Key, AppError> {
    let digest = Sha512::digest(secret);
    Key::try_from(digest.as_slice()).map_err(|e| {
        AppError::internal("Invalid session secret", json!({ "reason": e.to_string() }))
    })
}

/// Builds a signing key from 64 random bytes.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
pub fn generate_key() -> Result<Key, AppError> {
    let mut material = [0u8; 64];
    getrandom::fill(&mut material).map_err(|e| {
        AppError::internal(
            "Failed to generate session secret",
            json!({ "reason": e.to_string() }),
        )
    })?;
    Key::try_from(material.as_slice()).map_err(|e| {
        AppError::internal("Invalid session secret", json!({ "reason": e.to_string() }))
    })
}

/// Severity of a flash message, used as its CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// One-shot message shown on the next page render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Per-browser UI state carried in the session cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_short_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
}

impl Session {
    /// Reads the session from a verified cookie jar.
    pub fn from_jar(jar: &SignedCookieJar) -> Self {
        jar.get(SESSION_COOKIE)
            .and_then(|cookie| Self::decode(cookie.value()))
            .unwrap_or_default()
    }

    fn decode(value: &str) -> Option<Self> {
        let json = ENGINE.decode(value).ok()?;
        match serde_json::from_slice(&json) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::debug!("Discarding unparsable session cookie: {}", e);
                None
            }
        }
    }

    /// Writes the session into `jar`, removing the cookie when empty.
    pub fn save(&self, jar: SignedCookieJar) -> SignedCookieJar {
        if *self == Self::default() {
            return jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
        }

        // Only plain strings and enums; serialization cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();

        jar.add(
            Cookie::build((SESSION_COOKIE, ENGINE.encode(json)))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax),
        )
    }

    /// Removes and returns the pending flash message.
    pub fn take_flash(&mut self) -> Option<Flash> {
        self.flash.take()
    }

    pub fn flash(&mut self, level: FlashLevel, message: impl Into<String>) {
        self.flash = Some(Flash::new(level, message));
    }
}
