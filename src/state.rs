//! Shared application state injected into every handler.

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use std::sync::Arc;

use crate::application::services::LinkService;
use crate::infrastructure::persistence::JsonFileEntryRepository;

/// Concrete link service used by the running server.
pub type AppLinkService = LinkService<JsonFileEntryRepository>;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<AppLinkService>,
    /// Public base URL short codes are appended to.
    pub base_url: String,
    /// Key used to sign the web session cookie.
    pub session_key: Key,
}

impl AppState {
    pub fn new(link_service: Arc<AppLinkService>, base_url: String, session_key: Key) -> Self {
        Self {
            link_service,
            base_url,
            session_key,
        }
    }

    /// Full short URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        self.link_service.short_url(&self.base_url, code)
    }
}

// Lets handlers extract `SignedCookieJar` directly.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.session_key.clone()
    }
}
