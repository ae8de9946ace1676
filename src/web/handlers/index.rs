//! Submission page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;
use tracing::error;

use crate::error::AppError;
use crate::state::AppState;
use crate::web::session::{Flash, FlashLevel, Session};

/// Message shown when a request failed for reasons the user cannot fix.
pub(crate) const GENERIC_FAILURE: &str = "Something went wrong, please try again.";

/// Template for the submission page.
///
/// Renders `templates/index.html` with the URL form, the last short URL
/// created in this session, and any pending flash message.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub short_url: Option<String>,
    pub flash: Option<Flash>,
}

/// Form body posted from the submission page.
#[derive(Debug, Deserialize)]
pub struct ShortenForm {
    #[serde(default)]
    pub url: String,
}

/// Renders the submission page.
///
/// # Endpoint
///
/// `GET /`
///
/// Consumes the pending flash message, so the response rewrites the session
/// cookie when one was shown.
pub async fn index_handler(jar: SignedCookieJar) -> Response {
    let mut session = Session::from_jar(&jar);
    let flash = session.take_flash();

    let template = IndexTemplate {
        short_url: session.last_short_url.clone(),
        flash,
    };

    if template.flash.is_some() {
        (session.save(jar), template).into_response()
    } else {
        template.into_response()
    }
}

/// Shortens the submitted URL and returns to the submission page.
///
/// # Endpoint
///
/// `POST /` (form field `url`)
///
/// # Outcomes
///
/// - New code: stored in the session as the last short URL
/// - Existing code: stored in the session, with an info flash
/// - Invalid URL: error flash, session URL untouched
/// - Storage failure: logged, generic error flash
pub async fn shorten_form_handler(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<ShortenForm>,
) -> Response {
    let mut session = Session::from_jar(&jar);
    let url = form.url.trim();

    match state.link_service.shorten_or_reuse(url).await {
        Ok(outcome) => {
            session.last_short_url = Some(state.short_url(&outcome.code));
            if outcome.reused {
                session.flash(FlashLevel::Info, "This URL already has a short code!");
            } else {
                session.flash(FlashLevel::Success, "Short URL created!");
            }
        }
        Err(e @ AppError::InvalidUrl { .. }) => {
            session.flash(FlashLevel::Error, e.to_string());
        }
        Err(e) => {
            error!(error = %e, "Failed to shorten URL");
            session.flash(FlashLevel::Error, GENERIC_FAILURE);
        }
    }

    (session.save(jar), Redirect::to("/")).into_response()
}

/// Forgets the last short URL shown on the submission page.
///
/// # Endpoint
///
/// `GET /clear`
///
/// Touches only the session; the store is unaffected.
pub async fn clear_handler(jar: SignedCookieJar) -> Response {
    let mut session = Session::from_jar(&jar);
    session.last_short_url = None;

    (session.save(jar), Redirect::to("/")).into_response()
}
