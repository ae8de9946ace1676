//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header::LOCATION},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::SignedCookieJar;
use serde_json::json;
use tracing::{debug, error};

use crate::error::AppError;
use crate::state::AppState;
use crate::web::handlers::index::GENERIC_FAILURE;
use crate::web::session::{FlashLevel, Session};

/// Redirects a short code to its original URL, counting the visit.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Responses
///
/// - Known code: 307 Temporary Redirect to the original URL
/// - Unknown code: error flash, 303 back to `/`
/// - Storage failure, or a stored URL that cannot be sent as a `Location`
///   header: logged, generic error flash, 303 back to `/`
///
/// The visit is persisted before the redirect is issued; if that write
/// fails the redirect is not served.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Response {
    let result = state.link_service.resolve(&code).await.and_then(|url| {
        HeaderValue::try_from(url.as_str()).map_err(|e| {
            AppError::internal(
                "Stored URL is not a valid Location header",
                json!({ "code": code, "reason": e.to_string() }),
            )
        })
    });

    let mut session = Session::from_jar(&jar);
    match result {
        Ok(location) => {
            debug!(code = %code, "Redirecting");
            return (StatusCode::TEMPORARY_REDIRECT, [(LOCATION, location)]).into_response();
        }
        Err(AppError::NotFound { .. }) => session.flash(FlashLevel::Error, "Short URL not found"),
        Err(e) => {
            error!(code = %code, error = %e, "Failed to resolve short code");
            session.flash(FlashLevel::Error, GENERIC_FAILURE);
        }
    }

    (session.save(jar), Redirect::to("/")).into_response()
}
