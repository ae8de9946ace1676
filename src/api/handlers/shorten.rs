//! Handler for link shortening endpoint.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL, or returns the existing one for the same URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/page" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "code": "aB3x_Q",
///   "short_url": "http://localhost:3000/aB3x_Q",
///   "long_url": "https://example.com/page",
///   "reused": false
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the body fails validation or the URL is not
/// absolute. Returns 500 if the store could not be written.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let outcome = state.link_service.shorten_or_reuse(&payload.url).await?;

    Ok(Json(ShortenResponse {
        short_url: state.short_url(&outcome.code),
        code: outcome.code,
        long_url: payload.url,
        reused: outcome.reused,
    }))
}
