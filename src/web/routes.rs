//! Web page route configuration.

use crate::state::AppState;
use crate::web::handlers::{
    clear_handler, index_handler, redirect_handler, shorten_form_handler, stats_page_handler,
};
use axum::{Router, routing::get};

/// Browser-facing routes.
///
/// # Endpoints
///
/// - `GET  /`       - Submission form
/// - `POST /`       - Shorten the submitted URL
/// - `GET  /stats`  - Visit statistics table
/// - `GET  /clear`  - Forget the last short URL in this session
/// - `GET  /{code}` - Redirect to the original URL
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler).post(shorten_form_handler))
        .route("/stats", get(stats_page_handler))
        .route("/clear", get(clear_handler))
        .route("/{code}", get(redirect_handler))
}
