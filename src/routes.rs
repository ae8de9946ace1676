//! Top-level router configuration combining web and API routes.
//!
//! # Route Structure
//!
//! - `GET  /`          - Submission form (POST to shorten)
//! - `GET  /stats`     - Statistics table
//! - `GET  /clear`     - Clear the session's last short URL
//! - `GET  /{code}`    - Short link redirect
//! - `GET  /health`    - Health check
//! - `/api/*`          - JSON API
//! - `/static/*`       - Static assets
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use crate::web;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
///
/// Wraps [`router`] in trailing-slash normalization.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

/// All routes with state and tracing applied.
///
/// Fixed routes (`/stats`, `/clear`, `/health`) take precedence over the
/// `/{code}` capture; generated codes never collide with them.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(web::routes::routes())
        .route("/health", get(health_handler))
        .nest("/api", api::routes::routes())
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(tracing::layer())
}
