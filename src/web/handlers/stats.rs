//! Visit statistics page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};

use crate::error::AppError;
use crate::state::AppState;

/// One row of the statistics table.
pub struct StatsRow {
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    pub visits: u64,
}

/// Template for the statistics page.
///
/// Renders `templates/stats.html` as a table, most visited first.
#[derive(Template, WebTemplate)]
#[template(path = "stats.html")]
pub struct StatsTemplate {
    pub rows: Vec<StatsRow>,
}

/// Renders the statistics page.
///
/// # Endpoint
///
/// `GET /stats`
pub async fn stats_page_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let rows = state
        .link_service
        .stats()
        .await?
        .into_iter()
        .map(|entry| StatsRow {
            short_url: state.short_url(&entry.code),
            code: entry.code,
            original_url: entry.original_url,
            visits: entry.visits,
        })
        .collect();

    Ok(StatsTemplate { rows })
}
