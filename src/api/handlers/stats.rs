//! Handler for visit statistics.

use axum::{Json, extract::State};

use crate::api::dto::stats::{LinkStatsItem, StatsResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists every short code with its visit count, most visited first.
///
/// # Endpoint
///
/// `GET /api/stats`
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let items: Vec<LinkStatsItem> = state
        .link_service
        .stats()
        .await?
        .into_iter()
        .map(|entry| {
            let short_url = state.short_url(&entry.code);
            LinkStatsItem::from_entry(entry, short_url)
        })
        .collect();

    Ok(Json(StatsResponse {
        total: items.len(),
        items,
    }))
}
