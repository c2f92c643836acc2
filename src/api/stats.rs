//! Statistics endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, services::stats::LibraryStats};

/// Library-wide counters
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Library statistics", body = LibraryStats)
    )
)]
pub async fn get_stats(State(state): State<crate::AppState>) -> AppResult<Json<LibraryStats>> {
    let stats = state.services.stats.get_stats().await?;
    Ok(Json(stats))
}
