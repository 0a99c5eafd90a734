use axum::{extract::State, response::IntoResponse, Json};

use crate::{dto::profile_dto::StatsResponse, error::Result, AppState};

#[axum::debug_handler]
pub async fn get_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.profile_service.stats().await?;
    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}
