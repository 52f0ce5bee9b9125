//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::UserId,
    infrastructure::dto::http::{PresenceDto, SpotSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the spots that currently have members
pub async fn get_spots(State(state): State<Arc<AppState>>) -> Json<Vec<SpotSummaryDto>> {
    let spots = state.get_active_spots_usecase.execute().await;

    // UseCase の結果から DTO への変換
    Json(spots.into_iter().map(SpotSummaryDto::from).collect())
}

/// Get whether a user currently has any open connection
pub async fn get_presence(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<PresenceDto>, StatusCode> {
    let user_id = match UserId::try_from(user_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Invalid user id in presence lookup: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let summary = state.get_presence_usecase.execute(&user_id).await;
    Ok(Json(summary.into()))
}
