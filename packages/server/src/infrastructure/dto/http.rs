//! HTTP API response DTOs.

use serde::Serialize;

/// `GET /api/spots` の要素
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotSummaryDto {
    pub spot_id: String,
    pub user_count: usize,
}

/// `GET /api/presence/{user_id}` のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceDto {
    pub user_id: String,
    pub online: bool,
    pub connection_count: usize,
}
