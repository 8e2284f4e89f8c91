//! Campaign Response API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;

use crate::core::ServerState;
use crate::db::models::{CampaignResponse, CampaignResponseUpdate, ResponseStatus};
use crate::db::repository::record_id;
use crate::utils::{AppError, AppResult};

const TABLE: &str = "campaign_response";

/// GET /api/responses/:id - 获取响应详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CampaignResponse>> {
    let rid = record_id(TABLE, &id);
    let response = state
        .responses()
        .find_by_id(&rid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Response {} not found", id)))?;
    Ok(Json(response))
}

/// PUT /api/responses/:id - 提交/更新响应
///
/// 状态推进到 Submitted/Completed 时自动记录 submitted_at
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(mut payload): Json<CampaignResponseUpdate>,
) -> AppResult<Json<CampaignResponse>> {
    if matches!(
        payload.status,
        Some(ResponseStatus::Submitted) | Some(ResponseStatus::Completed)
    ) && payload.submitted_at.is_none()
    {
        payload.submitted_at = Some(Utc::now());
    }

    let rid = record_id(TABLE, &id);
    let response = state.responses().update(&rid, payload).await?;
    Ok(Json(response))
}
