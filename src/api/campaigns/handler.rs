//! Campaign API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::auth::CurrentUser;
use crate::campaigns::{CampaignExecutor, ExecutionReport};
use crate::core::ServerState;
use crate::db::models::{
    Campaign, CampaignCreate, CampaignResponse, CampaignStatus, CampaignUpdate, ResponseStats,
};
use crate::db::repository::record_id;
use crate::db::repository::send_log::SendCounts;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

const TABLE: &str = "campaign";

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct CampaignListQuery {
    #[serde(default)]
    pub skip: usize,
    pub limit: Option<usize>,
    pub status: Option<CampaignStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CampaignList {
    pub campaigns: Vec<Campaign>,
    pub total: usize,
    pub page: usize,
    pub size: usize,
    pub pages: usize,
}

/// GET /api/campaigns - 获取活动列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<CampaignListQuery>,
) -> AppResult<Json<CampaignList>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let repo = state.campaigns();
    let campaigns = repo
        .find_all(query.status, query.search.as_deref(), query.skip, limit)
        .await?;
    let total = repo
        .count_filtered(query.status, query.search.as_deref())
        .await?;

    Ok(Json(CampaignList {
        campaigns,
        total,
        page: query.skip / limit + 1,
        size: limit,
        pages: total.div_ceil(limit),
    }))
}

/// Validate that referenced templates and form exist (404 otherwise)
async fn check_references(state: &ServerState, data: &CampaignCreate) -> AppResult<()> {
    if let Some(id) = &data.email_template_id
        && state.email_templates().find_by_id(id).await?.is_none()
    {
        return Err(AppError::not_found("Email template not found"));
    }
    if let Some(id) = &data.whatsapp_template_id
        && state.whatsapp_templates().find_by_id(id).await?.is_none()
    {
        return Err(AppError::not_found("WhatsApp template not found"));
    }
    if let Some(id) = &data.form_id
        && state.forms().find_by_id(id).await?.is_none()
    {
        return Err(AppError::not_found("Custom form not found"));
    }
    Ok(())
}

/// POST /api/campaigns - 创建活动 (Draft)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<CampaignCreate>,
) -> AppResult<Json<Campaign>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    check_references(&state, &payload).await?;

    let created_by: Option<RecordId> = current_user.id.parse().ok();
    let campaign = state.campaigns().create(payload, created_by).await?;
    Ok(Json(campaign))
}

/// GET /api/campaigns/:id - 获取活动详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Campaign>> {
    let rid = record_id(TABLE, &id);
    let campaign = state
        .campaigns()
        .find_by_id(&rid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Campaign {} not found", id)))?;
    Ok(Json(campaign))
}

/// PUT /api/campaigns/:id - 更新活动 (未指定字段保持原值)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CampaignUpdate>,
) -> AppResult<Json<Campaign>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    let rid = record_id(TABLE, &id);
    let campaign = state.campaigns().update(&rid, payload).await?;
    Ok(Json(campaign))
}

/// DELETE /api/campaigns/:id - 删除活动
///
/// Active 活动不可删除 (400)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let rid = record_id(TABLE, &id);
    let campaign = state
        .campaigns()
        .find_by_id(&rid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Campaign {} not found", id)))?;

    if campaign.status == CampaignStatus::Active {
        return Err(AppError::business_rule("Cannot delete active campaign"));
    }

    let deleted = state.campaigns().delete(&rid).await?;
    Ok(Json(deleted))
}

/// POST /api/campaigns/:id/execute - 执行活动
///
/// 同步执行派发循环并返回汇总报告；单个供应商失败不会中断执行，
/// 也不会使请求失败 (200 + errors 列表)。
pub async fn execute(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ExecutionReport>> {
    let rid = record_id(TABLE, &id);
    tracing::info!(campaign = %rid, by = %current_user.email, "Campaign execution requested");

    let report = CampaignExecutor::new(state).execute(&rid).await?;
    Ok(Json(report))
}

#[derive(Debug, Serialize)]
pub struct CampaignStatusResponse {
    pub id: String,
    pub status: CampaignStatus,
    pub total_vendors: usize,
    pub responses: ResponseStats,
    pub sends: SendCounts,
    pub last_updated: Option<DateTime<Utc>>,
}

/// GET /api/campaigns/:id/status - 活动进度
pub async fn status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CampaignStatusResponse>> {
    let rid = record_id(TABLE, &id);
    let campaign = state
        .campaigns()
        .find_by_id(&rid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Campaign {} not found", id)))?;

    let responses = state.responses().stats_for_campaign(&rid).await?;
    let sends = state.send_logs().counts_for_campaign(&rid).await?;

    Ok(Json(CampaignStatusResponse {
        id: rid.to_string(),
        status: campaign.status,
        total_vendors: campaign.target_vendors.len(),
        responses,
        sends,
        last_updated: campaign.updated_at.or(campaign.created_at),
    }))
}

/// GET /api/campaigns/:id/responses - 活动的响应列表
pub async fn responses(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<CampaignResponse>>> {
    let rid = record_id(TABLE, &id);
    state
        .campaigns()
        .find_by_id(&rid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Campaign {} not found", id)))?;

    let responses = state.responses().find_by_campaign(&rid).await?;
    Ok(Json(responses))
}
