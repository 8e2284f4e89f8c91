//! Vendor API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{Vendor, VendorCreate, VendorUpdate};
use crate::db::repository::record_id;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

const TABLE: &str = "vendor";

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct VendorListQuery {
    #[serde(default)]
    pub skip: usize,
    pub limit: Option<usize>,
    pub search: Option<String>,
    pub msme_status: Option<String>,
}

/// GET /api/vendors - 获取供应商列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<VendorListQuery>,
) -> AppResult<Json<Vec<Vendor>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let vendors = state
        .vendors()
        .find_all(
            query.search.as_deref(),
            query.msme_status.as_deref(),
            query.skip,
            limit,
        )
        .await?;
    Ok(Json(vendors))
}

/// GET /api/vendors/:id - 获取单个供应商
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vendor>> {
    let rid = record_id(TABLE, &id);
    let vendor = state
        .vendors()
        .find_by_id(&rid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Vendor {} not found", id)))?;
    Ok(Json(vendor))
}

fn validate_payload_texts(
    email: &Option<String>,
    phone: &Option<String>,
    location: &Option<String>,
) -> AppResult<()> {
    validate_optional_text(email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(location, "location", MAX_NAME_LEN)?;
    Ok(())
}

/// POST /api/vendors - 创建供应商
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<VendorCreate>,
) -> AppResult<Json<Vendor>> {
    validate_required_text(&payload.vendor_code, "vendor_code", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.vendor_name, "vendor_name", MAX_NAME_LEN)?;
    validate_payload_texts(&payload.email, &payload.phone, &payload.location)?;

    let vendor = state.vendors().create(payload).await?;
    Ok(Json(vendor))
}

/// PUT /api/vendors/:id - 更新供应商 (未指定字段保持原值)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<VendorUpdate>,
) -> AppResult<Json<Vendor>> {
    if let Some(ref code) = payload.vendor_code {
        validate_required_text(code, "vendor_code", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(ref name) = payload.vendor_name {
        validate_required_text(name, "vendor_name", MAX_NAME_LEN)?;
    }
    validate_payload_texts(&payload.email, &payload.phone, &payload.location)?;

    let rid = record_id(TABLE, &id);
    let vendor = state.vendors().update(&rid, payload).await?;
    Ok(Json(vendor))
}

/// DELETE /api/vendors/:id - 删除供应商 (仅管理员)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let rid = record_id(TABLE, &id);
    let deleted = state.vendors().delete(&rid).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Vendor {} not found", id)));
    }
    Ok(Json(true))
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    pub removed: usize,
}

/// POST /api/vendors/bulk-delete - 批量删除 (仅管理员)
pub async fn bulk_delete(
    State(state): State<ServerState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> AppResult<Json<BulkDeleteResponse>> {
    if payload.ids.is_empty() {
        return Err(AppError::validation("ids must not be empty"));
    }
    let rids: Vec<_> = payload.ids.iter().map(|id| record_id(TABLE, id)).collect();
    let removed = state.vendors().delete_many(&rids).await?;
    tracing::info!(removed, "Vendor bulk delete");
    Ok(Json(BulkDeleteResponse { removed }))
}
