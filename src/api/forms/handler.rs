//! Form API Handlers

use std::collections::HashSet;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use surrealdb::RecordId;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{CustomForm, CustomFormCreate, CustomFormUpdate, FormField, FormResponse};
use crate::db::repository::record_id;
use crate::forms::{FieldDescriptor, describe_fields, validate_submission};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text, validate_slug,
};
use crate::utils::{AppError, AppResult};

const TABLE: &str = "custom_form";

/// Field names must be unique and visibility rules must reference an
/// existing field
fn validate_fields(fields: &[FormField]) -> AppResult<()> {
    let mut names: HashSet<&str> = HashSet::new();
    for field in fields {
        validate_required_text(&field.name, "field name", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&field.label, "field label", MAX_NAME_LEN)?;
        if !names.insert(field.name.as_str()) {
            return Err(AppError::validation(format!(
                "Duplicate field name '{}'",
                field.name
            )));
        }
    }
    for field in fields {
        if let Some(rule) = &field.visible_when
            && !names.contains(rule.field.as_str())
        {
            return Err(AppError::validation(format!(
                "Field '{}' references unknown field '{}'",
                field.name, rule.field
            )));
        }
    }
    Ok(())
}

// ========== Authenticated builder CRUD ==========

/// GET /api/forms - 表单列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<CustomForm>>> {
    let forms = state.forms().find_all().await?;
    Ok(Json(forms))
}

/// GET /api/forms/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CustomForm>> {
    let rid = record_id(TABLE, &id);
    let form = state
        .forms()
        .find_by_id(&rid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Form {} not found", id)))?;
    Ok(Json(form))
}

/// POST /api/forms - 创建表单
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<CustomFormCreate>,
) -> AppResult<Json<CustomForm>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
    validate_slug(&payload.slug)?;
    validate_fields(&payload.fields)?;

    let created_by: Option<RecordId> = current_user.id.parse().ok();
    let form = state.forms().create(payload, created_by).await?;
    Ok(Json(form))
}

/// PUT /api/forms/:id - 更新表单
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CustomFormUpdate>,
) -> AppResult<Json<CustomForm>> {
    if let Some(ref fields) = payload.fields {
        validate_fields(fields)?;
    }
    if let Some(ref slug) = payload.slug {
        validate_slug(slug)?;
    }

    let rid = record_id(TABLE, &id);
    let form = state.forms().update(&rid, payload).await?;
    Ok(Json(form))
}

/// DELETE /api/forms/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let rid = record_id(TABLE, &id);
    let deleted = state.forms().delete(&rid).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Form {} not found", id)));
    }
    Ok(Json(true))
}

/// GET /api/forms/:id/responses - 表单提交记录
pub async fn responses(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<FormResponse>>> {
    let rid = record_id(TABLE, &id);
    state
        .forms()
        .find_by_id(&rid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Form {} not found", id)))?;
    let responses = state.form_responses().find_by_form(&rid).await?;
    Ok(Json(responses))
}

// ========== Public (unauthenticated) ==========

#[derive(Debug, Serialize)]
pub struct PublicFormResponse {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub slug: String,
    pub fields: Vec<FieldDescriptor>,
}

/// 按 slug 查找活跃表单；不存在或停用都按 404 处理
async fn active_form_by_slug(state: &ServerState, slug: &str) -> AppResult<CustomForm> {
    let form = state
        .forms()
        .find_by_slug(slug)
        .await?
        .filter(|f| f.is_active)
        .ok_or_else(|| AppError::not_found(format!("Form '{}' not found", slug)))?;
    Ok(form)
}

/// GET /api/forms/public/:slug - 公开表单定义
pub async fn public_get(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<PublicFormResponse>> {
    let form = active_form_by_slug(&state, &slug).await?;
    Ok(Json(PublicFormResponse {
        title: form.title,
        description: form.description,
        slug: form.slug,
        fields: describe_fields(&form.fields),
    }))
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
    pub response_id: String,
}

/// POST /api/forms/public/:slug - 提交表单
///
/// 校验可见必填字段后整体存储答案负载
pub async fn public_submit(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    Json(answers): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<SubmitResponse>)> {
    let form = active_form_by_slug(&state, &slug).await?;

    let answer_map = answers
        .as_object()
        .ok_or_else(|| AppError::validation("Submission body must be a JSON object"))?;

    if let Err(missing) = validate_submission(&form.fields, answer_map) {
        return Err(AppError::validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let form_id = form
        .id
        .ok_or_else(|| AppError::internal("Stored form has no id"))?;
    let response = state.form_responses().create(&form_id, answers).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: "Form response recorded",
            response_id: response.id.map(|t| t.to_string()).unwrap_or_default(),
        }),
    ))
}
