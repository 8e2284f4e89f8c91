//! Template API Handlers
//!
//! Deleting a template referenced by an Active campaign is blocked; a
//! successful delete nulls the reference out of non-active campaigns.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::auth::CurrentUser;
use crate::campaigns::render;
use crate::core::ServerState;
use crate::db::models::{
    CampaignStatus, EmailTemplate, EmailTemplateCreate, EmailTemplateUpdate, WhatsAppTemplate,
    WhatsAppTemplateCreate, WhatsAppTemplateUpdate,
};
use crate::db::repository::record_id;
use crate::utils::validation::{
    MAX_BODY_LEN, MAX_NAME_LEN, MAX_SUBJECT_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResult};

const EMAIL_TABLE: &str = "email_template";
const WHATSAPP_TABLE: &str = "whatsapp_template";

#[derive(Debug, Deserialize)]
pub struct TemplateListQuery {
    pub search: Option<String>,
}

fn creator_id(user: &CurrentUser) -> Option<RecordId> {
    user.id.parse().ok()
}

// ========== Email templates ==========

/// GET /api/templates/email - 邮件模板列表
pub async fn list_email(
    State(state): State<ServerState>,
    Query(query): Query<TemplateListQuery>,
) -> AppResult<Json<Vec<EmailTemplate>>> {
    let templates = state
        .email_templates()
        .find_all(query.search.as_deref())
        .await?;
    Ok(Json(templates))
}

/// GET /api/templates/email/:id
pub async fn get_email(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<EmailTemplate>> {
    let rid = record_id(EMAIL_TABLE, &id);
    let template = state
        .email_templates()
        .find_by_id(&rid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Email template {} not found", id)))?;
    Ok(Json(template))
}

/// POST /api/templates/email - 创建邮件模板
///
/// 未声明变量列表时从 subject + body 提取
pub async fn create_email(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<EmailTemplateCreate>,
) -> AppResult<Json<EmailTemplate>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.subject, "subject", MAX_SUBJECT_LEN)?;
    validate_required_text(&payload.body, "body", MAX_BODY_LEN)?;

    let variables = match &payload.variables {
        Some(vars) => vars.clone(),
        None => render::extract_variables(&format!("{} {}", payload.subject, payload.body)),
    };

    let template = state
        .email_templates()
        .create(payload, variables, creator_id(&current_user))
        .await?;
    Ok(Json(template))
}

/// PUT /api/templates/email/:id - 更新邮件模板
pub async fn update_email(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(mut payload): Json<EmailTemplateUpdate>,
) -> AppResult<Json<EmailTemplate>> {
    let rid = record_id(EMAIL_TABLE, &id);
    let repo = state.email_templates();
    let existing = repo
        .find_by_id(&rid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Email template {} not found", id)))?;

    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(ref subject) = payload.subject {
        validate_required_text(subject, "subject", MAX_SUBJECT_LEN)?;
    }
    if let Some(ref body) = payload.body {
        validate_required_text(body, "body", MAX_BODY_LEN)?;
    }

    // Re-derive the variable list when the text changes without an
    // explicit override
    if payload.variables.is_none() && (payload.subject.is_some() || payload.body.is_some()) {
        let subject = payload.subject.as_deref().unwrap_or(&existing.subject);
        let body = payload.body.as_deref().unwrap_or(&existing.body);
        payload.variables = Some(render::extract_variables(&format!("{subject} {body}")));
    }

    let template = repo.update(&rid, payload).await?;
    Ok(Json(template))
}

/// DELETE /api/templates/email/:id
///
/// Active 活动引用中的模板不可删除 (400)
pub async fn delete_email(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let rid = record_id(EMAIL_TABLE, &id);
    let repo = state.email_templates();
    repo.find_by_id(&rid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Email template {} not found", id)))?;

    let referencing = state.campaigns().find_by_email_template(&rid).await?;
    if referencing
        .iter()
        .any(|c| c.status == CampaignStatus::Active)
    {
        return Err(AppError::business_rule(
            "Cannot delete: template is referenced by an active campaign",
        ));
    }

    let deleted = repo.delete(&rid).await?;
    state.campaigns().clear_email_template_refs(&rid).await?;
    Ok(Json(deleted))
}

// ========== WhatsApp templates ==========

/// GET /api/templates/whatsapp - WhatsApp 模板列表
pub async fn list_whatsapp(
    State(state): State<ServerState>,
    Query(query): Query<TemplateListQuery>,
) -> AppResult<Json<Vec<WhatsAppTemplate>>> {
    let templates = state
        .whatsapp_templates()
        .find_all(query.search.as_deref())
        .await?;
    Ok(Json(templates))
}

/// GET /api/templates/whatsapp/:id
pub async fn get_whatsapp(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<WhatsAppTemplate>> {
    let rid = record_id(WHATSAPP_TABLE, &id);
    let template = state
        .whatsapp_templates()
        .find_by_id(&rid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("WhatsApp template {} not found", id)))?;
    Ok(Json(template))
}

/// POST /api/templates/whatsapp - 创建 WhatsApp 模板
pub async fn create_whatsapp(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<WhatsAppTemplateCreate>,
) -> AppResult<Json<WhatsAppTemplate>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.content, "content", MAX_BODY_LEN)?;

    let variables = match &payload.variables {
        Some(vars) => vars.clone(),
        None => render::extract_variables(&payload.content),
    };

    let template = state
        .whatsapp_templates()
        .create(payload, variables, creator_id(&current_user))
        .await?;
    Ok(Json(template))
}

/// PUT /api/templates/whatsapp/:id - 更新 WhatsApp 模板
pub async fn update_whatsapp(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(mut payload): Json<WhatsAppTemplateUpdate>,
) -> AppResult<Json<WhatsAppTemplate>> {
    let rid = record_id(WHATSAPP_TABLE, &id);
    let repo = state.whatsapp_templates();
    repo.find_by_id(&rid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("WhatsApp template {} not found", id)))?;

    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(ref content) = payload.content {
        validate_required_text(content, "content", MAX_BODY_LEN)?;
        if payload.variables.is_none() {
            payload.variables = Some(render::extract_variables(content));
        }
    }

    let template = repo.update(&rid, payload).await?;
    Ok(Json(template))
}

/// DELETE /api/templates/whatsapp/:id
pub async fn delete_whatsapp(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let rid = record_id(WHATSAPP_TABLE, &id);
    let repo = state.whatsapp_templates();
    repo.find_by_id(&rid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("WhatsApp template {} not found", id)))?;

    let referencing = state.campaigns().find_by_whatsapp_template(&rid).await?;
    if referencing
        .iter()
        .any(|c| c.status == CampaignStatus::Active)
    {
        return Err(AppError::business_rule(
            "Cannot delete: template is referenced by an active campaign",
        ));
    }

    let deleted = repo.delete(&rid).await?;
    state.campaigns().clear_whatsapp_template_refs(&rid).await?;
    Ok(Json(deleted))
}

// ========== Preview ==========

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub content: String,
    /// Render against this vendor; sample data when absent
    pub vendor_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub rendered: String,
    pub variables_used: Vec<String>,
}

/// POST /api/templates/preview - 渲染预览
pub async fn preview(
    State(state): State<ServerState>,
    Json(payload): Json<PreviewRequest>,
) -> AppResult<Json<PreviewResponse>> {
    let vars = match &payload.vendor_id {
        Some(id) => {
            let rid = record_id("vendor", id);
            let vendor = state
                .vendors()
                .find_by_id(&rid)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Vendor {} not found", id)))?;
            render::vendor_variables(&vendor)
        }
        None => render::sample_variables(),
    };

    Ok(Json(PreviewResponse {
        rendered: render::render(&payload.content, &vars),
        variables_used: render::extract_variables(&payload.content),
    }))
}
