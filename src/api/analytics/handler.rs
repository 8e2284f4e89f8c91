//! Analytics API Handlers
//!
//! Aggregation endpoints backing the dashboard and the per-campaign
//! analytics view.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::models::{CampaignStatus, ResponseStats};
use crate::db::repository::record_id;
use crate::db::repository::send_log::SendCounts;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct RecentCampaign {
    pub id: String,
    pub name: String,
    pub status: CampaignStatus,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub total_campaigns: usize,
    pub active_campaigns: usize,
    pub total_vendors: usize,
    pub total_responses: usize,
    pub pending_responses: usize,
    pub completed_responses: usize,
    /// completed / total, percent
    pub overall_response_rate: f64,
    pub recent_campaigns: Vec<RecentCampaign>,
}

/// GET /api/analytics/dashboard - 总览指标
pub async fn dashboard(State(state): State<ServerState>) -> AppResult<Json<DashboardMetrics>> {
    let campaigns = state.campaigns();
    let total_campaigns = campaigns.count_all().await?;
    let active_campaigns = campaigns.count_by_status(CampaignStatus::Active).await?;
    let total_vendors = state.vendors().count_all().await?;
    let responses = state.responses().stats_all().await?;

    let overall_response_rate = if responses.total > 0 {
        responses.completed as f64 / responses.total as f64 * 100.0
    } else {
        0.0
    };

    let recent_campaigns = campaigns
        .find_all(None, None, 0, 5)
        .await?
        .into_iter()
        .map(|c| RecentCampaign {
            id: c.id.map(|t| t.to_string()).unwrap_or_default(),
            name: c.name,
            status: c.status,
            created_at: c.created_at,
        })
        .collect();

    Ok(Json(DashboardMetrics {
        total_campaigns,
        active_campaigns,
        total_vendors,
        total_responses: responses.total,
        pending_responses: responses.pending,
        completed_responses: responses.completed,
        overall_response_rate,
        recent_campaigns,
    }))
}

#[derive(Debug, Serialize)]
pub struct CampaignAnalytics {
    pub campaign_id: String,
    pub campaign_name: String,
    pub status: CampaignStatus,
    pub total_vendors: usize,
    pub responses: ResponseStats,
    pub sends: SendCounts,
    /// completed responses / targeted vendors, percent
    pub response_rate: f64,
}

/// GET /api/analytics/campaigns/:id - 单个活动的分析
pub async fn campaign_analytics(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CampaignAnalytics>> {
    let rid = record_id("campaign", &id);
    let campaign = state
        .campaigns()
        .find_by_id(&rid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Campaign {} not found", id)))?;

    let responses = state.responses().stats_for_campaign(&rid).await?;
    let sends = state.send_logs().counts_for_campaign(&rid).await?;

    let vendor_count = campaign.target_vendors.len();
    let response_rate = if vendor_count > 0 {
        responses.completed as f64 / vendor_count as f64 * 100.0
    } else {
        0.0
    };

    Ok(Json(CampaignAnalytics {
        campaign_id: rid.to_string(),
        campaign_name: campaign.name,
        status: campaign.status,
        total_vendors: vendor_count,
        responses,
        sends,
        response_rate,
    }))
}
