//! Campaign Response Model
//!
//! One row per (campaign, vendor) pair, created lazily the first time a
//! campaign execution touches the vendor. The answer payload is an
//! explicit untyped blob — form shapes vary per campaign.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Response lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    Pending,
    Submitted,
    Completed,
    Failed,
}

/// Response row matching the `campaign_response` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignResponse {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub campaign_id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub vendor_id: RecordId,
    pub status: ResponseStatus,
    #[serde(default)]
    pub form_data: Option<serde_json::Value>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Update payload — attach answers and move the status forward
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignResponseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ResponseStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Per-status counts for a campaign
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResponseStats {
    pub total: usize,
    pub pending: usize,
    pub submitted: usize,
    pub completed: usize,
    pub failed: usize,
}
