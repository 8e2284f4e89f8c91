//! Campaign Response Repository

use chrono::Utc;
use serde::Deserialize;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, CountRow, RepoError, RepoResult};
use crate::db::models::{
    CampaignResponse, CampaignResponseUpdate, ResponseStats, ResponseStatus,
};

const TABLE: &str = "campaign_response";

#[derive(Debug, Deserialize)]
struct StatusCount {
    status: ResponseStatus,
    count: usize,
}

#[derive(Clone)]
pub struct ResponseRepository {
    base: BaseRepository,
}

impl ResponseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find response by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<CampaignResponse>> {
        let response: Option<CampaignResponse> = self.base.db().select(id.clone()).await?;
        Ok(response)
    }

    /// All responses for a campaign
    pub async fn find_by_campaign(
        &self,
        campaign: &RecordId,
    ) -> RepoResult<Vec<CampaignResponse>> {
        let responses: Vec<CampaignResponse> = self
            .base
            .db()
            .query("SELECT * FROM campaign_response WHERE campaign_id = $campaign")
            .bind(("campaign", campaign.to_string()))
            .await?
            .take(0)?;
        Ok(responses)
    }

    /// The response for a (campaign, vendor) pair, if one exists
    pub async fn find_by_pair(
        &self,
        campaign: &RecordId,
        vendor: &RecordId,
    ) -> RepoResult<Option<CampaignResponse>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM campaign_response \
                 WHERE campaign_id = $campaign AND vendor_id = $vendor LIMIT 1",
            )
            .bind(("campaign", campaign.to_string()))
            .bind(("vendor", vendor.to_string()))
            .await?;
        let responses: Vec<CampaignResponse> = result.take(0)?;
        Ok(responses.into_iter().next())
    }

    /// Create the Pending placeholder row for a (campaign, vendor) pair
    pub async fn create_pending(
        &self,
        campaign: &RecordId,
        vendor: &RecordId,
    ) -> RepoResult<CampaignResponse> {
        let response = CampaignResponse {
            id: None,
            campaign_id: campaign.clone(),
            vendor_id: vendor.clone(),
            status: ResponseStatus::Pending,
            form_data: None,
            submitted_at: None,
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        let created: Option<CampaignResponse> =
            self.base.db().create(TABLE).content(response).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create response row".to_string()))
    }

    /// Attach answers / move the status forward
    pub async fn update(
        &self,
        id: &RecordId,
        data: CampaignResponseUpdate,
    ) -> RepoResult<CampaignResponse> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Response {} not found", id)))?;

        let _: Option<CampaignResponse> = self.base.db().update(id.clone()).merge(data).await?;
        self.base
            .db()
            .query("UPDATE $id SET updated_at = $now")
            .bind(("id", id.clone()))
            .bind(("now", Utc::now()))
            .await?
            .check()?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Response {} not found", id)))
    }

    /// Per-status counts for one campaign
    pub async fn stats_for_campaign(&self, campaign: &RecordId) -> RepoResult<ResponseStats> {
        let rows: Vec<StatusCount> = self
            .base
            .db()
            .query(
                "SELECT status, count() AS count FROM campaign_response \
                 WHERE campaign_id = $campaign GROUP BY status",
            )
            .bind(("campaign", campaign.to_string()))
            .await?
            .take(0)?;
        Ok(Self::fold_stats(rows))
    }

    /// Per-status counts across all campaigns (dashboard)
    pub async fn stats_all(&self) -> RepoResult<ResponseStats> {
        let rows: Vec<StatusCount> = self
            .base
            .db()
            .query("SELECT status, count() AS count FROM campaign_response GROUP BY status")
            .await?
            .take(0)?;
        Ok(Self::fold_stats(rows))
    }

    /// Total response count
    pub async fn count_all(&self) -> RepoResult<usize> {
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() AS count FROM campaign_response GROUP ALL")
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    fn fold_stats(rows: Vec<StatusCount>) -> ResponseStats {
        let mut stats = ResponseStats::default();
        for row in rows {
            stats.total += row.count;
            match row.status {
                ResponseStatus::Pending => stats.pending = row.count,
                ResponseStatus::Submitted => stats.submitted = row.count,
                ResponseStatus::Completed => stats.completed = row.count,
                ResponseStatus::Failed => stats.failed = row.count,
            }
        }
        stats
    }
}
