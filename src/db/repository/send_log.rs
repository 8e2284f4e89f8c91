//! Send Log Repository

use chrono::Utc;
use serde::Deserialize;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Channel, SendLog};

const TABLE: &str = "send_log";

#[derive(Debug, Deserialize)]
struct ChannelCount {
    channel: Channel,
    count: usize,
}

/// Per-channel send totals for a campaign
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct SendCounts {
    pub email: usize,
    pub whatsapp: usize,
}

#[derive(Clone)]
pub struct SendLogRepository {
    base: BaseRepository,
}

impl SendLogRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Append one successful-dispatch row
    pub async fn append(
        &self,
        campaign: &RecordId,
        vendor: &RecordId,
        channel: Channel,
        recipient: &str,
    ) -> RepoResult<SendLog> {
        let log = SendLog {
            id: None,
            campaign_id: campaign.clone(),
            vendor_id: vendor.clone(),
            channel,
            recipient: recipient.to_string(),
            sent_at: Utc::now(),
        };
        let created: Option<SendLog> = self.base.db().create(TABLE).content(log).await?;
        created.ok_or_else(|| RepoError::Database("Failed to append send log".to_string()))
    }

    /// All send logs for a campaign
    pub async fn find_by_campaign(&self, campaign: &RecordId) -> RepoResult<Vec<SendLog>> {
        let logs: Vec<SendLog> = self
            .base
            .db()
            .query("SELECT * FROM send_log WHERE campaign_id = $campaign ORDER BY sent_at")
            .bind(("campaign", campaign.to_string()))
            .await?
            .take(0)?;
        Ok(logs)
    }

    /// Per-channel totals for a campaign
    pub async fn counts_for_campaign(&self, campaign: &RecordId) -> RepoResult<SendCounts> {
        let rows: Vec<ChannelCount> = self
            .base
            .db()
            .query(
                "SELECT channel, count() AS count FROM send_log \
                 WHERE campaign_id = $campaign GROUP BY channel",
            )
            .bind(("campaign", campaign.to_string()))
            .await?
            .take(0)?;

        let mut counts = SendCounts::default();
        for row in rows {
            match row.channel {
                Channel::Email => counts.email = row.count,
                Channel::Whatsapp => counts.whatsapp = row.count,
            }
        }
        Ok(counts)
    }
}
