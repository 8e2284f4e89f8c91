//! Campaign Repository

use chrono::Utc;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, CountRow, RepoError, RepoResult};
use crate::db::models::{Campaign, CampaignCreate, CampaignStatus, CampaignUpdate};

const TABLE: &str = "campaign";

#[derive(Clone)]
pub struct CampaignRepository {
    base: BaseRepository,
}

impl CampaignRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List campaigns, optionally filtered by status and name/description
    /// substring, newest first.
    pub async fn find_all(
        &self,
        status: Option<CampaignStatus>,
        search: Option<&str>,
        skip: usize,
        limit: usize,
    ) -> RepoResult<Vec<Campaign>> {
        let mut sql = String::from("SELECT * FROM campaign");
        let mut clauses: Vec<&str> = Vec::new();
        if status.is_some() {
            clauses.push("status = $status");
        }
        if search.is_some() {
            clauses.push(
                "(string::lowercase(name) CONTAINS $search \
                 OR string::lowercase(description ?? '') CONTAINS $search)",
            );
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC LIMIT $limit START $skip");

        let mut query = self.base.db().query(sql);
        if let Some(s) = status {
            query = query.bind(("status", s));
        }
        if let Some(s) = search {
            query = query.bind(("search", s.to_lowercase()));
        }
        let campaigns: Vec<Campaign> = query
            .bind(("limit", limit as i64))
            .bind(("skip", skip as i64))
            .await?
            .take(0)?;
        Ok(campaigns)
    }

    /// Count campaigns matching the list filters
    pub async fn count_filtered(
        &self,
        status: Option<CampaignStatus>,
        search: Option<&str>,
    ) -> RepoResult<usize> {
        let mut sql = String::from("SELECT count() AS count FROM campaign");
        let mut clauses: Vec<&str> = Vec::new();
        if status.is_some() {
            clauses.push("status = $status");
        }
        if search.is_some() {
            clauses.push(
                "(string::lowercase(name) CONTAINS $search \
                 OR string::lowercase(description ?? '') CONTAINS $search)",
            );
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" GROUP ALL");

        let mut query = self.base.db().query(sql);
        if let Some(s) = status {
            query = query.bind(("status", s));
        }
        if let Some(s) = search {
            query = query.bind(("search", s.to_lowercase()));
        }
        let rows: Vec<CountRow> = query.await?.take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    /// Total campaign count
    pub async fn count_all(&self) -> RepoResult<usize> {
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() AS count FROM campaign GROUP ALL")
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    /// Count campaigns with the given status
    pub async fn count_by_status(&self, status: CampaignStatus) -> RepoResult<usize> {
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() AS count FROM campaign WHERE status = $status GROUP ALL")
            .bind(("status", status))
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    /// Find campaign by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Campaign>> {
        let campaign: Option<Campaign> = self.base.db().select(id.clone()).await?;
        Ok(campaign)
    }

    /// Create a new campaign in Draft status
    pub async fn create(
        &self,
        data: CampaignCreate,
        created_by: Option<RecordId>,
    ) -> RepoResult<Campaign> {
        let campaign = Campaign {
            id: None,
            name: data.name,
            description: data.description,
            status: CampaignStatus::Draft,
            email_template_id: data.email_template_id,
            whatsapp_template_id: data.whatsapp_template_id,
            form_id: data.form_id,
            target_vendors: data.target_vendors,
            deadline: data.deadline,
            created_by,
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        let created: Option<Campaign> = self.base.db().create(TABLE).content(campaign).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create campaign".to_string()))
    }

    /// Partial update; unset fields keep their stored value
    pub async fn update(&self, id: &RecordId, data: CampaignUpdate) -> RepoResult<Campaign> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Campaign {} not found", id)))?;

        let _: Option<Campaign> = self.base.db().update(id.clone()).merge(data).await?;
        self.base
            .db()
            .query("UPDATE $id SET updated_at = $now")
            .bind(("id", id.clone()))
            .bind(("now", Utc::now()))
            .await?
            .check()?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Campaign {} not found", id)))
    }

    /// Move a campaign to the given status
    pub async fn set_status(&self, id: &RecordId, status: CampaignStatus) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $id SET status = $status, updated_at = $now")
            .bind(("id", id.clone()))
            .bind(("status", status))
            .bind(("now", Utc::now()))
            .await?
            .check()?;
        Ok(())
    }

    /// Hard delete a campaign
    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        let deleted: Option<Campaign> = self.base.db().delete(id.clone()).await?;
        Ok(deleted.is_some())
    }

    /// Campaigns referencing the given email template
    pub async fn find_by_email_template(&self, template: &RecordId) -> RepoResult<Vec<Campaign>> {
        let campaigns: Vec<Campaign> = self
            .base
            .db()
            .query("SELECT * FROM campaign WHERE email_template_id = $template")
            .bind(("template", template.to_string()))
            .await?
            .take(0)?;
        Ok(campaigns)
    }

    /// Campaigns referencing the given WhatsApp template
    pub async fn find_by_whatsapp_template(
        &self,
        template: &RecordId,
    ) -> RepoResult<Vec<Campaign>> {
        let campaigns: Vec<Campaign> = self
            .base
            .db()
            .query("SELECT * FROM campaign WHERE whatsapp_template_id = $template")
            .bind(("template", template.to_string()))
            .await?
            .take(0)?;
        Ok(campaigns)
    }

    /// Null out email-template references on non-active campaigns
    /// (called after the template itself is deleted)
    pub async fn clear_email_template_refs(&self, template: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "UPDATE campaign SET email_template_id = NONE \
                 WHERE email_template_id = $template AND status != 'Active'",
            )
            .bind(("template", template.to_string()))
            .await?
            .check()?;
        Ok(())
    }

    /// Null out WhatsApp-template references on non-active campaigns
    pub async fn clear_whatsapp_template_refs(&self, template: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "UPDATE campaign SET whatsapp_template_id = NONE \
                 WHERE whatsapp_template_id = $template AND status != 'Active'",
            )
            .bind(("template", template.to_string()))
            .await?
            .check()?;
        Ok(())
    }
}
