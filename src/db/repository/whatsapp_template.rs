//! WhatsApp Template Repository

use chrono::Utc;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{WhatsAppTemplate, WhatsAppTemplateCreate, WhatsAppTemplateUpdate};

const TABLE: &str = "whatsapp_template";

#[derive(Clone)]
pub struct WhatsAppTemplateRepository {
    base: BaseRepository,
}

impl WhatsAppTemplateRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List templates, optional name/content substring search, newest first
    pub async fn find_all(&self, search: Option<&str>) -> RepoResult<Vec<WhatsAppTemplate>> {
        let mut sql = String::from("SELECT * FROM whatsapp_template");
        if search.is_some() {
            sql.push_str(
                " WHERE string::lowercase(name) CONTAINS $search \
                 OR string::lowercase(content) CONTAINS $search",
            );
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = self.base.db().query(sql);
        if let Some(s) = search {
            query = query.bind(("search", s.to_lowercase()));
        }
        let templates: Vec<WhatsAppTemplate> = query.await?.take(0)?;
        Ok(templates)
    }

    /// Find template by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<WhatsAppTemplate>> {
        let template: Option<WhatsAppTemplate> = self.base.db().select(id.clone()).await?;
        Ok(template)
    }

    /// Create a new template
    pub async fn create(
        &self,
        data: WhatsAppTemplateCreate,
        variables: Vec<String>,
        created_by: Option<RecordId>,
    ) -> RepoResult<WhatsAppTemplate> {
        let template = WhatsAppTemplate {
            id: None,
            name: data.name,
            content: data.content,
            variables,
            created_by,
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        let created: Option<WhatsAppTemplate> =
            self.base.db().create(TABLE).content(template).await?;
        created
            .ok_or_else(|| RepoError::Database("Failed to create WhatsApp template".to_string()))
    }

    /// Partial update; unset fields keep their stored value
    pub async fn update(
        &self,
        id: &RecordId,
        data: WhatsAppTemplateUpdate,
    ) -> RepoResult<WhatsAppTemplate> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("WhatsApp template {} not found", id)))?;

        let _: Option<WhatsAppTemplate> = self.base.db().update(id.clone()).merge(data).await?;
        self.base
            .db()
            .query("UPDATE $id SET updated_at = $now")
            .bind(("id", id.clone()))
            .bind(("now", Utc::now()))
            .await?
            .check()?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("WhatsApp template {} not found", id)))
    }

    /// Hard delete a template
    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        let deleted: Option<WhatsAppTemplate> = self.base.db().delete(id.clone()).await?;
        Ok(deleted.is_some())
    }
}
