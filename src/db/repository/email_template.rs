//! Email Template Repository

use chrono::Utc;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{EmailTemplate, EmailTemplateCreate, EmailTemplateUpdate};

const TABLE: &str = "email_template";

#[derive(Clone)]
pub struct EmailTemplateRepository {
    base: BaseRepository,
}

impl EmailTemplateRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List templates, optional name/subject substring search, newest first
    pub async fn find_all(&self, search: Option<&str>) -> RepoResult<Vec<EmailTemplate>> {
        let mut sql = String::from("SELECT * FROM email_template");
        if search.is_some() {
            sql.push_str(
                " WHERE string::lowercase(name) CONTAINS $search \
                 OR string::lowercase(subject) CONTAINS $search",
            );
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = self.base.db().query(sql);
        if let Some(s) = search {
            query = query.bind(("search", s.to_lowercase()));
        }
        let templates: Vec<EmailTemplate> = query.await?.take(0)?;
        Ok(templates)
    }

    /// Find template by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<EmailTemplate>> {
        let template: Option<EmailTemplate> = self.base.db().select(id.clone()).await?;
        Ok(template)
    }

    /// Create a new template
    pub async fn create(
        &self,
        data: EmailTemplateCreate,
        variables: Vec<String>,
        created_by: Option<RecordId>,
    ) -> RepoResult<EmailTemplate> {
        let template = EmailTemplate {
            id: None,
            name: data.name,
            subject: data.subject,
            body: data.body,
            variables,
            created_by,
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        let created: Option<EmailTemplate> =
            self.base.db().create(TABLE).content(template).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create email template".to_string()))
    }

    /// Partial update; unset fields keep their stored value
    pub async fn update(
        &self,
        id: &RecordId,
        data: EmailTemplateUpdate,
    ) -> RepoResult<EmailTemplate> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Email template {} not found", id)))?;

        let _: Option<EmailTemplate> = self.base.db().update(id.clone()).merge(data).await?;
        self.base
            .db()
            .query("UPDATE $id SET updated_at = $now")
            .bind(("id", id.clone()))
            .bind(("now", Utc::now()))
            .await?
            .check()?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Email template {} not found", id)))
    }

    /// Hard delete a template
    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        let deleted: Option<EmailTemplate> = self.base.db().delete(id.clone()).await?;
        Ok(deleted.is_some())
    }
}
