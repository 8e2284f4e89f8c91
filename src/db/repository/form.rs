//! Custom Form Repository

use chrono::Utc;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{CustomForm, CustomFormCreate, CustomFormUpdate};

const TABLE: &str = "custom_form";

#[derive(Clone)]
pub struct FormRepository {
    base: BaseRepository,
}

impl FormRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All forms, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<CustomForm>> {
        let forms: Vec<CustomForm> = self
            .base
            .db()
            .query("SELECT * FROM custom_form ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(forms)
    }

    /// Find form by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<CustomForm>> {
        let form: Option<CustomForm> = self.base.db().select(id.clone()).await?;
        Ok(form)
    }

    /// Find form by slug (public endpoint key)
    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<CustomForm>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM custom_form WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug.to_string()))
            .await?;
        let forms: Vec<CustomForm> = result.take(0)?;
        Ok(forms.into_iter().next())
    }

    /// Create a new form
    pub async fn create(
        &self,
        data: CustomFormCreate,
        created_by: Option<RecordId>,
    ) -> RepoResult<CustomForm> {
        // Slug is the public URL key; must be unique
        if self.find_by_slug(&data.slug).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Form slug '{}' already exists",
                data.slug
            )));
        }

        let form = CustomForm {
            id: None,
            name: data.name,
            title: data.title,
            slug: data.slug,
            description: data.description,
            is_active: true,
            fields: data.fields,
            created_by,
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        let created: Option<CustomForm> = self.base.db().create(TABLE).content(form).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create form".to_string()))
    }

    /// Partial update; unset fields keep their stored value
    pub async fn update(&self, id: &RecordId, data: CustomFormUpdate) -> RepoResult<CustomForm> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Form {} not found", id)))?;

        if let Some(ref new_slug) = data.slug
            && new_slug != &existing.slug
            && self.find_by_slug(new_slug).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Form slug '{}' already exists",
                new_slug
            )));
        }

        let _: Option<CustomForm> = self.base.db().update(id.clone()).merge(data).await?;
        self.base
            .db()
            .query("UPDATE $id SET updated_at = $now")
            .bind(("id", id.clone()))
            .bind(("now", Utc::now()))
            .await?
            .check()?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Form {} not found", id)))
    }

    /// Hard delete a form
    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        let deleted: Option<CustomForm> = self.base.db().delete(id.clone()).await?;
        Ok(deleted.is_some())
    }
}
