//! Form Response Repository

use chrono::Utc;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::FormResponse;

const TABLE: &str = "form_response";

#[derive(Clone)]
pub struct FormResponseRepository {
    base: BaseRepository,
}

impl FormResponseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Store one submitted answer payload
    pub async fn create(
        &self,
        form: &RecordId,
        answers: serde_json::Value,
    ) -> RepoResult<FormResponse> {
        let response = FormResponse {
            id: None,
            form_id: form.clone(),
            answers,
            submitted_at: Utc::now(),
        };
        let created: Option<FormResponse> =
            self.base.db().create(TABLE).content(response).await?;
        created.ok_or_else(|| RepoError::Database("Failed to store form response".to_string()))
    }

    /// All submissions for a form, newest first
    pub async fn find_by_form(&self, form: &RecordId) -> RepoResult<Vec<FormResponse>> {
        let responses: Vec<FormResponse> = self
            .base
            .db()
            .query("SELECT * FROM form_response WHERE form_id = $form ORDER BY submitted_at DESC")
            .bind(("form", form.to_string()))
            .await?
            .take(0)?;
        Ok(responses)
    }
}
