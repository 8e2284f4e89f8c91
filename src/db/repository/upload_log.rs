//! Upload Log Repository

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoResult};
use crate::db::models::UploadLog;

const TABLE: &str = "upload_log";

#[derive(Clone)]
pub struct UploadLogRepository {
    base: BaseRepository,
}

impl UploadLogRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Write one row per detected import anomaly
    pub async fn create_batch(&self, logs: Vec<UploadLog>) -> RepoResult<usize> {
        if logs.is_empty() {
            return Ok(0);
        }
        let created: Vec<UploadLog> = self.base.db().insert(TABLE).content(logs).await?;
        Ok(created.len())
    }

    /// Most recent anomaly rows
    pub async fn find_recent(&self, limit: usize) -> RepoResult<Vec<UploadLog>> {
        let logs: Vec<UploadLog> = self
            .base
            .db()
            .query("SELECT * FROM upload_log ORDER BY created_at DESC LIMIT $limit")
            .bind(("limit", limit as i64))
            .await?
            .take(0)?;
        Ok(logs)
    }
}
