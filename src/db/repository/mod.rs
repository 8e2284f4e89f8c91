//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.
//!
//! # ID Convention
//!
//! 全栈统一使用 "table:id" 格式，通过 [`record_id`] 解析：
//!   - API 层接受 "vendor:abc" 或裸 "abc"
//!   - CRUD 直接使用 `RecordId` (`db.select(id)` / `db.delete(id)`)

pub mod campaign;
pub mod email_template;
pub mod form;
pub mod form_response;
pub mod response;
pub mod send_log;
pub mod upload_log;
pub mod user;
pub mod vendor;
pub mod whatsapp_template;

// Re-exports
pub use campaign::CampaignRepository;
pub use email_template::EmailTemplateRepository;
pub use form::FormRepository;
pub use form_response::FormResponseRepository;
pub use response::ResponseRepository;
pub use send_log::SendLogRepository;
pub use upload_log::UploadLogRepository;
pub use user::UserRepository;
pub use vendor::VendorRepository;
pub use whatsapp_template::WhatsAppTemplateRepository;

use serde::Deserialize;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::utils::AppError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Database(msg) => AppError::Database(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Parse an incoming id into a [`RecordId`] for the given table.
///
/// Accepts both the full "table:key" form and the bare key.
pub fn record_id(table: &str, raw: &str) -> RecordId {
    match raw.split_once(':') {
        Some((tb, key)) if tb == table => RecordId::from_table_key(table, key),
        _ => RecordId::from_table_key(table, raw),
    }
}

/// Row shape for `SELECT count() AS count ... GROUP ALL`
#[derive(Debug, Deserialize)]
pub(crate) struct CountRow {
    pub count: usize,
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
