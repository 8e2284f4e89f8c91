//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine) connection and schema bootstrap

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

/// Database service — opens the embedded store and declares indexes
pub struct DbService;

impl DbService {
    /// Open (or create) the embedded database at the given path
    pub async fn connect(db_path: &Path) -> Result<Surreal<Db>, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns("campaign")
            .use_db("central")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        tracing::info!("Database connection established (SurrealDB embedded, RocksDB)");
        Ok(db)
    }
}

/// Declare unique indexes. Repositories also check-before-insert;
/// the indexes are the backstop against races.
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    let statements = [
        "DEFINE INDEX IF NOT EXISTS idx_vendor_code ON TABLE vendor COLUMNS vendor_code UNIQUE",
        "DEFINE INDEX IF NOT EXISTS idx_form_slug ON TABLE custom_form COLUMNS slug UNIQUE",
        "DEFINE INDEX IF NOT EXISTS idx_user_email ON TABLE user COLUMNS email UNIQUE",
    ];
    for statement in statements {
        db.query(statement)
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
            .check()
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
    }
    Ok(())
}
