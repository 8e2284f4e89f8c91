//! Vendor Repository

use chrono::Utc;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, CountRow, RepoError, RepoResult};
use crate::db::models::{Vendor, VendorCreate, VendorUpdate};

const TABLE: &str = "vendor";

#[derive(Debug, serde::Deserialize)]
struct CodeRow {
    vendor_code: String,
}

#[derive(Clone)]
pub struct VendorRepository {
    base: BaseRepository,
}

impl VendorRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List vendors with optional substring search (code / name / email)
    /// and MSME status filter, newest first.
    pub async fn find_all(
        &self,
        search: Option<&str>,
        msme_status: Option<&str>,
        skip: usize,
        limit: usize,
    ) -> RepoResult<Vec<Vendor>> {
        let mut sql = String::from("SELECT * FROM vendor");
        let mut clauses: Vec<&str> = Vec::new();
        if search.is_some() {
            clauses.push(
                "(string::lowercase(vendor_name) CONTAINS $search \
                 OR string::lowercase(vendor_code) CONTAINS $search \
                 OR string::lowercase(email ?? '') CONTAINS $search)",
            );
        }
        if msme_status.is_some() {
            clauses.push("msme_status = $msme_status");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC LIMIT $limit START $skip");

        let mut query = self.base.db().query(sql);
        if let Some(s) = search {
            query = query.bind(("search", s.to_lowercase()));
        }
        if let Some(s) = msme_status {
            query = query.bind(("msme_status", s.to_string()));
        }
        let vendors: Vec<Vendor> = query
            .bind(("limit", limit as i64))
            .bind(("skip", skip as i64))
            .await?
            .take(0)?;
        Ok(vendors)
    }

    /// Total vendor count
    pub async fn count_all(&self) -> RepoResult<usize> {
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() AS count FROM vendor GROUP ALL")
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    /// Find vendor by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Vendor>> {
        let vendor: Option<Vendor> = self.base.db().select(id.clone()).await?;
        Ok(vendor)
    }

    /// Find vendor by code (exact, case-sensitive)
    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<Vendor>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM vendor WHERE vendor_code = $code LIMIT 1")
            .bind(("code", code.to_string()))
            .await?;
        let vendors: Vec<Vendor> = result.take(0)?;
        Ok(vendors.into_iter().next())
    }

    /// Resolve a list of vendor ids; ids that no longer exist are skipped
    pub async fn find_by_ids(&self, ids: &[RecordId]) -> RepoResult<Vec<Vendor>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let vendors: Vec<Vendor> = self
            .base
            .db()
            .query("SELECT * FROM vendor WHERE id IN $ids")
            .bind(("ids", ids.to_vec()))
            .await?
            .take(0)?;
        Ok(vendors)
    }

    /// Return which of the given codes already exist in the store
    pub async fn existing_codes(&self, codes: &[String]) -> RepoResult<Vec<String>> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<CodeRow> = self
            .base
            .db()
            .query("SELECT vendor_code FROM vendor WHERE vendor_code IN $codes")
            .bind(("codes", codes.to_vec()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().map(|r| r.vendor_code).collect())
    }

    /// Create a new vendor
    pub async fn create(&self, data: VendorCreate) -> RepoResult<Vendor> {
        // Vendor code is unique across the store
        if self.find_by_code(&data.vendor_code).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Vendor code '{}' already exists",
                data.vendor_code
            )));
        }

        let vendor = Vendor::from(data);
        let created: Option<Vendor> = self.base.db().create(TABLE).content(vendor).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create vendor".to_string()))
    }

    /// Insert a validated batch in one go (bulk import path).
    ///
    /// Duplicate checking happens in the import validator before this is
    /// called; the unique index is the backstop.
    pub async fn create_batch(&self, batch: Vec<VendorCreate>) -> RepoResult<usize> {
        if batch.is_empty() {
            return Ok(0);
        }
        let rows: Vec<Vendor> = batch.into_iter().map(Vendor::from).collect();
        let created: Vec<Vendor> = self.base.db().insert(TABLE).content(rows).await?;
        Ok(created.len())
    }

    /// Partial update; unset fields keep their stored value
    pub async fn update(&self, id: &RecordId, data: VendorUpdate) -> RepoResult<Vendor> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Vendor {} not found", id)))?;

        // Check duplicate code if changing
        if let Some(ref new_code) = data.vendor_code
            && new_code != &existing.vendor_code
            && self.find_by_code(new_code).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Vendor code '{}' already exists",
                new_code
            )));
        }

        let _: Option<Vendor> = self.base.db().update(id.clone()).merge(data).await?;
        self.base
            .db()
            .query("UPDATE $id SET updated_at = $now")
            .bind(("id", id.clone()))
            .bind(("now", Utc::now()))
            .await?
            .check()?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Vendor {} not found", id)))
    }

    /// Hard delete a vendor
    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        let deleted: Option<Vendor> = self.base.db().delete(id.clone()).await?;
        Ok(deleted.is_some())
    }

    /// Admin bulk delete; returns the number of vendors removed
    pub async fn delete_many(&self, ids: &[RecordId]) -> RepoResult<usize> {
        let mut removed = 0;
        for id in ids {
            if self.delete(id).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
