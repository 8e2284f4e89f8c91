//! Upload Log Model
//!
//! One row per anomaly detected during a vendor bulk import, carrying the
//! offending raw row for later inspection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Classified import anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadErrorType {
    InvalidEmail,
    InvalidPhone,
    LandlineNumber,
    MissingEmail,
    MissingPhone,
}

impl UploadErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "invalid_email",
            Self::InvalidPhone => "invalid_phone",
            Self::LandlineNumber => "landline_number",
            Self::MissingEmail => "missing_email",
            Self::MissingPhone => "missing_phone",
        }
    }
}

/// Upload log row matching the `upload_log` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadLog {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// Groups every anomaly of one import run
    pub import_id: String,
    pub file_name: String,
    /// 1-based spreadsheet row (header excluded)
    pub row_number: usize,
    pub error_type: UploadErrorType,
    /// Offending token plus context, human readable
    pub detail: String,
    /// The raw row as parsed, for later inspection
    pub raw_data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
