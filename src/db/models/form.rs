//! Custom Form Models
//!
//! A form owns an ordered sequence of fields, embedded in the form record.
//! Field order is the array order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Closed set of builder field types.
///
/// Renderers match exhaustively on this enum — adding a variant without
/// updating every renderer is a compile error, not a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Phone,
    Number,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Date,
    File,
}

/// Conditional visibility: show the field only when another field's
/// current answer equals `equals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityRule {
    /// Name of the controlling field
    pub field: String,
    /// Required answer value (string comparison)
    pub equals: String,
}

/// One field definition inside a form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    /// Answer key, unique within the form
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Choices for select/radio/checkbox fields
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub visible_when: Option<VisibilityRule>,
}

/// Form matching the `custom_form` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomForm {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub title: String,
    /// URL slug, unique across forms (public form endpoint key)
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
    #[serde(default)]
    pub fields: Vec<FormField>,
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_by: Option<RecordId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

/// Create form payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFormCreate {
    pub name: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FormField>,
}

/// Update form payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomFormUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FormField>>,
}

/// Submitted answer payload matching the `form_response` table
///
/// Answers are stored as one JSON object keyed by field name — the form
/// engine validates required visible fields, nothing more.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormResponse {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub form_id: RecordId,
    pub answers: serde_json::Value,
    pub submitted_at: DateTime<Utc>,
}
