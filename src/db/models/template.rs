//! Email / WhatsApp Template Models
//!
//! Both templates carry `{variable}` placeholders in their text fields.
//! The declared `variables` list is advisory; rendering substitutes any
//! known placeholder and leaves unknown ones untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Email template matching the `email_template` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailTemplate {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub variables: Vec<String>,
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

/// Create email template payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailTemplateCreate {
    pub name: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub variables: Option<Vec<String>>,
}

/// Update email template payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailTemplateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<String>>,
}

/// WhatsApp template matching the `whatsapp_template` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppTemplate {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub variables: Vec<String>,
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

/// Create WhatsApp template payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppTemplateCreate {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub variables: Option<Vec<String>>,
}

/// Update WhatsApp template payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WhatsAppTemplateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<String>>,
}
