//! Send Log Model
//!
//! Append-only record of one dispatch attempt that succeeded, per vendor
//! per campaign per channel. Used for counting, never for retry state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Outbound notification channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Email,
    Whatsapp,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Whatsapp => "whatsapp",
        }
    }
}

/// Send log row matching the `send_log` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendLog {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub campaign_id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub vendor_id: RecordId,
    pub channel: Channel,
    /// Email address or normalized phone number the message went to
    pub recipient: String,
    pub sent_at: DateTime<Utc>,
}
