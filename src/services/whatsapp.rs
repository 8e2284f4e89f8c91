//! WhatsApp Business API adapter
//!
//! POSTs `{graph}/{phone_number_id}/messages` with a text payload.
//! Without an access token the adapter logs the would-be dispatch and
//! reports success.

use async_trait::async_trait;
use serde_json::json;

use super::{SendError, WhatsAppSender};
use crate::core::config::WhatsAppConfig;

const GRAPH_BASE: &str = "https://graph.facebook.com";

pub struct WhatsAppService {
    config: WhatsAppConfig,
    client: reqwest::Client,
}

impl WhatsAppService {
    pub fn new(config: WhatsAppConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl WhatsAppSender for WhatsAppService {
    async fn send(&self, phone: &str, body: &str) -> Result<(), SendError> {
        if phone.trim().is_empty() {
            return Err(SendError::InvalidRecipient("empty phone number".into()));
        }

        let Some(token) = &self.config.access_token else {
            tracing::info!(
                to = %phone,
                preview = %body.chars().take(80).collect::<String>(),
                "WHATSAPP (DEV MODE): logged instead of sent"
            );
            return Ok(());
        };

        let url = format!(
            "{GRAPH_BASE}/{}/{}/messages",
            self.config.api_version, self.config.phone_number_id
        );
        let payload = json!({
            "messaging_product": "whatsapp",
            "to": phone,
            "type": "text",
            "text": { "body": body },
        });

        let resp = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            tracing::error!(to = %phone, status = %status, "WhatsApp API rejected dispatch");
            return Err(SendError::Provider(format!("{status}: {text}")));
        }

        tracing::info!(to = %phone, "WhatsApp message sent");
        Ok(())
    }
}

/// Normalize a stored phone number into dispatch form.
///
/// - strips everything but digits (a leading `+` is honored then dropped)
/// - bare 10-digit mobiles get the configured country code prefixed
/// - anything cleaning to fewer than 10 or more than 15 digits is rejected
pub fn clean_phone_number(raw: &str, default_country_code: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }

    let mut clean: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    if let Some(stripped) = clean.strip_prefix('+') {
        clean = stripped.to_string();
    }
    // A '+' anywhere else is garbage
    if clean.contains('+') {
        return None;
    }

    if clean.len() == 10 && clean.starts_with(['6', '7', '8', '9']) {
        clean = format!("{default_country_code}{clean}");
    }

    if clean.len() < 10 || clean.len() > 15 {
        return None;
    }

    Some(clean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_mobile_gets_country_code() {
        assert_eq!(
            clean_phone_number("98765 43210", "91"),
            Some("919876543210".to_string())
        );
    }

    #[test]
    fn test_international_number_kept() {
        assert_eq!(
            clean_phone_number("+44 20 7183 8750", "91"),
            Some("442071838750".to_string())
        );
    }

    #[test]
    fn test_already_prefixed_number_kept() {
        assert_eq!(
            clean_phone_number("919876543210", "91"),
            Some("919876543210".to_string())
        );
    }

    #[test]
    fn test_short_number_rejected() {
        assert_eq!(clean_phone_number("123", "91"), None);
        assert_eq!(clean_phone_number("", "91"), None);
    }

    #[test]
    fn test_overlong_number_rejected() {
        assert_eq!(clean_phone_number("1234567890123456", "91"), None);
    }
}
