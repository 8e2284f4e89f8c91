//! Email delivery adapter
//!
//! POSTs the provider's JSON send API (SendGrid-compatible shape) with a
//! bearer key. Without a key the adapter logs the would-be dispatch and
//! reports success.

use async_trait::async_trait;
use serde_json::json;

use super::{EmailSender, SendError};
use crate::core::config::EmailConfig;

pub struct EmailService {
    config: EmailConfig,
    client: reqwest::Client,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EmailSender for EmailService {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), SendError> {
        if to.trim().is_empty() {
            return Err(SendError::InvalidRecipient("empty email address".into()));
        }

        let Some(api_key) = &self.config.api_key else {
            tracing::info!(
                to = %to,
                subject = %subject,
                "EMAIL (DEV MODE): logged instead of sent"
            );
            return Ok(());
        };

        let payload = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": {
                "email": self.config.from_email,
                "name": self.config.from_name,
            },
            "subject": subject,
            "content": [{ "type": "text/html", "value": html_body }],
        });

        let resp = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(to = %to, status = %status, "Email provider rejected dispatch");
            return Err(SendError::Provider(format!("{status}: {body}")));
        }

        tracing::info!(to = %to, "Email sent");
        Ok(())
    }
}
