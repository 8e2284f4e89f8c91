//! Outbound notification adapters
//!
//! Thin clients over the email delivery provider and the WhatsApp
//! Business API. Both run in dev mode (log, report success) when
//! credentials are absent, so local stacks and tests never hit the wire.
//!
//! The campaign executor depends on the [`EmailSender`] / [`WhatsAppSender`]
//! traits, not the concrete clients.

pub mod email;
pub mod whatsapp;

pub use email::EmailService;
pub use whatsapp::WhatsAppService;

use async_trait::async_trait;
use thiserror::Error;

/// Dispatch failure reported by an adapter
///
/// Never panics through: the executor records these per vendor and
/// continues the loop.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Request failed: {0}")]
    Transport(String),
}

/// Email delivery seam
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), SendError>;
}

/// WhatsApp delivery seam
#[async_trait]
pub trait WhatsAppSender: Send + Sync {
    /// `phone` must already be normalized (digits, or `+` prefixed)
    async fn send(&self, phone: &str, body: &str) -> Result<(), SendError>;
}
