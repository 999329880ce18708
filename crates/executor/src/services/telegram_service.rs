use async_trait::async_trait;
use common::config::TelegramConfig;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Telegram request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Telegram API error (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers a human readable message to the operator's chat.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns the raw response body on delivery.
    async fn notify(&self, message: &str) -> Result<String, NotifyError>;
}

pub struct TelegramService {
    client: Client,
    url: String,
    chat_id: String,
}

impl TelegramService {
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            client: Client::new(),
            url: config.send_message_url(),
            chat_id: config.chat_id.clone(),
        }
    }
}

#[async_trait]
impl Notifier for TelegramService {
    async fn notify(&self, message: &str) -> Result<String, NotifyError> {
        let payload = [("chat_id", self.chat_id.as_str()), ("text", message)];

        // The request URL embeds the bot token, keep it out of error messages.
        let resp = self
            .client
            .post(&self.url)
            .form(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Http(e.without_url()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| NotifyError::Http(e.without_url()))?;

        if status != StatusCode::OK {
            error!("Telegram API error: {}", body);
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
