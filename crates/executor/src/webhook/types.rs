use serde::{Deserialize, Serialize};

/// Envelope returned to the webhook caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: String,
    pub message: String,
}

impl WebhookResponse {
    pub fn success(message: &str) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
        }
    }

    /// Sent for every alert, whatever happened to the trade.
    pub fn processed() -> Self {
        Self::success("Processed alert")
    }

    pub fn relayed() -> Self {
        Self::success("Message sent to Telegram")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
