use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_RELAY_MESSAGE: &str = "No message provided";

/// Trading instruction posted to the webhook, e.g. by a TradingView alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub symbol: String,
    /// "buy" or "sell", any case.
    pub action: String,
    pub quantity: Decimal,
}

/// Body accepted by the plain message relay.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayMessage {
    #[serde(default)]
    pub message: Option<String>,
}

impl RelayMessage {
    pub fn text(&self) -> &str {
        self.message.as_deref().unwrap_or(DEFAULT_RELAY_MESSAGE)
    }
}
