use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const STATUS_FILLED: &str = "FILLED";
pub const STATUS_ERROR: &str = "error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Maps an alert action onto an order side. Only an exact
    /// case-insensitive "buy" or "sell" is accepted.
    pub fn from_action(action: &str) -> Option<Self> {
        if action.eq_ignore_ascii_case("buy") {
            Some(Side::Buy)
        } else if action.eq_ignore_ascii_case("sell") {
            Some(Side::Sell)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketOrder {
    pub symbol: String,
    pub side: Side,
    pub quantity: Decimal,
}

/// Outcome of one trade attempt. On success this is the exchange's own view of
/// the order, with every field it returned kept in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResult {
    pub status: String,
    #[serde(rename = "orderId", default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl OrderResult {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            order_id: None,
            message: Some(message.into()),
            fields: Map::new(),
        }
    }

    pub fn is_filled(&self) -> bool {
        self.status == STATUS_FILLED
    }

    pub fn is_error(&self) -> bool {
        self.status == STATUS_ERROR
    }
}

impl fmt::Display for OrderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{{\"status\":\"{}\"}}", self.status),
        }
    }
}
