use async_trait::async_trait;
use common::models::{MarketOrder, OrderResult};

use crate::error::ExchangeError;
use crate::remote::OrderResponse;

/// Order entry and lookup against a spot exchange.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    async fn create_market_order(
        &self,
        order: &MarketOrder,
    ) -> Result<OrderResponse, ExchangeError>;

    /// Fetches the current state of a previously placed order.
    async fn get_order(&self, symbol: &str, order_id: u64) -> Result<OrderResult, ExchangeError>;
}
