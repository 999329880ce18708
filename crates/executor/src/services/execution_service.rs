use std::sync::Arc;

use common::models::{Alert, MarketOrder, OrderResult, Side};
use exchange::{BinanceClient, ExchangeClient, ExchangeError};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Invalid action")]
    InvalidAction(String),
    #[error("Invalid symbol")]
    InvalidSymbol,
    #[error("Invalid quantity")]
    InvalidQuantity(Decimal),
    #[error(transparent)]
    Placement(ExchangeError),
    #[error("order {order_id} was placed but its status lookup failed: {source}")]
    Lookup {
        order_id: u64,
        #[source]
        source: ExchangeError,
    },
}

impl From<ExecutionError> for OrderResult {
    fn from(err: ExecutionError) -> Self {
        OrderResult::error(err.to_string())
    }
}

/// Turns alerts into market orders and reports the exchange-confirmed state.
#[derive(Clone)]
pub struct ExecutionService {
    client: Arc<dyn ExchangeClient>,
}

impl ExecutionService {
    pub fn new(client: Arc<dyn ExchangeClient>) -> Self {
        Self { client }
    }

    /// Places the order and re-reads it by id. The lookup, not the placement
    /// response, is what gets returned. A placed order is never cancelled,
    /// even when the lookup fails.
    pub async fn try_execute(&self, alert: &Alert) -> Result<OrderResult, ExecutionError> {
        let side = Side::from_action(&alert.action)
            .ok_or_else(|| ExecutionError::InvalidAction(alert.action.clone()))?;

        // Exchange symbols are plain tickers like BTCUSDT.
        if alert.symbol.is_empty() || !alert.symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ExecutionError::InvalidSymbol);
        }
        if alert.quantity <= Decimal::ZERO {
            return Err(ExecutionError::InvalidQuantity(alert.quantity));
        }

        let order = MarketOrder {
            symbol: alert.symbol.clone(),
            side,
            quantity: alert.quantity,
        };

        let placed = self
            .client
            .create_market_order(&order)
            .await
            .map_err(ExecutionError::Placement)?;

        info!(
            "ORDER PLACED: ID={}, Status={}, Executed={}, QuoteQty={}",
            placed.order_id, placed.status, placed.executed_qty, placed.cummulative_quote_qty
        );

        let confirmed = self
            .client
            .get_order(&order.symbol, placed.order_id)
            .await
            .map_err(|source| ExecutionError::Lookup {
                order_id: placed.order_id,
                source,
            })?;

        info!(
            "ORDER CONFIRMED: ID={}, Status={}",
            placed.order_id, confirmed.status
        );

        Ok(confirmed)
    }

    /// Like [`try_execute`](Self::try_execute), folding every failure into an
    /// `"error"` result.
    pub async fn execute(&self, alert: &Alert) -> OrderResult {
        match self.try_execute(alert).await {
            Ok(result) => result,
            Err(e) => {
                match &e {
                    ExecutionError::InvalidAction(action) => {
                        warn!("Rejected alert: unsupported action {:?}", action)
                    }
                    ExecutionError::InvalidQuantity(quantity) => {
                        warn!("Rejected alert: quantity {} is not positive", quantity)
                    }
                    _ => error!("Error executing trade: {}", e),
                }
                e.into()
            }
        }
    }
}

/// Logs trading permission and held balances. Failures are logged only.
pub async fn log_account_overview(client: &BinanceClient) {
    match client.get_account().await {
        Ok(info) => {
            info!("Binance Account Connected. Can Trade: {}", info.can_trade);
            if !info.can_trade {
                warn!("Binance account is not allowed to trade, orders will be rejected");
            }
            for b in info.balances.iter().filter(|b| !b.is_empty()) {
                info!("Balance: {} Free={} Locked={}", b.asset, b.free, b.locked);
            }
        }
        Err(e) => error!("Failed to fetch account info: {}", e),
    }
}
