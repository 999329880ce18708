use std::sync::Arc;

use axum::{Json, extract::State};
use common::models::{Alert, OrderResult, RelayMessage};
use tracing::{debug, info, warn};

use crate::services::{ExecutionService, Notifier};
use crate::webhook::types::{HealthResponse, WebhookResponse};

/// Runs one alert through notify, execute, notify.
pub struct AlertHandler {
    executor: ExecutionService,
    notifier: Arc<dyn Notifier>,
}

impl AlertHandler {
    pub fn new(executor: ExecutionService, notifier: Arc<dyn Notifier>) -> Self {
        Self { executor, notifier }
    }

    /// Always answers with the success envelope. The trade outcome only
    /// reaches the operator through the second notification.
    pub async fn handle(&self, alert: &Alert) -> WebhookResponse {
        info!("Received alert: {:?}", alert);
        let received = serde_json::to_string(alert).unwrap_or_else(|_| format!("{:?}", alert));
        send(self.notifier.as_ref(), &format!("Received alert: {}", received)).await;

        let result = self.executor.execute(alert).await;

        send(self.notifier.as_ref(), &confirmation_message(&result)).await;
        WebhookResponse::processed()
    }
}

pub fn confirmation_message(result: &OrderResult) -> String {
    if result.is_filled() {
        format!("Trade executed: {}", result)
    } else {
        format!("Trade failed: {}", result)
    }
}

/// Forwards free-form text to the chat.
pub struct RelayHandler {
    notifier: Arc<dyn Notifier>,
}

impl RelayHandler {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    pub async fn relay(&self, payload: &RelayMessage) -> WebhookResponse {
        send(self.notifier.as_ref(), payload.text()).await;
        WebhookResponse::relayed()
    }
}

async fn send(notifier: &dyn Notifier, message: &str) {
    match notifier.notify(message).await {
        Ok(body) => debug!("Notification delivered: {}", body),
        Err(e) => warn!("Notification not delivered: {}", e),
    }
}

/// POST /webhook (trading relay)
pub async fn alert_webhook(
    State(handler): State<Arc<AlertHandler>>,
    Json(alert): Json<Alert>,
) -> Json<WebhookResponse> {
    Json(handler.handle(&alert).await)
}

/// POST /webhook (message relay)
pub async fn relay_webhook(
    State(handler): State<Arc<RelayHandler>>,
    Json(payload): Json<RelayMessage>,
) -> Json<WebhookResponse> {
    Json(handler.relay(&payload).await)
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::NotifyError;
    use crate::services::mocks::MockExchange;
    use crate::services::telegram_service::MockNotifier;
    use exchange::ExchangeError;
    use exchange::remote::OrderResponse;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    fn recording_notifier(sent: Arc<Mutex<Vec<String>>>) -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().returning(move |msg| {
            sent.lock().unwrap().push(msg.to_string());
            Ok(r#"{"ok":true}"#.to_string())
        });
        notifier
    }

    fn btc_buy() -> Alert {
        Alert {
            symbol: "BTCUSDT".to_string(),
            action: "buy".to_string(),
            quantity: dec!(0.01),
        }
    }

    fn filled_exchange() -> MockExchange {
        let mut exchange = MockExchange::new();
        exchange.expect_create_market_order().times(1).returning(|_| {
            Ok(OrderResponse {
                order_id: 1,
                symbol: "BTCUSDT".to_string(),
                status: "NEW".to_string(),
                executed_qty: String::new(),
                cummulative_quote_qty: String::new(),
            })
        });
        exchange.expect_get_order().times(1).returning(|_, id| {
            Ok(serde_json::from_value(serde_json::json!({ "orderId": id, "status": "FILLED" }))
                .unwrap())
        });
        exchange
    }

    #[tokio::test]
    async fn test_filled_trade_notifies_twice() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let handler = AlertHandler::new(
            ExecutionService::new(Arc::new(filled_exchange())),
            Arc::new(recording_notifier(sent.clone())),
        );

        let resp = handler.handle(&btc_buy()).await;

        assert_eq!(resp, WebhookResponse::processed());
        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].starts_with("Received alert: "));
        assert!(sent[0].contains("BTCUSDT"));
        assert!(sent[1].starts_with("Trade executed: "));
        assert!(sent[1].contains("\"orderId\":1"));
    }

    #[tokio::test]
    async fn test_invalid_action_still_succeeds_over_http() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let mut exchange = MockExchange::new();
        exchange.expect_create_market_order().never();
        let handler = AlertHandler::new(
            ExecutionService::new(Arc::new(exchange)),
            Arc::new(recording_notifier(sent.clone())),
        );

        let mut alert = btc_buy();
        alert.action = "hodl".to_string();
        let resp = handler.handle(&alert).await;

        assert_eq!(resp.status, "success");
        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[1],
            r#"Trade failed: {"status":"error","message":"Invalid action"}"#
        );
    }

    #[tokio::test]
    async fn test_exchange_error_reported_as_failed_trade() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let mut exchange = MockExchange::new();
        exchange.expect_create_market_order().returning(|_| {
            Err(ExchangeError::Api {
                status: 400,
                code: -2010,
                msg: "Account has insufficient balance for requested action.".to_string(),
            })
        });
        exchange.expect_get_order().never();
        let handler = AlertHandler::new(
            ExecutionService::new(Arc::new(exchange)),
            Arc::new(recording_notifier(sent.clone())),
        );

        let resp = handler.handle(&btc_buy()).await;

        assert_eq!(resp, WebhookResponse::processed());
        let sent = sent.lock().unwrap();
        assert!(sent[1].starts_with("Trade failed: "));
        assert!(sent[1].contains("insufficient balance"));
    }

    #[tokio::test]
    async fn test_notifier_failures_do_not_block_trade() {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(2).returning(|_| {
            Err(NotifyError::Rejected {
                status: 401,
                body: "Unauthorized".to_string(),
            })
        });
        let handler = AlertHandler::new(
            ExecutionService::new(Arc::new(filled_exchange())),
            Arc::new(notifier),
        );

        let resp = handler.handle(&btc_buy()).await;

        assert_eq!(resp, WebhookResponse::processed());
    }

    #[test]
    fn test_confirmation_message_branches_on_filled() {
        let filled: OrderResult =
            serde_json::from_value(serde_json::json!({ "status": "FILLED" })).unwrap();
        let expired: OrderResult =
            serde_json::from_value(serde_json::json!({ "status": "EXPIRED" })).unwrap();

        assert_eq!(
            confirmation_message(&filled),
            r#"Trade executed: {"status":"FILLED"}"#
        );
        assert!(confirmation_message(&expired).starts_with("Trade failed: "));
    }

    #[tokio::test]
    async fn test_relay_forwards_text() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let handler = RelayHandler::new(Arc::new(recording_notifier(sent.clone())));

        let resp = handler
            .relay(&RelayMessage {
                message: Some("BTC crossed 100k".to_string()),
            })
            .await;
        handler.relay(&RelayMessage::default()).await;

        assert_eq!(resp, WebhookResponse::relayed());
        assert_eq!(
            *sent.lock().unwrap(),
            vec!["BTC crossed 100k".to_string(), "No message provided".to_string()]
        );
    }
}
