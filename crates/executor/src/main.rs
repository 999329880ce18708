use dotenvy::dotenv;
use std::sync::Arc;
use tracing::debug;

use common::config::AppConfig;
use common::logger;
use exchange::BinanceClient;

use executor::report_missing;
use executor::services::execution_service::{ExecutionService, log_account_overview};
use executor::services::{Notifier, TelegramService};
use executor::webhook::{self, AlertHandler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logger::setup_logger();
    debug!("System starting up...");

    let config = AppConfig::from_env()?;
    report_missing(&config.missing_telegram());

    let missing_binance = config.missing_binance();
    report_missing(&missing_binance);

    let binance = Arc::new(BinanceClient::new(&config.binance));
    if missing_binance.is_empty() {
        log_account_overview(&binance).await;
    }

    let notifier: Arc<dyn Notifier> = Arc::new(TelegramService::new(&config.telegram));
    let handler = AlertHandler::new(ExecutionService::new(binance), notifier);

    webhook::serve(webhook::trading_router(Arc::new(handler)), &config.server).await
}
