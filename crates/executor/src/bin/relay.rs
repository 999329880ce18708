use dotenvy::dotenv;
use std::sync::Arc;
use tracing::debug;

use common::config::AppConfig;
use common::logger;

use executor::report_missing;
use executor::services::TelegramService;
use executor::webhook::{self, RelayHandler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logger::setup_logger();
    debug!("Message relay starting up...");

    let config = AppConfig::from_env()?;
    report_missing(&config.missing_telegram());

    let handler = RelayHandler::new(Arc::new(TelegramService::new(&config.telegram)));

    webhook::serve(webhook::relay_router(Arc::new(handler)), &config.server).await
}
