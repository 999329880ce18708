pub mod binance_client;

pub use binance_client::{AccountInformation, Balance, BinanceClient, OrderResponse};
