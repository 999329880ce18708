use async_trait::async_trait;
use chrono::Utc;
use common::config::BinanceConfig;
use common::models::{MarketOrder, OrderResult};
use hmac::{Hmac, Mac};
use reqwest::{Client, Method, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use sha2::Sha256;
use tracing::{debug, error, info};

use crate::error::ExchangeError;
use crate::traits::ExchangeClient;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    #[serde(rename = "orderId")]
    pub order_id: u64,
    pub symbol: String,
    pub status: String,
    #[serde(rename = "executedQty", default)]
    pub executed_qty: String,
    #[serde(rename = "cummulativeQuoteQty", default)]
    pub cummulative_quote_qty: String,
}

#[derive(Debug, Deserialize)]
pub struct Balance {
    pub asset: String,
    pub free: String,
    pub locked: String,
}

impl Balance {
    pub fn is_empty(&self) -> bool {
        let free = self.free.parse::<f64>().unwrap_or(0.0);
        let locked = self.locked.parse::<f64>().unwrap_or(0.0);
        free <= 0.0 && locked <= 0.0
    }
}

#[derive(Debug, Deserialize)]
pub struct AccountInformation {
    pub balances: Vec<Balance>,
    #[serde(rename = "canTrade")]
    pub can_trade: bool,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    msg: String,
}

#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
    api_key: String,
    secret_key: String,
}

impl BinanceClient {
    pub fn new(config: &BinanceConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            secret_key: config.secret_key.clone(),
        }
    }

    fn sign(&self, query: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(query.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Encodes `params` into the query, appends `timestamp`, signs the encoded
    /// query and appends `signature` last.
    fn sign_url(&self, url: &mut Url, params: &[(&str, String)], timestamp: i64) {
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
            .append_pair("timestamp", &timestamp.to_string());

        let signature = self.sign(url.query().unwrap_or_default());
        url.query_pairs_mut().append_pair("signature", &signature);
    }

    async fn send_signed<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ExchangeError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| ExchangeError::InvalidUrl(format!("{}{}: {}", self.base_url, path, e)))?;

        self.sign_url(&mut url, params, Utc::now().timestamp_millis());

        let resp = self
            .client
            .request(method.clone(), url)
            .header("X-MBX-APIKEY", &self.api_key)
            .send()
            .await?;

        Self::decode(method, path, resp).await
    }

    async fn decode<T: DeserializeOwned>(
        method: Method,
        path: &str,
        resp: Response,
    ) -> Result<T, ExchangeError> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            error!("Binance {} {} failed: {}", method, path, body);
            return Err(match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(api) => ExchangeError::Api {
                    status: status.as_u16(),
                    code: api.code,
                    msg: api.msg,
                },
                Err(_) => ExchangeError::Status {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        debug!("Binance {} {} -> {}", method, path, body);
        serde_json::from_str::<T>(&body).map_err(|e| ExchangeError::Decode(format!("{}: {}", e, body)))
    }

    pub async fn get_account(&self) -> Result<AccountInformation, ExchangeError> {
        self.send_signed(Method::GET, "/api/v3/account", &[]).await
    }

    pub async fn post_order(&self, order: &MarketOrder) -> Result<OrderResponse, ExchangeError> {
        let params = [
            ("symbol", order.symbol.to_uppercase()),
            ("side", order.side.to_string()),
            ("type", "MARKET".to_string()),
            ("quantity", order.quantity.normalize().to_string()),
        ];

        info!(
            "Placing Order: {} {} {}",
            order.side, order.quantity, order.symbol
        );

        self.send_signed(Method::POST, "/api/v3/order", &params).await
    }

    pub async fn query_order(&self, symbol: &str, order_id: u64) -> Result<OrderResult, ExchangeError> {
        let params = [
            ("symbol", symbol.to_uppercase()),
            ("orderId", order_id.to_string()),
        ];
        self.send_signed(Method::GET, "/api/v3/order", &params).await
    }
}

#[async_trait]
impl ExchangeClient for BinanceClient {
    async fn create_market_order(
        &self,
        order: &MarketOrder,
    ) -> Result<OrderResponse, ExchangeError> {
        self.post_order(order).await
    }

    async fn get_order(&self, symbol: &str, order_id: u64) -> Result<OrderResult, ExchangeError> {
        self.query_order(symbol, order_id).await
    }
}
