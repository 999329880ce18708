use std::fmt;

use thiserror::Error;

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_BINANCE_BASE_URL: &str = "https://api.binance.com";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),
}

#[derive(Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_url: String,
}

impl TelegramConfig {
    /// Full `sendMessage` endpoint for the configured bot.
    pub fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_url.trim_end_matches('/'),
            self.bot_token
        )
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Clone)]
pub struct BinanceConfig {
    pub api_key: String,
    pub secret_key: String,
    pub base_url: String,
}

impl fmt::Debug for BinanceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinanceConfig")
            .field("api_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Listen target; `host` may be a hostname or an IP literal.
    pub fn bind_target(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

/// Everything the relays read from the environment, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub binance: BinanceConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            telegram: TelegramConfig {
                bot_token: get("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
                chat_id: get("TELEGRAM_CHAT_ID").unwrap_or_default(),
                api_url: get("TELEGRAM_API_URL")
                    .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            },
            binance: BinanceConfig {
                api_key: get("BINANCE_API_KEY").unwrap_or_default(),
                secret_key: get("BINANCE_API_SECRET")
                    .or_else(|| get("BINANCE_SECRET_KEY"))
                    .unwrap_or_default(),
                base_url: get("BINANCE_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BINANCE_BASE_URL.to_string()),
            },
            server: ServerConfig {
                host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            },
        })
    }

    pub fn missing_telegram(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.telegram.bot_token.is_empty() {
            missing.push("TELEGRAM_BOT_TOKEN");
        }
        if self.telegram.chat_id.is_empty() {
            missing.push("TELEGRAM_CHAT_ID");
        }
        missing
    }

    pub fn missing_binance(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.binance.api_key.is_empty() {
            missing.push("BINANCE_API_KEY");
        }
        if self.binance.secret_key.is_empty() {
            missing.push("BINANCE_API_SECRET");
        }
        missing
    }
}
