use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("request to exchange failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Binance API error {code} (HTTP {status}): {msg}")]
    Api { status: u16, code: i64, msg: String },

    #[error("Binance returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid exchange URL {0}")]
    InvalidUrl(String),

    #[error("unexpected exchange response: {0}")]
    Decode(String),
}
