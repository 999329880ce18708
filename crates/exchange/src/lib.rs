pub mod error;
pub mod remote;
pub mod traits;

pub use error::ExchangeError;
pub use remote::BinanceClient;
pub use traits::ExchangeClient;
