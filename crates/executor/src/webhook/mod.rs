//! Inbound webhook surface: the trading alert relay and the plain message relay.

pub mod handlers;
pub mod server;
pub mod types;

pub use handlers::{AlertHandler, RelayHandler};
pub use server::{relay_router, serve, trading_router};
