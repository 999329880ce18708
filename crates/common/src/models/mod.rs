pub mod alert;
pub mod order;

pub use alert::{Alert, RelayMessage};
pub use order::{MarketOrder, OrderResult, Side};
