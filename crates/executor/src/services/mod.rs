pub mod execution_service;
pub mod telegram_service;

pub use execution_service::{ExecutionError, ExecutionService};
pub use telegram_service::{Notifier, NotifyError, TelegramService};
