pub mod runner;
pub mod telegram;

pub use runner::BotRunner;
pub use telegram::{TELEGRAM_API_BASE, TelegramClient, TelegramError, Update};
