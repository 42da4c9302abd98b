pub mod notifier;

pub use notifier::{startup_message, TelegramNotifier};
