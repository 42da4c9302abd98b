use std::time::Duration;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::Recipient;
use tracing::debug;

use common::{Error, Notifier, Result};

/// Sends alerts to a single Telegram chat or channel through the Bot API.
pub struct TelegramNotifier {
    bot: Bot,
    recipient: Recipient,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>, chat_id: &str) -> Self {
        Self {
            bot: Bot::new(token),
            recipient: parse_recipient(chat_id),
        }
    }
}

/// Numeric ids address chats and groups; anything else is taken as an
/// `@channel` username.
pub fn parse_recipient(chat_id: &str) -> Recipient {
    let chat_id = chat_id.trim();
    match chat_id.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(chat_id.to_string()),
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        debug!(recipient = ?self.recipient, "Sending Telegram message");
        self.bot
            .send_message(self.recipient.clone(), message)
            .await
            .map(|_| ())
            .map_err(|e| Error::NotifierFailure(e.to_string()))
    }
}

/// Announcement sent once when the process starts.
pub fn startup_message(period: Duration) -> String {
    let secs = period.as_secs();
    let every = if secs >= 60 && secs % 60 == 0 {
        format!("{} minutes", secs / 60)
    } else {
        format!("{secs} seconds")
    };
    format!("🤖 Bot started! Scanning all USDT pairs every {every}...")
}
