use async_trait::async_trait;
use teloxide::{prelude::*, types::ParseMode};

use crate::models;
use crate::scheduling::ReminderDeliveryChannel;

use super::render::render_reminder;

pub struct TelegramDeliveryChannel {
    bot: Bot,
}

impl TelegramDeliveryChannel {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ReminderDeliveryChannel for TelegramDeliveryChannel {
    async fn send_reminder(&self, chat_id: models::ChatId, text: &str) -> anyhow::Result<()> {
        self.bot
            .send_message(ChatId(chat_id), render_reminder(text))
            .parse_mode(ParseMode::MarkdownV2)
            .await?;

        log::info!("Delivered reminder to chat {}", chat_id);
        Ok(())
    }
}
