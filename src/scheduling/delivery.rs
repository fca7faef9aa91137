use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{ChatId, ReminderPayload};
use crate::storage::ReminderRegistry;

#[async_trait]
pub trait ReminderDeliveryChannel: Send + Sync + 'static {
    async fn send_reminder(&self, chat_id: ChatId, text: &str) -> anyhow::Result<()>;
}

/// Delivery callback run by the scheduler when a reminder is due.
pub struct ReminderDelivery {
    channel: Arc<dyn ReminderDeliveryChannel>,
    registry: Arc<ReminderRegistry>,
}

impl ReminderDelivery {
    pub fn new(channel: Arc<dyn ReminderDeliveryChannel>, registry: Arc<ReminderRegistry>) -> Self {
        Self { channel, registry }
    }

    pub async fn deliver(&self, payload: ReminderPayload) {
        if let Err(error) = self
            .channel
            .send_reminder(payload.chat_id, &payload.text)
            .await
        {
            log::warn!(
                "Could not deliver reminder. [error = {}, chat_id = {}]",
                error,
                payload.chat_id
            );
        }

        let removed = self
            .registry
            .remove_first_matching(payload.user_id, &payload.text)
            .await;

        if removed.is_none() {
            log::debug!(
                "No pending registry entry for delivered reminder. [user_id = {}]",
                payload.user_id
            );
        }
    }
}
