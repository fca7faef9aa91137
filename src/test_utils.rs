use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::models::{ChatId, ReminderPayload};
use crate::scheduling::{ReminderDeliveryChannel, ReminderScheduler, SchedulerError};

pub type ReceivedMessages = Arc<Mutex<Vec<(ChatId, String)>>>;

#[derive(Clone, Default)]
pub struct TestDeliveryChannel {
    pub received_messages: ReceivedMessages,
    pub failing: bool,
}

#[async_trait]
impl ReminderDeliveryChannel for TestDeliveryChannel {
    async fn send_reminder(&self, chat_id: ChatId, text: &str) -> anyhow::Result<()> {
        if self.failing {
            anyhow::bail!("chat is unreachable");
        }
        self.received_messages
            .lock()
            .unwrap()
            .push((chat_id, text.to_string()));
        Ok(())
    }
}

pub type ScheduledJobs = Arc<Mutex<Vec<(ReminderPayload, Duration)>>>;

/// Records what would have been scheduled without ever firing it.
#[derive(Clone, Default)]
pub struct RecordingReminderScheduler {
    pub scheduled: ScheduledJobs,
}

impl ReminderScheduler for RecordingReminderScheduler {
    fn schedule(&self, payload: ReminderPayload, delay: Duration) -> Result<(), SchedulerError> {
        self.scheduled.lock().unwrap().push((payload, delay));
        Ok(())
    }
}

/// Behaves like a job queue whose worker has already stopped.
pub struct ClosedReminderScheduler;

impl ReminderScheduler for ClosedReminderScheduler {
    fn schedule(&self, _payload: ReminderPayload, _delay: Duration) -> Result<(), SchedulerError> {
        Err(SchedulerError::QueueClosed)
    }
}
