pub mod delivery;
mod job_queue;


use std::time::Duration;

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::models::{Reminder, ReminderPayload};
use crate::storage::ReminderRegistry;

pub use delivery::{ReminderDelivery, ReminderDeliveryChannel};
pub use job_queue::JobQueueScheduler;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("reminder job queue is no longer running")]
    QueueClosed,
}

/// Fire-and-forget delayed delivery: the payload is handed to the delivery
/// callback once, at or after `delay` from now. There is no cancellation.
pub trait ReminderScheduler: Send + Sync + 'static {
    fn schedule(&self, payload: ReminderPayload, delay: Duration) -> Result<(), SchedulerError>;
}

/// Records `reminder` in the registry and schedules its delivery for
/// `reminder.fire_at`. Fire times already in the past are delivered at once.
///
/// The entry is registered before scheduling so an immediate delivery always
/// finds it, and is taken back out if scheduling fails.
pub async fn register_reminder(
    registry: &ReminderRegistry,
    scheduler: &dyn ReminderScheduler,
    reminder: Reminder,
    now: DateTime<Local>,
) -> Result<(), SchedulerError> {
    let delay = (reminder.fire_at - now).to_std().unwrap_or(Duration::ZERO);
    let payload = ReminderPayload::from(&reminder);

    log::info!(
        "Registering reminder for user {} in {:?}",
        reminder.user_id,
        delay
    );

    registry.insert(reminder.clone()).await;

    if let Err(error) = scheduler.schedule(payload, delay) {
        registry.remove(&reminder).await;
        return Err(error);
    }

    Ok(())
}
