use std::{cmp::Ordering, cmp::Reverse, collections::BinaryHeap, sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    task,
    time::{self, Instant},
};
use tokio_util::sync::CancellationToken;

use crate::models::ReminderPayload;

use super::{ReminderDelivery, ReminderScheduler, SchedulerError};

struct ScheduledJob {
    deadline: Instant,
    sequence: u64,
    payload: ReminderPayload,
}

impl PartialEq for ScheduledJob {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledJob {}

impl PartialOrd for ScheduledJob {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledJob {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.deadline, self.sequence).cmp(&(other.deadline, other.sequence))
    }
}

/// Timed job queue. `schedule` only enqueues; a single worker task sleeps
/// until the earliest deadline and runs each due delivery on its own task.
pub struct JobQueueScheduler {
    tx: mpsc::UnboundedSender<(Instant, ReminderPayload)>,
    shutdown: CancellationToken,
}

impl JobQueueScheduler {
    pub fn new(delivery: Arc<ReminderDelivery>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();

        task::spawn(run_queue(rx, delivery, shutdown.child_token()));

        Self { tx, shutdown }
    }
}

impl Drop for JobQueueScheduler {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl ReminderScheduler for JobQueueScheduler {
    fn schedule(&self, payload: ReminderPayload, delay: Duration) -> Result<(), SchedulerError> {
        self.tx
            .send((Instant::now() + delay, payload))
            .map_err(|_| SchedulerError::QueueClosed)
    }
}

async fn run_queue(
    mut rx: mpsc::UnboundedReceiver<(Instant, ReminderPayload)>,
    delivery: Arc<ReminderDelivery>,
    shutdown: CancellationToken,
) {
    let mut pending = BinaryHeap::new();
    let mut sequence = 0u64;

    loop {
        let next_deadline = pending
            .peek()
            .map(|Reverse(job): &Reverse<ScheduledJob>| job.deadline);

        tokio::select! {
            _ = shutdown.cancelled() => {
                log::info!("Reminder queue shutting down with {} pending jobs", pending.len());
                break;
            }
            received = rx.recv() => match received {
                Some((deadline, payload)) => {
                    pending.push(Reverse(ScheduledJob { deadline, sequence, payload }));
                    sequence += 1;
                }
                None => break,
            },
            _ = sleep_until(next_deadline) => {
                fire_due_jobs(&mut pending, &delivery);
            }
        }
    }
}

fn fire_due_jobs(pending: &mut BinaryHeap<Reverse<ScheduledJob>>, delivery: &Arc<ReminderDelivery>) {
    let now = Instant::now();
    while pending
        .peek()
        .is_some_and(|Reverse(job)| job.deadline <= now)
    {
        let Some(Reverse(job)) = pending.pop() else {
            break;
        };

        let delivery = Arc::clone(delivery);
        task::spawn(async move {
            delivery.deliver(job.payload).await;
        });
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
