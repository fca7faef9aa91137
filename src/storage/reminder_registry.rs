use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::models::{Reminder, UserId};

/// Per-user list of pending reminders. Only used for display and cleanup,
/// delivery is driven by the scheduler's own copy of the payload.
pub struct ReminderRegistry {
    store: RwLock<HashMap<UserId, Vec<Reminder>>>,
}

impl ReminderRegistry {
    pub fn new() -> Self {
        ReminderRegistry {
            store: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, reminder: Reminder) {
        let mut store = self.store.write().await;
        store.entry(reminder.user_id).or_default().push(reminder);
    }

    pub async fn list(&self, user_id: UserId) -> Vec<Reminder> {
        let store = self.store.read().await;
        store.get(&user_id).cloned().unwrap_or_default()
    }

    /// Removes the first pending reminder of `user_id` whose text equals
    /// `text`. Two reminders with identical text are indistinguishable here.
    pub async fn remove_first_matching(&self, user_id: UserId, text: &str) -> Option<Reminder> {
        let mut store = self.store.write().await;
        let reminders = store.get_mut(&user_id)?;
        let position = reminders.iter().position(|reminder| reminder.text == text)?;

        Some(reminders.remove(position))
    }

    /// Removes the most recently inserted entry equal to `reminder`.
    pub async fn remove(&self, reminder: &Reminder) -> bool {
        let mut store = self.store.write().await;
        let Some(reminders) = store.get_mut(&reminder.user_id) else {
            return false;
        };

        match reminders.iter().rposition(|pending| pending == reminder) {
            Some(position) => {
                reminders.remove(position);
                true
            }
            None => false,
        }
    }
}

impl Default for ReminderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
