use chrono::{DateTime, Local};

pub type UserId = u64;
pub type ChatId = i64;

pub type Task = String;

/// Bookkeeping entry kept in the registry while a reminder is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub text: String,
    pub fire_at: DateTime<Local>,
}

/// Immutable copy of the data a scheduled delivery needs. Independent of the
/// registry entry it was created alongside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderPayload {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub text: String,
}

impl From<&Reminder> for ReminderPayload {
    fn from(reminder: &Reminder) -> Self {
        Self {
            chat_id: reminder.chat_id,
            user_id: reminder.user_id,
            text: reminder.text.clone(),
        }
    }
}
