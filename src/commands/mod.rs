//! Platform independent command handling. Each handler validates the input,
//! reads or mutates the issuing user's state and returns the [`Reply`] to send.

mod callback;


use std::num::{IntErrorKind, ParseIntError};

use chrono::{DateTime, Local};

use crate::error::UserInputError;
use crate::models::{ChatId, Reminder, Task, UserId};
use crate::reminder_parser::parse_remind_me;
use crate::scheduling::{ReminderScheduler, register_reminder};
use crate::storage::{ReminderRegistry, TaskStorage};

pub use callback::CallbackPayload;

const BUTTON_PREVIEW_LENGTH: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskButton {
    pub label: String,
    pub payload: CallbackPayload,
}

impl TaskButton {
    fn new(position: usize, task: &str) -> Self {
        let preview = if task.chars().count() > BUTTON_PREVIEW_LENGTH {
            let truncated: String = task.chars().take(BUTTON_PREVIEW_LENGTH).collect();
            format!("{truncated}…")
        } else {
            task.to_string()
        };

        Self {
            label: format!("{}. {}", position + 1, preview),
            payload: CallbackPayload::DeleteTask { position },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Welcome,
    TaskAdded(Task),
    AddTaskUsage,
    TaskList(Vec<Task>),
    EmptyTaskList,
    NothingToDelete,
    DeleteTaskUsage,
    InvalidTaskNumber,
    SelectTaskToDelete(Vec<TaskButton>),
    TaskDeleted(Task),
    TaskNotFound,
    RemindMeUsage,
    InvalidTimeFormat,
    ReminderSet {
        text: String,
        fire_at: DateTime<Local>,
    },
    ReminderNotScheduled,
    ReminderList(Vec<Reminder>),
    NoReminders,
    UnknownCommand,
}

pub fn start() -> Reply {
    Reply::Welcome
}

pub async fn add_task(tasks: &dyn TaskStorage, user_id: UserId, args: &str) -> Reply {
    let text = join_words(args);
    match tasks.add(user_id, &text).await {
        Ok(task) => {
            log::info!("User {} added a task", user_id);
            Reply::TaskAdded(task)
        }
        Err(_) => Reply::AddTaskUsage,
    }
}

pub async fn show_tasks(tasks: &dyn TaskStorage, user_id: UserId) -> Reply {
    let tasks = tasks.list(user_id).await;
    if tasks.is_empty() {
        Reply::EmptyTaskList
    } else {
        Reply::TaskList(tasks)
    }
}

/// `/deletetask [index]`. Without an index the user gets one button per task.
pub async fn delete_task(tasks: &dyn TaskStorage, user_id: UserId, args: &str) -> Reply {
    let current = tasks.list(user_id).await;
    if current.is_empty() {
        return Reply::NothingToDelete;
    }

    let Some(argument) = args.split_whitespace().next() else {
        let buttons = current
            .iter()
            .enumerate()
            .map(|(position, task)| TaskButton::new(position, task))
            .collect();
        return Reply::SelectTaskToDelete(buttons);
    };

    let index = match argument.parse::<i64>() {
        Ok(index) => index,
        Err(error) if is_overflow(&error) => return Reply::InvalidTaskNumber,
        Err(_) => return Reply::DeleteTaskUsage,
    };

    let result = match usize::try_from(index) {
        Ok(index) => tasks.delete_by_index(user_id, index).await,
        Err(_) => Err(UserInputError::InvalidIndex),
    };

    match result {
        Ok(task) => {
            log::info!("User {} deleted task #{}", user_id, index);
            Reply::TaskDeleted(task)
        }
        Err(_) => Reply::InvalidTaskNumber,
    }
}

/// Button press from the `/deletetask` picker. The encoded position is checked
/// against the current list, so a press after other deletions removes whatever
/// task occupies that position now.
pub async fn delete_selected_task(tasks: &dyn TaskStorage, user_id: UserId, data: &str) -> Reply {
    let result = match CallbackPayload::decode(data) {
        Ok(CallbackPayload::DeleteTask { position }) => tasks
            .delete_by_position(user_id, position)
            .await
            .map_err(|_| UserInputError::SelectorStale),
        Err(error) => Err(error),
    };

    match result {
        Ok(task) => Reply::TaskDeleted(task),
        Err(error) => {
            log::debug!("Rejected task selector from user {}: {}", user_id, error);
            Reply::TaskNotFound
        }
    }
}

pub async fn remind_me(
    registry: &ReminderRegistry,
    scheduler: &dyn ReminderScheduler,
    user_id: UserId,
    chat_id: ChatId,
    args: &str,
    now: DateTime<Local>,
) -> Reply {
    let parsed = parse_remind_me(args)
        .and_then(|request| Ok((request.fire_time(&now)?, request.text)));

    let (fire_at, text) = match parsed {
        Ok(parsed) => parsed,
        Err(UserInputError::MissingArguments) => return Reply::RemindMeUsage,
        Err(_) => return Reply::InvalidTimeFormat,
    };

    let reminder = Reminder {
        chat_id,
        user_id,
        text: text.clone(),
        fire_at,
    };
    match register_reminder(registry, scheduler, reminder, now).await {
        Ok(()) => Reply::ReminderSet { text, fire_at },
        Err(error) => {
            log::error!("Could not schedule reminder for user {}: {}", user_id, error);
            Reply::ReminderNotScheduled
        }
    }
}

pub async fn show_reminders(registry: &ReminderRegistry, user_id: UserId) -> Reply {
    let reminders = registry.list(user_id).await;
    if reminders.is_empty() {
        Reply::NoReminders
    } else {
        Reply::ReminderList(reminders)
    }
}

pub fn unknown_command() -> Reply {
    Reply::UnknownCommand
}

fn is_overflow(error: &ParseIntError) -> bool {
    matches!(
        error.kind(),
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow
    )
}

fn join_words(args: &str) -> String {
    args.split_whitespace().collect::<Vec<_>>().join(" ")
}
