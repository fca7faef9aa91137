use chrono::{DateTime, Local};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::markdown::{bold, escape};

use crate::commands::{Reply, TaskButton};
use crate::models::Reminder;

const FIRE_TIME_FORMAT: &str = "%H:%M:%S on %Y-%m-%d";

/// MarkdownV2 text plus an optional inline keyboard.
pub(super) struct RenderedReply {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

pub(super) fn render(reply: &Reply) -> RenderedReply {
    let keyboard = match reply {
        Reply::SelectTaskToDelete(buttons) => Some(task_keyboard(buttons)),
        _ => None,
    };

    RenderedReply {
        text: render_text(reply),
        keyboard,
    }
}

/// Text for editing the message that carried the pressed button.
pub(super) fn render_edit(reply: &Reply) -> String {
    match reply {
        Reply::TaskDeleted(task) => format!("✅ Deleted task: {}", bold(&escape(task))),
        other => render_text(other),
    }
}

fn render_text(reply: &Reply) -> String {
    match reply {
        Reply::Welcome => format!(
            "👋 {}\n\n{}",
            bold("Welcome to Task Master\\!"),
            escape(
                "I can help you manage your tasks and reminders:\n\
                 📝 /addtask - Add a new task\n\
                 📋 /tasks - See your task list\n\
                 🗑️ /deletetask - Delete a task\n\
                 ⏰ /remindme - Set a reminder\n\
                 🔔 /reminders - See your pending reminders",
            )
        ),
        Reply::TaskAdded(task) => format!("✅ Task added: {}", bold(&escape(task))),
        Reply::AddTaskUsage => {
            escape("⚠️ Please provide a task description.\nExample: /addtask Buy groceries")
        }
        Reply::TaskList(tasks) => format!(
            "📋 {}\n\n{}",
            bold("Your Tasks:"),
            numbered(tasks.iter().map(|task| escape(task)))
        ),
        Reply::EmptyTaskList => escape("📭 Your task list is empty."),
        Reply::NothingToDelete => escape("📭 You don't have any tasks to delete."),
        Reply::DeleteTaskUsage => {
            escape("⚠️ Please provide a valid task number.\nExample: /deletetask 2")
        }
        Reply::InvalidTaskNumber => {
            escape("⚠️ Invalid task number. Use /tasks to see your task list.")
        }
        Reply::SelectTaskToDelete(_) => escape("🗑️ Select a task to delete:"),
        Reply::TaskDeleted(task) => format!("🗑️ Deleted task: {}", bold(&escape(task))),
        Reply::TaskNotFound => escape("⚠️ Error: Task not found or already deleted."),
        Reply::RemindMeUsage => escape(
            "⚠️ Please provide a time and reminder text.\n\
             Examples:\n\
             • /remindme 30m Buy groceries\n\
             • /remindme 2h Call mom\n\
             • /remindme tomorrow Submit report",
        ),
        Reply::InvalidTimeFormat => escape(
            "⚠️ Invalid time format. Please use:\n\
             • 30m (30 minutes)\n\
             • 2h (2 hours)\n\
             • tomorrow",
        ),
        Reply::ReminderSet { text, fire_at } => format!(
            "⏰ Reminder set for {}:\n{}",
            bold(&format_fire_time(fire_at)),
            bold(&escape(text))
        ),
        Reply::ReminderList(reminders) => format!(
            "⏰ {}\n\n{}",
            bold("Your Reminders:"),
            numbered(reminders.iter().map(display_reminder))
        ),
        Reply::NoReminders => escape("📭 You don't have any pending reminders."),
        Reply::ReminderNotScheduled => {
            escape("⚠️ Could not set the reminder. Please try again later.")
        }
        Reply::UnknownCommand => escape(
            "❓ Sorry, I didn't understand that command.\nTry /start to see available commands.",
        ),
    }
}

/// Text of a delivered reminder.
pub(super) fn render_reminder(text: &str) -> String {
    format!("⏰ {}: {}", bold("REMINDER"), escape(text))
}

fn display_reminder(reminder: &Reminder) -> String {
    format!(
        "{} \\(at {}\\)",
        escape(&reminder.text),
        bold(&format_fire_time(&reminder.fire_at))
    )
}

fn format_fire_time(fire_at: &DateTime<Local>) -> String {
    escape(&fire_at.format(FIRE_TIME_FORMAT).to_string())
}

/// `1\. first\n2\. second`; items must already be escaped.
fn numbered(items: impl Iterator<Item = String>) -> String {
    items
        .enumerate()
        .map(|(i, item)| format!("{}\\. {}", i + 1, item))
        .collect::<Vec<String>>()
        .join("\n")
}

fn task_keyboard(buttons: &[TaskButton]) -> InlineKeyboardMarkup {
    let rows = buttons.iter().map(|button| {
        vec![InlineKeyboardButton::callback(
            button.label.clone(),
            button.payload.encode(),
        )]
    });

    InlineKeyboardMarkup::new(rows)
}
