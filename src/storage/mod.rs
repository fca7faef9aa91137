mod reminder_registry;
mod task_storage;

pub use reminder_registry::ReminderRegistry;
pub use task_storage::{InMemoryTaskStorage, TaskStorage};
