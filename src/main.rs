mod appsettings;
mod commands;
mod error;
mod models;
mod reminder_parser;
mod scheduling;
mod storage;
mod telegram;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use anyhow::Context;
use appsettings::AppSettings;
use scheduling::{JobQueueScheduler, ReminderDelivery, ReminderScheduler};
use storage::{InMemoryTaskStorage, ReminderRegistry, TaskStorage};
use telegram::{TelegramDeliveryChannel, TelegramInteractionInterface};
use teloxide::Bot;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let settings = AppSettings::load().context("Bot token is not configured")?;
    let bot = Bot::new(settings.telegram.token);

    log::info!("🤖 Task Master bot is starting");

    let task_storage: Arc<dyn TaskStorage> = Arc::new(InMemoryTaskStorage::new());
    let reminder_registry = Arc::new(ReminderRegistry::new());

    let delivery_channel = Arc::new(TelegramDeliveryChannel::new(bot.clone()));
    let delivery = Arc::new(ReminderDelivery::new(
        delivery_channel,
        Arc::clone(&reminder_registry),
    ));
    let scheduler: Arc<dyn ReminderScheduler> = Arc::new(JobQueueScheduler::new(delivery));

    TelegramInteractionInterface::start(bot, task_storage, reminder_registry, scheduler).await;

    log::info!("Task Master bot stopped");
    Ok(())
}

fn init_logging() {
    if std::env::var_os("RUST_LOG").is_none() {
        pretty_env_logger::formatted_builder()
            .filter_module("taskmaster", log::LevelFilter::Info)
            .init();
    } else {
        pretty_env_logger::init();
    }
}
