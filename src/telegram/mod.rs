mod delivery;
mod render;
mod util;


pub use delivery::TelegramDeliveryChannel;

use std::sync::Arc;

use chrono::Local;
use teloxide::dptree::case;
use teloxide::types::{Me, ParseMode};
use teloxide::utils::command::BotCommands;
use teloxide::{dispatching::UpdateHandler, prelude::*};

use crate::commands::{self, Reply};
use crate::scheduling::ReminderScheduler;
use crate::storage::{ReminderRegistry, TaskStorage};

use render::{render, render_edit};
use util::try_get_message_from_query;

type HandlerResult = anyhow::Result<()>;
type HandlerTaskStorageType = Arc<dyn TaskStorage>;
type HandlerSchedulerType = Arc<dyn ReminderScheduler>;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub(crate) enum Command {
    #[command(description = "Get started with Task Master")]
    Start,
    #[command(description = "Add a new task to your list")]
    AddTask(String),
    #[command(description = "View all your current tasks")]
    Tasks,
    #[command(description = "Delete a task from your list")]
    DeleteTask(String),
    #[command(description = "Set a reminder for a task")]
    RemindMe(String),
    #[command(description = "View your pending reminders")]
    Reminders,
}

pub struct TelegramInteractionInterface;

impl TelegramInteractionInterface {
    pub async fn start(
        bot: Bot,
        task_storage: HandlerTaskStorageType,
        reminder_registry: Arc<ReminderRegistry>,
        scheduler: HandlerSchedulerType,
    ) {
        log::info!("Starting Telegram interaction interface");

        if let Err(error) = bot.set_my_commands(Command::bot_commands()).await {
            log::warn!("Could not register the command menu: {}", error);
        }

        Dispatcher::builder(bot, schema())
            .dependencies(dptree::deps![task_storage, reminder_registry, scheduler])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await
    }
}

/// Parses a supported command, accepting the command name in any case.
fn parse_command(msg: Message, me: Me) -> Option<Command> {
    let text = msg.text()?;
    Command::parse(&lowercase_command_name(text), me.username()).ok()
}

/// `/AddTask@MyBot Buy Milk` becomes `/addtask@MyBot Buy Milk`.
fn lowercase_command_name(text: &str) -> String {
    let name_end = text
        .find(|c: char| c.is_whitespace() || c == '@')
        .unwrap_or(text.len());

    format!("{}{}", text[..name_end].to_lowercase(), &text[name_end..])
}

fn schema() -> UpdateHandler<anyhow::Error> {
    let command_handler = dptree::filter_map(parse_command)
        .branch(case![Command::Start].endpoint(start))
        .branch(case![Command::AddTask(args)].endpoint(add_task))
        .branch(case![Command::Tasks].endpoint(show_tasks))
        .branch(case![Command::DeleteTask(args)].endpoint(delete_task))
        .branch(case![Command::RemindMe(args)].endpoint(remind_me))
        .branch(case![Command::Reminders].endpoint(show_reminders));

    // Registered last so it only sees commands nothing above matched.
    let unknown_command_handler = dptree::filter(|msg: Message| {
        msg.text().is_some_and(|text| text.starts_with('/'))
    })
    .endpoint(unknown_command);

    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(command_handler)
                .branch(unknown_command_handler),
        )
        .branch(Update::filter_callback_query().endpoint(delete_selected_task))
}

async fn send_reply(bot: &Bot, msg: &Message, reply: Reply) -> HandlerResult {
    let rendered = render(&reply);
    let request = bot
        .send_message(msg.chat.id, rendered.text)
        .parse_mode(ParseMode::MarkdownV2);

    match rendered.keyboard {
        Some(keyboard) => request.reply_markup(keyboard).await?,
        None => request.await?,
    };

    Ok(())
}

fn sender_id(msg: &Message) -> Option<u64> {
    msg.from.as_ref().map(|user| user.id.0)
}

async fn start(bot: Bot, msg: Message) -> HandlerResult {
    send_reply(&bot, &msg, commands::start()).await
}

async fn add_task(
    bot: Bot,
    msg: Message,
    args: String,
    storage: HandlerTaskStorageType,
) -> HandlerResult {
    let Some(user_id) = sender_id(&msg) else {
        return Ok(());
    };

    let reply = commands::add_task(storage.as_ref(), user_id, &args).await;
    send_reply(&bot, &msg, reply).await
}

async fn show_tasks(bot: Bot, msg: Message, storage: HandlerTaskStorageType) -> HandlerResult {
    let Some(user_id) = sender_id(&msg) else {
        return Ok(());
    };

    let reply = commands::show_tasks(storage.as_ref(), user_id).await;
    send_reply(&bot, &msg, reply).await
}

async fn delete_task(
    bot: Bot,
    msg: Message,
    args: String,
    storage: HandlerTaskStorageType,
) -> HandlerResult {
    let Some(user_id) = sender_id(&msg) else {
        return Ok(());
    };

    let reply = commands::delete_task(storage.as_ref(), user_id, &args).await;
    send_reply(&bot, &msg, reply).await
}

async fn delete_selected_task(
    bot: Bot,
    query: CallbackQuery,
    storage: HandlerTaskStorageType,
) -> HandlerResult {
    bot.answer_callback_query(query.id.clone()).await?;

    let Some(message) = try_get_message_from_query(&query) else {
        log::debug!("Ignoring button press on an inaccessible message");
        return Ok(());
    };

    let data = query.data.as_deref().unwrap_or_default();
    let reply = commands::delete_selected_task(storage.as_ref(), query.from.id.0, data).await;

    bot.edit_message_text(message.chat.id, message.id, render_edit(&reply))
        .parse_mode(ParseMode::MarkdownV2)
        .await?;

    Ok(())
}

async fn remind_me(
    bot: Bot,
    msg: Message,
    args: String,
    registry: Arc<ReminderRegistry>,
    scheduler: HandlerSchedulerType,
) -> HandlerResult {
    let Some(user_id) = sender_id(&msg) else {
        return Ok(());
    };

    let reply = commands::remind_me(
        &registry,
        scheduler.as_ref(),
        user_id,
        msg.chat.id.0,
        &args,
        Local::now(),
    )
    .await;

    send_reply(&bot, &msg, reply).await
}

async fn show_reminders(
    bot: Bot,
    msg: Message,
    registry: Arc<ReminderRegistry>,
) -> HandlerResult {
    let Some(user_id) = sender_id(&msg) else {
        return Ok(());
    };

    let reply = commands::show_reminders(&registry, user_id).await;
    send_reply(&bot, &msg, reply).await
}

async fn unknown_command(bot: Bot, msg: Message) -> HandlerResult {
    send_reply(&bot, &msg, commands::unknown_command()).await
}
