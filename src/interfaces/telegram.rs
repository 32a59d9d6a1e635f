//! Telegram update handling: turns teloxide updates into [`InboundEvent`]s.

use crate::application::router::{EntryCommand, EventRouter, InboundEvent};
use crate::domain::chat::{ChatId, MessageRef};
use std::sync::Arc;
use teloxide::dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

type HandlerError = Box<dyn std::error::Error + Send + Sync>;
type HandlerResult = Result<(), HandlerError>;

#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "connect your account or open the menu")]
    Start,
    #[command(description = "open the menu")]
    Menu,
}

impl From<Command> for EntryCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Start => Self::Start,
            Command::Menu => Self::Menu,
        }
    }
}

pub fn schema() -> UpdateHandler<HandlerError> {
    let messages = Update::filter_message()
        .branch(dptree::entry().filter_command::<Command>().endpoint(on_command))
        .branch(dptree::endpoint(on_text));

    dptree::entry()
        .branch(messages)
        .branch(Update::filter_callback_query().endpoint(on_button))
}

/// Registers the command list and polls for updates until Ctrl-C.
pub async fn run(bot: Bot, router: Arc<EventRouter>) {
    if let Err(err) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!(%err, "Could not register bot commands");
    }

    tracing::info!("Bot started");
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![router])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn on_command(msg: Message, command: Command, router: Arc<EventRouter>) -> HandlerResult {
    let event = InboundEvent::Command {
        chat: ChatId::from(msg.chat.id.0),
        command: command.into(),
    };
    router.handle(event).await;
    Ok(())
}

async fn on_text(msg: Message, router: Arc<EventRouter>) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    // Unknown commands are not conversation input.
    if text.starts_with('/') {
        tracing::debug!(chat = msg.chat.id.0, "Ignoring unknown command");
        return Ok(());
    }

    let event = InboundEvent::Text {
        chat: ChatId::from(msg.chat.id.0),
        text: text.to_string(),
    };
    router.handle(event).await;
    Ok(())
}

async fn on_button(query: CallbackQuery, router: Arc<EventRouter>) -> HandlerResult {
    let chat = match &query.message {
        Some(message) => ChatId::from(message.chat().id.0),
        None => ChatId::new(query.from.id.0.to_string()),
    };

    let event = InboundEvent::Button {
        chat,
        callback_id: query.id.clone(),
        message: query.message.as_ref().map(|message| MessageRef(message.id().0)),
        data: query.data.clone().unwrap_or_default(),
    };
    router.handle(event).await;
    Ok(())
}
