use crate::domain::chat::{ChatId, MessageRef};
use crate::domain::ports::ChatTransport;
use crate::domain::reply::{Reply, TextFormat};
use crate::error::TransportError;
use async_trait::async_trait;
use teloxide::Bot;
use teloxide::payloads::{EditMessageTextSetters, SendMessageSetters};
use teloxide::requests::Requester;
use teloxide::types::{
    ChatId as TelegramChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode,
};

/// Chat transport backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn recipient(chat: &ChatId) -> Result<TelegramChatId, TransportError> {
    chat.as_str()
        .parse::<i64>()
        .map(TelegramChatId)
        .map_err(|_| TransportError::InvalidRecipient(chat.to_string()))
}

/// One button per row, in menu order.
fn keyboard(reply: &Reply) -> Option<InlineKeyboardMarkup> {
    if reply.buttons.is_empty() {
        return None;
    }
    let rows = reply.buttons.iter().map(|button| {
        vec![InlineKeyboardButton::callback(
            button.label.clone(),
            button.action.to_string(),
        )]
    });
    Some(InlineKeyboardMarkup::new(rows))
}

fn rejected(err: teloxide::RequestError) -> TransportError {
    TransportError::Rejected(err.to_string())
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send(&self, chat: &ChatId, reply: &Reply) -> Result<(), TransportError> {
        let mut request = self.bot.send_message(recipient(chat)?, reply.text.clone());
        if reply.format == TextFormat::Html {
            request = request.parse_mode(ParseMode::Html);
        }
        if let Some(markup) = keyboard(reply) {
            request = request.reply_markup(markup);
        }
        request.await.map(|_| ()).map_err(rejected)
    }

    async fn edit(
        &self,
        chat: &ChatId,
        message: MessageRef,
        reply: &Reply,
    ) -> Result<(), TransportError> {
        let mut request =
            self.bot
                .edit_message_text(recipient(chat)?, MessageId(message.0), reply.text.clone());
        if reply.format == TextFormat::Html {
            request = request.parse_mode(ParseMode::Html);
        }
        if let Some(markup) = keyboard(reply) {
            request = request.reply_markup(markup);
        }
        request.await.map(|_| ()).map_err(rejected)
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError> {
        self.bot
            .answer_callback_query(callback_id.to_string())
            .await
            .map(|_| ())
            .map_err(rejected)
    }
}
