//! Pure conversation transitions.
//!
//! Each event is handled in two halves: a `*_request` function picks the
//! backend request (if any) from the event and current state, and the matching
//! `entry` / `after_*` function turns the backend's answer into a
//! [`Transition`]. None of these functions touch the store, the gateway or the
//! chat platform.

use super::effect::{Effect, Notice, Response, Transition};
use crate::domain::chat::ChatId;
use crate::domain::gateway::{
    ActionOutcome, ConnectionStatus, GatewayRequest, GatewayResult, NotificationList,
    SubmissionKind, TicketList, TicketReplyOutcome, decode,
};
use crate::domain::menu::MenuAction;
use crate::domain::state::{ConversationState, StateChange};
use crate::error::GatewayError;
use serde::de::DeserializeOwned;

/// Upper bound on notifications or tickets rendered in one reply.
pub const MAX_LISTED: usize = 10;

fn read<T: DeserializeOwned>(action: &str, result: GatewayResult) -> Result<T, GatewayError> {
    let decoded = decode(result);
    if let Err(GatewayError::Malformed(reason)) = &decoded {
        tracing::warn!(action, %reason, "Discarding malformed gateway reply");
    }
    decoded
}

pub fn entry_request(chat: &ChatId) -> GatewayRequest {
    GatewayRequest::CheckConnection {
        telegram_chat_id: chat.clone(),
    }
}

/// Entry flow: show the menu to connected chats, otherwise start onboarding.
///
/// A failed connection check is treated as "not connected".
pub fn entry(result: GatewayResult) -> Transition {
    let status: ConnectionStatus = read("check_connection", result).unwrap_or_default();

    if status.connected {
        Transition::clear().reply(Response::Welcome {
            username: status.username,
            developer: status.is_developer,
        })
    } else {
        Transition::new(StateChange::Set(ConversationState::AwaitingConnectionCode))
            .reply(Response::Onboarding)
    }
}

pub fn text_request(
    chat: &ChatId,
    state: &ConversationState,
    text: &str,
) -> Option<GatewayRequest> {
    let telegram_chat_id = chat.clone();
    let request = match state {
        ConversationState::Idle => return None,
        ConversationState::AwaitingConnectionCode => GatewayRequest::Connect {
            code: text.to_string(),
            telegram_chat_id,
        },
        ConversationState::AwaitingSupportMessage => GatewayRequest::Support {
            telegram_chat_id,
            message: text.to_string(),
            kind: SubmissionKind::Support,
        },
        ConversationState::AwaitingIdeaMessage => GatewayRequest::Support {
            telegram_chat_id,
            message: text.to_string(),
            kind: SubmissionKind::Idea,
        },
        ConversationState::AwaitingTicketResponse(ticket_id) => GatewayRequest::RespondTicket {
            telegram_chat_id,
            ticket_id: ticket_id.clone(),
            response_message: text.to_string(),
        },
    };
    Some(request)
}

/// Free-text outcome. `result` is `None` when `text_request` made no call.
///
/// Only the connection-code step survives a failed call, so the user can retry
/// the code; every other step is cleared whatever the backend answered.
pub fn after_text(
    state: &ConversationState,
    text: &str,
    result: Option<GatewayResult>,
) -> Transition {
    let Some(result) = result else {
        return Transition::keep().with_effect(Effect::Reenter);
    };

    match state {
        ConversationState::Idle => Transition::keep().with_effect(Effect::Reenter),
        ConversationState::AwaitingConnectionCode => {
            let outcome: ActionOutcome = read("connect", result).unwrap_or_default();
            if outcome.success {
                Transition::clear()
                    .reply(Response::message(outcome.message, Notice::Connected))
                    .with_effect(Effect::Reenter)
            } else {
                Transition::keep()
                    .reply(Response::message(outcome.message, Notice::ConnectionFailed))
            }
        }
        ConversationState::AwaitingSupportMessage => {
            let outcome: ActionOutcome = read("support", result).unwrap_or_default();
            Transition::clear().reply(Response::message(outcome.message, Notice::SupportSent))
        }
        ConversationState::AwaitingIdeaMessage => {
            let outcome: ActionOutcome = read("support", result).unwrap_or_default();
            Transition::clear().reply(Response::message(outcome.message, Notice::IdeaReceived))
        }
        ConversationState::AwaitingTicketResponse(_) => {
            let outcome: TicketReplyOutcome =
                read("respond_ticket", result).unwrap_or_default();
            if !outcome.success {
                return Transition::clear()
                    .reply(Response::message(outcome.message, Notice::Failed));
            }

            let mut transition = Transition::clear();
            if let Some(recipient) = outcome.user_telegram_chat_id {
                transition = transition.with_effect(Effect::Relay {
                    recipient,
                    text: text.to_string(),
                });
            }
            transition.reply(Response::message(outcome.message, Notice::TicketReplySent))
        }
    }
}

pub fn button_request(chat: &ChatId, action: &MenuAction) -> Option<GatewayRequest> {
    let telegram_chat_id = chat.clone();
    match action {
        MenuAction::Notifications => Some(GatewayRequest::GetNotifications { telegram_chat_id }),
        MenuAction::Tickets => Some(GatewayRequest::GetSupportTickets { telegram_chat_id }),
        MenuAction::Support | MenuAction::Idea | MenuAction::Ticket(_) => None,
    }
}

/// Button outcome. Buttons never read the current state; some of them set it.
pub fn after_button(action: &MenuAction, result: Option<GatewayResult>) -> Transition {
    match action {
        MenuAction::Support => Transition::new(StateChange::Set(
            ConversationState::AwaitingSupportMessage,
        ))
        .reply(Response::SupportPrompt),
        MenuAction::Idea => {
            Transition::new(StateChange::Set(ConversationState::AwaitingIdeaMessage))
                .reply(Response::IdeaPrompt)
        }
        MenuAction::Ticket(id) => Transition::new(StateChange::Set(
            ConversationState::AwaitingTicketResponse(id.clone()),
        ))
        .reply(Response::TicketPrompt),
        MenuAction::Notifications => notifications(result),
        MenuAction::Tickets => tickets(result),
    }
}

fn failed() -> Transition {
    Transition::keep().reply(Response::message(None, Notice::Failed))
}

fn notifications(result: Option<GatewayResult>) -> Transition {
    let Some(Ok(list)) = result.map(|r| read::<NotificationList>("get_notifications", r)) else {
        return failed();
    };

    if list.notifications.is_empty() {
        return Transition::keep().reply(Response::NoNotifications);
    }

    let ids = list.notifications.iter().map(|n| n.id.clone()).collect();
    let shown = list.notifications.into_iter().take(MAX_LISTED).collect();

    Transition::keep()
        .with_effect(Effect::MarkRead(ids))
        .reply(Response::Notifications(shown))
}

fn tickets(result: Option<GatewayResult>) -> Transition {
    let Some(Ok(list)) = result.map(|r| read::<TicketList>("get_support_tickets", r)) else {
        return failed();
    };

    if list.is_refused() {
        return Transition::keep().reply(Response::message(list.message, Notice::Failed));
    }

    let shown: Vec<_> = list
        .tickets
        .into_iter()
        .filter(|ticket| ticket.id.is_some())
        .take(MAX_LISTED)
        .collect();

    if shown.is_empty() {
        Transition::keep().reply(Response::NoTickets)
    } else {
        Transition::keep().reply(Response::Tickets(shown))
    }
}
