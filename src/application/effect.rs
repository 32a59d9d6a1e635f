//! Output contract of the conversation state machine.

use crate::domain::chat::ChatId;
use crate::domain::gateway::{Notification, NotificationId, Ticket};
use crate::domain::state::StateChange;

/// Fallback texts shown when the backend does not supply a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Connected,
    ConnectionFailed,
    SupportSent,
    IdeaReceived,
    TicketReplySent,
    Failed,
}

/// What the originating chat should be shown, before formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Welcome {
        username: Option<String>,
        developer: bool,
    },
    Onboarding,
    /// Backend-supplied text, or the notice's default when absent.
    Message {
        text: Option<String>,
        fallback: Notice,
    },
    Notifications(Vec<Notification>),
    NoNotifications,
    SupportPrompt,
    IdeaPrompt,
    Tickets(Vec<Ticket>),
    NoTickets,
    TicketPrompt,
}

impl Response {
    pub fn message(text: Option<String>, fallback: Notice) -> Self {
        Self::Message { text, fallback }
    }
}

/// A side effect requested by a transition, executed in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Reply(Response),
    /// Best-effort delivery of a support reply to another chat.
    Relay { recipient: ChatId, text: String },
    /// Fire-and-forget `mark_read` call.
    MarkRead(Vec<NotificationId>),
    /// Run the entry flow again within the same event.
    Reenter,
}

/// Work left for the router once the machine has expanded `Effect::Reenter`.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Reply(Response),
    Relay { recipient: ChatId, text: String },
    MarkRead(Vec<NotificationId>),
}

impl Effect {
    /// `None` for `Reenter`, which only the machine can carry out.
    pub fn into_outbound(self) -> Option<Outbound> {
        match self {
            Self::Reply(response) => Some(Outbound::Reply(response)),
            Self::Relay { recipient, text } => Some(Outbound::Relay { recipient, text }),
            Self::MarkRead(ids) => Some(Outbound::MarkRead(ids)),
            Self::Reenter => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: StateChange,
    pub effects: Vec<Effect>,
}

impl Transition {
    pub fn new(state: StateChange) -> Self {
        Self {
            state,
            effects: vec![],
        }
    }

    pub fn keep() -> Self {
        Self::new(StateChange::Keep)
    }

    pub fn clear() -> Self {
        Self::new(StateChange::Clear)
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn reply(self, response: Response) -> Self {
        self.with_effect(Effect::Reply(response))
    }
}
