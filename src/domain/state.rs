use super::chat::string_or_number;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a support ticket, kept in the form the backend issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TicketId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        string_or_number(deserializer).map(Self)
    }
}

/// The step a chat is at within a multi-turn flow.
///
/// A chat with no stored entry is `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingConnectionCode,
    AwaitingSupportMessage,
    AwaitingIdeaMessage,
    AwaitingTicketResponse(TicketId),
}

impl ConversationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// What a transition does to the stored state of the chat that raised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    Keep,
    Set(ConversationState),
    Clear,
}
