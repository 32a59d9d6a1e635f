use super::state::TicketId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const TICKET_PREFIX: &str = "ticket_";

/// Tag attached to an inline menu button and echoed back when it is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Notifications,
    Support,
    Idea,
    Tickets,
    Ticket(TicketId),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown menu action: {0:?}")]
pub struct UnknownMenuAction(pub String);

impl FromStr for MenuAction {
    type Err = UnknownMenuAction;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "notifications" => Ok(Self::Notifications),
            "support" => Ok(Self::Support),
            "idea" => Ok(Self::Idea),
            "tickets" => Ok(Self::Tickets),
            _ => match tag.strip_prefix(TICKET_PREFIX) {
                Some(id) if !id.is_empty() => Ok(Self::Ticket(TicketId::new(id))),
                _ => Err(UnknownMenuAction(tag.to_string())),
            },
        }
    }
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Notifications => f.write_str("notifications"),
            Self::Support => f.write_str("support"),
            Self::Idea => f.write_str("idea"),
            Self::Tickets => f.write_str("tickets"),
            Self::Ticket(id) => write!(f, "{TICKET_PREFIX}{id}"),
        }
    }
}
