//! Renders state machine responses into chat messages.
//!
//! Rich text is Telegram HTML; any value that comes from users or the backend
//! is escaped before it is embedded.

use super::effect::{Notice, Response};
use crate::domain::gateway::{Notification, Ticket};
use crate::domain::menu::MenuAction;
use crate::domain::reply::{Button, Reply};
use std::fmt::Write;
use teloxide::utils::html::{bold, escape};

const PREVIEW_CHARS: usize = 30;
const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone)]
pub struct Presenter {
    brand: String,
    site_url: String,
}

impl Presenter {
    pub fn new(brand: impl Into<String>, site_url: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            site_url: site_url.into(),
        }
    }

    pub fn render(&self, response: &Response) -> Reply {
        match response {
            Response::Welcome {
                username,
                developer,
            } => self.welcome(username.as_deref(), *developer),
            Response::Onboarding => self.onboarding(),
            Response::Message { text, fallback } => match text {
                Some(text) => Reply::plain(text.clone()),
                None => Reply::plain(notice_text(*fallback)),
            },
            Response::Notifications(notifications) => render_notifications(notifications),
            Response::NoNotifications => Reply::plain("📭 No new notifications"),
            Response::SupportPrompt => {
                Reply::html("🆘 <b>Tech support</b>\n\nDescribe your problem and we will help:")
            }
            Response::IdeaPrompt => Reply::html(
                "💡 <b>Your idea</b>\n\nWrite your suggestion for improving the site or the community:",
            ),
            Response::Tickets(tickets) => render_tickets(tickets),
            Response::NoTickets => Reply::plain("📭 No open tickets"),
            Response::TicketPrompt => Reply::plain("✏️ Write your reply to this ticket:"),
        }
    }

    /// Message delivered to the submitter of a ticket that was answered.
    pub fn relay(&self, text: &str) -> Reply {
        Reply::html(format!("📨 <b>Reply from support:</b>\n\n{}", escape(text)))
    }

    fn welcome(&self, username: Option<&str>, developer: bool) -> Reply {
        let greeting = match username {
            Some(name) => format!("👋 Hi, {}!", bold(&escape(name))),
            None => "👋 Hi!".to_string(),
        };
        let text = format!(
            "{greeting}\n\nYour Telegram is connected to {}.\n\
             You will receive notifications about contract payouts and more.",
            escape(&self.brand)
        );
        Reply::html(text).with_buttons(main_menu(developer))
    }

    fn onboarding(&self) -> Reply {
        Reply::html(format!(
            "🩸 {}\n\n\
             To connect your account:\n\
             1. Open {}\n\
             2. Go to Profile → Telegram\n\
             3. Press 'Get connection code'\n\
             4. Send the code here\n\n\
             Enter your connection code:",
            bold(&format!("{} Bot", escape(&self.brand))),
            escape(&self.site_url)
        ))
    }
}

/// Entry menu; the tickets item is reserved for developers.
pub fn main_menu(developer: bool) -> Vec<Button> {
    let mut buttons = vec![
        Button::new("📬 My notifications", MenuAction::Notifications),
        Button::new("🆘 Tech support", MenuAction::Support),
        Button::new("💡 Suggest an idea", MenuAction::Idea),
    ];
    if developer {
        buttons.push(Button::new("🎫 Support tickets", MenuAction::Tickets));
    }
    buttons
}

fn notice_text(notice: Notice) -> &'static str {
    match notice {
        Notice::Connected => "✅ Connected!",
        Notice::ConnectionFailed => "❌ Connection failed",
        Notice::SupportSent => "📩 Sent!",
        Notice::IdeaReceived => "💡 Thanks for the idea!",
        Notice::TicketReplySent => "✅ Reply sent!",
        Notice::Failed => "❌ Something went wrong",
    }
}

fn render_notifications(notifications: &[Notification]) -> Reply {
    let mut text = String::from("📬 <b>Your notifications:</b>\n\n");
    for notification in notifications {
        let icon = if notification.is_contract_payment() {
            "💰"
        } else {
            "📌"
        };
        // Writing into a String cannot fail.
        let _ = write!(
            text,
            "{icon} {}\n{}\n\n",
            bold(&escape(&notification.title)),
            escape(&notification.message)
        );
    }
    Reply::html(text.trim_end())
}

fn render_tickets(tickets: &[Ticket]) -> Reply {
    let buttons = tickets
        .iter()
        .filter_map(|ticket| {
            let id = ticket.id.clone()?;
            Some(Button::new(ticket_label(ticket), MenuAction::Ticket(id)))
        })
        .collect();

    Reply::html("🎫 <b>Open tickets:</b>\n\nChoose a ticket to reply to:").with_buttons(buttons)
}

fn ticket_label(ticket: &Ticket) -> String {
    let icon = if ticket.is_idea() { "💡" } else { "🆘" };
    let author = ticket.submitter().unwrap_or(ANONYMOUS);
    let preview: String = ticket.message.chars().take(PREVIEW_CHARS).collect();
    format!("{icon} {author}: {preview}...")
}
