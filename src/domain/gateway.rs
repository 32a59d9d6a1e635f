//! Backend protocol: the requests the bot can make and typed views over the
//! loosely structured replies.
//!
//! Every reply view tolerates missing or `null` keys by falling back to a
//! typed default. A key of the wrong JSON type fails the whole decode, which
//! callers treat like any other gateway failure.

use super::chat::ChatId;
use super::state::TicketId;
use crate::error::GatewayError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Kind of free-text submission forwarded through the `support` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
    Support,
    Idea,
}

/// Opaque notification id, echoed back to the backend exactly as received.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub Value);

/// A named request to the backend. Serializes to `{"action": <name>, ...params}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum GatewayRequest {
    CheckConnection {
        telegram_chat_id: ChatId,
    },
    Connect {
        code: String,
        telegram_chat_id: ChatId,
    },
    Support {
        telegram_chat_id: ChatId,
        message: String,
        #[serde(rename = "type")]
        kind: SubmissionKind,
    },
    GetNotifications {
        telegram_chat_id: ChatId,
    },
    MarkRead {
        notification_ids: Vec<NotificationId>,
    },
    GetSupportTickets {
        telegram_chat_id: ChatId,
    },
    RespondTicket {
        telegram_chat_id: ChatId,
        ticket_id: TicketId,
        response_message: String,
    },
}

impl GatewayRequest {
    /// The symbolic action name sent on the wire.
    pub fn action(&self) -> &'static str {
        match self {
            Self::CheckConnection { .. } => "check_connection",
            Self::Connect { .. } => "connect",
            Self::Support { .. } => "support",
            Self::GetNotifications { .. } => "get_notifications",
            Self::MarkRead { .. } => "mark_read",
            Self::GetSupportTickets { .. } => "get_support_tickets",
            Self::RespondTicket { .. } => "respond_ticket",
        }
    }
}

pub type GatewayResult = Result<Value, GatewayError>;

/// Decodes a raw gateway result into the view a branch needs.
pub fn decode<T: DeserializeOwned>(result: GatewayResult) -> Result<T, GatewayError> {
    let value = result?;
    if !value.is_object() {
        return Err(GatewayError::Malformed(format!(
            "expected a JSON object, got {value}"
        )));
    }
    serde_json::from_value(value).map_err(|err| GatewayError::Malformed(err.to_string()))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn absent_is_success() -> bool {
    true
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|text| !text.trim().is_empty()))
}

/// Reply to `check_connection`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConnectionStatus {
    #[serde(default, deserialize_with = "null_as_default")]
    pub connected: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_developer: bool,
    #[serde(default, deserialize_with = "non_empty")]
    pub username: Option<String>,
}

/// Reply to `connect` and `support`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ActionOutcome {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "non_empty")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Notification {
    #[serde(default)]
    pub id: NotificationId,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

impl Notification {
    pub fn is_contract_payment(&self) -> bool {
        self.kind == "contract_paid"
    }
}

/// Reply to `get_notifications`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NotificationList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "non_empty")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Ticket {
    #[serde(default)]
    pub id: Option<TicketId>,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub profiles: Option<Profile>,
}

impl Ticket {
    pub fn is_idea(&self) -> bool {
        self.kind == "idea"
    }

    pub fn submitter(&self) -> Option<&str> {
        self.profiles.as_ref()?.username.as_deref()
    }
}

/// Reply to `get_support_tickets`. An absent `success` flag means success; an
/// explicit `null` does not.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TicketList {
    #[serde(default = "absent_is_success", deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "non_empty")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tickets: Vec<Ticket>,
}

impl TicketList {
    pub fn is_refused(&self) -> bool {
        !self.success
    }
}

/// Reply to `respond_ticket`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TicketReplyOutcome {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "non_empty")]
    pub message: Option<String>,
    #[serde(default)]
    pub user_telegram_chat_id: Option<ChatId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_action_and_params() {
        let request = GatewayRequest::Support {
            telegram_chat_id: ChatId::new("77"),
            message: "site is down".to_string(),
            kind: SubmissionKind::Idea,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "action": "support",
                "telegram_chat_id": "77",
                "message": "site is down",
                "type": "idea",
            })
        );
        assert_eq!(request.action(), "support");
    }

    #[test]
    fn test_mark_read_echoes_ids_verbatim() {
        let request = GatewayRequest::MarkRead {
            notification_ids: vec![NotificationId(json!(5)), NotificationId(json!("a-b"))],
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"action": "mark_read", "notification_ids": [5, "a-b"]})
        );
    }

    #[test]
    fn test_missing_and_null_keys_fall_back_to_defaults() {
        let status: ConnectionStatus =
            decode(Ok(json!({"connected": null, "username": ""}))).unwrap();
        assert_eq!(status, ConnectionStatus::default());

        let list: NotificationList = decode(Ok(json!({}))).unwrap();
        assert!(list.notifications.is_empty());

        let tickets: TicketList = decode(Ok(json!({"tickets": null}))).unwrap();
        assert!(!tickets.is_refused());
    }

    #[test]
    fn test_ticket_list_refused_unless_success_is_absent_or_true() {
        for (reply, refused) in [
            (json!({"tickets": []}), false),
            (json!({"success": true, "tickets": []}), false),
            (json!({"success": false}), true),
            (json!({"success": null, "tickets": []}), true),
        ] {
            let list: TicketList = decode(Ok(reply.clone())).unwrap();
            assert_eq!(list.is_refused(), refused, "{reply}");
        }
    }

    #[test]
    fn test_wrong_types_and_non_objects_are_malformed() {
        let wrong_type = decode::<ConnectionStatus>(Ok(json!({"connected": "yes"})));
        assert!(matches!(wrong_type, Err(GatewayError::Malformed(_))));

        let not_object = decode::<ActionOutcome>(Ok(json!([true, "ok"])));
        assert!(matches!(not_object, Err(GatewayError::Malformed(_))));
    }

    #[test]
    fn test_failure_passes_through_decode() {
        let result = decode::<ActionOutcome>(Err(GatewayError::Timeout));
        assert_eq!(result, Err(GatewayError::Timeout));
    }

    #[test]
    fn test_ticket_decodes_numeric_id_and_submitter() {
        let list: TicketList = decode(Ok(json!({
            "tickets": [
                {"id": 42, "type": "idea", "message": "dark mode", "profiles": {"username": "ana"}},
                {"id": "x1", "type": "support", "message": "help", "profiles": null},
            ]
        })))
        .unwrap();

        assert_eq!(list.tickets[0].id, Some(TicketId::new("42")));
        assert!(list.tickets[0].is_idea());
        assert_eq!(list.tickets[0].submitter(), Some("ana"));
        assert_eq!(list.tickets[1].submitter(), None);
    }
}
