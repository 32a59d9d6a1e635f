use super::effect::Outbound;
use super::machine::ConversationMachine;
use super::presenter::Presenter;
use crate::domain::chat::{ChatId, MessageRef};
use crate::domain::gateway::GatewayRequest;
use crate::domain::menu::MenuAction;
use crate::domain::ports::ChatTransportRef;
use crate::domain::reply::Reply;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryCommand {
    Start,
    Menu,
}

/// A chat platform event, reduced to what the conversation machine needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Command {
        chat: ChatId,
        command: EntryCommand,
    },
    Text {
        chat: ChatId,
        text: String,
    },
    Button {
        chat: ChatId,
        callback_id: String,
        /// The message carrying the pressed button, edited in place when known.
        message: Option<MessageRef>,
        data: String,
    },
}

/// Dispatches inbound events to the conversation machine and carries out the
/// work it returns.
pub struct EventRouter {
    machine: ConversationMachine,
    transport: ChatTransportRef,
    presenter: Presenter,
}

impl EventRouter {
    pub fn new(
        machine: ConversationMachine,
        transport: ChatTransportRef,
        presenter: Presenter,
    ) -> Self {
        Self {
            machine,
            transport,
            presenter,
        }
    }

    /// Handles one event to completion.
    ///
    /// Returns the handles of fire-and-forget work spawned along the way
    /// (`mark_read` calls, relayed support replies). Dropping them detaches
    /// the tasks; their failures are only logged.
    pub async fn handle(&self, event: InboundEvent) -> Vec<JoinHandle<()>> {
        match event {
            InboundEvent::Command { chat, command } => {
                tracing::info!(%chat, ?command, "Command received");
                let outbound = self.machine.on_entry(&chat).await;
                self.execute(&chat, None, outbound).await
            }
            InboundEvent::Text { chat, text } => {
                let outbound = self.machine.on_text(&chat, text.trim()).await;
                self.execute(&chat, None, outbound).await
            }
            InboundEvent::Button {
                chat,
                callback_id,
                message,
                data,
            } => {
                // The platform expects every button press to be acknowledged.
                if let Err(err) = self.transport.answer_callback(&callback_id).await {
                    tracing::error!(%chat, %err, "Failed to answer callback query");
                }

                let action = match data.parse::<MenuAction>() {
                    Ok(action) => action,
                    Err(err) => {
                        tracing::warn!(%chat, %err, "Ignoring button press");
                        return Vec::new();
                    }
                };
                let outbound = self.machine.on_button(&chat, &action).await;
                self.execute(&chat, message, outbound).await
            }
        }
    }

    async fn execute(
        &self,
        chat: &ChatId,
        origin: Option<MessageRef>,
        outbound: Vec<Outbound>,
    ) -> Vec<JoinHandle<()>> {
        let mut background = Vec::new();

        for work in outbound {
            match work {
                Outbound::Reply(response) => {
                    let reply = self.presenter.render(&response);
                    self.deliver(chat, origin, &reply).await;
                }
                Outbound::Relay { recipient, text } => {
                    let reply = self.presenter.relay(&text);
                    let transport = self.transport.clone();
                    background.push(tokio::spawn(async move {
                        if let Err(err) = transport.send(&recipient, &reply).await {
                            tracing::error!(%recipient, %err, "Could not deliver support reply");
                        }
                    }));
                }
                Outbound::MarkRead(notification_ids) => {
                    let gateway = self.machine.gateway().clone();
                    let request = GatewayRequest::MarkRead { notification_ids };
                    background.push(tokio::spawn(async move {
                        if let Err(err) = gateway.call(&request).await {
                            tracing::warn!(%err, "Failed to mark notifications read");
                        }
                    }));
                }
            }
        }

        background
    }

    async fn deliver(&self, chat: &ChatId, origin: Option<MessageRef>, reply: &Reply) {
        let delivered = match origin {
            Some(message) => self.transport.edit(chat, message, reply).await,
            None => self.transport.send(chat, reply).await,
        };
        if let Err(err) = delivered {
            tracing::error!(%chat, %err, "Failed to deliver reply");
        }
    }
}
