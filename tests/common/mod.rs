#![allow(dead_code)]

use async_trait::async_trait;
use gatebot::application::machine::ConversationMachine;
use gatebot::application::presenter::Presenter;
use gatebot::application::router::EventRouter;
use gatebot::domain::chat::{ChatId, MessageRef};
use gatebot::domain::gateway::{GatewayRequest, GatewayResult};
use gatebot::domain::ports::{ChatTransport, Gateway};
use gatebot::domain::reply::Reply;
use gatebot::error::TransportError;
use gatebot::infrastructure::in_memory::InMemoryStateStore;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Gateway answering each action with a scripted result and recording every
/// request. Unscripted actions answer `{}`.
#[derive(Default)]
pub struct FakeGateway {
    replies: Mutex<HashMap<&'static str, GatewayResult>>,
    calls: Mutex<Vec<GatewayRequest>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, action: &'static str, result: GatewayResult) -> Self {
        self.set_reply(action, result);
        self
    }

    pub fn set_reply(&self, action: &'static str, result: GatewayResult) {
        self.replies.lock().unwrap().insert(action, result);
    }

    pub fn calls(&self) -> Vec<GatewayRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<&'static str> {
        self.calls().iter().map(GatewayRequest::action).collect()
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn call(&self, request: &GatewayRequest) -> GatewayResult {
        self.calls.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .get(request.action())
            .cloned()
            .unwrap_or_else(|| Ok(json!({})))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Message { chat: ChatId, reply: Reply },
    Edit { chat: ChatId, message: MessageRef, reply: Reply },
    Answer(String),
}

/// Transport recording every outbound operation. Sends to `unreachable`
/// chats fail.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    unreachable: Mutex<Vec<ChatId>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn make_unreachable(&self, chat: ChatId) {
        self.unreachable.lock().unwrap().push(chat);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// Texts of messages and edits, in delivery order.
    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Message { reply, .. } | Sent::Edit { reply, .. } => Some(reply.text),
                Sent::Answer(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send(&self, chat: &ChatId, reply: &Reply) -> Result<(), TransportError> {
        if self.unreachable.lock().unwrap().contains(chat) {
            return Err(TransportError::Rejected("chat not found".to_string()));
        }
        self.sent.lock().unwrap().push(Sent::Message {
            chat: chat.clone(),
            reply: reply.clone(),
        });
        Ok(())
    }

    async fn edit(
        &self,
        chat: &ChatId,
        message: MessageRef,
        reply: &Reply,
    ) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(Sent::Edit {
            chat: chat.clone(),
            message,
            reply: reply.clone(),
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError> {
        self.sent
            .lock()
            .unwrap()
            .push(Sent::Answer(callback_id.to_string()));
        Ok(())
    }
}

pub struct Harness {
    pub store: InMemoryStateStore,
    pub gateway: Arc<FakeGateway>,
    pub transport: Arc<RecordingTransport>,
    pub machine: ConversationMachine,
    pub router: EventRouter,
}

pub fn harness(gateway: FakeGateway) -> Harness {
    let store = InMemoryStateStore::new();
    let gateway = Arc::new(gateway);
    let transport = Arc::new(RecordingTransport::new());

    let machine = ConversationMachine::new(Arc::new(store.clone()), gateway.clone());
    let router = EventRouter::new(
        machine.clone(),
        transport.clone(),
        Presenter::new("Blood Family", "bloodfamily.vercel.app"),
    );

    Harness {
        store,
        gateway,
        transport,
        machine,
        router,
    }
}

pub fn chat() -> ChatId {
    ChatId::new("1001")
}
