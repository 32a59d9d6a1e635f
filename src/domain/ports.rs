use super::chat::{ChatId, MessageRef};
use super::gateway::{GatewayRequest, GatewayResult};
use super::reply::Reply;
use super::state::ConversationState;
use crate::error::TransportError;
use async_trait::async_trait;
use std::sync::Arc;

/// Owner of every chat's conversation state.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Returns `Idle` for chats without an entry.
    async fn get(&self, chat: &ChatId) -> ConversationState;
    async fn set(&self, chat: &ChatId, state: ConversationState);
    async fn clear(&self, chat: &ChatId);
}

/// Single outbound call to the backend. Never panics; failures come back as
/// `GatewayError`.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn call(&self, request: &GatewayRequest) -> GatewayResult;
}

/// Outbound operations on the chat platform.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, chat: &ChatId, reply: &Reply) -> Result<(), TransportError>;
    async fn edit(
        &self,
        chat: &ChatId,
        message: MessageRef,
        reply: &Reply,
    ) -> Result<(), TransportError>;
    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError>;
}

pub type StateStoreRef = Arc<dyn StateStore>;
pub type GatewayRef = Arc<dyn Gateway>;
pub type ChatTransportRef = Arc<dyn ChatTransport>;
