use crate::domain::chat::ChatId;
use crate::domain::ports::StateStore;
use crate::domain::state::ConversationState;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for conversation states.
///
/// Uses `Arc<RwLock<HashMap<ChatId, ConversationState>>>` so every clone shares
/// the same map. `Idle` is never stored: absence of an entry means `Idle`.
/// Contents are lost when the process exits.
#[derive(Default, Clone)]
pub struct InMemoryStateStore {
    states: Arc<RwLock<HashMap<ChatId, ConversationState>>>,
}

impl InMemoryStateStore {
    /// Creates a new, empty in-memory state store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chats currently in a multi-step flow.
    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.states.read().await.is_empty()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get(&self, chat: &ChatId) -> ConversationState {
        let states = self.states.read().await;
        states.get(chat).cloned().unwrap_or_default()
    }

    async fn set(&self, chat: &ChatId, state: ConversationState) {
        let mut states = self.states.write().await;
        if state.is_idle() {
            states.remove(chat);
        } else {
            states.insert(chat.clone(), state);
        }
    }

    async fn clear(&self, chat: &ChatId) {
        let mut states = self.states.write().await;
        states.remove(chat);
    }
}
