use gatebot::domain::chat::ChatId;
use gatebot::domain::ports::{StateStore, StateStoreRef};
use gatebot::domain::state::{ConversationState, TicketId};
use gatebot::infrastructure::in_memory::InMemoryStateStore;
use std::sync::Arc;

#[tokio::test]
async fn test_store_as_shared_trait_object() {
    let store: StateStoreRef = Arc::new(InMemoryStateStore::new());

    // Verify Send + Sync by spawning tasks
    let mut handles = Vec::new();
    for i in 0..50_i64 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let chat = ChatId::from(i);
            store
                .set(
                    &chat,
                    ConversationState::AwaitingTicketResponse(TicketId::new(i.to_string())),
                )
                .await;
            store.get(&chat).await
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let state = handle.await.unwrap();
        assert_eq!(
            state,
            ConversationState::AwaitingTicketResponse(TicketId::new(i.to_string()))
        );
    }
}

#[tokio::test]
async fn test_concurrent_writes_to_same_chat_leave_one_state() {
    let store = InMemoryStateStore::new();
    let chat = ChatId::new("42");

    let mut handles = Vec::new();
    for i in 0..100 {
        let store = store.clone();
        let chat = chat.clone();
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                store
                    .set(&chat, ConversationState::AwaitingSupportMessage)
                    .await;
            } else {
                store.clear(&chat).await;
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    // Last write wins; the map holds at most one entry for the chat.
    assert!(store.len().await <= 1);
}

#[tokio::test]
async fn test_unseen_chats_are_idle() {
    let store: StateStoreRef = Arc::new(InMemoryStateStore::new());

    for id in ["1", "-100200300", "not-a-number"] {
        assert_eq!(store.get(&ChatId::new(id)).await, ConversationState::Idle);
    }
}
