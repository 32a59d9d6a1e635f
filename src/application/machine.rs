use super::effect::{Effect, Outbound, Transition};
use super::transition;
use crate::domain::chat::ChatId;
use crate::domain::menu::MenuAction;
use crate::domain::ports::{GatewayRef, StateStoreRef};
use crate::domain::state::StateChange;

/// Runs conversation transitions against the state store and the backend.
///
/// Each event reads the chat's state once, makes at most one backend request
/// of its own, applies the resulting state change and hands the remaining
/// effects back to the caller as [`Outbound`] work. `Effect::Reenter` is
/// expanded here by running the entry flow.
#[derive(Clone)]
pub struct ConversationMachine {
    store: StateStoreRef,
    gateway: GatewayRef,
}

impl ConversationMachine {
    pub fn new(store: StateStoreRef, gateway: GatewayRef) -> Self {
        Self { store, gateway }
    }

    pub fn gateway(&self) -> &GatewayRef {
        &self.gateway
    }

    /// `/start`, `/menu`.
    pub async fn on_entry(&self, chat: &ChatId) -> Vec<Outbound> {
        tracing::debug!(%chat, "Entry event");
        self.enter(chat).await
    }

    pub async fn on_text(&self, chat: &ChatId, text: &str) -> Vec<Outbound> {
        let state = self.store.get(chat).await;
        tracing::debug!(%chat, ?state, "Text event");

        let result = match transition::text_request(chat, &state, text) {
            Some(request) => Some(self.gateway.call(&request).await),
            None => None,
        };
        let next = transition::after_text(&state, text, result);
        self.apply(chat, next).await
    }

    pub async fn on_button(&self, chat: &ChatId, action: &MenuAction) -> Vec<Outbound> {
        tracing::debug!(%chat, %action, "Button event");

        let result = match transition::button_request(chat, action) {
            Some(request) => Some(self.gateway.call(&request).await),
            None => None,
        };
        let next = transition::after_button(action, result);
        self.apply(chat, next).await
    }

    async fn enter(&self, chat: &ChatId) -> Vec<Outbound> {
        let result = self.gateway.call(&transition::entry_request(chat)).await;
        let next = transition::entry(result);
        self.change_state(chat, next.state).await;
        // The entry transition never re-enters.
        next.effects
            .into_iter()
            .filter_map(Effect::into_outbound)
            .collect()
    }

    async fn apply(&self, chat: &ChatId, next: Transition) -> Vec<Outbound> {
        self.change_state(chat, next.state).await;

        let mut outbound = Vec::with_capacity(next.effects.len());
        for effect in next.effects {
            match effect.into_outbound() {
                Some(work) => outbound.push(work),
                None => outbound.extend(self.enter(chat).await),
            }
        }
        outbound
    }

    async fn change_state(&self, chat: &ChatId, change: StateChange) {
        match change {
            StateChange::Keep => {}
            StateChange::Set(state) => {
                tracing::debug!(%chat, ?state, "State set");
                self.store.set(chat, state).await;
            }
            StateChange::Clear => {
                tracing::debug!(%chat, "State cleared");
                self.store.clear(chat).await;
            }
        }
    }
}
