//! Application layer: the conversation state machine and the event router
//! that feeds it.
//!
//! Decisions live in [`transition`] as pure functions. [`machine`] runs them
//! against the injected state store and gateway, [`router`] turns platform
//! events into machine calls and carries out the returned effects, and
//! [`presenter`] renders responses into chat messages.

pub mod effect;
pub mod machine;
pub mod presenter;
pub mod router;
pub mod transition;
