pub mod chat;
pub mod gateway;
pub mod menu;
pub mod ports;
pub mod reply;
pub mod state;
