//! Adapters implementing the domain ports.

pub mod http_gateway;
pub mod in_memory;
pub mod telegram;
