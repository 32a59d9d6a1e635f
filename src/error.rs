use thiserror::Error;

/// Failure of a single backend call.
///
/// This is an expected outcome, not a fault: the conversation machine decides
/// per branch what the user sees when a call fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("gateway call timed out")]
    Timeout,
    #[error("gateway transport error: {0}")]
    Transport(String),
    #[error("malformed gateway response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("chat platform rejected the request: {0}")]
    Rejected(String),
    #[error("invalid chat identity: {0}")]
    InvalidRecipient(String),
}

/// Startup failures. Everything after startup is logged, never fatal.
#[derive(Error, Debug)]
pub enum BotError {
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
