use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletBridgeError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("backend error: {0}")]
    Backend(Value),
    #[error("request timed out after {0} ms")]
    Timeout(u64),
    #[error("transport channel closed")]
    ChannelClosed,
    #[error("runtime error: {0}")]
    Runtime(String),
}

impl WalletBridgeError {
    /// The backend's error payload, verbatim, when the failure came from the
    /// backend rather than this side of the channel.
    pub fn backend_payload(&self) -> Option<&Value> {
        match self {
            WalletBridgeError::Backend(payload) => Some(payload),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, WalletBridgeError>;
