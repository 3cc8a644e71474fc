//! Application-level errors for the parley service.

use thiserror::Error;

use pchat::ChatError;
use pmemory::MemoryError;
use pprovider::ProviderError;

#[derive(Debug, Error)]
pub enum ParleyError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store error: {0}")]
    Store(String),

    #[error("transport error: {0}")]
    Transport(#[from] ProviderError),

    #[error("server error: {0}")]
    Server(String),
}

impl From<MemoryError> for ParleyError {
    fn from(error: MemoryError) -> Self {
        Self::Store(error.to_string())
    }
}

impl From<ChatError> for ParleyError {
    fn from(error: ChatError) -> Self {
        Self::Store(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ParleyError>;
