//! Chat-layer errors and classification.
//!
//! ```rust
//! use pchat::{ChatError, ChatErrorKind};
//! use pprovider::{ApiError, ProviderError};
//!
//! let error = ChatError::from(ProviderError::remote_api(ApiError::new("server_error", "busy")));
//! assert_eq!(error.kind, ChatErrorKind::RemoteApi);
//! assert_eq!(error.message, "server_error: busy");
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

use pcommon::ParseSessionIdError;
use pprovider::{MergeError, ProviderError, ProviderErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    Validation,
    NotFound,
    RemoteApi,
    Protocol,
    Merge,
    Transport,
    Store,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::NotFound, message)
    }

    pub fn remote_api(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::RemoteApi, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Protocol, message)
    }

    pub fn merge(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Merge, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Transport, message)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Store, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Cancelled, message)
    }

    /// Whether the failure came from the caller's input rather than downstream.
    pub fn is_client_error(&self) -> bool {
        matches!(self.kind, ChatErrorKind::Validation | ChatErrorKind::Merge)
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ChatError {}

impl From<ProviderError> for ChatError {
    fn from(value: ProviderError) -> Self {
        match value.kind {
            ProviderErrorKind::RemoteApi => ChatError::remote_api(value.message),
            ProviderErrorKind::Protocol => ChatError::protocol(value.message),
            ProviderErrorKind::InvalidRequest => ChatError::validation(value.message),
            ProviderErrorKind::Transport | ProviderErrorKind::Timeout => {
                ChatError::transport(value.message)
            }
        }
    }
}

impl From<MergeError> for ChatError {
    fn from(value: MergeError) -> Self {
        ChatError::merge(value.to_string())
    }
}

impl From<ParseSessionIdError> for ChatError {
    fn from(value: ParseSessionIdError) -> Self {
        ChatError::validation(value.to_string())
    }
}
