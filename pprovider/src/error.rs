//! Provider error kinds and error value helpers.
//!
//! ```rust
//! use pprovider::{ApiError, ProviderError, ProviderErrorKind};
//!
//! let timeout = ProviderError::timeout("read timed out");
//! assert!(timeout.retryable);
//!
//! let remote = ProviderError::remote_api(ApiError::new("invalid_request_error", "bad model"));
//! assert_eq!(remote.kind, ProviderErrorKind::RemoteApi);
//! assert_eq!(remote.message, "invalid_request_error: bad model");
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::protocol::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    InvalidRequest,
    RemoteApi,
    Protocol,
    Timeout,
    Transport,
}

/// Failure talking to the remote chat-completion API.
///
/// `retryable` is a hint for callers; nothing in this workspace retries.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub retryable: bool,
    pub api_error: Option<ApiError>,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
            api_error: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidRequest, message, false)
    }

    pub fn remote_api(error: ApiError) -> Self {
        Self {
            kind: ProviderErrorKind::RemoteApi,
            message: error.to_string(),
            retryable: false,
            api_error: Some(error),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Protocol, message, false)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message, true)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message, true)
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ProviderError {}

#[cfg(feature = "http-transport")]
impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout(error.to_string())
        } else if error.is_decode() {
            Self::protocol(error.to_string())
        } else {
            Self::transport(error.to_string())
        }
    }
}
