//! Shared primitives and strongly-typed identifiers for workspace crates.
//!
//! ```rust
//! use pcommon::SessionId;
//!
//! let id = SessionId::generate();
//! let parsed: SessionId = id.to_string().parse().expect("round trips");
//! assert_eq!(id, parsed);
//! assert!(SessionId::parse("not-a-session").is_err());
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use pcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Session identifier newtype.
    //!
    //! ```rust
    //! use pcommon::SessionId;
    //!
    //! let id = SessionId::parse("0b5f4c3e-8f5d-4b8a-9a55-6f1f2f4a9e10").expect("valid uuid");
    //! assert_eq!(id.to_string(), "0b5f4c3e-8f5d-4b8a-9a55-6f1f2f4a9e10");
    //! ```

    use std::error::Error;
    use std::fmt::{Display, Formatter};
    use std::str::FromStr;

    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    /// Opaque, unique identifier of a chat session.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SessionId(Uuid);

    impl SessionId {
        pub fn generate() -> Self {
            Self(Uuid::new_v4())
        }

        pub fn parse(value: &str) -> Result<Self, ParseSessionIdError> {
            Uuid::parse_str(value.trim())
                .map(Self)
                .map_err(|_| ParseSessionIdError {
                    value: value.to_string(),
                })
        }

        pub fn as_uuid(&self) -> &Uuid {
            &self.0
        }
    }

    impl Display for SessionId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            Display::fmt(&self.0.hyphenated(), f)
        }
    }

    impl FromStr for SessionId {
        type Err = ParseSessionIdError;

        fn from_str(value: &str) -> Result<Self, Self::Err> {
            Self::parse(value)
        }
    }

    impl From<Uuid> for SessionId {
        fn from(value: Uuid) -> Self {
            Self(value)
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ParseSessionIdError {
        pub value: String,
    }

    impl Display for ParseSessionIdError {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "invalid session id '{}'", self.value)
        }
    }

    impl Error for ParseSessionIdError {}
}

pub use context::{ParseSessionIdError, SessionId};
pub use future::BoxFuture;
