//! Common `pprovider` imports for downstream crates.

pub use crate::{
    ApiError, ChatRequest, ChatResponse, ChatTransport, Choice, ChunkStream, Delta, FinishReason,
    Message, Options, ProviderError, ProviderErrorKind, ProviderFuture, Role, Stop, Usage,
    VecChunkStream,
};
#[cfg(feature = "http-transport")]
pub use crate::HttpChatTransport;
pub use pcommon::{BoxFuture, SessionId};
