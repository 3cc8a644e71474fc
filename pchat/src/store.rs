//! Session storage contract and a basic in-memory implementation.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use pcommon::{BoxFuture, SessionId};

use crate::{ChatError, Session};

pub type ChatFuture<'a, T> = BoxFuture<'a, T>;

/// Keyed session storage. The store is the single source of truth; callers
/// receive owned copies and write whole sessions back.
pub trait SessionStore: Send + Sync {
    fn store<'a>(&'a self, session: &'a Session) -> ChatFuture<'a, Result<(), ChatError>>;

    fn find<'a>(&'a self, id: &'a SessionId) -> ChatFuture<'a, Result<Session, ChatError>>;

    fn close<'a>(&'a self) -> ChatFuture<'a, Result<(), ChatError>>;
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
    closed: AtomicBool,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<(), ChatError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(ChatError::store("session store is closed"));
        }
        Ok(())
    }
}

impl SessionStore for InMemorySessionStore {
    fn store<'a>(&'a self, session: &'a Session) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async move {
            self.ensure_open()?;
            let mut sessions = self
                .sessions
                .write()
                .map_err(|_| ChatError::store("session store lock poisoned"))?;

            sessions.insert(session.id, session.clone());
            Ok(())
        })
    }

    fn find<'a>(&'a self, id: &'a SessionId) -> ChatFuture<'a, Result<Session, ChatError>> {
        Box::pin(async move {
            self.ensure_open()?;
            let sessions = self
                .sessions
                .read()
                .map_err(|_| ChatError::store("session store lock poisoned"))?;

            sessions
                .get(id)
                .cloned()
                .ok_or_else(|| ChatError::not_found("chat not found"))
        })
    }

    fn close<'a>(&'a self) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async move {
            self.closed.store(true, Ordering::Release);
            let mut sessions = self
                .sessions
                .write()
                .map_err(|_| ChatError::store("session store lock poisoned"))?;
            sessions.clear();
            Ok(())
        })
    }
}
