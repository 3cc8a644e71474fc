//! Session store selection.

use std::path::PathBuf;
use std::sync::Arc;

use pchat::{InMemorySessionStore, SessionStore};

use crate::error::MemoryError;
use crate::sqlite::{SqliteSessionStore, default_sqlite_path};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionStoreConfig {
    #[default]
    InMemory,
    Sqlite { path: PathBuf },
}

impl SessionStoreConfig {
    pub fn sqlite_default() -> Self {
        Self::Sqlite {
            path: default_sqlite_path(),
        }
    }
}

pub fn create_session_store(
    config: SessionStoreConfig,
) -> Result<Arc<dyn SessionStore>, MemoryError> {
    match config {
        SessionStoreConfig::InMemory => Ok(Arc::new(InMemorySessionStore::new())),
        SessionStoreConfig::Sqlite { path } => {
            tracing::info!(path = %path.display(), "opening sqlite session store");
            Ok(Arc::new(SqliteSessionStore::new(path)?))
        }
    }
}
