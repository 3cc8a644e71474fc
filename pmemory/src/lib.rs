//! Durable session storage for parley.
//!
//! ```rust
//! use pchat::{Session, SessionStore};
//! use pmemory::{SessionStoreConfig, create_session_store};
//!
//! # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
//! let store = create_session_store(SessionStoreConfig::InMemory).expect("store");
//! let session = Session::create("gpt-3.5-turbo", "be brief", None);
//! store.store(&session).await.expect("stored");
//! assert_eq!(store.find(&session.id).await.expect("found"), session);
//! # });
//! ```

mod backend;
mod error;
mod sqlite;

pub mod prelude {
    pub use crate::{
        MemoryError, MemoryErrorKind, SessionStoreConfig, SqliteSessionStore,
        create_session_store, default_sqlite_path,
    };
}

pub use backend::{SessionStoreConfig, create_session_store};
pub use error::{MemoryError, MemoryErrorKind};
pub use sqlite::{SqliteSessionStore, default_sqlite_path};

#[cfg(test)]
mod tests {
    use pchat::{ChatErrorKind, Session, SessionStore};
    use pcommon::SessionId;
    use pprovider::{Message, Options, Stop};

    use crate::{SessionStoreConfig, SqliteSessionStore, create_session_store};

    fn temp_dir(prefix: &str) -> std::path::PathBuf {
        let unique = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("pmemory-{prefix}-{unique}"))
    }

    fn sample_session() -> Session {
        let mut session = Session::create(
            "gpt-3.5-turbo",
            "you are terse",
            Some(
                Options::new()
                    .with_temperature(0.25)
                    .with_stop(Stop::Many(vec!["END".into()])),
            ),
        );
        session.add_message(Message::user("1+1?"));
        session.add_message(Message::assistant("\n\n2"));
        session
    }

    #[tokio::test]
    async fn sqlite_store_round_trips_sessions_in_order() {
        let store = SqliteSessionStore::new_in_memory().expect("sqlite store");
        let session = sample_session();

        store.store(&session).await.expect("store");
        let found = store.find(&session.id).await.expect("find");

        assert_eq!(found, session);
    }

    #[tokio::test]
    async fn sqlite_store_replaces_previous_state() {
        let store = SqliteSessionStore::new_in_memory().expect("sqlite store");
        let mut session = sample_session();
        store.store(&session).await.expect("first store");

        session.set_model("gpt-4");
        session.add_message(Message::user("again"));
        store.store(&session).await.expect("second store");

        let found = store.find(&session.id).await.expect("find");
        assert_eq!(found.model, "gpt-4");
        assert_eq!(found.messages().len(), 4);
        assert_eq!(found.messages()[3], Message::user("again"));
    }

    #[tokio::test]
    async fn sqlite_store_reports_unknown_sessions_as_not_found() {
        let store = SqliteSessionStore::new_in_memory().expect("sqlite store");
        let error = store
            .find(&SessionId::generate())
            .await
            .expect_err("unknown session");

        assert_eq!(error.kind, ChatErrorKind::NotFound);
    }

    #[tokio::test]
    async fn sqlite_store_persists_across_reopen() {
        let path = temp_dir("reopen").join("sessions.sqlite3");
        let session = sample_session();

        {
            let store = SqliteSessionStore::new(&path).expect("open");
            store.store(&session).await.expect("store");
            store.close().await.expect("close");

            let error = store.find(&session.id).await.expect_err("closed store");
            assert_eq!(error.kind, ChatErrorKind::Store);
        }

        let reopened = SqliteSessionStore::new(&path).expect("reopen");
        assert_eq!(reopened.find(&session.id).await.expect("find"), session);

        let _ = std::fs::remove_dir_all(path.parent().expect("temp parent"));
    }

    #[tokio::test]
    async fn factory_builds_requested_backend() {
        let memory = create_session_store(SessionStoreConfig::InMemory).expect("memory store");
        let session = sample_session();
        memory.store(&session).await.expect("store");
        assert_eq!(memory.find(&session.id).await.expect("find"), session);

        let path = temp_dir("factory").join("nested").join("sessions.sqlite3");
        let sqlite = create_session_store(SessionStoreConfig::Sqlite { path: path.clone() })
            .expect("sqlite store");
        sqlite.store(&session).await.expect("store");
        assert!(path.exists());

        let _ = std::fs::remove_dir_all(temp_dir_root(&path));
    }

    fn temp_dir_root(path: &std::path::Path) -> std::path::PathBuf {
        path.parent()
            .and_then(std::path::Path::parent)
            .expect("temp root")
            .to_path_buf()
    }
}
