//! SQLite-backed session store.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use pchat::{ChatError, ChatFuture, Session, SessionStore};
use pcommon::SessionId;
use pprovider::{Message, Options, Role};
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::MemoryError;

#[derive(Debug)]
pub struct SqliteSessionStore {
    connection: Mutex<Option<Connection>>,
}

impl SqliteSessionStore {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|error| {
                MemoryError::storage(format!(
                    "failed to create sqlite parent directory: {error}"
                ))
            })?;
        }

        let connection = Connection::open(path).map_err(|error| {
            MemoryError::storage(format!("failed to open sqlite database: {error}"))
        })?;
        Self::from_connection(connection)
    }

    pub fn new_in_memory() -> Result<Self, MemoryError> {
        let connection = Connection::open_in_memory().map_err(|error| {
            MemoryError::storage(format!("failed to open in-memory sqlite database: {error}"))
        })?;
        Self::from_connection(connection)
    }

    fn from_connection(connection: Connection) -> Result<Self, MemoryError> {
        connection
            .busy_timeout(Duration::from_secs(5))
            .map_err(|error| {
                MemoryError::storage(format!("failed to configure sqlite busy timeout: {error}"))
            })?;
        initialize_schema(&connection)?;

        Ok(Self {
            connection: Mutex::new(Some(connection)),
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, Option<Connection>>, MemoryError> {
        self.connection
            .lock()
            .map_err(|_| MemoryError::storage("sqlite store lock poisoned"))
    }

    fn save(&self, session: &Session) -> Result<(), MemoryError> {
        let mut guard = self.connection()?;
        let conn = guard
            .as_mut()
            .ok_or_else(|| MemoryError::storage("sqlite store is closed"))?;

        let options_json = serde_json::to_string(&session.options).map_err(|error| {
            MemoryError::invalid_request(format!("failed to encode session options: {error}"))
        })?;
        let session_id = session.id.to_string();

        let tx = conn.transaction().map_err(|error| {
            MemoryError::storage(format!("failed to begin sqlite transaction: {error}"))
        })?;

        tx.execute(
            "
            INSERT INTO sessions (session_id, model, options_json, updated_at_secs)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(session_id) DO UPDATE SET
                model = excluded.model,
                options_json = excluded.options_json,
                updated_at_secs = excluded.updated_at_secs
            ",
            params![&session_id, &session.model, &options_json, now_secs()],
        )
        .map_err(|error| MemoryError::storage(format!("failed to upsert session: {error}")))?;

        tx.execute(
            "DELETE FROM session_messages WHERE session_id = ?1",
            params![&session_id],
        )
        .map_err(|error| {
            MemoryError::storage(format!("failed to clear session messages: {error}"))
        })?;

        {
            let mut insert = tx
                .prepare(
                    "
                    INSERT INTO session_messages (session_id, position, role, content)
                    VALUES (?1, ?2, ?3, ?4)
                    ",
                )
                .map_err(|error| {
                    MemoryError::storage(format!("failed to prepare message insert: {error}"))
                })?;

            for (position, message) in session.messages().iter().enumerate() {
                insert
                    .execute(params![
                        &session_id,
                        position as i64,
                        message.role.as_str(),
                        &message.content
                    ])
                    .map_err(|error| {
                        MemoryError::storage(format!("failed to insert session message: {error}"))
                    })?;
            }
        }

        tx.commit().map_err(|error| {
            MemoryError::storage(format!("failed to commit sqlite transaction: {error}"))
        })
    }

    fn load(&self, id: &SessionId) -> Result<Session, MemoryError> {
        let guard = self.connection()?;
        let conn = guard
            .as_ref()
            .ok_or_else(|| MemoryError::storage("sqlite store is closed"))?;
        let session_id = id.to_string();

        let row = conn
            .query_row(
                "SELECT model, options_json FROM sessions WHERE session_id = ?1",
                params![&session_id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()
            .map_err(|error| MemoryError::storage(format!("failed to load session: {error}")))?;

        let Some((model, options_json)) = row else {
            return Err(MemoryError::not_found("chat not found"));
        };

        let options: Options = serde_json::from_str(&options_json).map_err(|error| {
            MemoryError::storage(format!("failed to decode session options: {error}"))
        })?;

        let mut statement = conn
            .prepare(
                "
                SELECT role, content
                FROM session_messages
                WHERE session_id = ?1
                ORDER BY position ASC
                ",
            )
            .map_err(|error| {
                MemoryError::storage(format!("failed to prepare message query: {error}"))
            })?;

        let rows = statement
            .query_map(params![&session_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|error| {
                MemoryError::storage(format!("failed to query session messages: {error}"))
            })?;

        let mut messages = Vec::new();
        for row in rows {
            let (role, content) = row.map_err(|error| {
                MemoryError::storage(format!("failed to read session message: {error}"))
            })?;
            let role = role.parse::<Role>().map_err(|error| {
                MemoryError::storage(format!("failed to decode stored message: {error}"))
            })?;
            messages.push(Message::new(role, content));
        }

        Ok(Session::restore(*id, model, messages, options))
    }

    fn shutdown(&self) -> Result<(), MemoryError> {
        let mut guard = self.connection()?;
        match guard.take() {
            Some(connection) => connection.close().map_err(|(_, error)| {
                MemoryError::storage(format!("failed to close sqlite database: {error}"))
            }),
            None => Ok(()),
        }
    }
}

impl SessionStore for SqliteSessionStore {
    fn store<'a>(&'a self, session: &'a Session) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async move { self.save(session).map_err(ChatError::from) })
    }

    fn find<'a>(&'a self, id: &'a SessionId) -> ChatFuture<'a, Result<Session, ChatError>> {
        Box::pin(async move { self.load(id).map_err(ChatError::from) })
    }

    fn close<'a>(&'a self) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async move {
            self.shutdown().map_err(ChatError::from)?;
            tracing::info!("sqlite session store closed");
            Ok(())
        })
    }
}

fn initialize_schema(conn: &Connection) -> Result<(), MemoryError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;

        CREATE TABLE IF NOT EXISTS sessions (
            session_id TEXT PRIMARY KEY,
            model TEXT NOT NULL,
            options_json TEXT NOT NULL,
            updated_at_secs INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS session_messages (
            session_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            role TEXT NOT NULL,
            content TEXT NOT NULL,
            PRIMARY KEY (session_id, position)
        );
        ",
    )
    .map_err(|error| MemoryError::storage(format!("failed to initialize sqlite schema: {error}")))
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or_default()
}

/// `PARLEY_SQLITE_PATH`, else `~/.parley/sessions.sqlite3`.
pub fn default_sqlite_path() -> PathBuf {
    if let Some(explicit) = std::env::var_os("PARLEY_SQLITE_PATH") {
        return PathBuf::from(explicit);
    }

    if let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
        return PathBuf::from(home).join(".parley").join("sessions.sqlite3");
    }

    PathBuf::from("sessions.sqlite3")
}
