//! Session rows and CSRF token issuance.

use chrono::Utc;
use hrms_core::token::generate_hash;
use hrms_core::{BootError, SessionContext, SessionId, SessionService, TransactionManager};
use rusqlite::OptionalExtension;
use tracing::{debug, instrument, warn};

use crate::database::Database;
use crate::error::StoreError;

/// Sessions backed by the shared connection.
#[derive(Clone)]
pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    /// Wrap a database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Start a session for `user`.
    ///
    /// Joins the pending transaction if one is open.
    #[instrument(skip(self))]
    pub fn create_session(&self, user: &str) -> Result<SessionContext, StoreError> {
        let session_id = SessionId::generate();
        let now = Utc::now().to_rfc3339();

        self.db.with_conn(|conn| {
            let _ = conn.execute(
                "INSERT INTO sessions (sid, user, csrf_token, created_at, last_updated)
                 VALUES (?1, ?2, NULL, ?3, ?3)",
                rusqlite::params![session_id.as_str(), user, now],
            )?;
            Ok(())
        })?;

        Ok(SessionContext {
            session_id,
            user: user.to_string(),
        })
    }

    /// Look up a session by id.
    #[instrument(skip(self, sid))]
    pub fn resolve(&self, sid: &str) -> Result<Option<SessionContext>, StoreError> {
        self.db.with_conn(|conn| {
            let user: Option<String> = conn
                .query_row("SELECT user FROM sessions WHERE sid = ?1", [sid], |row| row.get(0))
                .optional()?;
            Ok(user.map(|user| SessionContext {
                session_id: SessionId::from_raw(sid),
                user,
            }))
        })
    }

    /// The session's token, generating and staging one if absent.
    ///
    /// A generated token is written inside a transaction left open on the
    /// shared connection; it becomes visible elsewhere after [`Self::commit`].
    #[instrument(skip(self, session), fields(user = %session.user))]
    pub fn csrf_token(&self, session: &SessionContext) -> Result<String, StoreError> {
        let sid = session.session_id.as_str();
        self.db.with_conn(|conn| {
            let stored: Option<Option<String>> = conn
                .query_row("SELECT csrf_token FROM sessions WHERE sid = ?1", [sid], |row| {
                    row.get(0)
                })
                .optional()?;

            match stored {
                None => Err(StoreError::NotFound(format!("session {sid}"))),
                Some(Some(token)) if !token.is_empty() => Ok(token),
                Some(_) => {
                    let token = generate_hash();
                    if conn.is_autocommit() {
                        conn.execute_batch("BEGIN IMMEDIATE")?;
                    }
                    let _ = conn.execute(
                        "UPDATE sessions SET csrf_token = ?1, last_updated = ?2 WHERE sid = ?3",
                        rusqlite::params![token, Utc::now().to_rfc3339(), sid],
                    )?;
                    debug!("csrf token staged");
                    Ok(token)
                }
            }
        })
    }

    /// Commit the open transaction, if any.
    ///
    /// A failed commit rolls the transaction back, discarding staged tokens.
    pub fn commit(&self) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            if conn.is_autocommit() {
                return Ok(());
            }
            if let Err(e) = conn.execute_batch("COMMIT") {
                if !conn.is_autocommit() {
                    if let Err(rollback) = conn.execute_batch("ROLLBACK") {
                        warn!(error = %rollback, "rollback after failed commit failed");
                    }
                }
                warn!(error = %e, "commit failed, pending session writes discarded");
                return Err(e.into());
            }
            debug!("pending session writes committed");
            Ok(())
        })
    }

    /// Whether writes are waiting on [`Self::commit`].
    pub fn has_pending(&self) -> bool {
        self.db.with_conn(|conn| Ok(!conn.is_autocommit())).unwrap_or(false)
    }
}

impl SessionService for SessionStore {
    fn issue_csrf_token(&self, session: &SessionContext) -> hrms_core::Result<String> {
        self.csrf_token(session)
            .map_err(|e| BootError::Session(e.to_string()))
    }
}

impl TransactionManager for SessionStore {
    fn commit_pending(&self) -> hrms_core::Result<()> {
        self.commit()
            .map_err(|e| BootError::Transaction(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrms_core::token::HASH_LEN;
    use rusqlite::Connection;

    fn store() -> SessionStore {
        SessionStore::new(Database::in_memory().unwrap())
    }

    #[test]
    fn create_and_resolve() {
        let store = store();
        let session = store.create_session("jane@example.com").unwrap();
        let resolved = store.resolve(session.session_id.as_str()).unwrap().unwrap();
        assert_eq!(resolved, session);
    }

    #[test]
    fn resolve_unknown_sid() {
        assert!(store().resolve("nope").unwrap().is_none());
    }

    #[test]
    fn token_generated_on_first_use() {
        let store = store();
        let session = store.create_session("jane@example.com").unwrap();
        let token = store.csrf_token(&session).unwrap();
        assert_eq!(token.len(), HASH_LEN);
        assert!(store.has_pending());
    }

    #[test]
    fn token_stable_within_session() {
        let store = store();
        let session = store.create_session("jane@example.com").unwrap();
        let first = store.csrf_token(&session).unwrap();
        store.commit().unwrap();
        let second = store.csrf_token(&session).unwrap();
        assert_eq!(first, second);
        assert!(!store.has_pending(), "re-reading a token writes nothing");
    }

    #[test]
    fn tokens_differ_across_sessions() {
        let store = store();
        let a = store.create_session("jane@example.com").unwrap();
        let b = store.create_session("jane@example.com").unwrap();
        assert_ne!(store.csrf_token(&a).unwrap(), store.csrf_token(&b).unwrap());
    }

    #[test]
    fn token_for_unknown_session_fails() {
        let session = SessionContext {
            session_id: SessionId::from_raw("ghost"),
            user: "nobody".into(),
        };
        let err = store().issue_csrf_token(&session).unwrap_err();
        assert!(matches!(err, BootError::Session(_)));
    }

    #[test]
    fn commit_without_pending_is_noop() {
        let store = store();
        store.commit_pending().unwrap();
        assert!(!store.has_pending());
    }

    #[test]
    fn failed_commit_rolls_back() {
        let store = store();
        let session = store.create_session("jane@example.com").unwrap();
        store
            .db
            .with_conn(|conn| {
                conn.execute_batch(
                    "PRAGMA foreign_keys = ON;
                     CREATE TABLE parent (id INTEGER PRIMARY KEY);
                     CREATE TABLE child (
                         parent_id INTEGER REFERENCES parent(id) DEFERRABLE INITIALLY DEFERRED
                     );",
                )?;
                Ok(())
            })
            .unwrap();

        let _ = store.csrf_token(&session).unwrap();
        store
            .db
            .with_conn(|conn| {
                let _ = conn.execute("INSERT INTO child (parent_id) VALUES (99)", [])?;
                Ok(())
            })
            .unwrap();

        let err = store.commit_pending().unwrap_err();
        assert!(matches!(err, BootError::Transaction(_)));
        assert!(!store.has_pending());

        let stored: Option<String> = store
            .db
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT csrf_token FROM sessions WHERE sid = ?1",
                    [session.session_id.as_str()],
                    |row| row.get(0),
                )?)
            })
            .unwrap();
        assert_eq!(stored, None);
    }

    #[test]
    fn token_invisible_to_other_connections_until_commit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.db");
        let store = SessionStore::new(Database::open(&path).unwrap());
        let session = store.create_session("jane@example.com").unwrap();

        let token = store.csrf_token(&session).unwrap();

        let reader = Connection::open(&path).unwrap();
        let read = |conn: &Connection| -> Option<String> {
            conn.query_row(
                "SELECT csrf_token FROM sessions WHERE sid = ?1",
                [session.session_id.as_str()],
                |row| row.get(0),
            )
            .unwrap()
        };
        assert_eq!(read(&reader), None);

        store.commit_pending().unwrap();
        assert_eq!(read(&reader), Some(token));
    }
}
