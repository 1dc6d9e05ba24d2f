//! Embedded SQLite handle and scoped units of work.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use thiserror::Error;
use tracing::{debug, warn};

/// How long a writer waits on another process's lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Low-level storage failure.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database connection lock poisoned")]
    LockPoisoned,
}

/// Error type of a unit of work.
///
/// A unit of work may end in an error that is an ordinary outcome (a missing
/// row, a rejected input). Those still commit. Only faults roll back.
pub trait UnitOfWorkError: From<DbError> {
    fn is_fault(&self) -> bool;
}

impl UnitOfWorkError for DbError {
    fn is_fault(&self) -> bool {
        true
    }
}

/// Handle to a single-file embedded database.
///
/// The handle is constructed explicitly and passed to whatever needs storage.
/// It owns one connection; callers are serialized on it.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (creating if needed) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "Opened database");
        Self::from_connection(conn)
    }

    /// Open a private in-memory database (useful for testing).
    pub fn in_memory() -> Result<Self, DbError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, DbError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DbError> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    /// Run `f` against the raw connection, outside of any explicit transaction.
    pub fn with_connection<T, F>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Connection) -> Result<T, DbError>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Run `f` inside one transaction.
    ///
    /// Commits when `f` returns `Ok` or a non-fault error, rolls back on a
    /// fault. The connection lock is released on every path.
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: UnitOfWorkError,
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(DbError::from)?;

        match f(&tx) {
            Ok(value) => {
                tx.commit().map_err(DbError::from)?;
                Ok(value)
            }
            Err(err) if err.is_fault() => {
                match tx.rollback() {
                    Ok(()) => warn!("Transaction rolled back after storage fault"),
                    Err(rollback_err) => warn!(error = %rollback_err, "Rollback failed"),
                }
                Err(err)
            }
            Err(err) => {
                tx.commit().map_err(DbError::from)?;
                Err(err)
            }
        }
    }
}
