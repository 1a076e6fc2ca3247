use rusqlite::{Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocalStoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("local store lock poisoned")]
    Poisoned,
    #[error("blocking task failed: {0}")]
    Task(String),
    /// The state file was handed back for release; no further access.
    #[error("local store is closed")]
    Closed,
}

enum Handle {
    Unopened,
    Open(Connection),
    Closed,
}

/// Owned handle to the local state file.
pub struct LocalStore {
    path: PathBuf,
    handle: Mutex<Handle>,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            handle: Mutex::new(Handle::Unopened),
        }
    }

    pub fn is_open(&self) -> bool {
        self.handle
            .lock()
            .map(|guard| matches!(*guard, Handle::Open(_)))
            .unwrap_or(false)
    }

    pub fn is_closed(&self) -> bool {
        self.handle
            .lock()
            .map(|guard| matches!(*guard, Handle::Closed))
            .unwrap_or(false)
    }

    fn open(&self) -> Result<Connection, LocalStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let connection = Connection::open(&self.path)?;
        connection.execute(r#"CREATE TABLE IF NOT EXISTS "welcome" ( "count" INTEGER )"#, [])?;

        tracing::info!("Opened local state at {:?}", self.path);
        Ok(connection)
    }

    /// Runs `f` on the connection, opening it first if needed. Fails with
    /// `Closed` once `close` has run.
    fn with_connection<T, F>(&self, f: F) -> Result<T, LocalStoreError>
    where
        F: FnOnce(&Connection) -> Result<T, LocalStoreError>,
    {
        let mut guard = self.handle.lock().map_err(|_| LocalStoreError::Poisoned)?;

        if let Handle::Unopened = *guard {
            *guard = Handle::Open(self.open()?);
        }
        match &*guard {
            Handle::Open(connection) => f(connection),
            _ => Err(LocalStoreError::Closed),
        }
    }

    /// Increments the visit counter, creating its row on the first visit.
    pub fn increment_visits(&self) -> Result<i64, LocalStoreError> {
        self.with_connection(|connection| {
            let tx = connection.unchecked_transaction()?;

            let current: Option<i64> = tx
                .query_row(r#"SELECT "count" FROM "welcome""#, [], |row| row.get(0))
                .optional()?;

            let count = match current {
                Some(count) => {
                    tx.execute(r#"UPDATE "welcome" SET "count" = ?1"#, [count + 1])?;
                    count + 1
                }
                None => {
                    tx.execute(r#"INSERT INTO "welcome" VALUES (?1)"#, [1i64])?;
                    1
                }
            };

            tx.commit()?;
            Ok(count)
        })
    }

    /// Current visit count. Reads nothing (and creates nothing) if the state
    /// file does not exist yet.
    pub fn visits(&self) -> Result<i64, LocalStoreError> {
        if self.is_closed() {
            return Err(LocalStoreError::Closed);
        }
        if !self.is_open() && !self.path.exists() {
            return Ok(0);
        }

        self.with_connection(|connection| {
            let count: Option<i64> = connection
                .query_row(r#"SELECT "count" FROM "welcome""#, [], |row| row.get(0))
                .optional()?;
            Ok(count.unwrap_or(0))
        })
    }

    /// `increment_visits` off the async runtime.
    pub async fn record_visit(self: Arc<Self>) -> Result<i64, LocalStoreError> {
        tokio::task::spawn_blocking(move || self.increment_visits())
            .await
            .map_err(|e| LocalStoreError::Task(e.to_string()))?
    }

    /// Drops the connection so the file on disk is complete and unlocked.
    /// The store stays closed: later reads and writes fail with `Closed`
    /// instead of reopening a file that is being released.
    pub fn close(&self) {
        let mut guard = match self.handle.lock() {
            Ok(guard) => guard,
            // Close even if a holder panicked.
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Handle::Open(_) = std::mem::replace(&mut *guard, Handle::Closed) {
            tracing::info!("Closed local state at {:?}", self.path);
        }
    }
}
