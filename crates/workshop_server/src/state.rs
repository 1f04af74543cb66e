//! Shared application state.
//!
//! The server owns exactly one SQLite connection. Handlers borrow it through
//! [`AppState::with_conn`], which runs the synchronous store work on the
//! blocking pool while holding the connection mutex, so engine operations
//! never interleave inside this process.

use crate::error::AppError;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps a migrated connection; the caller keeps no other handle to it.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `f` with exclusive access to the connection.
    pub async fn with_conn<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Connection) -> Result<T, AppError> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let conn = db
                .lock()
                .map_err(|_| AppError::internal("database connection lock poisoned"))?;
            f(&conn)
        })
        .await
        .map_err(|err| AppError::internal("database task failed").with_source(err.into()))?
    }
}
