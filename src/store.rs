use std::path::PathBuf;

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{info, warn};

use crate::domain::{NewUser, User};
use crate::error::StoreError;

/// Fixed database file, created in the working directory on first run.
pub const DEFAULT_DB_FILE: &str = "userdesk.db";

/// Store configuration
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    pub db_path: PathBuf,
}

impl StoreConfig {
    /// Create a new store config pointing at the given database file
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_FILE)
    }
}

/// Data-access layer for the `users` table.
///
/// Every operation opens its own connection and drops it on return, success
/// or failure. Holds no state between calls other than the database file.
pub struct UserStore {
    config: StoreConfig,
}

impl UserStore {
    /// Create a new store with the given config
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    fn open(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open(&self.config.db_path)?)
    }

    /// Idempotently create the `users` table. Callers treat a failure here
    /// as fatal at startup.
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        let conn = self.open()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE
            )",
            params![],
        )?;
        info!(path = %self.config.db_path.display(), "users table ready");
        Ok(())
    }

    /// Insert a new user and return the id SQLite assigned to it.
    pub fn add(&self, user: &NewUser) -> Result<i64, StoreError> {
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO users (name, email) VALUES (?1, ?2)",
            params![user.name, user.email],
        )
        .map_err(|err| {
            warn!(email = %user.email, error = %err, "insert failed");
            email_conflict(err, &user.email)
        })?;
        Ok(conn.last_insert_rowid())
    }

    /// List all users in id order (equals insertion order for this schema).
    pub fn get_all(&self) -> Result<Vec<User>, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare("SELECT id, name, email FROM users ORDER BY id")?;
        let rows = stmt.query_map([], row_to_user)?;
        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }

    /// Single-row lookup by primary key; `Ok(None)` when no row matches.
    pub fn get_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let conn = self.open()?;
        let user = conn
            .query_row(
                "SELECT id, name, email FROM users WHERE id = ?1",
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Update name and email of the row matching `user.id`.
    pub fn update(&self, user: &User) -> Result<(), StoreError> {
        let conn = self.open()?;
        let affected = conn
            .execute(
                "UPDATE users SET name = ?1, email = ?2 WHERE id = ?3",
                params![user.name, user.email, user.id],
            )
            .map_err(|err| {
                warn!(id = user.id, error = %err, "update failed");
                email_conflict(err, &user.email)
            })?;
        if affected == 0 {
            warn!(id = user.id, "update matched no row");
            return Err(StoreError::NotFound(user.id));
        }
        Ok(())
    }

    /// Remove the row matching `id`.
    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.open()?;
        let affected = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
        if affected == 0 {
            warn!(id, "delete matched no row");
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
    })
}

/// Map a UNIQUE violation on the email column to its own error tag.
fn email_conflict(err: rusqlite::Error, email: &str) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(code, _)
            if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::EmailTaken(email.to_string())
        }
        _ => StoreError::Database(err),
    }
}
