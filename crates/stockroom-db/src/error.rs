//! # Database Error Types
//!
//! Error types for store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ├──► EngineError::Store   (startup rehydration, awaited reads)   │
//! │       │                                                                 │
//! │       └──► PersistError::Store  (background writes, logged only)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Store operation errors.
///
/// Carries only strings so the error can be cloned into logs and
/// persistence reports.
#[derive(Debug, Clone, Error)]
pub enum DbError {
    /// A CHECK or NOT NULL constraint rejected the row.
    ///
    /// ## When This Occurs
    /// - Negative quantity or price reached the store (engine bug)
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// The store refused the operation (in-memory store with writes disabled).
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → ConstraintViolation / QueryFailed
/// sqlx::Error::PoolTimedOut   → PoolExhausted
/// sqlx::Error::PoolClosed     → ConnectionFailed
/// Other                       → Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "CHECK constraint failed: ..." / "NOT NULL constraint failed: ..."
                if msg.contains("constraint failed") {
                    DbError::ConstraintViolation(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
