//! # Engine Error Types
//!
//! Error types for engine operations and background persistence.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Engine Error Categories                             │
//! │                                                                         │
//! │  Returned from the operation itself (phase 1, synchronous):            │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Validation    │  │    NotFound     │  │     Configuration       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │ negative qty    │  │ id not in cache │  │  InvalidConfig          │ │
//! │  │ empty name      │  │                 │  │  ConfigLoadFailed       │ │
//! │  │ bad price text  │  │                 │  │  ConfigSaveFailed       │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Observable only through PersistHandle (phase 2, background):          │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  PersistError::Store      store write failed, cache kept        │   │
//! │  │  PersistError::WorkerGone persistence worker no longer running  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use stockroom_core::ValidationError;
use stockroom_db::DbError;
use thiserror::Error;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors reported synchronously by engine operations.
///
/// None of these ever describes a store write; a failed write shows up
/// only as a [`PersistError`].
#[derive(Debug, Error)]
pub enum EngineError {
    // =========================================================================
    // Operation Errors
    // =========================================================================
    /// Input rejected before any mutation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The targeted id is not in the cache.
    #[error("Item not found: {0}")]
    NotFound(String),

    /// An awaited store read failed (startup rehydration, `load_all`).
    #[error("Store error: {0}")]
    Store(#[from] DbError),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid engine configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for EngineError {
    fn from(err: toml::ser::Error) -> Self {
        EngineError::ConfigSaveFailed(err.to_string())
    }
}

impl EngineError {
    /// Returns true if the caller supplied bad input.
    pub fn is_validation(&self) -> bool {
        matches!(self, EngineError::Validation(_))
    }

    /// Returns true if the target id was absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::NotFound(_))
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidConfig(_)
                | EngineError::ConfigLoadFailed(_)
                | EngineError::ConfigSaveFailed(_)
        )
    }
}

// =============================================================================
// Persistence Errors
// =============================================================================

/// The kind of store write a persistence job performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Put,
    Delete,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreOp::Put => write!(f, "put"),
            StoreOp::Delete => write!(f, "delete"),
        }
    }
}

/// Outcome of a background store write, seen only through a `PersistHandle`.
///
/// The cache mutation that queued the write has already been applied and
/// stays applied whatever this reports.
#[derive(Debug, Clone, Error)]
pub enum PersistError {
    /// The store rejected or failed the write (StorePersistenceError).
    #[error("Store {op} failed for item {id}: {source}")]
    Store {
        id: String,
        op: StoreOp,
        #[source]
        source: DbError,
    },

    /// The persistence worker stopped before reporting.
    #[error("Persistence worker is not running")]
    WorkerGone,
}

impl PersistError {
    /// The item id the failed write targeted, if any.
    pub fn item_id(&self) -> Option<&str> {
        match self {
            PersistError::Store { id, .. } => Some(id),
            PersistError::WorkerGone => None,
        }
    }
}
