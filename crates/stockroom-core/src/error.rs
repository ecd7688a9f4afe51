//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  └── ValidationError  - Input rejected before any mutation             │
//! │                                                                         │
//! │  stockroom-db errors (separate crate)                                  │
//! │  └── DbError          - Store operation failures                       │
//! │                                                                         │
//! │  stockroom-sync errors                                                 │
//! │  ├── EngineError      - What callers of the engine see                 │
//! │  └── PersistError     - Background write outcome (side channel)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any state changes; a rejected operation leaves both the
/// cache and the store untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value must be strictly greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (non-numeric quantity, malformed date, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub(crate) fn invalid_format(field: &str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
