//! # Error Types
//!
//! Domain-specific error types for quote-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  quote-core errors (this file)                                         │
//! │  ├── CoreError        - Quotation tree / domain errors                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  quote-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → caller                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (room id, item id, etc.)
//! 3. Errors are enum variants, never String
//!
//! Note that the pricing engine has no error type at all: absent numeric
//! inputs normalize to zero and every division is guarded, so pricing is
//! total by construction.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Quotation-tree and domain logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Room id does not exist in the quotation.
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    /// Line item id does not exist in the given room.
    #[error("Line item not found: {0}")]
    ItemNotFound(String),

    /// A quotation must keep at least one room.
    #[error("Cannot remove the last remaining room")]
    LastRoom,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements, before any
/// business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid percentage).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
