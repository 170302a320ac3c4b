//! # Error Types
//!
//! Domain-specific error types for moto-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  moto-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  moto-db errors (separate crate)                                       │
//! │  └── DbError          - Database failures (wraps CoreError too)        │
//! │                                                                         │
//! │  moto-api errors (server)                                              │
//! │  └── ApiError         - JSON body + HTTP status the client sees        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::status::{Availability, ItemKind, ModerationStatus, TransactionStatus};

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Listing does not exist.
    #[error("{kind} not found: {id}")]
    ItemNotFound { kind: ItemKind, id: String },

    /// Reservation attempted on an item that is not `available`.
    ///
    /// ## User Workflow
    /// ```text
    /// Request A reserves moto X ──► X becomes "sold"
    ///                                   │
    /// Request B reserves moto X ────────┘
    ///      │
    ///      ▼
    /// ItemUnavailable { current: Sold }
    ///      │
    ///      ▼
    /// Client shows: "Item is not available (current state: sold)"
    /// ```
    #[error("{kind} {id} is not available (current state: {current})")]
    ItemUnavailable {
        kind: ItemKind,
        id: String,
        current: Availability,
    },

    /// Availability change outside the allowed state graph.
    #[error("Cannot change availability from {from} to {to}")]
    InvalidAvailabilityTransition { from: Availability, to: Availability },

    /// Moderation change outside the allowed state graph.
    #[error("Cannot change listing status from {from} to {to}")]
    InvalidModerationTransition {
        from: ModerationStatus,
        to: ModerationStatus,
    },

    /// Transaction is not in a state that allows the requested operation.
    #[error("Transaction {id} is {current}, cannot change it to {requested}")]
    InvalidTransactionStatus {
        id: String,
        current: TransactionStatus,
        requested: TransactionStatus,
    },

    /// Transaction does not exist.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// User does not exist.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// The caller may not touch this resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Owners may not rate their own listings.
    #[error("You cannot review your own {kind}")]
    OwnListingReview { kind: ItemKind },

    /// One review per user per item.
    #[error("You have already reviewed this {kind}")]
    AlreadyReviewed { kind: ItemKind },

    /// A guarded update found the row in a different state than it read.
    #[error("{kind} {id} was modified by another request, reload and try again")]
    ConcurrentUpdate { kind: ItemKind, id: String },

    /// Listing still referenced by a transaction awaiting validation.
    #[error("{kind} {id} has transactions pending validation")]
    HasOpenTransactions { kind: ItemKind, id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Produced before any business logic or database work runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid email, invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_names_current_state() {
        let err = CoreError::ItemUnavailable {
            kind: ItemKind::Motorcycle,
            id: "moto-1".to_string(),
            current: Availability::Sold,
        };
        assert_eq!(
            err.to_string(),
            "Motorcycle moto-1 is not available (current state: sold)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("itemId");
        assert_eq!(err.to_string(), "itemId is required");
        assert_eq!(err.field(), "itemId");

        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 8,
        };
        assert_eq!(err.to_string(), "password must be at least 8 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("amountPaid").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_transition_messages() {
        let err = CoreError::InvalidTransactionStatus {
            id: "tx-1".to_string(),
            current: TransactionStatus::Cancelled,
            requested: TransactionStatus::Validated,
        };
        assert_eq!(
            err.to_string(),
            "Transaction tx-1 is cancelled, cannot change it to validated"
        );
    }
}
