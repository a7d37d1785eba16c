//! # Error Types
//!
//! Domain-specific error types for kurir-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kurir-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations, missing entities     │
//! │  └── ValidationError  - Input shape/range failures                     │
//! │                                                                         │
//! │  kurir-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  kurir-payroll errors                                                  │
//! │  └── PayrollError     - What the HTTP layer sees (kind + message)      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → PayrollError → ApiError           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (delivery ID, field names)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to exactly one error kind at the API boundary

use thiserror::Error;

use crate::types::{DeliveryStatus, PaymentStatus};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// Every variant is detected before anything is written.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Delivery report cannot be found.
    #[error("Delivery not found: {0}")]
    DeliveryNotFound(String),

    /// Payment record cannot be found.
    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    /// Notification cannot be found for the requesting user.
    #[error("Notification not found: {0}")]
    NotificationNotFound(String),

    /// User account cannot be found.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// A user still referenced by settled payouts cannot be removed.
    ///
    /// Deleting them would take PAID deliveries with them and leave
    /// payments whose amount no longer matches what they settled.
    #[error("User {user_id} cannot be deleted: {reason}")]
    UserDeleteRefused { user_id: String, reason: String },

    /// A settled delivery was asked to change a financial field.
    ///
    /// ## When This Occurs
    /// ```text
    /// Delivery { payment_status: PAID, item_count: 10 }
    ///      │
    ///      ▼
    /// Update { item_count: 20 }
    ///      │
    ///      ▼
    /// PaidDeliveryLocked { fields: ["itemCount"] }
    /// ```
    #[error("Cannot modify a paid report ({delivery_id}: {}); unsettle payment first", .fields.join(", "))]
    PaidDeliveryLocked {
        delivery_id: String,
        fields: Vec<String>,
    },

    /// The requested status change is not part of the lifecycle.
    ///
    /// Approved and rejected reports never return to PENDING.
    #[error("Delivery {delivery_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        delivery_id: String,
        from: DeliveryStatus,
        to: DeliveryStatus,
    },

    /// The requested payment status cannot be set through an update.
    ///
    /// ## When This Occurs
    /// - Setting PAID directly (only the payout engine settles deliveries)
    /// - Requesting a payout for a report that is not approved
    #[error("Delivery {delivery_id} cannot be set to {requested}: {reason}")]
    PaymentStatusNotAllowed {
        delivery_id: String,
        requested: PaymentStatus,
        reason: String,
    },

    /// Some deliveries in a payout batch were missing, owned by another
    /// courier, or already settled by a concurrent payout.
    #[error("Some deliveries are invalid or already paid (requested {requested}, settleable {settled})")]
    PayoutConflict { requested: usize, settled: usize },

    /// A monetary computation left the i64 range.
    #[error("{field} is too large")]
    AmountOverflow { field: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
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

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., the same delivery twice in one payout).
    #[error("{field} '{value}' is listed more than once")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
