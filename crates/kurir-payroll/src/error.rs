//! # Service Error Types
//!
//! What a failed operation looks like to the HTTP layer.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in KurirPay                               │
//! │                                                                         │
//! │  ValidationError ─► CoreError ──┐                                      │
//! │                                  ├─► PayrollError ─► kind() ─► ApiError │
//! │  sqlx::Error ────► DbError ─────┘         │                            │
//! │                    (Rule(CoreError))      │                            │
//! │                                           ▼                            │
//! │        ErrorKind: VALIDATION_ERROR | NOT_FOUND | BUSINESS_RULE |       │
//! │                   CONFLICT | FORBIDDEN | INTERNAL                      │
//! │                                                                         │
//! │  The HTTP layer maps kinds to statuses (400/404/422/409/403/500).      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal failures are logged with their full detail and reach the caller
//! only as a generic message.

use serde::Serialize;
use thiserror::Error;

use kurir_core::{CoreError, ValidationError};
use kurir_db::DbError;

use crate::config::ConfigError;

// =============================================================================
// Payroll Error
// =============================================================================

/// Error returned by every service operation.
#[derive(Debug, Error)]
pub enum PayrollError {
    /// Domain rule or validation failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage failure (or a rule evaluated inside a transaction).
    #[error(transparent)]
    Db(#[from] DbError),

    /// The row changed between planning and writing an update.
    #[error("{0}")]
    Conflict(String),

    /// The caller's role does not allow this.
    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<ValidationError> for PayrollError {
    fn from(err: ValidationError) -> Self {
        PayrollError::Core(CoreError::Validation(err))
    }
}

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Bad input shape or range (400)
    ValidationError,
    /// Referenced entity absent (404)
    NotFound,
    /// Valid input that breaks a lifecycle rule (422)
    BusinessRule,
    /// Concurrent modification detected (409)
    Conflict,
    /// Role not allowed (403)
    Forbidden,
    /// Anything unexpected (500)
    Internal,
}

fn core_kind(err: &CoreError) -> ErrorKind {
    match err {
        CoreError::DeliveryNotFound(_)
        | CoreError::PaymentNotFound(_)
        | CoreError::NotificationNotFound(_)
        | CoreError::UserNotFound(_) => ErrorKind::NotFound,
        CoreError::PaidDeliveryLocked { .. }
        | CoreError::UserDeleteRefused { .. }
        | CoreError::InvalidStatusTransition { .. }
        | CoreError::PaymentStatusNotAllowed { .. } => ErrorKind::BusinessRule,
        CoreError::PayoutConflict { .. } => ErrorKind::Conflict,
        CoreError::AmountOverflow { .. } | CoreError::Validation(_) => ErrorKind::ValidationError,
    }
}

impl PayrollError {
    /// Category used by the HTTP layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PayrollError::Core(err) => core_kind(err),
            PayrollError::Db(DbError::Rule(err)) => core_kind(err),
            PayrollError::Db(DbError::NotFound { .. }) => ErrorKind::NotFound,
            PayrollError::Db(DbError::UniqueViolation { .. }) => ErrorKind::Conflict,
            PayrollError::Db(DbError::ForeignKeyViolation { .. }) => ErrorKind::ValidationError,
            PayrollError::Db(_) => ErrorKind::Internal,
            PayrollError::Conflict(_) => ErrorKind::Conflict,
            PayrollError::Forbidden(_) => ErrorKind::Forbidden,
            PayrollError::Config(_) => ErrorKind::Internal,
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        PayrollError::Forbidden(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        PayrollError::Conflict(message.into())
    }
}

/// Result type for service operations.
pub type PayrollResult<T> = Result<T, PayrollError>;

// =============================================================================
// API Error
// =============================================================================

/// Serialized error body for the HTTP layer.
///
/// ```json
/// {
///   "code": "BUSINESS_RULE",
///   "message": "Cannot modify a paid report (d-1: itemCount); unsettle payment first"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorKind,

    /// Human-readable error message for display
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorKind, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }
}

impl From<PayrollError> for ApiError {
    fn from(err: PayrollError) -> Self {
        let code = err.kind();
        match (&err, code) {
            (PayrollError::Db(DbError::ForeignKeyViolation { message }), _) => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::new(code, "Invalid reference")
            }
            (PayrollError::Db(DbError::UniqueViolation { field, .. }), _) => {
                ApiError::new(code, format!("{} already exists", field))
            }
            (_, ErrorKind::Internal) => {
                tracing::error!(error = %err, "Internal error");
                ApiError::new(code, "Internal server error")
            }
            _ => ApiError::new(code, err.to_string()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
