//! # kurir-core: Pure Business Logic for KurirPay
//!
//! This crate holds the payroll rules as pure functions with zero I/O
//! dependencies. Everything that decides *whether* a delivery may change or
//! *how much* a payout is worth lives here; persistence lives in `kurir-db`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KurirPay Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 HTTP layer (outside this workspace)             │   │
//! │  │    auth, routing, CORS, rate limiting ──► Caller identity      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kurir-payroll (services)                     │   │
//! │  │    DeliveryService, PayoutService, AuditRecorder, Notifier     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kurir-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ lifecycle │  │  payout   │  │ validation│  │   │
//! │  │   │ Delivery  │  │  Patch    │  │  Request  │  │   rules   │  │   │
//! │  │   │  Payment  │  │  Planner  │  │  Totals   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kurir-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Delivery, Payment, AuditLogEntry, etc.)
//! - [`money`] - Money type with checked integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//! - [`lifecycle`] - Delivery creation and the guarded update planner
//! - [`payout`] - Payout request validation and settlement totals
//! - [`rate`] - Per-item rate fallback rule
//! - [`notice`] - Notification texts for status changes and payouts
//!
//! ## Example Usage
//!
//! ```rust
//! use kurir_core::lifecycle::{plan_update, DeliveryPatch};
//! use kurir_core::{DeliveryStatus, PaymentStatus};
//! # use kurir_core::Delivery;
//! # use chrono::{NaiveDate, Utc};
//! # let now = Utc::now();
//! # let delivery = Delivery {
//! #     id: "d-1".into(), courier_id: "c-1".into(),
//! #     date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
//! #     item_count: 10, rate_per_item: 3000, total_amount: 30_000,
//! #     status: DeliveryStatus::Approved, payment_status: PaymentStatus::PendingRequest,
//! #     payment_id: None, notes: None, proof_reference: None,
//! #     created_at: now, updated_at: now,
//! # };
//!
//! // Rejecting a report that asked for payment resets it to UNPAID
//! let patch = DeliveryPatch {
//!     status: Some(DeliveryStatus::Rejected),
//!     ..Default::default()
//! };
//! let update = plan_update(&delivery, &patch).unwrap();
//! assert_eq!(update.payment_status, PaymentStatus::Unpaid);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod lifecycle;
pub mod money;
pub mod notice;
pub mod payout;
pub mod rate;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use kurir_core::Money` instead of
// `use kurir_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Per-item rate used when no usable rate is configured.
pub const DEFAULT_DELIVERY_RATE: i64 = 3000;

/// Page size when the caller does not ask for one.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Upper bound for a requested page size.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Maximum length of delivery and payout notes.
pub const MAX_NOTES_LENGTH: usize = 1000;

/// Maximum deliveries settled by a single payout.
///
/// ## Business Reason
/// A courier is paid weekly or monthly; a month of daily reports is far
/// below this. Larger batches usually mean a selection bug in the client.
pub const MAX_PAYOUT_DELIVERIES: usize = 500;

/// Maximum length of the application display name.
pub const MAX_APP_NAME_LENGTH: usize = 100;

/// Maximum length of a user's display name.
pub const MAX_USER_NAME_LENGTH: usize = 100;

/// Maximum length of an email address (RFC 5321 path limit).
pub const MAX_EMAIL_LENGTH: usize = 254;
