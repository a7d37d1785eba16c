//! # Repository Module
//!
//! Database repository implementations for KurirPay.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Service (kurir-payroll)                                                │
//! │       │                                                                 │
//! │       │  db.deliveries().get_by_id(id)                                 │
//! │       │  db.payments().settle(&request, &admin)                        │
//! │       ▼                                                                 │
//! │  Repositories (this module)                                            │
//! │  ├── user          identity rows                                       │
//! │  ├── delivery      reports, guarded updates, listings                  │
//! │  ├── payment       settlement transaction, history                     │
//! │  ├── audit         append-only audit trail                             │
//! │  ├── notification  per-user tray                                       │
//! │  └── settings      single settings row                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inserts that must be able to join a transaction ([`audit::insert_audit`],
//! [`notification::insert_notification`]) are free functions generic over
//! `sqlx::Executor`.

pub mod audit;
pub mod delivery;
pub mod notification;
pub mod payment;
pub mod settings;
pub mod user;
