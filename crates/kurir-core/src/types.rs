//! # Domain Types
//!
//! Core domain types used throughout KurirPay.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Delivery     │   │     Payment     │   │  AuditLogEntry  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │──►│  id (UUID)      │   │  user_id        │       │
//! │  │  courier_id     │   │  courier_id     │   │  action         │       │
//! │  │  item_count     │   │  amount (Σ)     │   │  entity/_id     │       │
//! │  │  rate_per_item  │   │  method         │   │  details (JSON) │       │
//! │  │  total_amount   │   │  admin_id       │   └─────────────────┘       │
//! │  │  payment_id ────┘   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ DeliveryStatus  │   │  PaymentStatus  │   │ PaymentMethod   │       │
//! │  │  PENDING        │   │  UNPAID         │   │  CASH           │       │
//! │  │  APPROVED       │   │  PENDING_REQUEST│   │  TRANSFER       │       │
//! │  │  REJECTED       │   │  PAID           │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! JSON field names are camelCase and enum values SCREAMING_SNAKE_CASE,
//! matching what the dashboard frontend already speaks.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

// =============================================================================
// Roles & Caller Identity
// =============================================================================

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Courier,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Courier => "COURIER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The already-authenticated identity behind a request.
///
/// Token issuance and verification happen in the HTTP layer; services only
/// ever see this resolved form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caller {
    pub user_id: String,
    pub role: Role,
    /// Client address recorded in the audit trail.
    pub ip_address: Option<String>,
}

impl Caller {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Caller {
            user_id: user_id.into(),
            role,
            ip_address: None,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Caller::new(user_id, Role::Admin)
    }

    pub fn courier(user_id: impl Into<String>) -> Self {
        Caller::new(user_id, Role::Courier)
    }

    /// Attaches the client IP address.
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// =============================================================================
// Delivery Status
// =============================================================================

/// Review state of a delivery report.
///
/// ```text
/// PENDING ──► APPROVED
///    │           ▲ │
///    │           │ ▼
///    └──────► REJECTED
///
/// (nothing returns to PENDING)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    /// Submitted by the courier, waiting for review.
    Pending,
    /// Accepted by an administrator; eligible for payout.
    Approved,
    /// Refused by an administrator; never paid.
    Rejected,
}

impl DeliveryStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "PENDING",
            DeliveryStatus::Approved => "APPROVED",
            DeliveryStatus::Rejected => "REJECTED",
        }
    }
}

impl Default for DeliveryStatus {
    fn default() -> Self {
        DeliveryStatus::Pending
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Settlement state of a delivery report.
///
/// `UNPAID → PENDING_REQUEST` is the courier asking for a payout,
/// `→ PAID` only ever happens inside the payout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unpaid,
    PendingRequest,
    Paid,
}

impl PaymentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "UNPAID",
            PaymentStatus::PendingRequest => "PENDING_REQUEST",
            PaymentStatus::Paid => "PAID",
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Unpaid
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Handed over in cash at the depot.
    Cash,
    /// Bank transfer.
    Transfer,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Transfer => "TRANSFER",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Delivery
// =============================================================================

/// A courier's delivery-count report for one working day.
///
/// ## Snapshot Pattern
/// `rate_per_item` is copied from the settings at creation time and never
/// re-read, so a later rate change only affects future reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning courier.
    pub courier_id: String,

    /// Day the work was performed (not necessarily the submission day).
    #[ts(as = "String")]
    pub date: NaiveDate,

    /// Packages delivered, always >= 1.
    pub item_count: i64,

    /// Rate in effect when the report was created.
    pub rate_per_item: i64,

    /// item_count × rate_per_item.
    pub total_amount: i64,

    pub status: DeliveryStatus,

    pub payment_status: PaymentStatus,

    /// Settling payment; present exactly when `payment_status` is PAID.
    pub payment_id: Option<String>,

    pub notes: Option<String>,

    /// Proof-of-delivery reference (photo URL or storage key).
    pub proof_reference: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Delivery {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_units(self.total_amount)
    }

    /// Returns the snapshotted rate as Money.
    #[inline]
    pub fn rate(&self) -> Money {
        Money::from_units(self.rate_per_item)
    }

    #[inline]
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Checks `total_amount == item_count × rate_per_item`.
    pub fn is_total_consistent(&self) -> bool {
        self.rate().checked_mul_count(self.item_count) == Some(self.total())
    }
}

// =============================================================================
// Payment
// =============================================================================

/// One settled payout covering a batch of deliveries.
///
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub courier_id: String,
    /// Sum of the settled deliveries' totals, computed server-side.
    pub amount: i64,
    pub method: PaymentMethod,
    pub notes: Option<String>,
    /// Administrator who settled the payout.
    pub admin_id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
}

impl Payment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_units(self.amount)
    }
}

/// Payment joined with the courier's display identity (settlement history view).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentWithCourier {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub payment: Payment,
    pub courier_name: String,
    pub courier_email: String,
}

// =============================================================================
// Users
// =============================================================================

/// Minimal user identity (authentication lives outside this workspace).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Profile edit of a user account. Role and credentials are not editable here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserPatch {
    /// Trims the name, normalises the email and checks both.
    pub fn validated(&self) -> Result<UserPatch, crate::error::ValidationError> {
        let name = match &self.name {
            Some(name) => Some(crate::validation::validate_user_name(name)?),
            None => None,
        };
        let email = match &self.email {
            Some(email) => Some(crate::validation::validate_email(email)?),
            None => None,
        };
        Ok(UserPatch { name, email })
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.name.is_some() {
            names.push("name");
        }
        if self.email.is_some() {
            names.push("email");
        }
        names
    }
}

// =============================================================================
// Audit Log
// =============================================================================

/// Append-only record of a mutating action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: String,
    pub user_id: String,
    /// e.g. `CREATE_DELIVERY`; stored as text so historical actions stay readable.
    pub action: String,
    /// e.g. `Delivery`, `Payment`.
    pub entity: String,
    pub entity_id: Option<String>,
    /// Serialized JSON payload.
    pub details: Option<String>,
    pub ip_address: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Mutating actions recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    CreateDelivery,
    UpdateDelivery,
    DeleteDelivery,
    CreatePayout,
    UpdateSettings,
    UpdateUser,
    DeleteUser,
}

impl AuditAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AuditAction::CreateDelivery => "CREATE_DELIVERY",
            AuditAction::UpdateDelivery => "UPDATE_DELIVERY",
            AuditAction::DeleteDelivery => "DELETE_DELIVERY",
            AuditAction::CreatePayout => "CREATE_PAYOUT",
            AuditAction::UpdateSettings => "UPDATE_SETTINGS",
            AuditAction::UpdateUser => "UPDATE_USER",
            AuditAction::DeleteUser => "DELETE_USER",
        }
    }

    /// Entity name stored next to the action.
    pub const fn entity(&self) -> &'static str {
        match self {
            AuditAction::CreateDelivery
            | AuditAction::UpdateDelivery
            | AuditAction::DeleteDelivery => "Delivery",
            AuditAction::CreatePayout => "Payment",
            AuditAction::UpdateSettings => "SystemSettings",
            AuditAction::UpdateUser | AuditAction::DeleteUser => "User",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit entry joined with the acting user's identity (admin viewer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogWithUser {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub entry: AuditLogEntry,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub user_role: Option<Role>,
}

// =============================================================================
// Notifications
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Info => "INFO",
            NotificationKind::Success => "SUCCESS",
            NotificationKind::Warning => "WARNING",
            NotificationKind::Error => "ERROR",
        }
    }
}

/// A message shown in a user's notification tray.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// System Settings
// =============================================================================

/// The single system-wide settings row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    pub id: i64,
    pub app_name: String,
    /// Per-item rate applied to new delivery reports.
    pub delivery_rate: i64,
    pub currency_symbol: String,
    pub allow_courier_self_register: bool,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Partial update of the system settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub app_name: Option<String>,
    pub delivery_rate: Option<i64>,
    pub allow_courier_self_register: Option<bool>,
}

impl SettingsPatch {
    /// Validates the present fields and trims the app name.
    pub fn validated(&self) -> Result<SettingsPatch, crate::error::ValidationError> {
        let app_name = match &self.app_name {
            Some(name) => Some(crate::validation::validate_app_name(name)?),
            None => None,
        };
        if let Some(rate) = self.delivery_rate {
            crate::validation::validate_rate("deliveryRate", rate)?;
        }
        Ok(SettingsPatch {
            app_name,
            delivery_rate: self.delivery_rate,
            allow_courier_self_register: self.allow_courier_self_register,
        })
    }

    /// Names of the fields present in the patch.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.app_name.is_some() {
            names.push("appName");
        }
        if self.delivery_rate.is_some() {
            names.push("deliveryRate");
        }
        if self.allow_courier_self_register.is_some() {
            names.push("allowCourierSelfRegister");
        }
        names
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Normalised page/limit pair.
///
/// Listing never fails on odd input: a missing or zero page becomes 1, a
/// missing or zero limit becomes the default, and large limits are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .min(MAX_PAGE_LIMIT);
        Pagination { page, limit }
    }

    #[inline]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[inline]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows to skip for this page.
    #[inline]
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination::new(None, None)
    }
}

/// Paging metadata returned alongside a page of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: i64, pagination: Pagination) -> Self {
        let limit = i64::from(pagination.limit());
        let total_pages = if total <= 0 { 0 } else { (total + limit - 1) / limit };
        Page {
            data,
            meta: PageMeta {
                total,
                page: pagination.page(),
                limit: pagination.limit(),
                total_pages,
            },
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_delivery() -> Delivery {
        let now = Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap();
        Delivery {
            id: "d-1".to_string(),
            courier_id: "c-1".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            item_count: 10,
            rate_per_item: 3000,
            total_amount: 30_000,
            status: DeliveryStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            payment_id: None,
            notes: None,
            proof_reference: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_defaults() {
        assert_eq!(DeliveryStatus::default(), DeliveryStatus::Pending);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Unpaid);
    }

    #[test]
    fn test_enums_serialize_screaming_snake_case() {
        let json = serde_json::to_string(&PaymentStatus::PendingRequest).unwrap();
        assert_eq!(json, "\"PENDING_REQUEST\"");
        let method: PaymentMethod = serde_json::from_str("\"TRANSFER\"").unwrap();
        assert_eq!(method, PaymentMethod::Transfer);
        assert_eq!(PaymentStatus::PendingRequest.to_string(), "PENDING_REQUEST");
    }

    #[test]
    fn test_delivery_serializes_camel_case() {
        let value = serde_json::to_value(sample_delivery()).unwrap();
        assert_eq!(value["courierId"], "c-1");
        assert_eq!(value["totalAmount"], 30_000);
        assert_eq!(value["paymentStatus"], "UNPAID");
        assert_eq!(value["date"], "2026-10-01");
    }

    #[test]
    fn test_total_consistency_check() {
        let mut delivery = sample_delivery();
        assert!(delivery.is_total_consistent());
        delivery.total_amount = 1;
        assert!(!delivery.is_total_consistent());
    }

    #[test]
    fn test_user_patch_normalises_fields() {
        let patch = UserPatch {
            name: Some("  Budi Santoso ".to_string()),
            email: Some(" Budi@KurirPay.Local".to_string()),
        }
        .validated()
        .unwrap();
        assert_eq!(patch.name.as_deref(), Some("Budi Santoso"));
        assert_eq!(patch.email.as_deref(), Some("budi@kurirpay.local"));
        assert_eq!(patch.field_names(), vec!["name", "email"]);

        let bad = UserPatch {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert!(bad.validated().is_err());
    }

    #[test]
    fn test_caller_builders() {
        let caller = Caller::admin("a-1").with_ip("10.0.0.7");
        assert!(caller.is_admin());
        assert_eq!(caller.ip_address.as_deref(), Some("10.0.0.7"));
        assert!(!Caller::courier("c-1").is_admin());
    }

    #[test]
    fn test_pagination_normalises_input() {
        let p = Pagination::new(None, None);
        assert_eq!((p.page(), p.limit(), p.offset()), (1, 50, 0));

        let p = Pagination::new(Some(0), Some(0));
        assert_eq!((p.page(), p.limit()), (1, 50));

        let p = Pagination::new(Some(3), Some(500));
        assert_eq!((p.page(), p.limit(), p.offset()), (3, 100, 200));
    }

    #[test]
    fn test_page_meta_total_pages() {
        let page: Page<u8> = Page::new(vec![], 101, Pagination::new(Some(1), Some(50)));
        assert_eq!(page.meta.total_pages, 3);

        let empty: Page<u8> = Page::new(vec![], 0, Pagination::default());
        assert_eq!(empty.meta.total_pages, 0);
    }
}
