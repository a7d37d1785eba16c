//! # Delivery Lifecycle Rules
//!
//! Creation rules and the guarded update planner for delivery reports.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Delivery Status × Payment Status                       │
//! │                                                                         │
//! │   status:    PENDING ──► APPROVED ◄──► REJECTED                        │
//! │                 └───────────────────────► ▲                             │
//! │                                                                         │
//! │   payment:   UNPAID ──► PENDING_REQUEST ──► PAID (payout engine only)  │
//! │                ▲              │                                         │
//! │                └── REJECTED ──┘  (rejection forces UNPAID)             │
//! │                                                                         │
//! │   PAID locks: itemCount, ratePerItem, totalAmount, status, date,       │
//! │               paymentStatus                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Planner, Not Merger
//! [`plan_update`] never merges arbitrary keys. The patch is a typed struct
//! (unknown JSON keys are dropped by serde) and the planner returns the full
//! resulting row, so the repository writes exactly what was decided here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Delivery, DeliveryStatus, PaymentStatus};
use crate::validation::{validate_item_count, validate_notes, validate_rate};

// =============================================================================
// Create
// =============================================================================

/// A validated delivery report ready to be inserted.
///
/// Status and payment status are not part of this type: new reports always
/// start `PENDING` / `UNPAID`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDelivery {
    pub courier_id: String,
    pub date: NaiveDate,
    pub item_count: i64,
    pub rate_per_item: i64,
    pub total_amount: i64,
    pub notes: Option<String>,
    pub proof_reference: Option<String>,
}

impl NewDelivery {
    /// Validates the input and snapshots the rate into the total.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use kurir_core::lifecycle::NewDelivery;
    ///
    /// let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
    /// let new = NewDelivery::new("c-1", date, 10, 3000, None, None).unwrap();
    /// assert_eq!(new.total_amount, 30_000);
    /// ```
    pub fn new(
        courier_id: impl Into<String>,
        date: NaiveDate,
        item_count: i64,
        rate_per_item: i64,
        notes: Option<String>,
        proof_reference: Option<String>,
    ) -> CoreResult<Self> {
        validate_item_count(item_count)?;
        validate_rate("ratePerItem", rate_per_item)?;
        validate_notes(notes.as_deref())?;

        let total = compute_total(item_count, rate_per_item)?;

        Ok(NewDelivery {
            courier_id: courier_id.into(),
            date,
            item_count,
            rate_per_item,
            total_amount: total.units(),
            notes: normalize_text(notes),
            proof_reference: normalize_text(proof_reference),
        })
    }
}

/// `item_count × rate_per_item`, failing instead of wrapping.
pub fn compute_total(item_count: i64, rate_per_item: i64) -> CoreResult<Money> {
    Money::from_units(rate_per_item)
        .checked_mul_count(item_count)
        .ok_or_else(|| CoreError::AmountOverflow {
            field: "totalAmount".to_string(),
        })
}

/// Blank strings are stored as NULL.
fn normalize_text(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

// =============================================================================
// Patch
// =============================================================================

/// The fields an update may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum DeliveryField {
    ItemCount,
    RatePerItem,
    TotalAmount,
    Status,
    PaymentStatus,
    Notes,
    Date,
    ProofReference,
}

impl DeliveryField {
    /// Name as it appears in JSON and audit details.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DeliveryField::ItemCount => "itemCount",
            DeliveryField::RatePerItem => "ratePerItem",
            DeliveryField::TotalAmount => "totalAmount",
            DeliveryField::Status => "status",
            DeliveryField::PaymentStatus => "paymentStatus",
            DeliveryField::Notes => "notes",
            DeliveryField::Date => "date",
            DeliveryField::ProofReference => "proofReference",
        }
    }
}

/// Partial update of a delivery report.
///
/// This struct *is* the allow-list: anything else in the request body
/// (`courierId`, `paymentId`, `createdAt`, ...) has nowhere to go and is
/// dropped during deserialization.
///
/// `notes` / `proofReference` set to an empty string clear the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliveryPatch {
    pub item_count: Option<i64>,
    pub rate_per_item: Option<i64>,
    /// Accepted for compatibility, never persisted as given.
    pub total_amount: Option<i64>,
    pub status: Option<DeliveryStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub notes: Option<String>,
    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,
    pub proof_reference: Option<String>,
}

impl DeliveryPatch {
    /// Allow-listed fields present in the patch, in declaration order.
    pub fn touched_fields(&self) -> Vec<DeliveryField> {
        let mut fields = Vec::new();
        if self.item_count.is_some() {
            fields.push(DeliveryField::ItemCount);
        }
        if self.rate_per_item.is_some() {
            fields.push(DeliveryField::RatePerItem);
        }
        if self.total_amount.is_some() {
            fields.push(DeliveryField::TotalAmount);
        }
        if self.status.is_some() {
            fields.push(DeliveryField::Status);
        }
        if self.payment_status.is_some() {
            fields.push(DeliveryField::PaymentStatus);
        }
        if self.notes.is_some() {
            fields.push(DeliveryField::Notes);
        }
        if self.date.is_some() {
            fields.push(DeliveryField::Date);
        }
        if self.proof_reference.is_some() {
            fields.push(DeliveryField::ProofReference);
        }
        fields
    }
}

// =============================================================================
// Update Planning
// =============================================================================

/// The complete post-update state of a delivery, decided by [`plan_update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryUpdate {
    pub id: String,
    pub item_count: i64,
    pub rate_per_item: i64,
    pub total_amount: i64,
    pub status: DeliveryStatus,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub date: NaiveDate,
    pub proof_reference: Option<String>,

    /// Payment status the row had when planned. The repository only writes
    /// if it still matches, so a concurrent payout cannot be overwritten.
    pub expected_payment_status: PaymentStatus,

    /// Fields written by this update (audit `changedFields`).
    pub changed_fields: Vec<DeliveryField>,

    /// Status before the update, set only when the status actually changed.
    pub previous_status: Option<DeliveryStatus>,
}

impl DeliveryUpdate {
    #[inline]
    pub fn status_changed(&self) -> bool {
        self.previous_status.is_some()
    }

    /// `changed_fields` as their JSON names.
    pub fn changed_field_names(&self) -> Vec<&'static str> {
        self.changed_fields.iter().map(DeliveryField::as_str).collect()
    }
}

/// Decides the result of applying `patch` to `current`.
///
/// ## Rules (in order)
/// 1. PAID records refuse any differing financial/status/date value
/// 2. `itemCount` and `ratePerItem` must stay >= 1
/// 3. No transition back to PENDING
/// 4. `totalAmount` = `itemCount × ratePerItem` of the resulting record
/// 5. `paymentStatus = PAID` is refused (payout engine only)
/// 6. `status = REJECTED` forces `paymentStatus = UNPAID`
/// 7. `paymentStatus = PENDING_REQUEST` needs an APPROVED result
///
/// Nothing is written here; an `Err` means nothing may be written.
pub fn plan_update(current: &Delivery, patch: &DeliveryPatch) -> CoreResult<DeliveryUpdate> {
    if current.is_paid() {
        guard_paid(current, patch)?;
    }

    if let Some(count) = patch.item_count {
        validate_item_count(count)?;
    }
    if let Some(rate) = patch.rate_per_item {
        validate_rate("ratePerItem", rate)?;
    }
    validate_notes(patch.notes.as_deref())?;

    let status = patch.status.unwrap_or(current.status);
    if status == DeliveryStatus::Pending && current.status != DeliveryStatus::Pending {
        return Err(CoreError::InvalidStatusTransition {
            delivery_id: current.id.clone(),
            from: current.status,
            to: status,
        });
    }

    let item_count = patch.item_count.unwrap_or(current.item_count);
    let rate_per_item = patch.rate_per_item.unwrap_or(current.rate_per_item);
    let total_amount = compute_total(item_count, rate_per_item)?.units();

    // totalAmount is recorded only when a factor moved it, never for a client value
    let factor_touched = patch.item_count.is_some() || patch.rate_per_item.is_some();
    let mut changed_fields: Vec<DeliveryField> = patch
        .touched_fields()
        .into_iter()
        .filter(|field| *field != DeliveryField::TotalAmount)
        .collect();
    if factor_touched {
        changed_fields.push(DeliveryField::TotalAmount);
    }

    let payment_status = if patch.status == Some(DeliveryStatus::Rejected) {
        if !changed_fields.contains(&DeliveryField::PaymentStatus) {
            changed_fields.push(DeliveryField::PaymentStatus);
        }
        PaymentStatus::Unpaid
    } else {
        match patch.payment_status {
            None => current.payment_status,
            Some(PaymentStatus::Paid) if current.is_paid() => PaymentStatus::Paid,
            Some(PaymentStatus::Paid) => {
                return Err(CoreError::PaymentStatusNotAllowed {
                    delivery_id: current.id.clone(),
                    requested: PaymentStatus::Paid,
                    reason: "deliveries are only settled through a payout".to_string(),
                });
            }
            Some(PaymentStatus::PendingRequest) if status != DeliveryStatus::Approved => {
                return Err(CoreError::PaymentStatusNotAllowed {
                    delivery_id: current.id.clone(),
                    requested: PaymentStatus::PendingRequest,
                    reason: format!("report is {}, not APPROVED", status),
                });
            }
            Some(requested) => requested,
        }
    };
    changed_fields.sort();

    let previous_status = (status != current.status).then_some(current.status);

    Ok(DeliveryUpdate {
        id: current.id.clone(),
        item_count,
        rate_per_item,
        total_amount,
        status,
        payment_status,
        notes: match &patch.notes {
            Some(notes) => normalize_text(Some(notes.clone())),
            None => current.notes.clone(),
        },
        date: patch.date.unwrap_or(current.date),
        proof_reference: match &patch.proof_reference {
            Some(reference) => normalize_text(Some(reference.clone())),
            None => current.proof_reference.clone(),
        },
        expected_payment_status: current.payment_status,
        changed_fields,
        previous_status,
    })
}

/// Refuses a patch that would change a locked field of a settled delivery.
///
/// Resubmitting identical values is allowed, so a client that always sends
/// the whole form can still edit notes.
fn guard_paid(current: &Delivery, patch: &DeliveryPatch) -> CoreResult<()> {
    let mut locked = Vec::new();

    if patch.item_count.is_some_and(|v| v != current.item_count) {
        locked.push(DeliveryField::ItemCount);
    }
    if patch.rate_per_item.is_some_and(|v| v != current.rate_per_item) {
        locked.push(DeliveryField::RatePerItem);
    }
    if patch.total_amount.is_some_and(|v| v != current.total_amount) {
        locked.push(DeliveryField::TotalAmount);
    }
    if patch.status.is_some_and(|v| v != current.status) {
        locked.push(DeliveryField::Status);
    }
    if patch.payment_status.is_some_and(|v| v != current.payment_status) {
        locked.push(DeliveryField::PaymentStatus);
    }
    if patch.date.is_some_and(|v| v != current.date) {
        locked.push(DeliveryField::Date);
    }

    if locked.is_empty() {
        return Ok(());
    }

    Err(CoreError::PaidDeliveryLocked {
        delivery_id: current.id.clone(),
        fields: locked.iter().map(|f| f.as_str().to_string()).collect(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn delivery(status: DeliveryStatus, payment_status: PaymentStatus) -> Delivery {
        let now = Utc::now();
        Delivery {
            id: "d-1".to_string(),
            courier_id: "c-1".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            item_count: 10,
            rate_per_item: 3000,
            total_amount: 30_000,
            status,
            payment_status,
            payment_id: (payment_status == PaymentStatus::Paid).then(|| "p-1".to_string()),
            notes: None,
            proof_reference: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_new_delivery_computes_total() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let new = NewDelivery::new("c-1", date, 10, 3000, Some("  ".into()), None).unwrap();
        assert_eq!(new.total_amount, 30_000);
        assert_eq!(new.notes, None);
    }

    #[test]
    fn test_new_delivery_rejects_zero_items() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let err = NewDelivery::new("c-1", date, 0, 3000, None, None).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_new_delivery_overflow() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let err = NewDelivery::new("c-1", date, i64::MAX, 2, None, None).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { .. }));
    }

    #[test]
    fn test_patch_drops_unknown_keys() {
        let patch: DeliveryPatch = serde_json::from_str(
            r#"{"itemCount": 12, "courierId": "someone-else", "paymentId": "p-9"}"#,
        )
        .unwrap();
        assert_eq!(patch.item_count, Some(12));
        assert_eq!(patch.touched_fields(), vec![DeliveryField::ItemCount]);
    }

    #[test]
    fn test_item_count_change_recomputes_total() {
        let current = delivery(DeliveryStatus::Pending, PaymentStatus::Unpaid);
        let patch = DeliveryPatch {
            item_count: Some(12),
            total_amount: Some(1),
            ..Default::default()
        };
        let update = plan_update(&current, &patch).unwrap();
        assert_eq!(update.total_amount, 36_000);
        assert_eq!(update.changed_field_names(), vec!["itemCount", "totalAmount"]);
    }

    #[test]
    fn test_client_total_without_factors_is_ignored() {
        let current = delivery(DeliveryStatus::Approved, PaymentStatus::Unpaid);
        let patch = DeliveryPatch {
            total_amount: Some(99),
            ..Default::default()
        };
        let update = plan_update(&current, &patch).unwrap();
        assert_eq!(update.total_amount, 30_000);
        assert!(update.changed_fields.is_empty());
    }

    #[test]
    fn test_rate_change_recomputes_total() {
        let current = delivery(DeliveryStatus::Pending, PaymentStatus::Unpaid);
        let patch = DeliveryPatch {
            rate_per_item: Some(3500),
            ..Default::default()
        };
        let update = plan_update(&current, &patch).unwrap();
        assert_eq!(update.total_amount, 35_000);
    }

    #[test]
    fn test_approve_keeps_payment_fields() {
        let current = delivery(DeliveryStatus::Pending, PaymentStatus::Unpaid);
        let patch = DeliveryPatch {
            status: Some(DeliveryStatus::Approved),
            ..Default::default()
        };
        let update = plan_update(&current, &patch).unwrap();
        assert_eq!(update.payment_status, PaymentStatus::Unpaid);
        assert_eq!(update.previous_status, Some(DeliveryStatus::Pending));
        assert!(update.status_changed());
    }

    #[test]
    fn test_paid_delivery_refuses_item_count_change() {
        let current = delivery(DeliveryStatus::Approved, PaymentStatus::Paid);
        let patch = DeliveryPatch {
            item_count: Some(20),
            ..Default::default()
        };
        match plan_update(&current, &patch) {
            Err(CoreError::PaidDeliveryLocked { fields, .. }) => {
                assert_eq!(fields, vec!["itemCount".to_string()]);
            }
            other => panic!("expected PaidDeliveryLocked, got {:?}", other),
        }
    }

    #[test]
    fn test_paid_delivery_refuses_each_locked_field() {
        let current = delivery(DeliveryStatus::Approved, PaymentStatus::Paid);
        let cases = [
            (
                "ratePerItem",
                DeliveryPatch {
                    rate_per_item: Some(1),
                    ..Default::default()
                },
            ),
            (
                "totalAmount",
                DeliveryPatch {
                    total_amount: Some(1),
                    ..Default::default()
                },
            ),
            (
                "status",
                DeliveryPatch {
                    status: Some(DeliveryStatus::Rejected),
                    ..Default::default()
                },
            ),
            (
                "date",
                DeliveryPatch {
                    date: NaiveDate::from_ymd_opt(2026, 10, 2),
                    ..Default::default()
                },
            ),
        ];

        for (field, patch) in cases {
            match plan_update(&current, &patch) {
                Err(CoreError::PaidDeliveryLocked { fields, .. }) => {
                    assert_eq!(fields, vec![field.to_string()]);
                }
                other => panic!("{}: expected PaidDeliveryLocked, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_paid_delivery_accepts_same_values_and_notes() {
        let current = delivery(DeliveryStatus::Approved, PaymentStatus::Paid);
        let patch = DeliveryPatch {
            item_count: Some(10),
            status: Some(DeliveryStatus::Approved),
            payment_status: Some(PaymentStatus::Paid),
            notes: Some("receipt signed".to_string()),
            ..Default::default()
        };
        let update = plan_update(&current, &patch).unwrap();
        assert_eq!(update.payment_status, PaymentStatus::Paid);
        assert_eq!(update.total_amount, 30_000);
        assert_eq!(update.notes.as_deref(), Some("receipt signed"));
        assert!(!update.status_changed());
    }

    #[test]
    fn test_paid_delivery_refuses_unsettle_through_update() {
        let current = delivery(DeliveryStatus::Approved, PaymentStatus::Paid);
        let patch = DeliveryPatch {
            payment_status: Some(PaymentStatus::Unpaid),
            ..Default::default()
        };
        assert!(matches!(
            plan_update(&current, &patch),
            Err(CoreError::PaidDeliveryLocked { .. })
        ));
    }

    #[test]
    fn test_reject_forces_unpaid() {
        let current = delivery(DeliveryStatus::Approved, PaymentStatus::PendingRequest);
        let patch = DeliveryPatch {
            status: Some(DeliveryStatus::Rejected),
            payment_status: Some(PaymentStatus::PendingRequest),
            ..Default::default()
        };
        let update = plan_update(&current, &patch).unwrap();
        assert_eq!(update.status, DeliveryStatus::Rejected);
        assert_eq!(update.payment_status, PaymentStatus::Unpaid);
        assert!(update.changed_fields.contains(&DeliveryField::PaymentStatus));
    }

    #[test]
    fn test_no_transition_back_to_pending() {
        let current = delivery(DeliveryStatus::Rejected, PaymentStatus::Unpaid);
        let patch = DeliveryPatch {
            status: Some(DeliveryStatus::Pending),
            ..Default::default()
        };
        assert!(matches!(
            plan_update(&current, &patch),
            Err(CoreError::InvalidStatusTransition { .. })
        ));
    }

    #[test]
    fn test_rejected_can_be_approved_again() {
        let current = delivery(DeliveryStatus::Rejected, PaymentStatus::Unpaid);
        let patch = DeliveryPatch {
            status: Some(DeliveryStatus::Approved),
            ..Default::default()
        };
        let update = plan_update(&current, &patch).unwrap();
        assert_eq!(update.status, DeliveryStatus::Approved);
    }

    #[test]
    fn test_paid_cannot_be_set_directly() {
        let current = delivery(DeliveryStatus::Approved, PaymentStatus::Unpaid);
        let patch = DeliveryPatch {
            payment_status: Some(PaymentStatus::Paid),
            ..Default::default()
        };
        assert!(matches!(
            plan_update(&current, &patch),
            Err(CoreError::PaymentStatusNotAllowed { .. })
        ));
    }

    #[test]
    fn test_payout_request_needs_approval() {
        let current = delivery(DeliveryStatus::Pending, PaymentStatus::Unpaid);
        let patch = DeliveryPatch {
            payment_status: Some(PaymentStatus::PendingRequest),
            ..Default::default()
        };
        assert!(matches!(
            plan_update(&current, &patch),
            Err(CoreError::PaymentStatusNotAllowed { .. })
        ));

        let approved = delivery(DeliveryStatus::Approved, PaymentStatus::Unpaid);
        let update = plan_update(&approved, &patch).unwrap();
        assert_eq!(update.payment_status, PaymentStatus::PendingRequest);
        assert_eq!(update.expected_payment_status, PaymentStatus::Unpaid);
    }

    #[test]
    fn test_invalid_patched_count_is_validation_error() {
        let current = delivery(DeliveryStatus::Pending, PaymentStatus::Unpaid);
        let patch = DeliveryPatch {
            item_count: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            plan_update(&current, &patch),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_notes_clear_value() {
        let mut current = delivery(DeliveryStatus::Pending, PaymentStatus::Unpaid);
        current.notes = Some("old".to_string());
        let patch = DeliveryPatch {
            notes: Some(String::new()),
            ..Default::default()
        };
        let update = plan_update(&current, &patch).unwrap();
        assert_eq!(update.notes, None);
    }
}
