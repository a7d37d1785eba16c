//! # Delivery Lifecycle Service
//!
//! Create, review, edit and remove courier delivery reports.
//!
//! ## Report Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   courier: create()                                                     │
//! │        │   rate snapshotted, total = itemCount × rate                   │
//! │        ▼                                                                │
//! │   ┌─────────┐  admin: update(status)  ┌──────────┐                      │
//! │   │ PENDING │────────────────────────►│ APPROVED │──┐ courier: update   │
//! │   │ UNPAID  │                         │ UNPAID   │  │ (PENDING_REQUEST) │
//! │   └────┬────┘                         └────┬─────┘◄─┘                   │
//! │        │ admin: update(REJECTED)           │ admin: create_payout       │
//! │        ▼                                   ▼ (payouts.rs)               │
//! │   ┌──────────┐                        ┌──────────┐                      │
//! │   │ REJECTED │ paymentStatus forced   │   PAID   │ financial fields     │
//! │   │ UNPAID   │ to UNPAID              │          │ locked               │
//! │   └──────────┘                        └──────────┘                      │
//! │                                                                         │
//! │   Every status change notifies the owning courier.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The rules themselves live in `kurir_core::lifecycle`; this service loads
//! the row, checks the caller's role, writes the planned result and records
//! the side effects.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use kurir_core::lifecycle::{plan_update, DeliveryPatch, NewDelivery};
use kurir_core::notice::status_change_notice;
use kurir_core::validation::validate_item_count;
use kurir_core::{
    AuditAction, Caller, CoreError, Delivery, Page, Pagination, PaymentStatus, Role,
};
use kurir_db::{Database, NewAuditEntry};

use crate::access::{can_view, require_admin};
use crate::audit::AuditRecorder;
use crate::error::{PayrollError, PayrollResult};
use crate::notify::Notifier;
use crate::rate::RateResolver;

/// Body of a "submit delivery report" request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDelivery {
    pub date: NaiveDate,
    pub item_count: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub proof_reference: Option<String>,
}

impl CreateDelivery {
    pub fn new(date: NaiveDate, item_count: i64) -> Self {
        CreateDelivery {
            date,
            item_count,
            notes: None,
            proof_reference: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Delivery report operations.
#[derive(Debug, Clone)]
pub struct DeliveryService {
    db: Database,
    rates: RateResolver,
    audit: AuditRecorder,
    notifier: Notifier,
}

impl DeliveryService {
    pub fn new(db: Database, rates: RateResolver, audit: AuditRecorder, notifier: Notifier) -> Self {
        DeliveryService {
            db,
            rates,
            audit,
            notifier,
        }
    }

    /// Submits a report for the calling courier.
    ///
    /// ## Flow
    /// 1. `itemCount >= 1` (nothing is read or written otherwise)
    /// 2. Snapshot the current rate, total = itemCount × rate
    /// 3. Insert as PENDING / UNPAID
    /// 4. Audit CREATE_DELIVERY (best-effort)
    ///
    /// Several reports for the same date are accepted.
    pub async fn create(&self, caller: &Caller, input: CreateDelivery) -> PayrollResult<Delivery> {
        validate_item_count(input.item_count)?;

        let rate = self.rates.current_rate().await?;
        let new = NewDelivery::new(
            &caller.user_id,
            input.date,
            input.item_count,
            rate,
            input.notes,
            input.proof_reference,
        )?;

        let delivery = self.db.deliveries().insert(&new).await?;

        info!(
            delivery_id = %delivery.id,
            courier_id = %delivery.courier_id,
            item_count = delivery.item_count,
            total = delivery.total_amount,
            "Delivery report created"
        );

        self.audit
            .log(
                caller,
                NewAuditEntry::new(&caller.user_id, AuditAction::CreateDelivery)
                    .entity_id(&delivery.id)
                    .details(json!({ "count": delivery.item_count })),
            )
            .await;

        Ok(delivery)
    }

    /// Fetches one report.
    ///
    /// ## Errors
    /// * `NotFound` - absent, or owned by another courier
    pub async fn get(&self, caller: &Caller, id: &str) -> PayrollResult<Delivery> {
        self.db
            .deliveries()
            .get_by_id(id)
            .await?
            .filter(|d| can_view(caller, d))
            .ok_or_else(|| CoreError::DeliveryNotFound(id.to_string()).into())
    }

    /// Applies a partial update as a guarded state transition.
    ///
    /// ## Flow
    /// ```text
    /// load ──► plan_update ──► role check ──► conditional write ──► audit
    ///                                              │                  │
    ///                              0 rows ─► Conflict        status changed?
    ///                                                                 │
    ///                                                          notify courier
    /// ```
    ///
    /// ## Errors
    /// * `NotFound` - absent, or owned by another courier
    /// * `BusinessRule` - paid report edit, backwards transition, bad payment status
    /// * `Forbidden` - a courier touched a review-only field
    /// * `Validation` - itemCount / ratePerItem below 1, notes too long
    /// * `Conflict` - the report was settled or removed while being edited
    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        patch: DeliveryPatch,
    ) -> PayrollResult<Delivery> {
        let current = self.get(caller, id).await?;

        // The paid lock is checked before the role, so a settled report
        // answers the same way to every caller.
        let planned = plan_update(&current, &patch)?;

        if caller.role == Role::Courier {
            check_courier_patch(&current, &patch)?;
        }

        debug!(
            delivery_id = %id,
            changed = ?planned.changed_field_names(),
            "Applying delivery update"
        );

        let updated = self.db.deliveries().apply_update(&planned).await?.ok_or_else(|| {
            PayrollError::conflict(format!(
                "Delivery {} was modified concurrently; reload and retry",
                id
            ))
        })?;

        info!(
            delivery_id = %updated.id,
            status = %updated.status,
            payment_status = %updated.payment_status,
            "Delivery report updated"
        );

        self.audit
            .log(
                caller,
                NewAuditEntry::new(&caller.user_id, AuditAction::UpdateDelivery)
                    .entity_id(&updated.id)
                    .details(json!({
                        "changedFields": planned.changed_field_names(),
                        "newStatus": updated.status,
                    })),
            )
            .await;

        if planned.status_changed() {
            let notice = status_change_notice(updated.date, updated.item_count, updated.status);
            self.notifier.notify(&updated.courier_id, &notice).await;
        }

        Ok(updated)
    }

    /// Removes a report (administrators only).
    ///
    /// Settled reports should be left alone; deleting one is allowed but
    /// logged as a warning since its payment then covers less than its amount.
    pub async fn delete(&self, caller: &Caller, id: &str) -> PayrollResult<Delivery> {
        require_admin(caller, "delete delivery reports")?;

        let removed = self
            .db
            .deliveries()
            .delete(id)
            .await?
            .ok_or_else(|| CoreError::DeliveryNotFound(id.to_string()))?;

        if removed.payment_status == PaymentStatus::Paid {
            warn!(
                delivery_id = %removed.id,
                payment_id = ?removed.payment_id,
                "Deleted a settled delivery report"
            );
        }

        info!(delivery_id = %removed.id, "Delivery report deleted");

        self.audit
            .log(
                caller,
                NewAuditEntry::new(&caller.user_id, AuditAction::DeleteDelivery)
                    .entity_id(&removed.id)
                    .details(json!({
                        "courierId": removed.courier_id,
                        "date": removed.date,
                        "paymentStatus": removed.payment_status,
                    })),
            )
            .await;

        Ok(removed)
    }

    /// Lists reports newest work date first: a courier's own, or everyone's
    /// for an administrator.
    ///
    /// `page` / `limit` are normalised, never rejected.
    pub async fn list(
        &self,
        caller: &Caller,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> PayrollResult<Page<Delivery>> {
        let pagination = Pagination::new(page, limit);
        let courier_filter = match caller.role {
            Role::Admin => None,
            Role::Courier => Some(caller.user_id.as_str()),
        };

        Ok(self.db.deliveries().list(courier_filter, pagination).await?)
    }
}

/// Couriers edit the report itself; review and pricing belong to admins.
///
/// Identical values are let through so a full-form resubmission works.
fn check_courier_patch(current: &Delivery, patch: &DeliveryPatch) -> PayrollResult<()> {
    if patch.status.is_some_and(|s| s != current.status) {
        return Err(PayrollError::forbidden("Couriers cannot change the review status"));
    }
    if patch.rate_per_item.is_some_and(|r| r != current.rate_per_item) {
        return Err(PayrollError::forbidden("Couriers cannot change the rate"));
    }
    match patch.payment_status {
        Some(PaymentStatus::PendingRequest) | None => Ok(()),
        Some(requested) if requested == current.payment_status => Ok(()),
        Some(_) => Err(PayrollError::forbidden(
            "Couriers may only request payment",
        )),
    }
}
