//! # Payout Settlement Service
//!
//! Turns a batch of a courier's unpaid reports into one Payment.
//!
//! ## Settlement Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_payout(admin, { courierId, deliveryIds, method, notes })        │
//! │       │                                                                 │
//! │       │  validate (non-empty, UUIDs, no duplicates)   ── Validation     │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │   ├─ UPDATE deliveries SET PAID ... WHERE still unpaid  (claim rows)    │
//! │   ├─ claimed != requested ─────────────► ROLLBACK ─── Conflict          │
//! │   ├─ amount = Σ totalAmount of claimed rows                             │
//! │   ├─ INSERT payment                                                     │
//! │   ├─ INSERT audit_logs (CREATE_PAYOUT)                                  │
//! │   ├─ INSERT notifications (courier)                                     │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two payouts racing over the same report serialize on SQLite's write lock;
//! the second one claims fewer rows than it asked for and aborts.

use tracing::{debug, info, warn};

use kurir_core::payout::PayoutRequest;
use kurir_core::{Caller, CoreError, Delivery, Payment, PaymentWithCourier, Role};
use kurir_db::Database;

use crate::access::{require_admin, require_self_or_admin};
use crate::error::PayrollResult;

/// Payout and settlement-history operations.
#[derive(Debug, Clone)]
pub struct PayoutService {
    db: Database,
}

impl PayoutService {
    pub fn new(db: Database) -> Self {
        PayoutService { db }
    }

    /// Settles the requested deliveries into one payment.
    ///
    /// The stored amount is always the sum of the settled reports' totals.
    /// A `declared_amount` from the client is only compared and logged.
    ///
    /// ## Errors
    /// * `Forbidden` - caller is not an administrator
    /// * `Validation` - empty batch, duplicate or malformed ids
    /// * `Conflict` - some report is unknown, another courier's, rejected or
    ///   already paid; nothing was written
    pub async fn create_payout(
        &self,
        caller: &Caller,
        request: PayoutRequest,
    ) -> PayrollResult<Payment> {
        require_admin(caller, "create payouts")?;
        request.validate()?;

        debug!(
            courier_id = %request.courier_id,
            deliveries = request.delivery_ids.len(),
            method = %request.method,
            "Creating payout"
        );

        let settlement = self.db.payments().settle(&request, caller).await?;

        if let Some(declared) = request.declared_amount {
            if declared != settlement.payment.amount {
                warn!(
                    payment_id = %settlement.payment.id,
                    declared,
                    computed = settlement.payment.amount,
                    "Declared payout amount differs from computed amount"
                );
            }
        }

        info!(
            payment_id = %settlement.payment.id,
            courier_id = %settlement.payment.courier_id,
            amount = %settlement.payment.amount(),
            "Payout created"
        );

        Ok(settlement.payment)
    }

    /// A courier's UNPAID reports, oldest work date first (payout screen).
    pub async fn list_unpaid_for_courier(
        &self,
        caller: &Caller,
        courier_id: &str,
    ) -> PayrollResult<Vec<Delivery>> {
        require_admin(caller, "view unpaid reports")?;
        Ok(self.db.deliveries().list_unpaid_for_courier(courier_id).await?)
    }

    /// All payments with the courier's name and email, newest first.
    pub async fn list_payments(&self, caller: &Caller) -> PayrollResult<Vec<PaymentWithCourier>> {
        require_admin(caller, "view all payments")?;
        Ok(self.db.payments().list_with_courier().await?)
    }

    /// One courier's payout history, newest first.
    pub async fn list_payments_for_courier(
        &self,
        caller: &Caller,
        courier_id: &str,
    ) -> PayrollResult<Vec<Payment>> {
        require_self_or_admin(caller, courier_id)?;
        Ok(self.db.payments().list_for_courier(courier_id).await?)
    }

    /// The reports settled by one payment.
    ///
    /// ## Errors
    /// * `NotFound` - no such payment, or a courier asking about someone
    ///   else's payment
    pub async fn get_payment_deliveries(
        &self,
        caller: &Caller,
        payment_id: &str,
    ) -> PayrollResult<Vec<Delivery>> {
        let payment = self
            .db
            .payments()
            .get_by_id(payment_id)
            .await?
            .filter(|p| caller.role == Role::Admin || p.courier_id == caller.user_id)
            .ok_or_else(|| CoreError::PaymentNotFound(payment_id.to_string()))?;

        Ok(self.db.deliveries().list_for_payment(&payment.id).await?)
    }
}
