//! # Payment Repository
//!
//! The settlement transaction and the payout history.
//!
//! ## Settlement Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │   1. UPDATE deliveries SET PAID, payment_id = P                        │
//! │        WHERE id IN (...) AND courier_id = C                            │
//! │          AND payment_status <> 'PAID' AND status <> 'REJECTED'         │
//! │        (first statement takes the write lock; a concurrent payout      │
//! │         waits here and then sees the rows already PAID)                │
//! │   2. rows_affected == len(ids)?  no ──► ROLLBACK, PayoutConflict       │
//! │   3. SELECT settled rows, amount = Σ total_amount                      │
//! │   4. INSERT payments (P)        (deliveries.payment_id FK is deferred) │
//! │   5. INSERT audit_logs  CREATE_PAYOUT                                  │
//! │   6. INSERT notifications  (courier)                                   │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Any error before COMMIT drops the transaction, which rolls it back.

use chrono::Utc;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbResult;
use crate::repository::audit::{insert_audit, NewAuditEntry};
use crate::repository::delivery::DELIVERY_COLUMNS;
use crate::repository::notification::insert_notification;
use kurir_core::notice::payout_notice;
use kurir_core::payout::{settlement_total, verify_settlement_count, PayoutRequest};
use kurir_core::{
    AuditAction, AuditLogEntry, Caller, Delivery, DeliveryStatus, Notification, Payment,
    PaymentStatus, PaymentWithCourier,
};

/// Everything written by one committed payout.
#[derive(Debug, Clone)]
pub struct Settlement {
    pub payment: Payment,
    pub deliveries: Vec<Delivery>,
    pub audit: AuditLogEntry,
    pub notification: Notification,
}

/// Repository for payments.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    /// Settles the requested deliveries into one payment, atomically.
    ///
    /// The request must already be validated (non-empty, no duplicates).
    ///
    /// ## Errors
    /// * `DbError::Rule(CoreError::PayoutConflict)` - some id was unknown,
    ///   belonged to another courier, was rejected or was already paid;
    ///   nothing was written
    pub async fn settle(&self, request: &PayoutRequest, admin: &Caller) -> DbResult<Settlement> {
        let payment_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(
            payment_id = %payment_id,
            courier_id = %request.courier_id,
            requested = request.delivery_ids.len(),
            "Starting settlement"
        );

        let mut tx = self.pool.begin().await?;

        // 1. Claim the rows that are still settleable
        let placeholders = vec!["?"; request.delivery_ids.len()].join(", ");
        let claim_sql = format!(
            r#"
            UPDATE deliveries
            SET payment_status = ?, payment_id = ?, updated_at = ?
            WHERE courier_id = ?
              AND payment_status <> ?
              AND status <> ?
              AND id IN ({})
            "#,
            placeholders
        );
        let mut claim = sqlx::query(&claim_sql)
            .bind(PaymentStatus::Paid)
            .bind(&payment_id)
            .bind(now)
            .bind(&request.courier_id)
            .bind(PaymentStatus::Paid)
            .bind(DeliveryStatus::Rejected);
        for id in &request.delivery_ids {
            claim = claim.bind(id);
        }
        let claimed = claim.execute(&mut *tx).await?.rows_affected();

        // 2. Every requested delivery must have been claimed
        if let Err(conflict) = verify_settlement_count(request.delivery_ids.len(), claimed as usize) {
            tx.rollback().await?;
            return Err(conflict.into());
        }

        // 3. Authoritative amount from the claimed rows
        let select_sql = format!(
            "SELECT {} FROM deliveries WHERE payment_id = ?1 ORDER BY date ASC, id ASC",
            DELIVERY_COLUMNS
        );
        let deliveries = sqlx::query_as::<_, Delivery>(&select_sql)
            .bind(&payment_id)
            .fetch_all(&mut *tx)
            .await?;
        let totals: Vec<i64> = deliveries.iter().map(|d| d.total_amount).collect();
        let amount = settlement_total(&totals)?;

        // 4. The payment itself
        let payment = Payment {
            id: payment_id.clone(),
            courier_id: request.courier_id.clone(),
            amount: amount.units(),
            method: request.method,
            notes: request.notes.clone(),
            admin_id: admin.user_id.clone(),
            date: now,
        };
        sqlx::query(
            r#"
            INSERT INTO payments (id, courier_id, amount, method, notes, admin_id, date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.courier_id)
        .bind(payment.amount)
        .bind(payment.method)
        .bind(&payment.notes)
        .bind(&payment.admin_id)
        .bind(payment.date)
        .execute(&mut *tx)
        .await?;

        // 5. Audit entry, inside the transaction
        let audit_entry = NewAuditEntry::new(&admin.user_id, AuditAction::CreatePayout)
            .entity_id(&payment.id)
            .details(json!({
                "courierId": payment.courier_id,
                "deliveryIds": request.delivery_ids,
                "amount": payment.amount,
                "method": payment.method,
            }))
            .ip_address(admin.ip_address.clone());
        let audit = insert_audit(&mut *tx, &audit_entry).await?;

        // 6. Courier notification, inside the transaction
        let notice = payout_notice(amount, payment.method, deliveries.len());
        let notification = insert_notification(&mut *tx, &payment.courier_id, &notice).await?;

        tx.commit().await?;

        info!(
            payment_id = %payment.id,
            courier_id = %payment.courier_id,
            amount = payment.amount,
            deliveries = deliveries.len(),
            "Payout settled"
        );

        Ok(Settlement {
            payment,
            deliveries,
            audit,
            notification,
        })
    }

    /// Gets a payment by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, courier_id, amount, method, notes, admin_id, date
            FROM payments
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    /// All payments with courier identity, newest first.
    pub async fn list_with_courier(&self) -> DbResult<Vec<PaymentWithCourier>> {
        let rows = sqlx::query_as::<_, PaymentWithCourier>(
            r#"
            SELECT
                p.id, p.courier_id, p.amount, p.method, p.notes, p.admin_id, p.date,
                u.name AS courier_name,
                u.email AS courier_email
            FROM payments p
            JOIN users u ON u.id = p.courier_id
            ORDER BY p.date DESC, p.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// One courier's payments, newest first.
    pub async fn list_for_courier(&self, courier_id: &str) -> DbResult<Vec<Payment>> {
        let rows = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, courier_id, amount, method, notes, admin_id, date
            FROM payments
            WHERE courier_id = ?1
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(courier_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
