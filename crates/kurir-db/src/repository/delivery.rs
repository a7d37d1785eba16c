//! # Delivery Repository
//!
//! Database operations for delivery reports.
//!
//! ## Who Writes What
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  insert()        NewDelivery (validated, total computed in core)       │
//! │  apply_update()  DeliveryUpdate planned by kurir_core::lifecycle       │
//! │                  └── only if payment_status is still what was planned  │
//! │  delete()        admin only (enforced by the caller)                   │
//! │                                                                         │
//! │  payment_status = PAID / payment_id are written ONLY by                │
//! │  PaymentRepository::settle() inside the payout transaction.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use kurir_core::lifecycle::{DeliveryUpdate, NewDelivery};
use kurir_core::{Delivery, DeliveryStatus, Page, Pagination, PaymentStatus};

pub(crate) const DELIVERY_COLUMNS: &str = r#"
    id, courier_id, date, item_count, rate_per_item, total_amount,
    status, payment_status, payment_id, notes, proof_reference,
    created_at, updated_at
"#;

/// Repository for delivery database operations.
#[derive(Debug, Clone)]
pub struct DeliveryRepository {
    pool: SqlitePool,
}

impl DeliveryRepository {
    /// Creates a new DeliveryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DeliveryRepository { pool }
    }

    /// Gets a delivery by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Delivery>> {
        let sql = format!("SELECT {} FROM deliveries WHERE id = ?1", DELIVERY_COLUMNS);
        let delivery = sqlx::query_as::<_, Delivery>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(delivery)
    }

    /// Inserts a new report as `PENDING` / `UNPAID`.
    pub async fn insert(&self, new: &NewDelivery) -> DbResult<Delivery> {
        let now = Utc::now();
        let delivery = Delivery {
            id: Uuid::new_v4().to_string(),
            courier_id: new.courier_id.clone(),
            date: new.date,
            item_count: new.item_count,
            rate_per_item: new.rate_per_item,
            total_amount: new.total_amount,
            status: DeliveryStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            payment_id: None,
            notes: new.notes.clone(),
            proof_reference: new.proof_reference.clone(),
            created_at: now,
            updated_at: now,
        };

        debug!(
            id = %delivery.id,
            courier_id = %delivery.courier_id,
            item_count = delivery.item_count,
            "Inserting delivery"
        );

        sqlx::query(
            r#"
            INSERT INTO deliveries (
                id, courier_id, date, item_count, rate_per_item, total_amount,
                status, payment_status, payment_id, notes, proof_reference,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10, ?11,
                ?12, ?13
            )
            "#,
        )
        .bind(&delivery.id)
        .bind(&delivery.courier_id)
        .bind(delivery.date)
        .bind(delivery.item_count)
        .bind(delivery.rate_per_item)
        .bind(delivery.total_amount)
        .bind(delivery.status)
        .bind(delivery.payment_status)
        .bind(&delivery.payment_id)
        .bind(&delivery.notes)
        .bind(&delivery.proof_reference)
        .bind(delivery.created_at)
        .bind(delivery.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(delivery)
    }

    /// Writes a planned update.
    ///
    /// ## Returns
    /// * `Some(delivery)` - the row after the write
    /// * `None` - the row is gone, or its payment status changed since the
    ///   update was planned (e.g. a payout settled it in between)
    pub async fn apply_update(&self, update: &DeliveryUpdate) -> DbResult<Option<Delivery>> {
        debug!(
            id = %update.id,
            changed = ?update.changed_field_names(),
            "Applying delivery update"
        );

        let result = sqlx::query(
            r#"
            UPDATE deliveries
            SET item_count = ?1,
                rate_per_item = ?2,
                total_amount = ?3,
                status = ?4,
                payment_status = ?5,
                notes = ?6,
                date = ?7,
                proof_reference = ?8,
                updated_at = ?9
            WHERE id = ?10 AND payment_status = ?11
            "#,
        )
        .bind(update.item_count)
        .bind(update.rate_per_item)
        .bind(update.total_amount)
        .bind(update.status)
        .bind(update.payment_status)
        .bind(&update.notes)
        .bind(update.date)
        .bind(&update.proof_reference)
        .bind(Utc::now())
        .bind(&update.id)
        .bind(update.expected_payment_status)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(&update.id).await
    }

    /// Deletes a delivery, returning the removed row.
    pub async fn delete(&self, id: &str) -> DbResult<Option<Delivery>> {
        let Some(existing) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        debug!(id = %id, "Deleting delivery");

        sqlx::query("DELETE FROM deliveries WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(Some(existing))
    }

    /// Lists deliveries newest work date first.
    ///
    /// ## Arguments
    /// * `courier_id` - `Some` restricts to one courier, `None` lists all
    pub async fn list(
        &self,
        courier_id: Option<&str>,
        pagination: Pagination,
    ) -> DbResult<Page<Delivery>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM deliveries WHERE (?1 IS NULL OR courier_id = ?1)",
        )
        .bind(courier_id)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            r#"
            SELECT {}
            FROM deliveries
            WHERE (?1 IS NULL OR courier_id = ?1)
            ORDER BY date DESC, created_at DESC, id DESC
            LIMIT ?2 OFFSET ?3
            "#,
            DELIVERY_COLUMNS
        );
        let rows = sqlx::query_as::<_, Delivery>(&sql)
            .bind(courier_id)
            .bind(i64::from(pagination.limit()))
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(rows, total, pagination))
    }

    /// A courier's UNPAID deliveries, oldest work date first.
    pub async fn list_unpaid_for_courier(&self, courier_id: &str) -> DbResult<Vec<Delivery>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM deliveries
            WHERE courier_id = ?1 AND payment_status = ?2
            ORDER BY date ASC, created_at ASC, id ASC
            "#,
            DELIVERY_COLUMNS
        );
        let rows = sqlx::query_as::<_, Delivery>(&sql)
            .bind(courier_id)
            .bind(PaymentStatus::Unpaid)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Deliveries settled by one payment.
    pub async fn list_for_payment(&self, payment_id: &str) -> DbResult<Vec<Delivery>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM deliveries
            WHERE payment_id = ?1
            ORDER BY date ASC, id ASC
            "#,
            DELIVERY_COLUMNS
        );
        let rows = sqlx::query_as::<_, Delivery>(&sql)
            .bind(payment_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig, DbError};
    use chrono::NaiveDate;
    use kurir_core::lifecycle::{plan_update, DeliveryPatch};
    use kurir_core::Role;

    async fn setup() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let courier = db.users().create("Budi", "budi@example.com", Role::Courier).await.unwrap();
        (db, courier.id)
    }

    fn new_delivery(courier_id: &str, day: u32, items: i64) -> NewDelivery {
        let date = NaiveDate::from_ymd_opt(2026, 10, day).unwrap();
        NewDelivery::new(courier_id, date, items, 3000, None, None).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let (db, courier_id) = setup().await;
        let created = db.deliveries().insert(&new_delivery(&courier_id, 1, 10)).await.unwrap();

        let fetched = db.deliveries().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.total_amount, 30_000);
        assert_eq!(fetched.status, DeliveryStatus::Pending);
        assert_eq!(fetched.payment_status, PaymentStatus::Unpaid);
    }

    #[tokio::test]
    async fn test_unknown_courier_is_foreign_key_violation() {
        let (db, _) = setup().await;
        let err = db
            .deliveries()
            .insert(&new_delivery("nobody", 1, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_apply_update_checks_expected_payment_status() {
        let (db, courier_id) = setup().await;
        let created = db.deliveries().insert(&new_delivery(&courier_id, 1, 10)).await.unwrap();

        let patch = DeliveryPatch {
            item_count: Some(12),
            ..Default::default()
        };
        let mut update = plan_update(&created, &patch).unwrap();
        let updated = db.deliveries().apply_update(&update).await.unwrap().unwrap();
        assert_eq!(updated.total_amount, 36_000);

        update.expected_payment_status = PaymentStatus::PendingRequest;
        assert!(db.deliveries().apply_update(&update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_scoping_and_ordering() {
        let (db, courier_id) = setup().await;
        let other = db.users().create("Eko", "eko@example.com", Role::Courier).await.unwrap();

        for day in [3, 1, 2] {
            db.deliveries().insert(&new_delivery(&courier_id, day, 5)).await.unwrap();
        }
        db.deliveries().insert(&new_delivery(&other.id, 4, 5)).await.unwrap();

        let own = db
            .deliveries()
            .list(Some(&courier_id), Pagination::new(Some(1), Some(2)))
            .await
            .unwrap();
        assert_eq!(own.meta.total, 3);
        assert_eq!(own.meta.total_pages, 2);
        let days: Vec<u32> = own.data.iter().map(|d| chrono::Datelike::day(&d.date)).collect();
        assert_eq!(days, vec![3, 2]);

        let all = db.deliveries().list(None, Pagination::default()).await.unwrap();
        assert_eq!(all.meta.total, 4);
        assert_eq!(chrono::Datelike::day(&all.data[0].date), 4);

        let unpaid = db.deliveries().list_unpaid_for_courier(&courier_id).await.unwrap();
        let days: Vec<u32> = unpaid.iter().map(|d| chrono::Datelike::day(&d.date)).collect();
        assert_eq!(days, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_delete_returns_row() {
        let (db, courier_id) = setup().await;
        let created = db.deliveries().insert(&new_delivery(&courier_id, 1, 10)).await.unwrap();

        let deleted = db.deliveries().delete(&created.id).await.unwrap().unwrap();
        assert_eq!(deleted.id, created.id);
        assert!(db.deliveries().get_by_id(&created.id).await.unwrap().is_none());
        assert!(db.deliveries().delete(&created.id).await.unwrap().is_none());
    }
}
