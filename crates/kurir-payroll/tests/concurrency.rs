//! Racing payouts against a file-backed database with several connections.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use uuid::Uuid;

use kurir_core::lifecycle::DeliveryPatch;
use kurir_core::payout::PayoutRequest;
use kurir_core::{Caller, DeliveryStatus, PaymentMethod, PaymentStatus, Role};
use kurir_db::{Database, DbConfig};
use kurir_payroll::{CreateDelivery, ErrorKind, Payroll};

/// Removes the database file and its WAL companions.
struct TempDb(PathBuf);

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.0.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

async fn open() -> (TempDb, Payroll, Caller, Caller) {
    let path = std::env::temp_dir().join(format!("kurirpay-race-{}.db", Uuid::new_v4()));
    let db = Database::new(
        DbConfig::new(path.clone())
            .max_connections(4)
            .busy_timeout(Duration::from_secs(10)),
    )
    .await
    .unwrap();

    let admin = db
        .users()
        .create("Admin", "admin@kurirpay.local", Role::Admin)
        .await
        .unwrap();
    let courier = db
        .users()
        .create("Budi", "budi@kurirpay.local", Role::Courier)
        .await
        .unwrap();

    (
        TempDb(path),
        Payroll::new(db, 3000),
        Caller::admin(admin.id),
        Caller::courier(courier.id),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_payouts_settle_once() {
    let (_guard, payroll, admin, courier) = open().await;

    for round in 1..=5u32 {
        let mut ids = Vec::new();
        for items in [4, 5, 6] {
            let date = NaiveDate::from_ymd_opt(2026, 10, round).unwrap();
            let delivery = payroll
                .deliveries()
                .create(&courier, CreateDelivery::new(date, items))
                .await
                .unwrap();
            payroll
                .deliveries()
                .update(
                    &admin,
                    &delivery.id,
                    DeliveryPatch {
                        status: Some(DeliveryStatus::Approved),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            ids.push(delivery.id);
        }

        let left = PayoutRequest::new(
            &courier.user_id,
            vec![ids[0].clone(), ids[1].clone()],
            PaymentMethod::Cash,
        );
        let right = PayoutRequest::new(
            &courier.user_id,
            vec![ids[1].clone(), ids[2].clone()],
            PaymentMethod::Transfer,
        );

        let (a, b) = {
            let (p1, p2) = (payroll.clone(), payroll.clone());
            let (c1, c2) = (admin.clone(), admin.clone());
            let t1 = tokio::spawn(async move { p1.payouts().create_payout(&c1, left).await });
            let t2 = tokio::spawn(async move { p2.payouts().create_payout(&c2, right).await });
            (t1.await.unwrap(), t2.await.unwrap())
        };

        let (winner, loser) = match (a, b) {
            (Ok(payment), Err(err)) | (Err(err), Ok(payment)) => (payment, err),
            (Ok(_), Ok(_)) => panic!("round {}: both payouts settled the shared delivery", round),
            (Err(a), Err(b)) => panic!("round {}: both payouts failed: {} / {}", round, a, b),
        };
        assert_eq!(loser.kind(), ErrorKind::Conflict);

        let shared = payroll.deliveries().get(&admin, &ids[1]).await.unwrap();
        assert_eq!(shared.payment_status, PaymentStatus::Paid);
        assert_eq!(shared.payment_id.as_deref(), Some(winner.id.as_str()));

        let settled = payroll
            .payouts()
            .get_payment_deliveries(&admin, &winner.id)
            .await
            .unwrap();
        assert_eq!(settled.len(), 2);
        assert_eq!(
            winner.amount,
            settled.iter().map(|d| d.total_amount).sum::<i64>()
        );
    }

    // Exactly one of the three reports per round is still unpaid
    let unpaid = payroll
        .payouts()
        .list_unpaid_for_courier(&admin, &courier.user_id)
        .await
        .unwrap();
    assert_eq!(unpaid.len(), 5);
    let payments = payroll.payouts().list_payments(&admin).await.unwrap();
    assert_eq!(payments.len(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_update_loses_to_payout() {
    let (_guard, payroll, admin, courier) = open().await;
    let date = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();

    let delivery = payroll
        .deliveries()
        .create(&courier, CreateDelivery::new(date, 10))
        .await
        .unwrap();
    payroll
        .payouts()
        .create_payout(
            &admin,
            PayoutRequest::new(&courier.user_id, vec![delivery.id.clone()], PaymentMethod::Cash),
        )
        .await
        .unwrap();

    // A plan made before the payout must not overwrite it
    let stale = kurir_core::lifecycle::plan_update(
        &delivery,
        &DeliveryPatch {
            item_count: Some(99),
            ..Default::default()
        },
    )
    .unwrap();
    let written = payroll
        .database()
        .deliveries()
        .apply_update(&stale)
        .await
        .unwrap();
    assert!(written.is_none());

    let current = payroll.deliveries().get(&admin, &delivery.id).await.unwrap();
    assert_eq!(current.item_count, 10);
    assert_eq!(current.payment_status, PaymentStatus::Paid);
}
