//! # Seed Data Generator
//!
//! Populates a database with couriers, delivery reports and payouts for
//! development.
//!
//! ## Usage
//! ```bash
//! # 3 couriers, 14 days of reports (default)
//! cargo run -p kurir-payroll --bin seed
//!
//! # More couriers, a longer history
//! cargo run -p kurir-payroll --bin seed -- --couriers 10 --days 30
//!
//! # Specify database path (otherwise KURIRPAY_DATABASE_PATH or kurirpay.db)
//! cargo run -p kurir-payroll --bin seed -- --db ./data/kurirpay.db
//! ```
//!
//! ## Generated Data
//! - One administrator (`admin@kurirpay.local`)
//! - Couriers `courier{N}@kurirpay.local`, one report per working day
//! - Every seventh report rejected, the most recent two left pending,
//!   everything else approved
//! - Approved reports older than a week settled in one payout per courier
//!
//! All writes go through the services, so audit entries and notifications
//! are generated exactly as in production.

use std::env;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use kurir_core::lifecycle::DeliveryPatch;
use kurir_core::payout::PayoutRequest;
use kurir_core::{Caller, DeliveryStatus, PaymentMethod, Role};
use kurir_payroll::telemetry::init_tracing;
use kurir_payroll::{CreateDelivery, Payroll, ServiceConfig};

const COURIER_NAMES: &[&str] = &[
    "Budi Santoso",
    "Sari Wulandari",
    "Agus Pratama",
    "Dewi Lestari",
    "Rudi Hartono",
    "Intan Permata",
    "Joko Susilo",
    "Maya Anggraini",
    "Hendra Wijaya",
    "Rina Kusuma",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ServiceConfig::load()?;
    let mut couriers: usize = 3;
    let mut days: i64 = 14;

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--couriers" | "-c" => {
                if i + 1 < args.len() {
                    couriers = args[i + 1].parse().unwrap_or(couriers);
                    i += 1;
                }
            }
            "--days" | "-n" => {
                if i + 1 < args.len() {
                    days = args[i + 1].parse().unwrap_or(days);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("KurirPay Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --couriers <N>  Number of couriers (default: 3, max: {})", COURIER_NAMES.len());
                println!("  -n, --days <N>      Days of reports per courier (default: 14)");
                println!("  -d, --db <PATH>     Database file path (default: kurirpay.db)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }
    let couriers = couriers.clamp(1, COURIER_NAMES.len());
    let days = days.max(1);

    init_tracing(&config.log_level);

    println!("🌱 KurirPay Seed Data Generator");
    println!("==============================");
    println!("Database: {}", config.database_path.display());
    println!("Couriers: {}", couriers);
    println!("Days:     {}", days);
    println!();

    let payroll = Payroll::connect(&config).await?;
    let db = payroll.database();

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.users().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} users", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let settings = payroll.settings().get().await?;
    println!("✓ Settings: {} (rate {})", settings.app_name, settings.delivery_rate);

    let admin = db
        .users()
        .create("Administrator", "admin@kurirpay.local", Role::Admin)
        .await?;
    let admin = Caller::admin(admin.id).with_ip("127.0.0.1");

    println!();
    println!("Generating delivery reports...");
    let start = std::time::Instant::now();
    let today = Utc::now().date_naive();
    let mut reports = 0usize;
    let mut payouts = 0usize;

    for (idx, name) in COURIER_NAMES.iter().take(couriers).enumerate() {
        let email = format!("courier{}@kurirpay.local", idx + 1);
        let user = db.users().create(name, &email, Role::Courier).await?;
        let courier = Caller::courier(user.id.clone());
        let mut settleable = Vec::new();

        for offset in (0..days).rev() {
            let date = today - Duration::days(offset);
            let seed = idx * 31 + offset as usize;
            let items = 15 + (seed * 7 % 36) as i64;

            let delivery = payroll
                .deliveries()
                .create(&courier, CreateDelivery::new(date, items))
                .await?;
            reports += 1;

            if offset < 2 {
                continue;
            }

            let status = if seed % 7 == 0 {
                DeliveryStatus::Rejected
            } else {
                DeliveryStatus::Approved
            };
            payroll
                .deliveries()
                .update(
                    &admin,
                    &delivery.id,
                    DeliveryPatch {
                        status: Some(status),
                        ..Default::default()
                    },
                )
                .await?;

            if status == DeliveryStatus::Approved && offset >= 7 {
                settleable.push(delivery.id);
            }
        }

        if settleable.is_empty() {
            warn!(courier = %name, "No reports old enough to settle");
            continue;
        }

        let method = if idx % 2 == 0 {
            PaymentMethod::Transfer
        } else {
            PaymentMethod::Cash
        };
        let payment = payroll
            .payouts()
            .create_payout(
                &admin,
                PayoutRequest::new(&user.id, settleable, method).with_notes("Seeded payout"),
            )
            .await?;
        payouts += 1;

        println!("  {}: paid {} ({})", name, payment.amount(), method);
    }

    let elapsed = start.elapsed();
    info!(reports, payouts, ?elapsed, "Seed complete");

    println!();
    println!("✓ Generated {} reports and {} payouts in {:?}", reports, payouts, elapsed);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
