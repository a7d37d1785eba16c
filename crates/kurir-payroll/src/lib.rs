//! # kurir-payroll: Delivery Lifecycle & Payout Services
//!
//! The collaborator an HTTP layer calls for every KurirPay operation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KurirPay Request Flow                            │
//! │                                                                         │
//! │  HTTP layer (auth, routing; not part of this workspace)                 │
//! │       │  Caller { userId, role, ipAddress }                             │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  kurir-payroll (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   DeliveryService   PayoutService   SettingsService             │   │
//! │  │   AuditLogService   UserService   Notifier                      │   │
//! │  │        │                 │                                      │   │
//! │  │   RateResolver      AuditRecorder (best-effort)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  kurir-core (rules, pure)   kurir-db (SQLite via sqlx)                  │
//! │                                                                         │
//! │  Errors leave as PayrollError → ApiError { code, message }              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kurir_payroll::{Payroll, ServiceConfig};
//!
//! let payroll = Payroll::connect(&ServiceConfig::load()?).await?;
//! let delivery = payroll
//!     .deliveries()
//!     .create(&caller, CreateDelivery::new(date, 10))
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

mod access;
pub mod audit;
pub mod audit_logs;
pub mod config;
pub mod deliveries;
pub mod error;
pub mod notify;
pub mod payouts;
pub mod rate;
pub mod settings;
pub mod telemetry;
pub mod users;

// =============================================================================
// Re-exports
// =============================================================================

pub use audit::AuditRecorder;
pub use audit_logs::AuditLogService;
pub use config::{ConfigError, ServiceConfig};
pub use deliveries::{CreateDelivery, DeliveryService};
pub use error::{ApiError, ErrorKind, PayrollError, PayrollResult};
pub use notify::Notifier;
pub use payouts::PayoutService;
pub use rate::RateResolver;
pub use settings::SettingsService;
pub use users::UserService;

use kurir_db::Database;
use tracing::info;

// =============================================================================
// Service Bundle
// =============================================================================

/// All services wired to one database.
#[derive(Debug, Clone)]
pub struct Payroll {
    db: Database,
    deliveries: DeliveryService,
    payouts: PayoutService,
    settings: SettingsService,
    audit_logs: AuditLogService,
    users: UserService,
    notifier: Notifier,
}

impl Payroll {
    /// Wires the services to an open database.
    ///
    /// `default_rate` is used while the settings row has no usable rate.
    pub fn new(db: Database, default_rate: i64) -> Self {
        let audit = AuditRecorder::new(db.clone());
        let notifier = Notifier::new(db.clone());
        let rates = RateResolver::new(db.clone(), default_rate);

        Payroll {
            deliveries: DeliveryService::new(db.clone(), rates, audit.clone(), notifier.clone()),
            payouts: PayoutService::new(db.clone()),
            settings: SettingsService::new(db.clone(), audit.clone()),
            audit_logs: AuditLogService::new(db.clone()),
            users: UserService::new(db.clone(), audit),
            notifier,
            db,
        }
    }

    /// Opens (and migrates) the configured database and wires the services.
    pub async fn connect(config: &ServiceConfig) -> PayrollResult<Self> {
        let db = Database::new(config.db_config()).await?;

        info!(
            path = %config.database_path.display(),
            default_rate = config.default_rate,
            "Payroll services ready"
        );

        Ok(Payroll::new(db, config.default_rate))
    }

    pub fn deliveries(&self) -> &DeliveryService {
        &self.deliveries
    }

    pub fn payouts(&self) -> &PayoutService {
        &self.payouts
    }

    pub fn settings(&self) -> &SettingsService {
        &self.settings
    }

    pub fn audit_logs(&self) -> &AuditLogService {
        &self.audit_logs
    }

    pub fn users(&self) -> &UserService {
        &self.users
    }

    pub fn notifications(&self) -> &Notifier {
        &self.notifier
    }

    /// The underlying database (user provisioning, health checks).
    pub fn database(&self) -> &Database {
        &self.db
    }
}
