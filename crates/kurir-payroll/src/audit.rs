//! # Audit Trail Recorder
//!
//! Best-effort audit writes for everything except payouts.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation            Audit write             On audit failure          │
//! │  ─────────────────    ────────────────────    ────────────────────────  │
//! │  create delivery      AuditRecorder::log      error! logged, op succeeds│
//! │  update delivery      AuditRecorder::log      error! logged, op succeeds│
//! │  delete delivery      AuditRecorder::log      error! logged, op succeeds│
//! │  update settings      AuditRecorder::log      error! logged, op succeeds│
//! │  create payout        insert_audit in tx      payout rolled back        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, error};

use kurir_core::{AuditLogEntry, Caller};
use kurir_db::{Database, NewAuditEntry};

/// Appends audit entries without ever failing the calling operation.
#[derive(Debug, Clone)]
pub struct AuditRecorder {
    db: Database,
}

impl AuditRecorder {
    pub fn new(db: Database) -> Self {
        AuditRecorder { db }
    }

    /// Records `entry`, attributing it to the caller's IP when the entry has none.
    ///
    /// Returns the stored row, or `None` when the write failed (already logged).
    pub async fn log(&self, caller: &Caller, mut entry: NewAuditEntry) -> Option<AuditLogEntry> {
        if entry.ip_address.is_none() {
            entry = entry.ip_address(caller.ip_address.clone());
        }

        match self.db.audit_logs().record(&entry).await {
            Ok(stored) => {
                debug!(
                    action = %entry.action,
                    entity_id = ?entry.entity_id,
                    user_id = %entry.user_id,
                    "Audit entry recorded"
                );
                Some(stored)
            }
            Err(e) => {
                error!(
                    error = %e,
                    action = %entry.action,
                    entity_id = ?entry.entity_id,
                    "Failed to record audit entry"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurir_core::AuditAction;
    use kurir_db::DbConfig;
    use serde_json::json;

    #[tokio::test]
    async fn test_log_attaches_caller_ip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let recorder = AuditRecorder::new(db.clone());
        let caller = Caller::admin("admin-1").with_ip("10.0.0.7");

        let stored = recorder
            .log(
                &caller,
                NewAuditEntry::new("admin-1", AuditAction::UpdateSettings)
                    .details(json!({ "changedFields": ["deliveryRate"] })),
            )
            .await
            .unwrap();

        assert_eq!(stored.ip_address.as_deref(), Some("10.0.0.7"));
        assert_eq!(stored.action, "UPDATE_SETTINGS");
        assert_eq!(stored.entity, "SystemSettings");
    }

    #[tokio::test]
    async fn test_log_swallows_failures() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let recorder = AuditRecorder::new(db.clone());
        db.close().await;

        let stored = recorder
            .log(
                &Caller::admin("admin-1"),
                NewAuditEntry::new("admin-1", AuditAction::DeleteDelivery),
            )
            .await;
        assert!(stored.is_none());
    }
}
