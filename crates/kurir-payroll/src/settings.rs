//! System settings (application name, per-item rate, self-registration).

use serde_json::json;
use tracing::info;

use kurir_core::{AuditAction, Caller, SettingsPatch, SystemSettings};
use kurir_db::{Database, NewAuditEntry};

use crate::access::require_admin;
use crate::audit::AuditRecorder;
use crate::error::PayrollResult;

#[derive(Debug, Clone)]
pub struct SettingsService {
    db: Database,
    audit: AuditRecorder,
}

impl SettingsService {
    pub fn new(db: Database, audit: AuditRecorder) -> Self {
        SettingsService { db, audit }
    }

    /// Current settings; the defaults are created on first read.
    pub async fn get(&self) -> PayrollResult<SystemSettings> {
        Ok(self.db.settings().get_or_create().await?)
    }

    /// Updates the present fields.
    ///
    /// A new `deliveryRate` applies to reports created afterwards; existing
    /// reports keep the rate they were created with.
    pub async fn update(&self, caller: &Caller, patch: SettingsPatch) -> PayrollResult<SystemSettings> {
        require_admin(caller, "change system settings")?;
        let patch = patch.validated()?;

        let settings = self.db.settings().update(&patch).await?;

        info!(
            fields = ?patch.field_names(),
            delivery_rate = settings.delivery_rate,
            "System settings updated"
        );

        self.audit
            .log(
                caller,
                NewAuditEntry::new(&caller.user_id, AuditAction::UpdateSettings)
                    .entity_id(settings.id.to_string())
                    .details(json!({
                        "changedFields": patch.field_names(),
                        "deliveryRate": settings.delivery_rate,
                    })),
            )
            .await;

        Ok(settings)
    }
}
