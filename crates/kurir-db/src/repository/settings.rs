//! # System Settings Repository
//!
//! The single `system_settings` row (id = 1). Reads create the default row
//! on first use, so callers never see "no settings".

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use kurir_core::{SettingsPatch, SystemSettings};

const SETTINGS_ID: i64 = 1;

/// Repository for the system settings row.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Returns the settings, inserting the defaults if the row is missing.
    pub async fn get_or_create(&self) -> DbResult<SystemSettings> {
        let inserted = sqlx::query(
            r#"
            INSERT OR IGNORE INTO system_settings (id, updated_at)
            VALUES (?1, ?2)
            "#,
        )
        .bind(SETTINGS_ID)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if inserted.rows_affected() > 0 {
            info!("Created default system settings");
        }

        let settings = sqlx::query_as::<_, SystemSettings>(
            r#"
            SELECT id, app_name, delivery_rate, currency_symbol,
                   allow_courier_self_register, updated_at
            FROM system_settings
            WHERE id = ?1
            "#,
        )
        .bind(SETTINGS_ID)
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }

    /// The configured delivery rate, without creating the row.
    pub async fn current_rate(&self) -> DbResult<Option<i64>> {
        let rate: Option<i64> =
            sqlx::query_scalar("SELECT delivery_rate FROM system_settings WHERE id = ?1")
                .bind(SETTINGS_ID)
                .fetch_optional(&self.pool)
                .await?;

        Ok(rate)
    }

    /// Applies a validated patch and returns the new settings.
    pub async fn update(&self, patch: &SettingsPatch) -> DbResult<SystemSettings> {
        self.get_or_create().await?;

        debug!(fields = ?patch.field_names(), "Updating system settings");

        sqlx::query(
            r#"
            UPDATE system_settings
            SET app_name = COALESCE(?1, app_name),
                delivery_rate = COALESCE(?2, delivery_rate),
                allow_courier_self_register = COALESCE(?3, allow_courier_self_register),
                updated_at = ?4
            WHERE id = ?5
            "#,
        )
        .bind(&patch.app_name)
        .bind(patch.delivery_rate)
        .bind(patch.allow_courier_self_register)
        .bind(Utc::now())
        .bind(SETTINGS_ID)
        .execute(&self.pool)
        .await?;

        self.get_or_create().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use kurir_core::DEFAULT_DELIVERY_RATE;

    #[tokio::test]
    async fn test_defaults_created_on_first_read() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert_eq!(db.settings().current_rate().await.unwrap(), None);

        let settings = db.settings().get_or_create().await.unwrap();
        assert_eq!(settings.app_name, "KurirPay");
        assert_eq!(settings.delivery_rate, DEFAULT_DELIVERY_RATE);
        assert_eq!(settings.currency_symbol, "Rp");
        assert!(!settings.allow_courier_self_register);
        assert_eq!(db.settings().current_rate().await.unwrap(), Some(DEFAULT_DELIVERY_RATE));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let patch = SettingsPatch {
            delivery_rate: Some(3500),
            ..Default::default()
        };
        let settings = db.settings().update(&patch).await.unwrap();
        assert_eq!(settings.delivery_rate, 3500);
        assert_eq!(settings.app_name, "KurirPay");

        let patch = SettingsPatch {
            allow_courier_self_register: Some(true),
            ..Default::default()
        };
        let settings = db.settings().update(&patch).await.unwrap();
        assert!(settings.allow_courier_self_register);
        assert_eq!(settings.delivery_rate, 3500);
    }
}
