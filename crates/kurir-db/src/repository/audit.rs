//! # Audit Log Repository
//!
//! Append-only storage for the audit trail.
//!
//! ## Two Ways In
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Best-effort (create/update/delete delivery, settings)                  │
//! │     AuditRepository::record(&entry)  ── own statement on the pool      │
//! │                                                                         │
//! │  Transactional (payout)                                                 │
//! │     insert_audit(&mut *tx, &entry)   ── rolls back with the payout     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde_json::Value;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use kurir_core::{AuditAction, AuditLogEntry, AuditLogWithUser, Page, Pagination};

/// An audit entry before it gets an id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
    pub user_id: String,
    pub action: AuditAction,
    pub entity_id: Option<String>,
    pub details: Option<Value>,
    pub ip_address: Option<String>,
}

impl NewAuditEntry {
    pub fn new(user_id: impl Into<String>, action: AuditAction) -> Self {
        NewAuditEntry {
            user_id: user_id.into(),
            action,
            entity_id: None,
            details: None,
            ip_address: None,
        }
    }

    pub fn entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn ip_address(mut self, ip: Option<String>) -> Self {
        self.ip_address = ip;
        self
    }
}

/// Inserts an audit entry through any executor (pool or open transaction).
pub async fn insert_audit<'e, E>(executor: E, entry: &NewAuditEntry) -> DbResult<AuditLogEntry>
where
    E: Executor<'e, Database = Sqlite>,
{
    let record = AuditLogEntry {
        id: Uuid::new_v4().to_string(),
        user_id: entry.user_id.clone(),
        action: entry.action.as_str().to_string(),
        entity: entry.action.entity().to_string(),
        entity_id: entry.entity_id.clone(),
        details: entry.details.as_ref().map(Value::to_string),
        ip_address: entry.ip_address.clone(),
        created_at: Utc::now(),
    };

    debug!(
        action = %record.action,
        entity_id = ?record.entity_id,
        "Appending audit entry"
    );

    sqlx::query(
        r#"
        INSERT INTO audit_logs (
            id, user_id, action, entity, entity_id, details, ip_address, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&record.id)
    .bind(&record.user_id)
    .bind(&record.action)
    .bind(&record.entity)
    .bind(&record.entity_id)
    .bind(&record.details)
    .bind(&record.ip_address)
    .bind(record.created_at)
    .execute(executor)
    .await?;

    Ok(record)
}

/// Repository for audit log operations.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: SqlitePool,
}

impl AuditRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AuditRepository { pool }
    }

    /// Appends an entry on its own connection.
    pub async fn record(&self, entry: &NewAuditEntry) -> DbResult<AuditLogEntry> {
        insert_audit(&self.pool, entry).await
    }

    /// Lists entries newest first with the acting user's identity.
    ///
    /// Entries whose user no longer exists keep `None` user fields.
    pub async fn list(&self, pagination: Pagination) -> DbResult<Page<AuditLogWithUser>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, AuditLogWithUser>(
            r#"
            SELECT
                a.id, a.user_id, a.action, a.entity, a.entity_id,
                a.details, a.ip_address, a.created_at,
                u.name AS user_name,
                u.email AS user_email,
                u.role AS user_role
            FROM audit_logs a
            LEFT JOIN users u ON u.id = a.user_id
            ORDER BY a.created_at DESC, a.id DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(i64::from(pagination.limit()))
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(rows, total, pagination))
    }

    /// Entries about one entity, oldest first.
    pub async fn list_for_entity(&self, entity_id: &str) -> DbResult<Vec<AuditLogEntry>> {
        let rows = sqlx::query_as::<_, AuditLogEntry>(
            r#"
            SELECT id, user_id, action, entity, entity_id, details, ip_address, created_at
            FROM audit_logs
            WHERE entity_id = ?1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(entity_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
