//! # Notification Repository
//!
//! Per-user notification tray. Rows are written either on their own
//! (status changes) or inside the payout transaction via
//! [`insert_notification`].

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use kurir_core::notice::Notice;
use kurir_core::Notification;

/// Inserts a notification through any executor (pool or open transaction).
pub async fn insert_notification<'e, E>(
    executor: E,
    user_id: &str,
    notice: &Notice,
) -> DbResult<Notification>
where
    E: Executor<'e, Database = Sqlite>,
{
    let notification = Notification {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        title: notice.title.clone(),
        message: notice.message.clone(),
        kind: notice.kind,
        is_read: false,
        created_at: Utc::now(),
    };

    debug!(user_id = %user_id, kind = notice.kind.as_str(), "Storing notification");

    sqlx::query(
        r#"
        INSERT INTO notifications (id, user_id, title, message, kind, is_read, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&notification.id)
    .bind(&notification.user_id)
    .bind(&notification.title)
    .bind(&notification.message)
    .bind(notification.kind)
    .bind(notification.is_read)
    .bind(notification.created_at)
    .execute(executor)
    .await?;

    Ok(notification)
}

/// Repository for notification operations.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: SqlitePool,
}

impl NotificationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        NotificationRepository { pool }
    }

    pub async fn create(&self, user_id: &str, notice: &Notice) -> DbResult<Notification> {
        insert_notification(&self.pool, user_id, notice).await
    }

    /// A user's notifications, newest first.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        unread_only: bool,
    ) -> DbResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, title, message, kind, is_read, created_at
            FROM notifications
            WHERE user_id = ?1
              AND (?2 = 0 OR is_read = 0)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .bind(unread_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Marks one notification read. Returns false if it is not the user's.
    pub async fn mark_read(&self, user_id: &str, notification_id: &str) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = 1
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Marks every unread notification of a user read; returns how many.
    pub async fn mark_all_read(&self, user_id: &str) -> DbResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = 1
            WHERE user_id = ?1 AND is_read = 0
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn count_unread(&self, user_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND is_read = 0",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use kurir_core::{NotificationKind, Role};

    fn notice(title: &str) -> Notice {
        Notice {
            title: title.to_string(),
            message: "body".to_string(),
            kind: NotificationKind::Info,
        }
    }

    #[tokio::test]
    async fn test_tray_lifecycle() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let courier = db.users().create("Sari", "sari@example.com", Role::Courier).await.unwrap();
        let other = db.users().create("Eko", "eko@example.com", Role::Courier).await.unwrap();
        let repo = db.notifications();

        let first = repo.create(&courier.id, &notice("first")).await.unwrap();
        repo.create(&courier.id, &notice("second")).await.unwrap();
        assert_eq!(repo.count_unread(&courier.id).await.unwrap(), 2);

        // Someone else's id does not match
        assert!(!repo.mark_read(&other.id, &first.id).await.unwrap());
        assert!(repo.mark_read(&courier.id, &first.id).await.unwrap());

        let unread = repo.list_for_user(&courier.id, true).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].title, "second");
        assert_eq!(repo.list_for_user(&courier.id, false).await.unwrap().len(), 2);

        assert_eq!(repo.mark_all_read(&courier.id).await.unwrap(), 1);
        assert_eq!(repo.count_unread(&courier.id).await.unwrap(), 0);
    }
}
