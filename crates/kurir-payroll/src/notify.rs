//! Courier notifications.
//!
//! Sending is fire-and-forget: a failed write is logged and the operation
//! that triggered it still succeeds. Payout notifications are the exception;
//! they are written inside the settlement transaction by kurir-db.

use tracing::{debug, error};

use kurir_core::notice::Notice;
use kurir_core::{CoreError, Notification};
use kurir_db::Database;

use crate::error::PayrollResult;

/// Notification tray operations.
#[derive(Debug, Clone)]
pub struct Notifier {
    db: Database,
}

impl Notifier {
    pub fn new(db: Database) -> Self {
        Notifier { db }
    }

    /// Stores a notification for `user_id`, never failing the caller.
    pub async fn notify(&self, user_id: &str, notice: &Notice) -> Option<Notification> {
        match self.db.notifications().create(user_id, notice).await {
            Ok(notification) => {
                debug!(user_id = %user_id, title = %notice.title, "Notification sent");
                Some(notification)
            }
            Err(e) => {
                error!(error = %e, user_id = %user_id, title = %notice.title, "Failed to send notification");
                None
            }
        }
    }

    /// The user's notifications, newest first.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        unread_only: bool,
    ) -> PayrollResult<Vec<Notification>> {
        Ok(self.db.notifications().list_for_user(user_id, unread_only).await?)
    }

    /// Marks one of the user's notifications read.
    ///
    /// ## Errors
    /// * `NotFound` - no such notification, or it belongs to someone else
    pub async fn mark_read(&self, user_id: &str, notification_id: &str) -> PayrollResult<()> {
        if !self.db.notifications().mark_read(user_id, notification_id).await? {
            return Err(CoreError::NotificationNotFound(notification_id.to_string()).into());
        }
        Ok(())
    }

    /// Marks everything read; returns how many changed.
    pub async fn mark_all_read(&self, user_id: &str) -> PayrollResult<u64> {
        Ok(self.db.notifications().mark_all_read(user_id).await?)
    }

    pub async fn count_unread(&self, user_id: &str) -> PayrollResult<i64> {
        Ok(self.db.notifications().count_unread(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use kurir_core::{NotificationKind, Role};
    use kurir_db::DbConfig;

    fn notice(title: &str) -> Notice {
        Notice {
            title: title.to_string(),
            message: format!("{} body", title),
            kind: NotificationKind::Info,
        }
    }

    #[tokio::test]
    async fn test_tray_flow() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let courier = db
            .users()
            .create("Budi", "budi@example.com", Role::Courier)
            .await
            .unwrap();
        let other = db
            .users()
            .create("Sari", "sari@example.com", Role::Courier)
            .await
            .unwrap();
        let notifier = Notifier::new(db.clone());

        let first = notifier.notify(&courier.id, &notice("First")).await.unwrap();
        notifier.notify(&courier.id, &notice("Second")).await.unwrap();
        assert_eq!(notifier.count_unread(&courier.id).await.unwrap(), 2);

        notifier.mark_read(&courier.id, &first.id).await.unwrap();
        let unread = notifier.list_for_user(&courier.id, true).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].title, "Second");

        let err = notifier.mark_read(&other.id, &first.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        assert_eq!(notifier.mark_all_read(&courier.id).await.unwrap(), 1);
        assert_eq!(notifier.count_unread(&courier.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_notify_unknown_user_is_swallowed() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let notifier = Notifier::new(db);

        assert!(notifier.notify("no-such-user", &notice("Lost")).await.is_none());
    }
}
