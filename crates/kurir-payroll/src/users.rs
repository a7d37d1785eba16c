//! Account administration: the courier directory and profile edits.
//!
//! The payout screen starts here: an administrator picks a courier from
//! [`UserService::list_couriers`] before asking for their unpaid reports.
//! Credentials and roles belong to the auth collaborator and are not
//! editable through this service.

use serde_json::json;
use tracing::{info, warn};

use kurir_core::{AuditAction, Caller, CoreError, Role, User, UserPatch};
use kurir_db::{Database, NewAuditEntry};

use crate::access::{require_admin, require_self_or_admin};
use crate::audit::AuditRecorder;
use crate::error::PayrollResult;

#[derive(Debug, Clone)]
pub struct UserService {
    db: Database,
    audit: AuditRecorder,
}

impl UserService {
    pub fn new(db: Database, audit: AuditRecorder) -> Self {
        UserService { db, audit }
    }

    /// All accounts, or one role's, alphabetically (administrators only).
    pub async fn list(&self, caller: &Caller, role: Option<Role>) -> PayrollResult<Vec<User>> {
        require_admin(caller, "list users")?;
        Ok(self.db.users().list(role).await?)
    }

    /// Couriers an administrator can settle payouts for.
    pub async fn list_couriers(&self, caller: &Caller) -> PayrollResult<Vec<User>> {
        self.list(caller, Some(Role::Courier)).await
    }

    /// One account; couriers may only look up themselves.
    pub async fn get(&self, caller: &Caller, id: &str) -> PayrollResult<User> {
        require_self_or_admin(caller, id)?;
        self.db
            .users()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::UserNotFound(id.to_string()).into())
    }

    /// Changes name and/or email (administrators only).
    ///
    /// ## Errors
    /// * `Validation` - blank or overlong name, malformed email
    /// * `NotFound` - no such user
    /// * `Conflict` - the email belongs to another account
    pub async fn update(&self, caller: &Caller, id: &str, patch: UserPatch) -> PayrollResult<User> {
        require_admin(caller, "edit user profiles")?;
        let patch = patch.validated()?;

        let user = self
            .db
            .users()
            .update_profile(id, &patch)
            .await?
            .ok_or_else(|| CoreError::UserNotFound(id.to_string()))?;

        info!(user_id = %user.id, fields = ?patch.field_names(), "User profile updated");

        self.audit
            .log(
                caller,
                NewAuditEntry::new(&caller.user_id, AuditAction::UpdateUser)
                    .entity_id(&user.id)
                    .details(json!({ "changedFields": patch.field_names() })),
            )
            .await;

        Ok(user)
    }

    /// Removes an account and its unsettled delivery reports.
    ///
    /// Accounts that appear on any payment are kept: their PAID reports are
    /// what the payment amounts add up to.
    ///
    /// ## Errors
    /// * `Forbidden` - caller is not an administrator
    /// * `BusinessRule` - own account, or settled payouts reference it
    /// * `NotFound` - no such user
    pub async fn delete(&self, caller: &Caller, id: &str) -> PayrollResult<User> {
        require_admin(caller, "delete users")?;
        if caller.user_id == id {
            return Err(CoreError::UserDeleteRefused {
                user_id: id.to_string(),
                reason: "administrators cannot delete their own account".to_string(),
            }
            .into());
        }

        let removed = self
            .db
            .users()
            .delete_unsettled(id)
            .await?
            .ok_or_else(|| CoreError::UserNotFound(id.to_string()))?;

        if removed.deleted_deliveries > 0 {
            warn!(
                user_id = %removed.user.id,
                deliveries = removed.deleted_deliveries,
                "Deleted unsettled delivery reports with the account"
            );
        }
        info!(user_id = %removed.user.id, role = %removed.user.role, "User deleted");

        self.audit
            .log(
                caller,
                NewAuditEntry::new(&caller.user_id, AuditAction::DeleteUser)
                    .entity_id(&removed.user.id)
                    .details(json!({
                        "email": removed.user.email,
                        "role": removed.user.role,
                        "deletedDeliveries": removed.deleted_deliveries,
                    })),
            )
            .await;

        Ok(removed.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::NaiveDate;
    use kurir_core::lifecycle::NewDelivery;
    use kurir_core::payout::PayoutRequest;
    use kurir_core::PaymentMethod;
    use kurir_db::DbConfig;

    struct Fixture {
        db: Database,
        service: UserService,
        admin: Caller,
        courier: User,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let admin = db
            .users()
            .create("Admin", "admin@example.com", Role::Admin)
            .await
            .unwrap();
        let courier = db
            .users()
            .create("Budi", "budi@example.com", Role::Courier)
            .await
            .unwrap();
        db.users()
            .create("Agus", "agus@example.com", Role::Courier)
            .await
            .unwrap();

        Fixture {
            service: UserService::new(db.clone(), AuditRecorder::new(db.clone())),
            db,
            admin: Caller::admin(admin.id),
            courier,
        }
    }

    #[tokio::test]
    async fn test_list_couriers() {
        let f = fixture().await;

        let couriers = f.service.list_couriers(&f.admin).await.unwrap();
        let names: Vec<&str> = couriers.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Agus", "Budi"]);
        assert_eq!(f.service.list(&f.admin, None).await.unwrap().len(), 3);

        let err = f
            .service
            .list_couriers(&Caller::courier(f.courier.id.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_get_self_or_admin() {
        let f = fixture().await;
        let me = Caller::courier(f.courier.id.clone());

        assert_eq!(f.service.get(&me, &f.courier.id).await.unwrap().name, "Budi");
        assert_eq!(f.service.get(&f.admin, &f.courier.id).await.unwrap().id, f.courier.id);

        let err = f.service.get(&me, &f.admin.user_id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = f.service.get(&f.admin, "missing").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_profile_is_audited() {
        let f = fixture().await;

        let updated = f
            .service
            .update(
                &f.admin,
                &f.courier.id,
                UserPatch {
                    name: Some(" Budi Santoso ".to_string()),
                    email: Some("Budi.Santoso@Example.com".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Budi Santoso");
        assert_eq!(updated.email, "budi.santoso@example.com");
        assert_eq!(updated.role, Role::Courier);

        let audit = f.db.audit_logs().list_for_entity(&f.courier.id).await.unwrap();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].action, "UPDATE_USER");
        assert_eq!(audit[0].entity, "User");
        assert_eq!(
            audit[0].details.as_deref(),
            Some(r#"{"changedFields":["name","email"]}"#)
        );
    }

    #[tokio::test]
    async fn test_update_errors() {
        let f = fixture().await;

        let taken = UserPatch {
            email: Some("agus@example.com".to_string()),
            ..Default::default()
        };
        let err = f.service.update(&f.admin, &f.courier.id, taken).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let blank = UserPatch {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        let err = f.service.update(&f.admin, &f.courier.id, blank).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);

        let err = f
            .service
            .update(&f.admin, "missing", UserPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = f
            .service
            .update(
                &Caller::courier(f.courier.id.clone()),
                &f.courier.id,
                UserPatch::default(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let unchanged = f.service.get(&f.admin, &f.courier.id).await.unwrap();
        assert_eq!(unchanged.email, "budi@example.com");
    }

    #[tokio::test]
    async fn test_delete_keeps_settled_history() {
        let f = fixture().await;
        let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let delivery = f
            .db
            .deliveries()
            .insert(&NewDelivery::new(&f.courier.id, date, 10, 3000, None, None).unwrap())
            .await
            .unwrap();
        let request = PayoutRequest::new(&f.courier.id, vec![delivery.id.clone()], PaymentMethod::Cash);
        let settlement = f.db.payments().settle(&request, &f.admin).await.unwrap();

        let err = f.service.delete(&f.admin, &f.courier.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BusinessRule);

        let settled = f
            .db
            .deliveries()
            .list_for_payment(&settlement.payment.id)
            .await
            .unwrap();
        let total: i64 = settled.iter().map(|d| d.total_amount).sum();
        assert_eq!(total, settlement.payment.amount);

        let err = f.service.delete(&f.admin, &f.admin.user_id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BusinessRule);
    }

    #[tokio::test]
    async fn test_delete_unsettled_courier() {
        let f = fixture().await;
        let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        f.db.deliveries()
            .insert(&NewDelivery::new(&f.courier.id, date, 10, 3000, None, None).unwrap())
            .await
            .unwrap();

        let removed = f.service.delete(&f.admin, &f.courier.id).await.unwrap();
        assert_eq!(removed.id, f.courier.id);

        let err = f.service.get(&f.admin, &f.courier.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let audit = f.db.audit_logs().list_for_entity(&f.courier.id).await.unwrap();
        assert_eq!(audit[0].action, "DELETE_USER");
        let details: serde_json::Value =
            serde_json::from_str(audit[0].details.as_deref().unwrap()).unwrap();
        assert_eq!(details["deletedDeliveries"], 1);
        assert_eq!(details["role"], "COURIER");

        let err = f.service.delete(&f.admin, &f.courier.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
