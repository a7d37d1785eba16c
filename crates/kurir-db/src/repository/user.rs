//! # User Repository
//!
//! Identity rows for couriers and administrators. Credentials are owned by
//! the authentication collaborator; this table only backs ownership checks,
//! foreign keys and display names.
//!
//! ## Removal
//! ```text
//! BEGIN
//!   payments by/for the user, or PAID deliveries?  yes ──► ROLLBACK, refused
//!   DELETE deliveries WHERE courier_id = U   (all unsettled)
//!   DELETE users WHERE id = U                (notifications cascade)
//! COMMIT
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kurir_core::{CoreError, PaymentStatus, Role, User, UserPatch};

/// A deleted user and the unsettled reports removed with them.
#[derive(Debug, Clone)]
pub struct RemovedUser {
    pub user: User,
    pub deleted_deliveries: u64,
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates a user.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` when the email is taken.
    pub async fn create(&self, name: &str, email: &str, role: Role) -> DbResult<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            role,
            created_at: Utc::now(),
        };

        debug!(id = %user.id, role = %role, "Creating user");

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, user.email.clone()),
            other => other,
        })?;

        Ok(user)
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role, created_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by (case-insensitive) email.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role, created_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Lists users alphabetically, optionally restricted to one role.
    pub async fn list(&self, role: Option<Role>) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role, created_at
            FROM users
            WHERE (?1 IS NULL OR role = ?1)
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Applies a validated profile patch.
    ///
    /// Returns `None` when the user does not exist.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` when the new email is taken.
    pub async fn update_profile(&self, id: &str, patch: &UserPatch) -> DbResult<Option<User>> {
        debug!(id = %id, fields = ?patch.field_names(), "Updating user profile");

        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE(?2, name),
                email = COALESCE(?3, email)
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.email)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => {
                DbError::duplicate(field, patch.email.clone().unwrap_or_default())
            }
            other => other,
        })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Deletes a user together with their unsettled delivery reports.
    ///
    /// Returns `None` when the user does not exist.
    ///
    /// ## Errors
    /// * `DbError::Rule(CoreError::UserDeleteRefused)` - the user has PAID
    ///   deliveries or appears on a payment (as courier or settling admin);
    ///   nothing was written
    pub async fn delete_unsettled(&self, id: &str) -> DbResult<Option<RemovedUser>> {
        let mut tx = self.pool.begin().await?;

        let Some(user) = sqlx::query_as::<_, User>(
            "SELECT id, name, email, role, created_at FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        let settled: i64 = sqlx::query_scalar(
            r#"
            SELECT
                (SELECT COUNT(*) FROM payments WHERE courier_id = ?1 OR admin_id = ?1)
              + (SELECT COUNT(*) FROM deliveries WHERE courier_id = ?1 AND payment_status = ?2)
            "#,
        )
        .bind(id)
        .bind(PaymentStatus::Paid)
        .fetch_one(&mut *tx)
        .await?;

        if settled > 0 {
            tx.rollback().await?;
            return Err(CoreError::UserDeleteRefused {
                user_id: id.to_string(),
                reason: format!("{} settled payment record(s) reference this account", settled),
            }
            .into());
        }

        let deleted_deliveries = sqlx::query("DELETE FROM deliveries WHERE courier_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(id = %id, deleted_deliveries, "Deleted user");

        Ok(Some(RemovedUser {
            user,
            deleted_deliveries,
        }))
    }

    /// Counts all users.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
