//! Audit trail viewer for administrators.

use kurir_core::{AuditLogWithUser, Caller, Page, Pagination};
use kurir_db::Database;

use crate::access::require_admin;
use crate::error::PayrollResult;

#[derive(Debug, Clone)]
pub struct AuditLogService {
    db: Database,
}

impl AuditLogService {
    pub fn new(db: Database) -> Self {
        AuditLogService { db }
    }

    /// Newest entries first, with the acting user's name, email and role.
    pub async fn list(
        &self,
        caller: &Caller,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> PayrollResult<Page<AuditLogWithUser>> {
        require_admin(caller, "view the audit log")?;
        Ok(self.db.audit_logs().list(Pagination::new(page, limit)).await?)
    }
}
