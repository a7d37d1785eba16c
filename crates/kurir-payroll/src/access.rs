//! Role checks shared by the services.
//!
//! Authentication happens upstream; these only look at the `Caller` the
//! HTTP layer built.

use kurir_core::{Caller, Delivery, Role};

use crate::error::{PayrollError, PayrollResult};

/// Fails with `Forbidden` unless the caller is an administrator.
pub(crate) fn require_admin(caller: &Caller, action: &str) -> PayrollResult<()> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(PayrollError::forbidden(format!(
            "Only administrators may {}",
            action
        )))
    }
}

/// Whether the caller may see this delivery at all.
///
/// Couriers only see their own reports; a foreign report is reported as
/// missing rather than forbidden.
pub(crate) fn can_view(caller: &Caller, delivery: &Delivery) -> bool {
    match caller.role {
        Role::Admin => true,
        Role::Courier => delivery.courier_id == caller.user_id,
    }
}

/// Fails with `Forbidden` when a courier asks about another courier's data.
pub(crate) fn require_self_or_admin(caller: &Caller, courier_id: &str) -> PayrollResult<()> {
    if caller.is_admin() || caller.user_id == courier_id {
        Ok(())
    } else {
        Err(PayrollError::forbidden(
            "Couriers may only view their own records",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&Caller::admin("a-1"), "create payouts").is_ok());

        let err = require_admin(&Caller::courier("c-1"), "create payouts").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_eq!(err.to_string(), "Only administrators may create payouts");
    }

    #[test]
    fn test_self_or_admin() {
        assert!(require_self_or_admin(&Caller::courier("c-1"), "c-1").is_ok());
        assert!(require_self_or_admin(&Caller::admin("a-1"), "c-1").is_ok());
        assert!(require_self_or_admin(&Caller::courier("c-2"), "c-1").is_err());
    }
}
