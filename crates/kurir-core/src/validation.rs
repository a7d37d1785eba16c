//! # Validation Module
//!
//! Input validation utilities for KurirPay.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard / courier app                                      │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Services (Rust)                                              │
//! │  ├── Type validation (deserialization into DeliveryPatch etc.)         │
//! │  └── THIS MODULE: field rules, run before any write                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (item_count >= 1), CHECK (status IN ...)                    │
//! │  ├── UNIQUE (users.email)                                              │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use kurir_core::validation::{validate_item_count, validate_notes};
//!
//! validate_item_count(10).unwrap();
//! validate_notes(Some("left at the front desk")).unwrap();
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::{
    MAX_APP_NAME_LENGTH, MAX_EMAIL_LENGTH, MAX_NOTES_LENGTH, MAX_PAYOUT_DELIVERIES,
    MAX_USER_NAME_LENGTH,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the number of packages on a delivery report.
///
/// ## Rules
/// - Must be at least 1
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Courier: Submit Daily Report                                           │
/// │                                                                         │
/// │  Courier enters item count: 10                                         │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_item_count(10) ← THIS FUNCTION                               │
/// │       │                                                                 │
/// │       ├── count < 1? → Error: "itemCount must be positive"             │
/// │       │                                                                 │
/// │       └── OK → rate lookup, total = count × rate, insert               │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_item_count(count: i64) -> ValidationResult<()> {
    if count < 1 {
        return Err(ValidationError::MustBePositive {
            field: "itemCount".to_string(),
        });
    }

    Ok(())
}

/// Validates a per-item rate (settings or a patched delivery).
///
/// ## Example
/// ```rust
/// use kurir_core::validation::validate_rate;
///
/// assert!(validate_rate("ratePerItem", 3000).is_ok());
/// assert!(validate_rate("ratePerItem", 0).is_err());
/// ```
pub fn validate_rate(field: &str, rate: i64) -> ValidationResult<()> {
    if rate < 1 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates optional free-text notes.
///
/// ## Rules
/// - May be absent or empty
/// - At most MAX_NOTES_LENGTH characters
pub fn validate_notes(notes: Option<&str>) -> ValidationResult<()> {
    if let Some(notes) = notes {
        if notes.chars().count() > MAX_NOTES_LENGTH {
            return Err(ValidationError::TooLong {
                field: "notes".to_string(),
                max: MAX_NOTES_LENGTH,
            });
        }
    }

    Ok(())
}

/// Validates the application display name in system settings.
///
/// ## Returns
/// The trimmed name.
pub fn validate_app_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "appName".to_string(),
        });
    }

    if name.chars().count() > MAX_APP_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "appName".to_string(),
            max: MAX_APP_NAME_LENGTH,
        });
    }

    Ok(name.to_string())
}

/// Validates a user's display name.
///
/// ## Returns
/// The trimmed name.
pub fn validate_user_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_USER_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_USER_NAME_LENGTH,
        });
    }

    Ok(name.to_string())
}

/// Validates an email address.
///
/// Only the shape is checked (`local@domain.tld`, no whitespace); delivery
/// is the auth collaborator's concern.
///
/// ## Returns
/// The trimmed, lowercased address (emails are unique case-insensitively).
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim().to_lowercase();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
        });
    }

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        });
    }

    Ok(email)
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use kurir_core::validation::validate_uuid;
///
/// assert!(validate_uuid("courierId", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("courierId", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the delivery ids of a payout request.
///
/// ## Rules
/// - At least one id
/// - At most MAX_PAYOUT_DELIVERIES ids
/// - Every id is a UUID
/// - No id appears twice (a duplicate would make the settled-row count
///   check meaningless)
pub fn validate_delivery_ids(ids: &[String]) -> ValidationResult<()> {
    if ids.is_empty() {
        return Err(ValidationError::Required {
            field: "deliveryIds".to_string(),
        });
    }

    if ids.len() > MAX_PAYOUT_DELIVERIES {
        return Err(ValidationError::OutOfRange {
            field: "deliveryIds".to_string(),
            min: 1,
            max: MAX_PAYOUT_DELIVERIES as i64,
        });
    }

    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        validate_uuid("deliveryIds", id)?;
        if !seen.insert(id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "deliveryIds".to_string(),
                value: id.clone(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ID_A: &str = "550e8400-e29b-41d4-a716-446655440000";
    const ID_B: &str = "6f1c2a9e-3b7d-4c55-9e21-0d6a8b4f7c10";

    #[test]
    fn test_validate_item_count() {
        assert!(validate_item_count(1).is_ok());
        assert!(validate_item_count(250).is_ok());

        assert!(validate_item_count(0).is_err());
        assert!(validate_item_count(-3).is_err());
    }

    #[test]
    fn test_validate_user_name() {
        assert_eq!(validate_user_name("  Sari ").unwrap(), "Sari");
        assert!(validate_user_name("   ").is_err());
        assert!(validate_user_name(&"x".repeat(MAX_USER_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(" Sari@Example.COM ").unwrap(), "sari@example.com");

        for bad in ["", "sari", "@example.com", "sari@", "sari@example", "sa ri@example.com", "a@b@c.com", "sari@.com"] {
            assert!(validate_email(bad).is_err(), "{:?} accepted", bad);
        }
    }

    #[test]
    fn test_validate_rate() {
        assert!(validate_rate("deliveryRate", 1).is_ok());
        let err = validate_rate("deliveryRate", -5).unwrap_err();
        assert_eq!(err.to_string(), "deliveryRate must be positive");
    }

    #[test]
    fn test_validate_notes() {
        assert!(validate_notes(None).is_ok());
        assert!(validate_notes(Some("")).is_ok());
        assert!(validate_notes(Some(&"x".repeat(MAX_NOTES_LENGTH))).is_ok());
        assert!(validate_notes(Some(&"x".repeat(MAX_NOTES_LENGTH + 1))).is_err());
    }

    #[test]
    fn test_validate_app_name() {
        assert_eq!(validate_app_name("  KurirPay  ").unwrap(), "KurirPay");
        assert!(validate_app_name("   ").is_err());
        assert!(validate_app_name(&"A".repeat(MAX_APP_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("id", ID_A).is_ok());
        assert!(validate_uuid("id", "").is_err());
        assert!(validate_uuid("id", "123").is_err());
    }

    #[test]
    fn test_validate_delivery_ids() {
        assert!(validate_delivery_ids(&[ID_A.to_string(), ID_B.to_string()]).is_ok());

        assert!(matches!(
            validate_delivery_ids(&[]),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_delivery_ids(&[ID_A.to_string(), ID_A.to_string()]),
            Err(ValidationError::Duplicate { .. })
        ));
        assert!(matches!(
            validate_delivery_ids(&["nope".to_string()]),
            Err(ValidationError::InvalidFormat { .. })
        ));

        let too_many: Vec<String> = (0..=MAX_PAYOUT_DELIVERIES)
            .map(|_| uuid::Uuid::new_v4().to_string())
            .collect();
        assert!(matches!(
            validate_delivery_ids(&too_many),
            Err(ValidationError::OutOfRange { .. })
        ));
    }
}
