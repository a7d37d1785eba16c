//! # Payout Rules
//!
//! The pure half of the settlement engine: request validation, the settled
//! row count check and the authoritative amount.
//!
//! ## Settlement Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PayoutRequest { courierId, deliveryIds[n], method, amount? }          │
//! │       │                                                                 │
//! │       ▼  validate()                         (this module)              │
//! │  BEGIN                                                                  │
//! │       │  UPDATE ... WHERE still unpaid      (kurir-db)                 │
//! │       ▼                                                                 │
//! │  verify_settlement_count(n, rows)            (this module)             │
//! │       │  SELECT total_amount of settled rows (kurir-db)                │
//! │       ▼                                                                 │
//! │  settlement_total(totals) ──► Payment.amount (this module)             │
//! │       │  INSERT payment, audit, notification                           │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::PaymentMethod;
use crate::validation::{validate_delivery_ids, validate_notes, validate_uuid};

/// An administrator's request to settle a batch of deliveries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRequest {
    pub courier_id: String,
    pub delivery_ids: Vec<String>,
    pub method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
    /// Amount shown on the admin's screen. Informational only; the stored
    /// amount is always recomputed from the settled rows.
    #[serde(default, alias = "amount")]
    pub declared_amount: Option<i64>,
}

impl PayoutRequest {
    pub fn new(
        courier_id: impl Into<String>,
        delivery_ids: Vec<String>,
        method: PaymentMethod,
    ) -> Self {
        PayoutRequest {
            courier_id: courier_id.into(),
            delivery_ids,
            method,
            notes: None,
            declared_amount: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_declared_amount(mut self, amount: i64) -> Self {
        self.declared_amount = Some(amount);
        self
    }

    /// Shape checks that run before the transaction opens.
    pub fn validate(&self) -> CoreResult<()> {
        validate_uuid("courierId", &self.courier_id)?;
        validate_delivery_ids(&self.delivery_ids)?;
        validate_notes(self.notes.as_deref())?;
        Ok(())
    }
}

/// Fails unless every requested delivery was settled.
///
/// A shortfall means at least one id was unknown, belonged to another
/// courier, or was paid by a payout that committed first.
pub fn verify_settlement_count(requested: usize, settled: usize) -> CoreResult<()> {
    if requested != settled {
        return Err(CoreError::PayoutConflict { requested, settled });
    }
    Ok(())
}

/// Sums the settled deliveries' totals into the payout amount.
///
/// ## Example
/// ```rust
/// use kurir_core::payout::settlement_total;
///
/// let amount = settlement_total(&[30_000, 15_000]).unwrap();
/// assert_eq!(amount.units(), 45_000);
/// ```
pub fn settlement_total(totals: &[i64]) -> CoreResult<Money> {
    Money::checked_sum(totals.iter().copied().map(Money::from_units)).ok_or_else(|| {
        CoreError::AmountOverflow {
            field: "amount".to_string(),
        }
    })
}
