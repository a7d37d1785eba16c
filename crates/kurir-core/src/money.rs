//! # Money Module
//!
//! Provides the `Money` type for payroll amounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PAYROLL MATH                                                           │
//! │                                                                         │
//! │  Rates are whole currency units (Rp 3.000 per package).                 │
//! │  Totals are item_count × rate and payouts are sums of totals.           │
//! │                                                                         │
//! │  OUR SOLUTION: i64 units, checked arithmetic on every product/sum       │
//! │    10 items × Rp 3.000 = Rp 30.000, exactly                             │
//! │    An overflow is an error, never a wrapped negative payout             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kurir_core::money::Money;
//!
//! let rate = Money::from_units(3000);
//! let total = rate.checked_mul_count(10).unwrap();
//! assert_eq!(total.units(), 30_000);
//! assert_eq!(total.to_string(), "Rp 30.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole currency units (Rupiah has no minor unit in use).
///
/// ## Design Decisions
/// - **i64 (signed)**: matches the SQLite INTEGER columns one to one
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Checked helpers**: totals and payout sums use `checked_*` so a corrupt
///   row can never settle for a wrapped amount
///
/// ## Where Money is Used
/// ```text
/// SystemSettings.delivery_rate ──► Delivery.rate_per_item (snapshot)
///                                        │
///                        × item_count    ▼
///                                  Delivery.total_amount
///                                        │
///                        Σ (settled)     ▼
///                                  Payment.amount
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole currency units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in whole currency units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Multiplies a per-item rate by an item count.
    ///
    /// Returns `None` when the product does not fit in i64.
    ///
    /// ## Example
    /// ```rust
    /// use kurir_core::money::Money;
    ///
    /// let rate = Money::from_units(3000);
    /// assert_eq!(rate.checked_mul_count(10), Some(Money::from_units(30_000)));
    /// assert_eq!(Money::from_units(i64::MAX).checked_mul_count(2), None);
    /// ```
    #[inline]
    pub const fn checked_mul_count(&self, count: i64) -> Option<Self> {
        match self.0.checked_mul(count) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Adds two values, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Sums an iterator of values, returning `None` on overflow.
    pub fn checked_sum<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Money>,
    {
        values
            .into_iter()
            .try_fold(Money::zero(), |acc, value| acc.checked_add(value))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses the Indonesian grouping the dashboard prints: `Rp 30.000`.
///
/// Used for notification texts; the frontend formats its own tables.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rp {}", sign, grouped)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<i64> for Money {
    fn from(units: i64) -> Self {
        Money(units)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_units() {
        let money = Money::from_units(30_000);
        assert_eq!(money.units(), 30_000);
        assert_eq!(Money::default(), Money::zero());
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::from_units(0).to_string(), "Rp 0");
        assert_eq!(Money::from_units(950).to_string(), "Rp 950");
        assert_eq!(Money::from_units(3000).to_string(), "Rp 3.000");
        assert_eq!(Money::from_units(1_250_000).to_string(), "Rp 1.250.000");
        assert_eq!(Money::from_units(-45_000).to_string(), "-Rp 45.000");
    }

    #[test]
    fn test_checked_mul_count() {
        let rate = Money::from_units(3000);
        assert_eq!(rate.checked_mul_count(10).map(|m| m.units()), Some(30_000));
        assert_eq!(Money::from_units(i64::MAX / 2 + 1).checked_mul_count(2), None);
    }

    #[test]
    fn test_checked_sum() {
        let values = vec![
            Money::from_units(30_000),
            Money::from_units(15_000),
            Money::from_units(6_000),
        ];
        assert_eq!(Money::checked_sum(values), Some(Money::from_units(51_000)));
        assert_eq!(Money::checked_sum(Vec::new()), Some(Money::zero()));
        assert_eq!(
            Money::checked_sum(vec![Money::from_units(i64::MAX), Money::from_units(1)]),
            None
        );
    }
}
