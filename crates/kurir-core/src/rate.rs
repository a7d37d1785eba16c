//! # Rate Resolution Rule
//!
//! Decides the per-item rate snapshotted into a new delivery report.
//!
//! ```text
//! settings.delivery_rate ──► Some(r) if r >= 1 ──► r
//!                       └──► None / r <= 0     ──► fallback (default 3000)
//! ```
//!
//! The lookup itself is I/O and lives in `kurir-payroll::rate::RateResolver`.

use crate::DEFAULT_DELIVERY_RATE;

/// Picks the configured rate when it is usable, otherwise the fallback.
///
/// A non-positive fallback is itself replaced by [`DEFAULT_DELIVERY_RATE`],
/// so the returned rate is always at least 1.
///
/// ## Example
/// ```rust
/// use kurir_core::rate::resolve_rate;
///
/// assert_eq!(resolve_rate(Some(3500), 3000), 3500);
/// assert_eq!(resolve_rate(None, 3000), 3000);
/// assert_eq!(resolve_rate(Some(0), 3000), 3000);
/// ```
pub fn resolve_rate(configured: Option<i64>, fallback: i64) -> i64 {
    match configured {
        Some(rate) if rate >= 1 => rate,
        _ if fallback >= 1 => fallback,
        _ => DEFAULT_DELIVERY_RATE,
    }
}
