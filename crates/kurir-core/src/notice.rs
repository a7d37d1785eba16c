//! # Notification Texts
//!
//! Builds the courier-facing messages for status changes and payouts.
//! Delivery of the message (persisting it, pushing it) is not done here.

use chrono::NaiveDate;

use crate::money::Money;
use crate::types::{DeliveryStatus, NotificationKind, PaymentMethod};

/// Title, body and severity of one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

/// Message for a courier whose report changed status.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use kurir_core::notice::status_change_notice;
/// use kurir_core::{DeliveryStatus, NotificationKind};
///
/// let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
/// let notice = status_change_notice(date, 10, DeliveryStatus::Approved);
/// assert_eq!(notice.kind, NotificationKind::Success);
/// assert_eq!(notice.message, "Your delivery report for 2026-10-01 (10 items) has been approved.");
/// ```
pub fn status_change_notice(date: NaiveDate, item_count: i64, status: DeliveryStatus) -> Notice {
    let (title, verb, kind) = match status {
        DeliveryStatus::Approved => (
            "Delivery report approved",
            "has been approved",
            NotificationKind::Success,
        ),
        DeliveryStatus::Rejected => (
            "Delivery report rejected",
            "has been rejected",
            NotificationKind::Error,
        ),
        DeliveryStatus::Pending => (
            "Delivery report pending",
            "is waiting for review",
            NotificationKind::Info,
        ),
    };

    Notice {
        title: title.to_string(),
        message: format!(
            "Your delivery report for {} ({} {}) {}.",
            date.format("%Y-%m-%d"),
            item_count,
            if item_count == 1 { "item" } else { "items" },
            verb
        ),
        kind,
    }
}

/// Message for a courier who has just been paid.
pub fn payout_notice(amount: Money, method: PaymentMethod, delivery_count: usize) -> Notice {
    let method = match method {
        PaymentMethod::Cash => "cash",
        PaymentMethod::Transfer => "bank transfer",
    };

    Notice {
        title: "Payment received".to_string(),
        message: format!(
            "You have been paid {} by {} for {} {}.",
            amount,
            method,
            delivery_count,
            if delivery_count == 1 { "delivery report" } else { "delivery reports" }
        ),
        kind: NotificationKind::Success,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_notice() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 2).unwrap();
        let notice = status_change_notice(date, 1, DeliveryStatus::Rejected);
        assert_eq!(notice.title, "Delivery report rejected");
        assert_eq!(notice.kind, NotificationKind::Error);
        assert_eq!(
            notice.message,
            "Your delivery report for 2026-10-02 (1 item) has been rejected."
        );
    }

    #[test]
    fn test_payout_notice() {
        let notice = payout_notice(Money::from_units(30_000), PaymentMethod::Cash, 1);
        assert_eq!(
            notice.message,
            "You have been paid Rp 30.000 by cash for 1 delivery report."
        );
    }
}
