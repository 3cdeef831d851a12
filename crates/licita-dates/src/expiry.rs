//! Expiration helpers over an optional expiration date.

use chrono::{Duration, NaiveDate};

/// Whether a document is expired at `reference`.
///
/// Without a date the expiration is unknown, which is not expired.
pub fn is_expired(expiration_date: Option<NaiveDate>, reference: NaiveDate) -> bool {
    match expiration_date {
        Some(date) => date < reference,
        None => false,
    }
}

/// Whether the document expires within `grace_days` of `reference`.
pub fn expires_soon(
    expiration_date: Option<NaiveDate>,
    reference: NaiveDate,
    grace_days: i64,
) -> bool {
    match expiration_date {
        Some(date) => {
            let warning_date = reference + Duration::days(grace_days);
            reference <= date && date <= warning_date
        }
        None => false,
    }
}

/// Days until expiration (negative if already expired).
pub fn days_until(expiration_date: Option<NaiveDate>, reference: NaiveDate) -> Option<i64> {
    expiration_date.map(|date| (date - reference).num_days())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_is_expired() {
        let today = day(2025, 6, 15);
        assert!(is_expired(Some(day(2025, 6, 14)), today));
        assert!(!is_expired(Some(day(2025, 6, 15)), today));
        assert!(!is_expired(Some(day(2025, 6, 16)), today));
        assert!(!is_expired(None, today));
    }

    #[test]
    fn test_expires_soon() {
        let today = day(2025, 6, 15);
        assert!(expires_soon(Some(day(2025, 6, 30)), today, 30));
        assert!(expires_soon(Some(day(2025, 6, 15)), today, 30));
        assert!(!expires_soon(Some(day(2025, 9, 15)), today, 30));
        // Already expired is not "expires soon".
        assert!(!expires_soon(Some(day(2025, 6, 1)), today, 30));
        assert!(!expires_soon(None, today, 30));
    }

    #[test]
    fn test_days_until() {
        let today = day(2025, 6, 15);
        assert_eq!(days_until(Some(day(2025, 6, 25)), today), Some(10));
        assert_eq!(days_until(Some(day(2025, 6, 10)), today), Some(-5));
        assert_eq!(days_until(None, today), None);
    }
}
