//! Issuance-window validation for certificates measured from emission.
//!
//! Judicial and bankruptcy certificates rarely print an expiration date;
//! procurement practice accepts them for a fixed number of days after
//! emission (90 by convention).

use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::parse::parse_date;

// Labeled issuance field, e.g. "emitido em 01/01/2025".
static ISSUANCE_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:emitid[oa]\s+em|expedid[oa]\s+em|data\s+de\s+emiss[ãa]o|data\s+de\s+expedi[çc][ãa]o)\s*:?\s*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4}|\d{4}[/\-]\d{1,2}[/\-]\d{1,2})",
    )
    .unwrap()
});

/// Outcome of issuance-window validation.
#[derive(Debug, Clone, Serialize)]
pub struct IssuanceCheck {
    pub issuance_date: Option<NaiveDate>,
    /// Issuance date plus the acceptance window.
    pub expiration_date: Option<NaiveDate>,
    pub is_expired: bool,
    pub days_remaining: Option<i64>,
    /// Inside the final stretch of the window.
    pub near_limit: bool,
}

/// Validates documents whose compliance window runs from emission.
#[derive(Debug, Clone)]
pub struct IssuanceValidator {
    max_days: i64,
    warning_days: i64,
}

impl Default for IssuanceValidator {
    fn default() -> Self {
        Self {
            max_days: 90,
            warning_days: 10,
        }
    }
}

impl IssuanceValidator {
    pub fn new(max_days: i64, warning_days: i64) -> Self {
        Self {
            max_days,
            warning_days,
        }
    }

    /// Extract the issuance date from a labeled field. First hit wins.
    pub fn extract_issuance_date(&self, text: &str) -> Option<NaiveDate> {
        let caps = ISSUANCE_FIELD.captures(text)?;
        parse_date(caps.get(1)?.as_str())
    }

    /// Validate `text` against the issuance window at `today`.
    ///
    /// No issuance date found means the window cannot be checked: the
    /// document is reported as not expired with everything unknown.
    pub fn validate(&self, text: &str, today: NaiveDate) -> IssuanceCheck {
        let Some(issuance) = self.extract_issuance_date(text) else {
            return IssuanceCheck {
                issuance_date: None,
                expiration_date: None,
                is_expired: false,
                days_remaining: None,
                near_limit: false,
            };
        };

        let expiration = issuance + Duration::days(self.max_days);
        let days_remaining = (expiration - today).num_days();
        let is_expired = days_remaining < 0;
        let near_limit = !is_expired && days_remaining <= self.warning_days;

        debug!(
            "Issuance check: emitted {}, window closes {}, {} days remaining",
            issuance, expiration, days_remaining
        );

        IssuanceCheck {
            issuance_date: Some(issuance),
            expiration_date: Some(expiration),
            is_expired,
            days_remaining: Some(days_remaining),
            near_limit,
        }
    }
}
