//! Licita Dates — date parsing, validity-date inference, issuance-window validation.
//!
//! Procurement paperwork carries dates in free-form, frequently OCR-mangled
//! Portuguese text. This crate finds the date that most plausibly bounds a
//! document's validity, in three stages of decreasing confidence: labeled
//! field, relative-validity phrase, scored free-text candidate.

pub mod expiry;
pub mod issuance;
pub mod parse;
pub mod validity;

pub use expiry::{days_until, expires_soon, is_expired};
pub use issuance::{IssuanceCheck, IssuanceValidator};
pub use parse::{extract_dates_with_context, parse_date, DateCandidate};
pub use validity::find_validity_date;
