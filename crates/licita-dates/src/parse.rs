//! Date token parsing for Brazilian document formats.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// How the digit groups of a pattern map to a calendar date.
#[derive(Debug, Clone, Copy)]
enum GroupOrder {
    DayMonthYear,
    YearMonthDay,
}

struct DatePattern {
    regex: Regex,
    order: GroupOrder,
}

// Ordered: the four-digit-year Brazilian form first, then the two-digit
// variant, then ISO. The \b anchors keep the two-digit pattern from eating
// a prefix of a four-digit year.
static DATE_PATTERNS: Lazy<Vec<DatePattern>> = Lazy::new(|| {
    vec![
        DatePattern {
            regex: Regex::new(r"\b(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{4})\b").unwrap(),
            order: GroupOrder::DayMonthYear,
        },
        DatePattern {
            regex: Regex::new(r"\b(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{2})\b").unwrap(),
            order: GroupOrder::DayMonthYear,
        },
        DatePattern {
            regex: Regex::new(r"\b(\d{4})[/\-](\d{1,2})[/\-](\d{1,2})\b").unwrap(),
            order: GroupOrder::YearMonthDay,
        },
    ]
});

/// A date found in text, with enough position information to score it.
#[derive(Debug, Clone)]
pub struct DateCandidate {
    pub date: NaiveDate,
    /// Byte offset of the date token in the source text.
    pub start: usize,
    pub end: usize,
    /// Surrounding text window (char-boundary safe).
    pub context: String,
    /// Byte offset where `context` begins in the source text.
    pub context_start: usize,
}

/// Parse a date string in any supported format.
///
/// Two-digit years resolve as `<50 → 20xx, ≥50 → 19xx`. Out-of-range
/// components (day, month, or a year outside 1900–2100) yield `None`.
pub fn parse_date(date_string: &str) -> Option<NaiveDate> {
    if date_string.is_empty() {
        return None;
    }

    for pattern in DATE_PATTERNS.iter() {
        let Some(caps) = pattern.regex.captures(date_string) else {
            continue;
        };
        let (day, month, year) = match pattern.order {
            GroupOrder::DayMonthYear => (&caps[1], &caps[2], &caps[3]),
            GroupOrder::YearMonthDay => (&caps[3], &caps[2], &caps[1]),
        };
        if let Some(date) = build_date(day, month, year) {
            return Some(date);
        }
    }

    None
}

fn build_date(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    let day: u32 = day.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let mut year: i32 = year.parse().ok()?;

    if year < 100 {
        year = if year < 50 { 2000 + year } else { 1900 + year };
    }

    if !(1..=31).contains(&day) || !(1..=12).contains(&month) || !(1900..=2100).contains(&year) {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Extract every date-like substring with a window of surrounding context.
///
/// Candidates come out in pattern-then-position order; the caller's
/// tie-breaking relies on this being stable.
pub fn extract_dates_with_context(text: &str, context_window: usize) -> Vec<DateCandidate> {
    let mut candidates = Vec::new();

    if text.is_empty() {
        return candidates;
    }

    for pattern in DATE_PATTERNS.iter() {
        for m in pattern.regex.find_iter(text) {
            let Some(caps) = pattern.regex.captures(m.as_str()) else {
                continue;
            };
            let (day, month, year) = match pattern.order {
                GroupOrder::DayMonthYear => (&caps[1], &caps[2], &caps[3]),
                GroupOrder::YearMonthDay => (&caps[3], &caps[2], &caps[1]),
            };
            let Some(date) = build_date(day, month, year) else {
                continue;
            };

            let context_start = floor_char_boundary(text, m.start().saturating_sub(context_window));
            let context_end = ceil_char_boundary(text, (m.end() + context_window).min(text.len()));

            candidates.push(DateCandidate {
                date,
                start: m.start(),
                end: m.end(),
                context: text[context_start..context_end].trim().to_string(),
                context_start,
            });
        }
    }

    candidates
}

/// Largest char boundary at or below `index`.
pub(crate) fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Smallest char boundary at or above `index`.
pub(crate) fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}
