//! Validity-date inference over free-form document text.
//!
//! Three stages, first hit wins: labeled field, relative-validity phrase
//! anchored to an issuance date, scored free-text candidate.

use chrono::{Duration, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::parse::{
    ceil_char_boundary, extract_dates_with_context, floor_char_boundary, parse_date,
};

/// Context keywords that mark a validity/expiration date.
const VALIDITY_KEYWORDS: &[&str] = &[
    "validade",
    "válidade",
    "vencimento",
    "expira em",
    "válido até",
    "valido ate",
    "data de validade",
    "prazo de validade",
    "vigência",
    "vigencia",
];

/// Context keywords that mark an issuance date.
const ISSUANCE_KEYWORDS: &[&str] = &[
    "emitido",
    "emitida",
    "emissão",
    "emissao",
    "expedido",
    "expedida",
    "expedição",
    "expedicao",
    "data",
];

// Labeled field followed by a date token, e.g. "VALIDADE: 15/03/2025".
static STRUCTURED_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:data\s+de\s+validade|prazo\s+de\s+validade|validade|vencimento|v[áa]lido\s+at[ée]|vig[êe]ncia|emiss[ãa]o)\s*:?\s*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4}|\d{4}[/\-]\d{1,2}[/\-]\d{1,2})",
    )
    .unwrap()
});

// Relative validity phrases: "válido por 90 dias", "prazo de 30 dias",
// "validade de 6 meses".
static RELATIVE_VALIDITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:v[áa]lid[oa]s?\s+por|prazo\s+de|validade\s+de)\s+(\d{1,3})\s+(dias?|m[êe]s(?:es)?)",
    )
    .unwrap()
});

/// Find the most plausible validity/expiration date in `text`.
///
/// Returns `None` when no stage produces a date — the document's validity
/// is unknown, not invalid.
pub fn find_validity_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }

    if let Some(date) = structured_field_date(text) {
        debug!("Validity date from structured field: {}", date);
        return Some(date);
    }

    if let Some(date) = relative_validity_date(text, today) {
        debug!("Validity date from relative phrase: {}", date);
        return Some(date);
    }

    if let Some(date) = scored_freetext_date(text, today) {
        debug!("Validity date from scored free text: {}", date);
        return Some(date);
    }

    None
}

/// Stage 1: explicit label immediately followed by a date.
fn structured_field_date(text: &str) -> Option<NaiveDate> {
    let caps = STRUCTURED_FIELD.captures(text)?;
    parse_date(caps.get(1)?.as_str())
}

/// Stage 2: "valid for N days/months" anchored to the nearest plausible
/// issuance date within ±300 chars of the phrase.
fn relative_validity_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = RELATIVE_VALIDITY.captures(text)?;
    let m = caps.get(0)?;
    let amount: u32 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2)?.as_str().to_lowercase();

    let window_start = floor_char_boundary(text, m.start().saturating_sub(300));
    let window_end = ceil_char_boundary(text, (m.end() + 300).min(text.len()));
    let window = &text[window_start..window_end];

    let issuance = best_issuance_date(window, today)?;

    let expiration = if unit.starts_with('d') {
        issuance + Duration::days(i64::from(amount))
    } else {
        issuance.checked_add_months(Months::new(amount))?
    };

    Some(expiration)
}

/// Pick the most plausible issuance date among candidates in `window`.
///
/// Future dates cannot be issuance dates and are penalized heavily;
/// dates older than six months are slightly penalized as likely stale.
fn best_issuance_date(window: &str, today: NaiveDate) -> Option<NaiveDate> {
    let candidates = extract_dates_with_context(window, 100);

    let mut best: Option<(i32, NaiveDate)> = None;
    for candidate in &candidates {
        let mut score = 0i32;
        let context_lower = candidate.context.to_lowercase();

        for keyword in ISSUANCE_KEYWORDS {
            if context_lower.contains(keyword) {
                score += 10;
                if keyword_near_date(&context_lower, keyword, candidate, 50) {
                    score += 5;
                }
                break;
            }
        }

        if candidate.date > today {
            score -= 20;
        } else if today - candidate.date > Duration::days(183) {
            score -= 3;
        }

        // Strictly-greater keeps the first candidate on ties.
        if best.map(|(s, _)| score > s).unwrap_or(true) {
            best = Some((score, candidate.date));
        }
    }

    best.map(|(_, date)| date)
}

/// Stage 3: score every date in the text by its surrounding context.
fn scored_freetext_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let candidates = extract_dates_with_context(text, 150);

    let mut best: Option<(i32, NaiveDate)> = None;
    for candidate in &candidates {
        let mut score = 0i32;
        let context_lower = candidate.context.to_lowercase();

        for keyword in VALIDITY_KEYWORDS {
            if context_lower.contains(keyword) {
                score += 10;
                if keyword_near_date(&context_lower, keyword, candidate, 50) {
                    score += 5;
                }
            }
        }

        if candidate.date > today {
            score += 8;
        } else if candidate.date == today {
            score += 3;
        }

        let days_diff = (candidate.date - today).num_days().abs();
        if days_diff < 365 * 2 {
            score += 5;
        } else if days_diff < 365 * 5 {
            score += 2;
        }

        if candidate.date < today && today - candidate.date > Duration::days(365) {
            score -= 10;
        }

        if best.map(|(s, _)| score > s).unwrap_or(true) {
            best = Some((score, candidate.date));
        }
    }

    best.map(|(score, date)| {
        debug!("Best free-text date {} (score {})", date, score);
        date
    })
}

/// Whether `keyword` occurs within `max_distance` bytes of the date token.
fn keyword_near_date(
    context_lower: &str,
    keyword: &str,
    candidate: &crate::parse::DateCandidate,
    max_distance: usize,
) -> bool {
    // Date position relative to the (lowercased) context. Lowercasing
    // Portuguese text preserves byte offsets closely enough for a
    // proximity check.
    let date_offset = candidate.start.saturating_sub(candidate.context_start);
    context_lower.match_indices(keyword).any(|(pos, _)| {
        let distance = if pos + keyword.len() <= date_offset {
            date_offset - (pos + keyword.len())
        } else {
            pos.saturating_sub(date_offset + (candidate.end - candidate.start))
        };
        distance <= max_distance
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    #[test]
    fn test_structured_field_wins() {
        let text = "Documento emitido em 01/01/2024. VALIDADE: 15/03/2025.";
        assert_eq!(
            find_validity_date(text, today()),
            NaiveDate::from_ymd_opt(2025, 3, 15)
        );
    }

    #[test]
    fn test_structured_field_iso() {
        let text = "Vencimento: 2025-06-30";
        assert_eq!(
            find_validity_date(text, today()),
            NaiveDate::from_ymd_opt(2025, 6, 30)
        );
    }

    #[test]
    fn test_relative_days_from_issuance() {
        let text = "Certidão emitida em 01/12/2024, válida por 90 dias a contar da emissão.";
        assert_eq!(
            find_validity_date(text, today()),
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
    }

    #[test]
    fn test_relative_months_from_issuance() {
        let text = "Expedido em 15/11/2024. Prazo de validade de 6 meses.";
        assert_eq!(
            find_validity_date(text, today()),
            NaiveDate::from_ymd_opt(2025, 5, 15)
        );
    }

    #[test]
    fn test_relative_ignores_future_issuance_candidate() {
        // The future date cannot be the issuance anchor.
        let text =
            "Reunião agendada para 01/06/2025. Documento emitido em 01/12/2024, válido por 30 dias.";
        assert_eq!(
            find_validity_date(text, today()),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
    }

    #[test]
    fn test_validity_context_beats_other_dates() {
        let text = "Assinado em 02/01/2023. Este documento é válido até 15/03/2025.";
        assert_eq!(
            find_validity_date(text, today()),
            NaiveDate::from_ymd_opt(2025, 3, 15)
        );
    }

    #[test]
    fn test_scenario_single_candidate() {
        let text = "condições gerais ... válido até 15/03/2025 ... sem outras datas";
        assert_eq!(
            find_validity_date(text, today()),
            NaiveDate::from_ymd_opt(2025, 3, 15)
        );
    }

    #[test]
    fn test_no_date_returns_none() {
        assert_eq!(find_validity_date("nenhuma data aqui", today()), None);
        assert_eq!(find_validity_date("", today()), None);
    }

    #[test]
    fn test_freetext_old_date_penalized() {
        // An old date with no validity context scores below a future one.
        let text = "Registro de 10/05/2020. Próxima renovação em 20/08/2025.";
        assert_eq!(
            find_validity_date(text, today()),
            NaiveDate::from_ymd_opt(2025, 8, 20)
        );
    }

    #[test]
    fn test_freetext_tie_keeps_first() {
        // Two equally scored future dates: extraction order decides.
        let text = "prazos 01/06/2025 e 01/07/2025";
        assert_eq!(
            find_validity_date(text, today()),
            NaiveDate::from_ymd_opt(2025, 6, 1)
        );
    }
}
