//! Similarity scoring between a requirement and a classified document.
//!
//! Pure and deterministic: the score accumulates category, synonym,
//! keyword, containment and canonical-pair signals, subtracts mismatch
//! penalties, scales by the document's classification confidence and
//! clamps to [0, 1].

use std::collections::HashSet;

use tracing::debug;

use licita_classify::ClassifiedDocument;
use licita_notice::BidRequirement;

/// Abbreviation → full-form synonyms for Brazilian procurement paperwork.
const SYNONYMS: &[(&str, &[&str])] = &[
    (
        "cnd",
        &[
            "certidão negativa",
            "certidao negativa",
            "certidão",
            "certidao",
        ],
    ),
    (
        "cndt",
        &[
            "certidão negativa de débitos trabalhistas",
            "certidao trabalhista",
            "cnd trabalhista",
            "cnd_trabalhista",
            "trabalhista",
        ],
    ),
    (
        "fgts",
        &[
            "regularidade do fgts",
            "regularidade fgts",
            "crf",
            "cnd fgts",
            "cnd_fgts",
        ],
    ),
    (
        "municipal",
        &[
            "prefeitura",
            "município",
            "municipio",
            "cnd municipal",
            "cnd_municipal",
        ],
    ),
    (
        "estadual",
        &["estado", "fazenda estadual", "cnd estadual", "cnd_estadual"],
    ),
    (
        "federal",
        &[
            "receita federal",
            "união",
            "uniao",
            "cnd federal",
            "cnd_federal",
        ],
    ),
    (
        "contrato social",
        &[
            "contrato_social",
            "ato constitutivo",
            "estatuto",
            "registro comercial",
            "registro_comercial",
        ],
    ),
    // Commercial registration can be satisfied by the corporate charter.
    (
        "registro comercial",
        &[
            "contrato_social",
            "contrato social",
            "ato constitutivo",
            "estatuto",
        ],
    ),
    ("cnpj", &["cadastro nacional", "pessoa juridica"]),
    (
        "falência",
        &[
            "falencia",
            "concordata",
            "recuperação",
            "recuperacao",
            "certidao_falencia",
            "certidao falencia",
        ],
    ),
    (
        "cível",
        &[
            "civel",
            "cnd_civel",
            "certidao civel",
            "certidao_civel",
            "judicial civel",
        ],
    ),
    (
        "atestado",
        &[
            "capacidade técnica",
            "capacidade tecnica",
            "atestado técnico",
            "atestado tecnico",
        ],
    ),
];

/// Canonical requirement↔document pairs for well-known families.
///
/// Ordered most-specific first; only the FIRST matching row fires. The
/// generic federal/estadual/municipal rows are mutually exclusive by
/// construction.
const EXACT_PAIRS: &[(&[&str], &[&str], f64)] = &[
    (&["cnpj"], &["cnpj"], 0.70),
    (
        &["contrato social", "contrato_social", "ato constitutivo"],
        &["contrato_social", "contrato social"],
        0.70,
    ),
    (
        &["registro comercial", "registro_comercial"],
        &["contrato_social", "contrato social"],
        0.70,
    ),
    (
        &["cnd federal", "cnd_federal", "federal"],
        &["cnd_federal", "cnd federal"],
        0.70,
    ),
    (
        &["cnd estadual", "cnd_estadual", "estadual"],
        &["cnd_estadual", "cnd estadual"],
        0.70,
    ),
    (
        &["cnd municipal", "cnd_municipal", "municipal"],
        &["cnd_municipal", "cnd municipal"],
        0.70,
    ),
    (
        &["cnd trabalhista", "cndt", "cnd_trabalhista", "trabalhista"],
        &["cnd_trabalhista", "cnd trabalhista", "trabalhista"],
        0.70,
    ),
    (
        &["fgts", "crf", "cnd_fgts"],
        &["cnd_fgts", "cnd fgts", "fgts"],
        0.70,
    ),
    (
        &[
            "falencia",
            "concordata",
            "certidao de falencia",
            "certidao falencia",
        ],
        &["certidao_falencia", "certidao falencia", "falencia concordata"],
        0.80,
    ),
    (
        &["civel", "certidao civel", "cnd civel"],
        &["cnd_civel", "cnd civel", "civel"],
        0.80,
    ),
    (&["alvara", "licença"], &["alvara", "licenca"], 0.70),
    (
        &["dispensa sanitaria", "dispensa_sanitaria"],
        &["dispensa_sanitaria", "dispensa sanitaria"],
        0.70,
    ),
];

/// Mismatch penalties: a requirement clearly of one type finding a document
/// clearly of an incompatible type. ALL matching rows apply — penalties are
/// meant to aggressively suppress cross-category false matches.
const MISMATCH_PENALTIES: &[(&[&str], &[&str], f64)] = &[
    (
        &["cnpj"],
        &["contrato", "social", "estatuto", "ata", "falencia", "civel", "cnd"],
        -0.9,
    ),
    (
        &["contrato", "social"],
        &["cnpj", "certidao", "cnd", "fgts", "trabalhista", "falencia", "civel"],
        -0.9,
    ),
    (
        &["registro comercial"],
        &["cnpj", "certidao", "cnd", "fgts", "trabalhista", "falencia", "civel"],
        -0.9,
    ),
    (
        &["falencia", "concordata"],
        &["fgts", "trabalhista", "estadual", "municipal", "federal", "cnd_civel", "civel"],
        -0.95,
    ),
    (
        &["civel"],
        &[
            "fgts",
            "trabalhista",
            "estadual",
            "municipal",
            "federal",
            "falencia_concordata",
            "falencia concordata",
        ],
        -0.95,
    ),
    (
        &["fgts"],
        &["civel", "falencia", "cnpj", "contrato", "estadual", "municipal"],
        -0.9,
    ),
    (
        &["trabalhista", "cndt"],
        &["civel", "falencia", "cnpj", "contrato", "fgts", "estadual", "municipal", "federal"],
        -0.9,
    ),
    (
        &["federal"],
        &["estadual", "municipal", "civel", "falencia", "fgts", "trabalhista"],
        -0.9,
    ),
    (
        &["estadual"],
        &["federal", "municipal", "civel", "falencia", "fgts", "trabalhista"],
        -0.9,
    ),
    (
        &["municipal"],
        &["federal", "estadual", "civel", "falencia", "fgts", "trabalhista"],
        -0.9,
    ),
];

/// Compute the similarity between `requirement` and `document` in [0, 1].
pub fn similarity(requirement: &BidRequirement, document: &ClassifiedDocument) -> f64 {
    let mut score = 0.0f64;

    // Category match is the strongest single signal.
    if requirement.category == document.category {
        score += 0.5;
    }

    let req_name = requirement.name.to_lowercase();
    let doc_type = document.document_type.to_lowercase();
    let filename = document.file_name.to_lowercase();
    let filename_norm = normalize_separators(&filename);

    // Synonym and abbreviation bonuses.
    for (abbrev, full_terms) in SYNONYMS {
        let req_mentions =
            req_name.contains(abbrev) || full_terms.iter().any(|t| req_name.contains(t));
        if !req_mentions {
            continue;
        }

        if filename_norm.contains(abbrev) || doc_type.contains(abbrev) {
            score += 0.35;
        } else if full_terms
            .iter()
            .any(|t| filename_norm.contains(t) || doc_type.contains(t))
        {
            score += 0.30;
        }

        // Reinforcing bonus, at most once per table entry.
        if req_name.contains(abbrev) {
            for term in *full_terms {
                if filename_norm.contains(term) {
                    score += 0.25;
                    break;
                }
            }
        }
    }

    // Jaccard keyword similarity over name vs type+filename tokens.
    let req_keywords: HashSet<&str> = req_name.split_whitespace().collect();
    let doc_keywords: HashSet<&str> = doc_type
        .split_whitespace()
        .chain(filename_norm.split_whitespace())
        .collect();

    if !req_keywords.is_empty() && !doc_keywords.is_empty() {
        let intersection = req_keywords.intersection(&doc_keywords).count();
        let union = req_keywords.union(&doc_keywords).count();
        if union > 0 {
            score += (intersection as f64 / union as f64) * 0.3;
        }
    }

    // Phrase containment.
    if doc_type.contains(&req_name) || req_name.contains(&doc_type) {
        score += 0.2;
    }
    if filename_norm.contains(&req_name) {
        score += 0.25;
    } else if req_keywords
        .iter()
        .any(|w| w.len() > 3 && filename_norm.contains(w))
    {
        score += 0.15;
    }

    // Exact normalized-name match against the filename stem.
    let filename_stem = normalize_separators(&strip_extension(&filename));
    let req_normalized = normalize_separators(&req_name);

    if filename_stem == req_normalized {
        score += 0.50;
    } else if filename_stem.contains(&req_normalized) || req_normalized.contains(&filename_stem) {
        score += 0.20;
    }

    // Canonical exact pairs: only the first matching row fires.
    for (req_patterns, doc_patterns, boost) in EXACT_PAIRS {
        let req_has = req_patterns.iter().any(|p| req_name.contains(p));
        let doc_has = doc_patterns.iter().any(|p| filename_norm.contains(p));
        if req_has && doc_has {
            score += boost;
            break;
        }
    }

    // Mismatch penalties: every matching row applies.
    for (req_patterns, doc_patterns, penalty) in MISMATCH_PENALTIES {
        let req_has = req_patterns.iter().any(|p| req_name.contains(p));
        let doc_has = doc_patterns.iter().any(|p| filename_norm.contains(p));
        if req_has && doc_has {
            debug!(
                "Mismatch penalty applied: '{}' vs '{}'",
                req_name, filename_norm
            );
            score += penalty;
        }
    }

    // Classification certainty scales the whole score.
    score *= document.confidence;

    let final_score = score.clamp(0.0, 1.0);
    debug!(
        "Similarity: '{}' <-> '{}' = {:.3}",
        requirement.name, document.file_name, final_score
    );

    final_score
}

fn normalize_separators(text: &str) -> String {
    text.replace(['_', '-'], " ")
}

fn strip_extension(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem.to_string(),
        _ => filename.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use licita_core::Category;

    fn req(name: &str, category: Category) -> BidRequirement {
        BidRequirement::new(name, category)
    }

    fn doc(filename: &str, doc_type: &str, category: Category, confidence: f64) -> ClassifiedDocument {
        ClassifiedDocument::new(filename, doc_type, category, confidence)
    }

    #[test]
    fn test_category_bonus_alone() {
        let r = req("documento qualquer", Category::Other);
        let d = doc("xyz.pdf", "arquivo avulso", Category::Other, 1.0);
        let score = similarity(&r, &d);
        assert!(score >= 0.5);
        assert!(score <= 1.0);
    }

    #[test]
    fn test_category_mismatch_no_bonus() {
        let r = req("documento qualquer", Category::TaxCompliance);
        let d = doc("xyz.pdf", "arquivo avulso", Category::Other, 1.0);
        assert!(similarity(&r, &d) < 0.5);
    }

    #[test]
    fn test_synonym_abbreviation_in_filename() {
        // "cnd" in requirement and filename, no category match.
        let r = req("cnd", Category::Other);
        let d = doc("cnd.pdf", "", Category::TaxCompliance, 1.0);
        // 0.35 synonym + other small signals, but no category bonus.
        let score = similarity(&r, &d);
        assert!(score > 0.35);
    }

    #[test]
    fn test_synonym_full_term() {
        let r = req("certidão negativa", Category::Other);
        let d = doc(
            "documento_generico.pdf",
            "certidão negativa",
            Category::Other,
            1.0,
        );
        // Requirement mentions a "cnd" synonym; document type carries it too.
        let score = similarity(&r, &d);
        assert!(score > 0.5);
    }

    #[test]
    fn test_jaccard_scaling() {
        // Identical token sets, no synonym/pair involvement.
        let r = req("alvara funcionamento", Category::Other);
        let d = doc(
            "alvara_funcionamento.pdf",
            "alvara funcionamento",
            Category::Other,
            1.0,
        );
        // Jaccard is diluted by the ".pdf"-bearing filename token but the
        // exact-stem bonus fires.
        let score = similarity(&r, &d);
        assert!(score > 0.9);
    }

    #[test]
    fn test_exact_stem_match_bonus() {
        let r = req("dispensa sanitaria", Category::Other);
        let d = doc("dispensa_sanitaria.pdf", "", Category::Other, 1.0);
        // stem "dispensa sanitaria" == normalized requirement → +0.50,
        // plus containment and the canonical pair.
        let score = similarity(&r, &d);
        assert!(score > 0.9);
    }

    #[test]
    fn test_exact_pair_first_match_only() {
        // Requirement mentioning both falência and civel patterns against a
        // falência filename: only the falência row (0.80) fires, not both.
        let r = req("certidao de falencia e civel", Category::Other);
        let d = doc("certidao_falencia.pdf", "", Category::Other, 1.0);
        let with_both = similarity(&r, &d);

        let r_single = req("certidao de falencia", Category::Other);
        let single = similarity(&r_single, &d);

        // The extra "civel" token cannot add a second exact-pair boost;
        // scores stay in the same clamped band.
        assert!(with_both <= 1.0 && single <= 1.0);
        assert!(single > 0.8);
    }

    #[test]
    fn test_scenario_a_cnpj() {
        let r = req("CNPJ", Category::LegalQualification);
        let d = doc(
            "comprovante_cnpj.pdf",
            "CNPJ",
            Category::LegalQualification,
            1.0,
        );
        assert!(similarity(&r, &d) > 0.9);
    }

    #[test]
    fn test_scenario_b_federal_vs_estadual() {
        let r = req("CND Federal", Category::TaxCompliance);
        let d = doc(
            "cnd_estadual.pdf",
            "CND Estadual",
            Category::TaxCompliance,
            0.9,
        );
        assert!(similarity(&r, &d) < 0.5);
    }

    #[test]
    fn test_penalty_cnpj_vs_contrato_social() {
        let r = req("cnpj", Category::LegalQualification);
        let d = doc(
            "contrato_social.pdf",
            "Contrato Social",
            Category::LegalQualification,
            1.0,
        );
        assert!(similarity(&r, &d) < 0.5);
    }

    #[test]
    fn test_single_penalty_row_fires_once() {
        // Requirement of one certificate kind against an incompatible
        // filename: exactly one penalty row fires and the score drops
        // below the acceptance threshold.
        let r = req("cnd trabalhista", Category::TaxCompliance);
        let d = doc(
            "certidao_civel_falencia.pdf",
            "Certidão",
            Category::TaxCompliance,
            1.0,
        );
        assert!(similarity(&r, &d) < 0.5);
    }

    #[test]
    fn test_stacked_penalties_apply_together() {
        // Requirement mentioning both fgts and trabalhista against a civel
        // filename: the fgts row AND the trabalhista row both fire
        // (−0.9 each), zeroing the score despite the category match.
        let r = req("regularidade fgts e cnd trabalhista", Category::TaxCompliance);
        let d = doc(
            "cnd_civel.pdf",
            "Certidão Cível",
            Category::TaxCompliance,
            1.0,
        );
        assert_eq!(similarity(&r, &d), 0.0);
    }

    #[test]
    fn test_confidence_scales_score() {
        let r = req("CNPJ", Category::LegalQualification);
        let high = doc(
            "comprovante_cnpj.pdf",
            "CNPJ",
            Category::LegalQualification,
            1.0,
        );
        let low = doc(
            "comprovante_cnpj.pdf",
            "CNPJ",
            Category::LegalQualification,
            0.3,
        );
        assert!(similarity(&r, &high) > similarity(&r, &low));
        assert!(similarity(&r, &low) < 0.75);
    }

    #[test]
    fn test_empty_requirement_name_in_range() {
        let r = req("", Category::Other);
        let d = doc("qualquer.pdf", "tipo", Category::Other, 1.0);
        let score = similarity(&r, &d);
        assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn test_empty_filename_in_range() {
        let r = req("cnd federal", Category::TaxCompliance);
        let d = doc("", "", Category::TaxCompliance, 1.0);
        let score = similarity(&r, &d);
        assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn test_zero_confidence_zeroes_score() {
        let r = req("CNPJ", Category::LegalQualification);
        let d = doc(
            "comprovante_cnpj.pdf",
            "CNPJ",
            Category::LegalQualification,
            0.0,
        );
        assert_eq!(similarity(&r, &d), 0.0);
    }

    #[test]
    fn test_deterministic() {
        let r = req("CND Trabalhista", Category::TaxCompliance);
        let d = doc(
            "cnd_trabalhista.pdf",
            "CNDT",
            Category::TaxCompliance,
            0.85,
        );
        let first = similarity(&r, &d);
        for _ in 0..10 {
            assert_eq!(similarity(&r, &d), first);
        }
    }
}
