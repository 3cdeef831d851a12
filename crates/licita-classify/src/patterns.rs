//! Filename pattern tables: category keywords and expiration policy lists.

use licita_core::Category;

/// Filename keywords per category, scanned in this order.
pub const FILENAME_PATTERNS: &[(Category, &[&str])] = &[
    (
        Category::LegalQualification,
        &[
            "contrato",
            "cnpj",
            "constituicao",
            "estatuto",
            "ata",
            "registro",
            "social",
            "assembleia",
        ],
    ),
    (
        Category::TaxCompliance,
        &[
            "certidao",
            "cnd",
            "regularidade",
            "fiscal",
            "fazenda",
            "fgts",
            "inss",
            "trabalhista",
            "federal",
            "estadual",
            "municipal",
        ],
    ),
    (
        Category::TechnicalQualification,
        &[
            "atestado",
            "capacidade",
            "tecnica",
            "acervo",
            "cat",
            "registro",
            "profissional",
            "experiencia",
        ],
    ),
    (
        Category::EconomicQualification,
        &[
            "balanco",
            "contabil",
            "demonstracao",
            "patrimonio",
            "falencia",
            "liquidez",
            "capital",
        ],
    ),
];

/// Documents that never expire: corporate charters, registrations,
/// meeting minutes, technical attestations.
pub const NON_EXPIRING_PATTERNS: &[&str] = &[
    "contrato_social",
    "contrato social",
    "cnpj",
    "ata",
    "estatuto",
    "atestado",
    "registro_comercial",
    "registro comercial",
];

/// Documents whose acceptance window runs from their emission date
/// (judicial, bankruptcy and civil certificates).
pub const ISSUANCE_DATED_PATTERNS: &[&str] =
    &["falencia", "falência", "concordata", "judicial", "civel", "cível"];

/// First expiration-policy list the filename matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirationPolicy {
    NonExpiring,
    IssuanceDated,
    Generic,
}

pub fn expiration_policy(filename_lower: &str) -> ExpirationPolicy {
    if NON_EXPIRING_PATTERNS
        .iter()
        .any(|p| filename_lower.contains(p))
    {
        return ExpirationPolicy::NonExpiring;
    }
    if ISSUANCE_DATED_PATTERNS
        .iter()
        .any(|p| filename_lower.contains(p))
    {
        return ExpirationPolicy::IssuanceDated;
    }
    ExpirationPolicy::Generic
}
