//! Rule-based pattern tables for Brazilian bid notices.

use licita_core::Category;

/// Document patterns commonly demanded by editais, per category.
///
/// Order matters: categories and patterns are scanned top to bottom and
/// the first occurrence of each pattern produces one requirement.
pub const DOCUMENT_PATTERNS: &[(Category, &[&str])] = &[
    (
        Category::LegalQualification,
        &[
            "contrato social",
            "ata de assembleia",
            "registro comercial",
            "inscrição comercial",
            "cnpj",
            "documento de constituição",
        ],
    ),
    (
        Category::TaxCompliance,
        &[
            "certidão negativa",
            "certidão de regularidade fiscal",
            "certidão de regularidade da fazenda",
            "regularidade fgts",
            "certidão trabalhista",
            "cnd",
            "certidão federal",
            "certidão estadual",
            "certidão municipal",
        ],
    ),
    (
        Category::TechnicalQualification,
        &[
            "atestado de capacidade técnica",
            "certidão de acervo técnico",
            "registro profissional",
            "comprovação de aptidão",
            "experiência anterior",
            "certidão cat",
        ],
    ),
    (
        Category::EconomicQualification,
        &[
            "balanço patrimonial",
            "demonstração contábil",
            "certidão de falência",
            "patrimônio líquido",
            "capital social",
            "índice de liquidez",
        ],
    ),
];

/// Title-case a pattern into its canonical requirement label.
pub fn canonical_label(pattern: &str) -> String {
    pattern
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
